/*
MIT License
Copyright (c)  Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use crate::current_weather::CurrentWeather;
use crate::{Float, WeatherTrait};
use calendar::Date;
use schedule::{EmptySchedule, Schedule};

/// A factory of [`CurrentWeather`] objects, where each field is driven
/// by its own [`Schedule`]. Fields whose schedule returns nothing
/// default to zero.
pub struct SyntheticWeather {
    /// A schedule producing the dry bulb temperature, in C
    pub dry_bulb_temperature: Box<dyn Schedule<Float>>,

    /// A schedule producing the relative humidity, in fractions (0-1)
    pub relative_humidity: Box<dyn Schedule<Float>>,

    /// A schedule producing the global horizontal irradiance, in W/m2
    pub global_horizontal_radiation: Box<dyn Schedule<Float>>,
}

impl std::default::Default for SyntheticWeather {
    fn default() -> Self {
        Self {
            dry_bulb_temperature: Box::new(EmptySchedule),
            relative_humidity: Box::new(EmptySchedule),
            global_horizontal_radiation: Box::new(EmptySchedule),
        }
    }
}

impl WeatherTrait for SyntheticWeather {
    fn get_weather_data(&self, date: Date) -> CurrentWeather {
        CurrentWeather {
            date,
            dry_bulb_temperature: self.dry_bulb_temperature.get(date).unwrap_or(0.0),
            relative_humidity: self.relative_humidity.get(date).unwrap_or(0.0),
            global_horizontal_radiation: self
                .global_horizontal_radiation
                .get(date)
                .unwrap_or(0.0),
        }
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use schedule::ScheduleConstant;

    #[test]
    fn test_get_weather_data() {
        let mut w = SyntheticWeather::default();
        w.dry_bulb_temperature = Box::new(ScheduleConstant::new(3.0));
        w.relative_humidity = Box::new(ScheduleConstant::new(0.5));

        let data = w.get_weather_data(Date {
            month: 7,
            day: 21,
            hour: 11.5,
        });
        assert!((data.dry_bulb_temperature - 3.0).abs() < 1e-6);
        assert!((data.relative_humidity - 0.5).abs() < 1e-6);
        // unset schedules default to zero
        assert!(data.global_horizontal_radiation.abs() < 1e-6);
    }
}
