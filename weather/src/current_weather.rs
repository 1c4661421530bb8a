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

use crate::Float;
use calendar::Date;
use serde::{Deserialize, Serialize};

/// The weather conditions at a particular moment, as consumed by the
/// thermal model. Solar geometry is resolved outside of the simulation:
/// surfaces carry static incidence coefficients applied to the global
/// horizontal irradiance reported here.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// The date of the current weather
    pub date: Date,

    /// Exterior dry bulb temperature, in C
    pub dry_bulb_temperature: Float,

    /// Exterior relative humidity, in fractions (0-1)
    pub relative_humidity: Float,

    /// Global horizontal solar irradiance, in W/m2
    pub global_horizontal_radiation: Float,
}

impl CurrentWeather {
    /// Interpolates the data between two weather lines
    pub fn interpolate(&self, other: &Self, x: Float) -> Self {
        let interp = |a: Float, b: Float| a + x * (b - a);
        Self {
            date: self.date.interpolate(other.date, x),
            dry_bulb_temperature: interp(
                self.dry_bulb_temperature,
                other.dry_bulb_temperature,
            ),
            relative_humidity: interp(self.relative_humidity, other.relative_humidity),
            global_horizontal_radiation: interp(
                self.global_horizontal_radiation,
                other.global_horizontal_radiation,
            ),
        }
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_interpolate() {
        let one = CurrentWeather {
            date: Date {
                month: 1,
                day: 1,
                hour: 0.0,
            },
            dry_bulb_temperature: 22.,
            relative_humidity: 0.4,
            global_horizontal_radiation: 0.,
        };
        let other = CurrentWeather {
            date: Date {
                month: 1,
                day: 1,
                hour: 1.0,
            },
            dry_bulb_temperature: 33.,
            relative_humidity: 0.6,
            global_horizontal_radiation: 100.,
        };

        let mid = one.interpolate(&other, 0.5);
        assert!((mid.dry_bulb_temperature - 27.5).abs() < 1e-6);
        assert!((mid.relative_humidity - 0.5).abs() < 1e-6);
        assert!((mid.global_horizontal_radiation - 50.).abs() < 1e-6);
        assert!((mid.date.hour - 0.5).abs() < 1e-6);
    }
}
