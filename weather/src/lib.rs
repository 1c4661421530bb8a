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

#![deny(missing_docs)]

//! A trait for getting weather data during a simulation, plus a
//! pre-computed weather series and a synthetic (schedule-driven)
//! implementation.
//!
//! Weather-file parsing lives outside this workspace: series are
//! supplied already computed (e.g., deserialized from JSON).

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(feature = "float")]
pub type Float = f32;

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(not(feature = "float"))]
pub type Float = f64;

/// Data associated to the specific weather conditions at a particular moment
pub mod current_weather;
pub use crate::current_weather::CurrentWeather;

/// Data associated to a specific Location
pub mod location;
pub use crate::location::Location;

/// Allows creating weathers that can be used for highly-specific
/// simulation. E.g., having a sinusoidal exterior temperature with no
/// sun.
pub mod synthetic_weather;
pub use crate::synthetic_weather::SyntheticWeather;

pub use calendar::Date;
use serde::{Deserialize, Serialize};

/// The basic trait defining a Weather that can be used in
/// Building Simulation
pub trait WeatherTrait: Sync {
    /// Retrieves a [`CurrentWeather`] object based on the date.
    fn get_weather_data(&self, date: Date) -> CurrentWeather;
}

/// A structure containing a pre-computed weather series
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Weather {
    /// The weather data
    pub data: Vec<CurrentWeather>,

    /// Information about the location of the weather
    pub location: Location,
}

impl Weather {
    /// Gets a weather line corresponding to a specific [`Date`].
    ///
    /// It interpolates if necessary
    pub fn find_weather_line(&self, date: Date) -> CurrentWeather {
        match self.data.binary_search_by(|x| x.date.cmp(&date)) {
            Ok(i) => self.data[i],
            Err(i) => {
                let n = self.data.len();
                if i == 0 || i == n {
                    // Date is between the last and the first dates in
                    // the data, so we interpolate across the new year.
                    let last_n = self.data[n - 1].date.day_of_year();
                    let first_n = self.data[0].date.day_of_year() + 365.;
                    let mut date_n = date.day_of_year();
                    if date_n < last_n {
                        date_n += 365.;
                    }
                    let x = (date_n - last_n) / (first_n - last_n);
                    self.data[n - 1].interpolate(&self.data[0], x)
                } else {
                    let before_n = self.data[i - 1].date.day_of_year();
                    let after_n = self.data[i].date.day_of_year();
                    let date_n = date.day_of_year();
                    let x = (date_n - before_n) / (after_n - before_n);
                    self.data[i - 1].interpolate(&self.data[i], x)
                }
            }
        }
    }

    /// Sorts the data by date
    pub fn sort_data(&mut self) {
        self.data.sort_by(|a, b| a.date.cmp(&b.date));
    }
}

impl WeatherTrait for Weather {
    fn get_weather_data(&self, date: Date) -> CurrentWeather {
        self.find_weather_line(date)
    }
}
