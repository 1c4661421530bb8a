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

use crate::Schedule;
use calendar::Date;

/// A daily schedule given as 24 hourly values, indexed by the integer
/// part of the date's hour. The same pattern repeats every day of
/// the year.
pub struct HourlySchedule<T> {
    values: [T; 24],
}

impl<T> HourlySchedule<T>
where
    T: Copy + Sync + Send,
{
    /// Creates a new schedule from its 24 hourly values
    pub fn new(values: [T; 24]) -> Self {
        Self { values }
    }

    /// Creates a schedule returning `active` between `start` hour
    /// (inclusive) and `end` hour (exclusive), and `inactive` otherwise
    pub fn between(start: usize, end: usize, active: T, inactive: T) -> Self {
        let mut values = [inactive; 24];
        for (h, v) in values.iter_mut().enumerate() {
            if h >= start && h < end {
                *v = active;
            }
        }
        Self { values }
    }
}

impl<T> Schedule<T> for HourlySchedule<T>
where
    T: Copy + Sync + Send,
{
    fn get(&self, date: Date) -> Option<T> {
        let mut h = date.hour.floor() as usize;
        if h > 23 {
            h = 23;
        }
        Some(self.values[h])
    }
}

/* *********** */
/*    TESTS    */
/* *********** */
