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

//! Schedules: values that change over the year (occupancy, lighting,
//! window operation, and so on), queried by [`Date`].

use calendar::Date;

mod constant;
pub use crate::constant::ScheduleConstant;

mod hourly;
pub use crate::hourly::HourlySchedule;

/// Anything capable of producing a value for a certain date.
pub trait Schedule<T>: Sync + Send {
    /// Retrieves the value of the schedule at a certain date, if any
    fn get(&self, date: Date) -> Option<T>;
}

/// A schedule that never returns a value. Useful as a default.
pub struct EmptySchedule;

impl<T> Schedule<T> for EmptySchedule {
    fn get(&self, _date: Date) -> Option<T> {
        None
    }
}

/* *********** */
/*    TESTS    */
/* *********** */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let date = Date {
            month: 4,
            day: 2,
            hour: 9.,
        };
        let s = EmptySchedule;
        let v: Option<f64> = s.get(date);
        assert!(v.is_none());
    }
}
