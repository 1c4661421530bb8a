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

use crate::{Date, Float};

/// A period of time, iterable in fixed timesteps of `dt` seconds.
///
/// Periods that end before they start are understood as crossing
/// the end of the year (e.g., December 20th to January 10th).
#[derive(Debug, Clone, Copy)]
pub struct Period {
    /// The first date of the period
    pub start: Date,

    /// The last date of the period
    pub end: Date,

    /// The timestep, in seconds
    pub dt: Float,
}

impl Period {
    /// Creates a new period between `start` and `end`, iterable
    /// every `dt` seconds.
    pub fn new(start: Date, end: Date, dt: Float) -> Self {
        Self { start, end, dt }
    }

    /// The number of timesteps contained in this period.
    pub fn n_steps(&self) -> usize {
        let a = self.start.day_of_year();
        let mut b = self.end.day_of_year();
        if b < a {
            b += 365.;
        }
        ((b - a) * 86400. / self.dt).floor() as usize + 1
    }
}

/// Iterates the dates of a [`Period`]
pub struct PeriodIterator {
    period: Period,
    next_step: usize,
    n_steps: usize,
}

impl IntoIterator for Period {
    type Item = Date;
    type IntoIter = PeriodIterator;

    fn into_iter(self) -> Self::IntoIter {
        PeriodIterator {
            n_steps: self.n_steps(),
            period: self,
            next_step: 0,
        }
    }
}

impl Iterator for PeriodIterator {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_step >= self.n_steps {
            return None;
        }
        let date = self
            .period
            .start
            .add_seconds(self.next_step as Float * self.period.dt);
        self.next_step += 1;
        Some(date)
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_n_steps() {
        let start = Date {
            month: 1,
            day: 1,
            hour: 0.,
        };
        let end = Date {
            month: 1,
            day: 2,
            hour: 0.,
        };
        // one day in 15-minute steps, both ends included
        let p = Period::new(start, end, 900.);
        assert_eq!(p.n_steps(), 96 + 1);
    }

    #[test]
    fn test_iterate() {
        let start = Date {
            month: 1,
            day: 1,
            hour: 0.,
        };
        let end = Date {
            month: 1,
            day: 1,
            hour: 2.,
        };
        let p = Period::new(start, end, 1800.);
        let dates: Vec<Date> = p.into_iter().collect();
        assert_eq!(dates.len(), 5);
        assert!((dates[1].hour - 0.5).abs() < 1e-6);
        assert!((dates[4].hour - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_iterate_over_new_year() {
        let start = Date {
            month: 12,
            day: 31,
            hour: 23.,
        };
        let end = Date {
            month: 1,
            day: 1,
            hour: 1.,
        };
        let p = Period::new(start, end, 3600.);
        let dates: Vec<Date> = p.into_iter().collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[1].month, 1);
        assert_eq!(dates[1].day, 1);
    }
}
