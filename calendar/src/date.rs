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

/// The number of days of each month (non-leap year;
/// leap years are not considered in this library)
const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A date, with a month, a day and an hour (with decimals).
/// There is no year: annual simulations wrap around from
/// December 31st to January 1st.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    /// The month, from 1 to 12
    pub month: u8,

    /// The day of the month, from 1 to the length of the month
    pub day: u8,

    /// The hour, from 0.0 to 23.99...
    pub hour: Float,
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let h = self.hour.floor();
        let m = ((self.hour - h) * 60.).round();
        write!(f, "{:02}/{:02} {:02}:{:02}", self.month, self.day, h as u8, m as u8)
    }
}

impl Date {
    /// The day of the year represented by this date, in days
    /// (with decimals) since January 1st at 00:00. January 1st at
    /// noon is, therefore, `0.5`.
    pub fn day_of_year(&self) -> Float {
        let mut days: usize = 0;
        for month in 1..self.month {
            days += DAYS_PER_MONTH[month as usize - 1] as usize;
        }
        days += self.day as usize - 1;
        days as Float + self.hour / 24.
    }

    /// Builds a `Date` back from a day of the year (as produced
    /// by [`Date::day_of_year`]). Values beyond 365 wrap around
    /// into the next year.
    pub fn from_day_of_year(mut n: Float) -> Self {
        while n >= 365. {
            n -= 365.;
        }
        while n < 0. {
            n += 365.;
        }
        let mut day = n.floor() as usize;
        let hour = 24. * (n - day as Float);
        let mut month: u8 = 1;
        for days_in_month in DAYS_PER_MONTH {
            if day < days_in_month as usize {
                break;
            }
            day -= days_in_month as usize;
            month += 1;
        }
        Self {
            month,
            day: day as u8 + 1,
            hour,
        }
    }

    /// Returns the date located `seconds` after this one,
    /// wrapping around the end of the year if needed.
    pub fn add_seconds(&self, seconds: Float) -> Self {
        Self::from_day_of_year(self.day_of_year() + seconds / 86400.)
    }

    /// Compares two dates based on their day of the year.
    pub fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let a = self.day_of_year();
        let b = other.day_of_year();
        if (a - b).abs() < 1e-9 {
            std::cmp::Ordering::Equal
        } else if a < b {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    }

    /// Checks whether this date comes after `other`
    pub fn is_later(&self, other: Self) -> bool {
        self.cmp(&other) == std::cmp::Ordering::Greater
    }

    /// Interpolates between two dates. `x` is the interpolation
    /// fraction: `0.0` returns `self`, `1.0` returns `other`.
    pub fn interpolate(&self, other: Self, x: Float) -> Self {
        let a = self.day_of_year();
        let mut b = other.day_of_year();
        if b < a {
            // crosses the end of the year
            b += 365.;
        }
        Self::from_day_of_year(a + x * (b - a))
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_day_of_year() {
        let d = Date {
            month: 1,
            day: 1,
            hour: 0.,
        };
        assert!(d.day_of_year().abs() < 1e-9);

        let d = Date {
            month: 1,
            day: 1,
            hour: 12.,
        };
        assert!((d.day_of_year() - 0.5).abs() < 1e-9);

        let d = Date {
            month: 2,
            day: 1,
            hour: 0.,
        };
        assert!((d.day_of_year() - 31.).abs() < 1e-9);

        let d = Date {
            month: 12,
            day: 31,
            hour: 12.,
        };
        assert!((d.day_of_year() - 364.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_day_of_year() {
        for n in [0.0, 0.75, 31.5, 59.25, 200.0, 364.99] {
            let d = Date::from_day_of_year(n);
            assert!(
                (d.day_of_year() - n).abs() < 1e-6,
                "n = {} | got {}",
                n,
                d.day_of_year()
            );
        }

        // wraps
        let d = Date::from_day_of_year(365.5);
        assert_eq!(d.month, 1);
        assert_eq!(d.day, 1);
        assert!((d.hour - 12.).abs() < 1e-6);
    }

    #[test]
    fn test_add_seconds() {
        let d = Date {
            month: 1,
            day: 31,
            hour: 23.75,
        };
        let next = d.add_seconds(900.);
        assert_eq!(next.month, 2);
        assert_eq!(next.day, 1);
        assert!(next.hour.abs() < 1e-6);

        // wrap around the year
        let d = Date {
            month: 12,
            day: 31,
            hour: 23.75,
        };
        let next = d.add_seconds(900.);
        assert_eq!(next.month, 1);
        assert_eq!(next.day, 1);
    }

    #[test]
    fn test_cmp() {
        let a = Date {
            month: 3,
            day: 1,
            hour: 0.,
        };
        let b = Date {
            month: 3,
            day: 1,
            hour: 0.25,
        };
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Less);
        assert_eq!(b.cmp(&a), std::cmp::Ordering::Greater);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
        assert!(b.is_later(a));
    }

    #[test]
    fn test_interpolate() {
        let a = Date {
            month: 1,
            day: 1,
            hour: 0.,
        };
        let b = Date {
            month: 1,
            day: 2,
            hour: 0.,
        };
        let mid = a.interpolate(b, 0.5);
        assert_eq!(mid.day, 1);
        assert!((mid.hour - 12.).abs() < 1e-6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let v = r#"{"month": 9,"day": 4, "hour": 21}"#;
        let d: Date = serde_json::from_str(v).unwrap();
        assert_eq!(d.month, 9);
        assert_eq!(d.day, 4);
        assert!((d.hour - 21.).abs() < 1e-5);
    }
}
