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

/// Standard atmospheric pressure, in Pa
pub const ATMOSPHERIC_PRESSURE: Float = 101_325.;

/// The ratio between the molecular weights of water and dry air
const EPSILON: Float = 0.622;

/// The saturation pressure of water vapour over liquid water at a
/// certain dry bulb temperature (in C), in Pa, following Tetens'
/// equation.
pub fn saturation_pressure(t: Float) -> Float {
    610.78 * (17.2694 * t / (t + 237.3)).exp()
}

/// The humidity ratio (kg of water per kg of dry air) of air at a
/// certain dry bulb temperature (in C) and relative humidity (in
/// fractions, 0-1).
pub fn humidity_ratio(t: Float, relative_humidity: Float) -> Float {
    let pv = relative_humidity * saturation_pressure(t);
    EPSILON * pv / (ATMOSPHERIC_PRESSURE - pv)
}

/// The relative humidity (in fractions) of air at a certain dry bulb
/// temperature (in C) and humidity ratio (kg/kg). Can exceed 1 for
/// super-saturated inputs.
pub fn relative_humidity(t: Float, w: Float) -> Float {
    let pv = w * ATMOSPHERIC_PRESSURE / (EPSILON + w);
    pv / saturation_pressure(t)
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_saturation_pressure() {
        // around 2.34 kPa at 20 C and 0.61 kPa at 0 C
        assert!((saturation_pressure(20.) - 2338.).abs() < 10.);
        assert!((saturation_pressure(0.) - 610.78).abs() < 1.);
    }

    #[test]
    fn test_humidity_ratio() {
        // saturated air at 20 C holds close to 14.7 g/kg
        let w = humidity_ratio(20., 1.0);
        assert!((w - 0.0147).abs() < 0.0005, "found {}", w);

        // dry air holds nothing
        assert!(humidity_ratio(20., 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        for t in [0., 10., 25., 35.] {
            for rh in [0.2, 0.5, 0.9] {
                let w = humidity_ratio(t, rh);
                let back = relative_humidity(t, w);
                assert!((back - rh).abs() < 1e-9, "t={} rh={} back={}", t, rh, back);
            }
        }
    }
}
