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
use model::EquipmentKind;

/// The relative humidity assumed when deriving comfort setpoints
const SETPOINT_RELATIVE_HUMIDITY: Float = 0.5;

/// The personal and air-movement assumptions behind a comfort
/// calculation. Different equipment implies different assumptions:
/// convective units move the room's air, radiant panels barely do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortParameters {
    /// The clothing insulation, in clo
    pub clothing: Float,

    /// The metabolic rate, in met
    pub metabolic_rate: Float,

    /// The relative air velocity, in m/s
    pub air_velocity: Float,
}

impl ComfortParameters {
    /// The assumptions for a heated room: winter clothing, seated
    /// activity, and the air movement the equipment induces
    pub fn heating(kind: &EquipmentKind) -> Self {
        let air_velocity = match kind {
            EquipmentKind::Radiant { .. } => 0.1,
            EquipmentKind::Convective { .. } => 0.2,
        };
        Self {
            clothing: 1.0,
            metabolic_rate: 1.2,
            air_velocity,
        }
    }

    /// The assumptions for a cooled room: summer clothing, seated
    /// activity, and the air movement the equipment induces
    pub fn cooling(kind: &EquipmentKind) -> Self {
        let air_velocity = match kind {
            EquipmentKind::Radiant { .. } => 0.1,
            EquipmentKind::Convective { .. } => 0.2,
        };
        Self {
            clothing: 0.5,
            metabolic_rate: 1.2,
            air_velocity,
        }
    }
}

/// Fanger's Predicted Mean Vote for a certain air temperature, mean
/// radiant temperature (both in C), relative humidity (fractions) and
/// personal parameters.
///
/// The clothing surface temperature is solved iteratively; an input
/// far outside the comfort model's domain makes that iteration fail,
/// which is reported as an error.
pub fn pmv(
    t_air: Float,
    t_radiant: Float,
    relative_humidity: Float,
    params: ComfortParameters,
) -> Result<Float, String> {
    let pa = relative_humidity * 1000. * (16.6536 - 4030.183 / (t_air + 235.)).exp();

    let icl = 0.155 * params.clothing;
    let m = params.metabolic_rate * 58.15;
    let mw = m; // no external work

    let fcl = if icl < 0.078 {
        1. + 1.29 * icl
    } else {
        1.05 + 0.645 * icl
    };

    let hcf = 12.1 * params.air_velocity.sqrt();
    let taa = t_air + 273.;
    let tra = t_radiant + 273.;

    let p1 = icl * fcl;
    let p2 = p1 * 3.96;
    let p3 = p1 * 100.;
    let p4 = p1 * taa;
    let p5 = 308.7 - 0.028 * mw + p2 * (tra / 100.).powi(4);

    let tcla = taa + (35.5 - t_air) / (3.5 * icl + 0.1);
    let mut xn = tcla / 100.;
    let mut xf = xn;
    let eps = 0.00015;

    let mut converged = false;
    for _ in 0..150 {
        xf = (xf + xn) / 2.;
        let hcn = 2.38 * (100. * xf - taa).abs().powf(0.25);
        let hc = hcf.max(hcn);
        xn = (p5 + p4 * hc - p2 * xf.powi(4)) / (100. + p3 * hc);
        if (xn - xf).abs() < eps {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(format!(
            "Clothing surface temperature did not converge for air temperature {} C",
            t_air
        ));
    }
    let hc = hcf.max(2.38 * (100. * xn - taa).abs().powf(0.25));
    let tcl = 100. * xn - 273.;

    let hl1 = 3.05e-3 * (5733. - 6.99 * mw - pa);
    let hl2 = if mw > 58.15 { 0.42 * (mw - 58.15) } else { 0. };
    let hl3 = 1.7e-5 * m * (5867. - pa);
    let hl4 = 0.0014 * m * (34. - t_air);
    let hl5 = 3.96 * fcl * (xn.powi(4) - (tra / 100.).powi(4));
    let hl6 = fcl * hc * (tcl - t_air);

    let ts = 0.303 * (-0.036 * m).exp() + 0.028;
    Ok(ts * (mw - hl1 - hl2 - hl3 - hl4 - hl5 - hl6))
}

/// The operative temperature (air and radiant alike) at which the
/// Predicted Mean Vote is zero for the given parameters, found by
/// bisection.
pub fn neutral_operative_temperature(params: ComfortParameters) -> Result<Float, String> {
    let mut lo: Float = 5.;
    let mut hi: Float = 45.;
    let f = |t: Float| pmv(t, t, SETPOINT_RELATIVE_HUMIDITY, params);

    if f(lo)? > 0. || f(hi)? < 0. {
        return Err(format!(
            "No neutral temperature between {} and {} C for {:?}",
            lo, hi, params
        ));
    }
    while hi - lo > 1e-3 {
        let mid = (lo + hi) / 2.;
        if f(mid)? < 0. {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok((lo + hi) / 2.)
}

/// The air temperature that realizes a certain operative-temperature
/// target in a room whose area-weighted mean surface temperature is
/// `t_mean_radiant`: the operative temperature is taken as the
/// average of both.
pub fn air_setpoint(operative_target: Float, t_mean_radiant: Float) -> Float {
    2. * operative_target - t_mean_radiant
}

/***********/
/* TESTING */
/***********/
