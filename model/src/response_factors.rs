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
use serde::{Deserialize, Serialize};

/// The reduced-order representation of transient conduction through a
/// construction: a set of first-order decay terms, each with a common
/// ratio and one gain per excitation.
///
/// The interior surface temperature of a wall is the sum, over terms,
/// of accumulators that obey
///
/// ```math
/// \theta_m(t) = g_m u(t) + r_m \theta_m(t-1)
/// ```
///
/// where $`u`$ is the excitation. Two excitations drive each wall: the
/// heat flux into its interior surface (gains `flux_gains`, in m2 K/W)
/// and the equivalent temperature on its exterior side (dimensionless
/// gains `exterior_gains`).
///
/// Under a constant excitation each accumulator tends to
/// $`g_m u/(1-r_m)`$; the summed fixed points are therefore the
/// steady-state responses: [`ResponseFactors::steady_flux_response`]
/// should equal the interior-to-exterior resistance and
/// [`ResponseFactors::steady_exterior_response`] should be 1.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "ratios": [0.9],
///     "flux_gains": [0.05],
///     "exterior_gains": [0.1]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ResponseFactors {
    /// The common ratio of each decay term. Each must be in `[0, 1)`
    pub ratios: Vec<Float>,

    /// The gain of each term for the interior-flux excitation,
    /// in m2 K/W
    pub flux_gains: Vec<Float>,

    /// The gain of each term for the exterior equivalent-temperature
    /// excitation (dimensionless)
    pub exterior_gains: Vec<Float>,
}

impl ResponseFactors {
    /// The number of decay terms
    pub fn n_terms(&self) -> usize {
        self.ratios.len()
    }

    /// The immediate response to the interior flux, in m2 K/W: the sum
    /// of the flux gains
    pub fn flux_gain_sum(&self) -> Float {
        self.flux_gains.iter().sum()
    }

    /// The immediate response to the exterior equivalent temperature:
    /// the sum of the exterior gains
    pub fn exterior_gain_sum(&self) -> Float {
        self.exterior_gains.iter().sum()
    }

    /// The steady-state response to a constant unit interior flux,
    /// in m2 K/W
    pub fn steady_flux_response(&self) -> Float {
        self.ratios
            .iter()
            .zip(self.flux_gains.iter())
            .map(|(r, g)| g / (1. - r))
            .sum()
    }

    /// The steady-state response to a constant unit exterior
    /// equivalent temperature
    pub fn steady_exterior_response(&self) -> Float {
        self.ratios
            .iter()
            .zip(self.exterior_gains.iter())
            .map(|(r, g)| g / (1. - r))
            .sum()
    }

    /// Checks that the factors are usable: every ratio in `[0, 1)` and
    /// one gain per ratio in both excitation series. A ratio outside
    /// that range means the input thermal model is unstable, which is
    /// not recoverable at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.ratios.is_empty() {
            return Err("ResponseFactors have no decay terms".to_string());
        }
        if self.flux_gains.len() != self.ratios.len()
            || self.exterior_gains.len() != self.ratios.len()
        {
            return Err(format!(
                "ResponseFactors shape mismatch... {} ratios, {} flux gains, {} exterior gains",
                self.ratios.len(),
                self.flux_gains.len(),
                self.exterior_gains.len()
            ));
        }
        for (m, r) in self.ratios.iter().enumerate() {
            if !(0. ..1.).contains(r) {
                return Err(format!(
                    "Response ratio of term {} is {}... ratios must be in [0,1)",
                    m, r
                ));
            }
        }
        Ok(())
    }
}

/***********/
/* TESTING */
/***********/
