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

/// The physical constants used throughout a simulation. Built once,
/// before the run starts, and passed explicitly to every component
/// that needs them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicalConstants {
    /// The specific heat of air, in J/kg K
    pub air_specific_heat: Float,

    /// The density of air, in kg/m3
    pub air_density: Float,

    /// The latent heat of vaporization of water, in J/kg
    pub latent_heat_of_vaporization: Float,

    /// The Stefan-Boltzmann constant, in W/m2 K4
    pub sigma: Float,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            air_specific_heat: 1005.,
            air_density: 1.2,
            latent_heat_of_vaporization: 2_501_000.,
            sigma: 5.67e-8,
        }
    }
}

impl PhysicalConstants {
    /// The heat capacity of a volume of air, in J/K
    pub fn air_heat_capacity(&self, volume: Float) -> Float {
        self.air_density * self.air_specific_heat * volume
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PhysicalConstants::default();
        assert_eq!(c.air_specific_heat, 1005.);
        assert_eq!(c.air_density, 1.2);
        assert_eq!(c.latent_heat_of_vaporization, 2_501_000.);
        assert!((c.air_heat_capacity(10.) - 12060.).abs() < 1e-9);
    }
}
