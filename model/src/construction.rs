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

use crate::{Float, ResponseFactors};
use serde::{Deserialize, Serialize};

/// The conductivity of the soil layer appended to constructions in
/// contact with the ground, in W/m K
pub const SOIL_CONDUCTIVITY: Float = 1.0;

/// The thickness of the soil layer appended to constructions in
/// contact with the ground, in m
pub const SOIL_THICKNESS: Float = 3.0;

/// The volumetric heat capacity of the soil layer appended to
/// constructions in contact with the ground, in J/m3 K
pub const SOIL_VOLUMETRIC_HEAT_CAPACITY: Float = 3_300_000.;

/// Builds the [`Layer`] of soil that sits between a ground-coupled
/// surface and the deep-soil node: 3 m of soil of conductivity
/// 1.0 W/m K and volumetric heat capacity 3.3 MJ/m3 K, i.e., a
/// resistance of 3.0 m2 K/W and an areal capacity of 9.9 MJ/m2 K.
pub fn soil_layer() -> Layer {
    Layer {
        thickness: SOIL_THICKNESS,
        conductivity: SOIL_CONDUCTIVITY,
        density: SOIL_VOLUMETRIC_HEAT_CAPACITY / 1000.,
        specific_heat: 1000.,
    }
}

/// A homogeneous slab of material within a [`Construction`], described
/// by its physical properties.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "thickness": 0.2,       // m
///     "conductivity": 1.63,   // W/m K
///     "density": 2400,        // kg/m3
///     "specific_heat": 900    // J/kg K
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    /// The thickness of the layer, in m
    pub thickness: Float,

    /// The thermal conductivity of the material, in W/m K
    pub conductivity: Float,

    /// The density of the material, in kg/m3
    pub density: Float,

    /// The specific heat of the material, in J/kg K
    pub specific_heat: Float,
}

impl Layer {
    /// The thermal resistance of the layer, in m2 K/W
    pub fn resistance(&self) -> Float {
        self.thickness / self.conductivity
    }

    /// The heat capacity of the layer per unit area, in J/m2 K
    pub fn areal_heat_capacity(&self) -> Float {
        self.thickness * self.density * self.specific_heat
    }
}

/// A stack of [`Layer`]s, listed from the interior side to the
/// exterior side, plus—optionally—pre-fitted [`ResponseFactors`].
///
/// When no factors are given, the thermal module derives them from
/// the layers at setup time.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "name": "Concrete wall",
///     "layers": [
///         { "thickness": 0.2, "conductivity": 1.63, "density": 2400, "specific_heat": 900 }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Construction {
    /// The name of the construction
    pub name: String,

    /// The layers of the construction, from interior to exterior
    #[serde(default)]
    pub layers: Vec<Layer>,

    /// Pre-fitted response factors. When absent, they are derived
    /// from `layers` before the simulation starts.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_factors: Option<ResponseFactors>,
}

impl Construction {
    /// Creates a new, empty construction
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
            response_factors: None,
        }
    }

    /// The resistance of the layer stack, in m2 K/W (films not included)
    pub fn resistance(&self) -> Float {
        self.layers.iter().map(|l| l.resistance()).sum()
    }

    /// The heat capacity of the layer stack per unit area, in J/m2 K
    pub fn areal_heat_capacity(&self) -> Float {
        self.layers.iter().map(|l| l.areal_heat_capacity()).sum()
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_soil_layer() {
        let soil = soil_layer();
        assert!((soil.resistance() - 3.0).abs() < 1e-9);
        assert!((soil.areal_heat_capacity() - 9_900_000.).abs() < 1e-6);
    }

    #[test]
    fn test_resistance_and_capacity() {
        let mut c = Construction::new("Brick and insulation");
        c.layers.push(Layer {
            thickness: 0.11,
            conductivity: 0.72,
            density: 1920.,
            specific_heat: 835.,
        });
        c.layers.push(Layer {
            thickness: 0.05,
            conductivity: 0.04,
            density: 30.,
            specific_heat: 1400.,
        });
        let exp_r = 0.11 / 0.72 + 0.05 / 0.04;
        let exp_c = 0.11 * 1920. * 835. + 0.05 * 30. * 1400.;
        assert!((c.resistance() - exp_r).abs() < 1e-9);
        assert!((c.areal_heat_capacity() - exp_c).abs() < 1e-6);
    }

    #[test]
    fn test_serde() -> Result<(), String> {
        let hardcoded_ref = Construction {
            name: "Concrete wall".into(),
            layers: vec![Layer {
                thickness: 0.2,
                conductivity: 1.63,
                density: 2400.,
                specific_heat: 900.,
            }],
            response_factors: None,
        };

        let from_json5: Construction = json5::from_str(
            "{
            name: 'Concrete wall',
            layers: [
                { thickness: 0.2, conductivity: 1.63, density: 2400, specific_heat: 900 }
            ],
        }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_json5);

        let rust_json = serde_json::to_string(&hardcoded_ref).map_err(|e| e.to_string())?;
        let from_serialized: Construction =
            serde_json::from_str(&rust_json).map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_serialized);

        Ok(())
    }
}
