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

/// The operating condition of a room during one timestep.
///
/// This is a closed set: components that branch on it should use an
/// exhaustive `match`, since new modes are not expected.
///
/// When stored in the simulation state the mode is encoded as a
/// floating point code: `Heating = 0`, `Cooling = 1`, `StopOpen = 2`,
/// `StopClose = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// The room's equipment is injecting sensible heat
    Heating,

    /// The room's equipment is extracting sensible heat (and possibly
    /// moisture)
    Cooling,

    /// The room is free-floating with its window open
    StopOpen,

    /// The room is free-floating with its window closed. This is also
    /// the default
    #[default]
    StopClose,
}

impl Mode {
    /// The code under which this mode is stored in the simulation state
    pub fn code(&self) -> Float {
        match self {
            Self::Heating => 0.,
            Self::Cooling => 1.,
            Self::StopOpen => 2.,
            Self::StopClose => 3.,
        }
    }

    /// Rebuilds a mode from its simulation-state code
    pub fn from_code(code: Float) -> Result<Self, String> {
        let i = code.round() as i32;
        match i {
            0 => Ok(Self::Heating),
            1 => Ok(Self::Cooling),
            2 => Ok(Self::StopOpen),
            3 => Ok(Self::StopClose),
            _ => Err(format!("'{}' is not the code of any operating Mode", code)),
        }
    }

    /// Whether the room's equipment is actively conditioning
    pub fn is_conditioning(&self) -> bool {
        match self {
            Self::Heating | Self::Cooling => true,
            Self::StopOpen | Self::StopClose => false,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Heating => "Heating",
            Self::Cooling => "Cooling",
            Self::StopOpen => "Stop (window open)",
            Self::StopClose => "Stop (window closed)",
        };
        write!(f, "{}", s)
    }
}

/// The kind of equipment conditioning a room, carrying its rated
/// capacity.
///
/// Radiant equipment delivers its output onto the room's surfaces and
/// is capped per unit of surface area; convective equipment delivers
/// straight into the air node and is capped by a fixed rated power.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
#[serde(deny_unknown_fields)]
pub enum EquipmentKind {
    /// Radiant panels (e.g., a heated floor)
    Radiant {
        /// The maximum heating output per unit of room surface area,
        /// in W/m2
        max_heating_flux: Float,

        /// The maximum cooling output per unit of room surface area,
        /// in W/m2
        max_cooling_flux: Float,
    },

    /// A convective unit (e.g., a split air conditioner)
    Convective {
        /// The maximum heating power, in W
        max_heating_power: Float,

        /// The maximum cooling power, in W
        max_cooling_power: Float,
    },
}

impl Default for EquipmentKind {
    fn default() -> Self {
        Self::Convective {
            max_heating_power: 0.,
            max_cooling_power: 0.,
        }
    }
}

/// The heating/cooling equipment serving one room.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "name": "Living room split",
///     "target_room": "Living room",
///     "kind": { "type": "Convective", "max_heating_power": 2500, "max_cooling_power": 2500 },
///     "heating_setpoint": 20,
///     "cooling_setpoint": 26
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Hvac {
    /// The name of the system
    pub name: String,

    /// The name of the room this system conditions
    pub target_room: String,

    /// The kind of equipment and its rated capacity
    #[serde(default)]
    pub kind: EquipmentKind,

    /// The air temperature below which the room is heated, in C.
    /// When absent, a comfort-based operative-temperature target is
    /// derived by the thermal module
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_setpoint: Option<Float>,

    /// The air temperature above which the room is cooled, in C.
    /// When absent, a comfort-based operative-temperature target is
    /// derived by the thermal module
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling_setpoint: Option<Float>,

    /// The relative humidity (in fractions, 0-1) towards which the
    /// room is dehumidified while cooling. When absent, cooling
    /// removes no moisture
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_relative_humidity: Option<Float>,

    /// The maximum dehumidification power, in W of latent heat. When
    /// absent, dehumidification is unconstrained
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dehumidification_power: Option<Float>,
}

impl Hvac {
    /// Creates a new system of the given equipment kind
    pub fn new<S: Into<String>, R: Into<String>>(name: S, target_room: R, kind: EquipmentKind) -> Self {
        Self {
            name: name.into(),
            target_room: target_room.into(),
            kind,
            ..Self::default()
        }
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_mode_codes() -> Result<(), String> {
        for mode in [Mode::Heating, Mode::Cooling, Mode::StopOpen, Mode::StopClose] {
            let back = Mode::from_code(mode.code())?;
            assert_eq!(mode, back);
        }
        assert!(Mode::from_code(9.).is_err());
        assert!(Mode::Heating.is_conditioning());
        assert!(Mode::Cooling.is_conditioning());
        assert!(!Mode::StopOpen.is_conditioning());
        assert!(!Mode::StopClose.is_conditioning());
        Ok(())
    }

    #[test]
    fn test_serde() -> Result<(), String> {
        let hardcoded_ref = Hvac {
            name: "Living room split".into(),
            target_room: "Living room".into(),
            kind: EquipmentKind::Convective {
                max_heating_power: 2500.,
                max_cooling_power: 2500.,
            },
            heating_setpoint: Some(20.),
            cooling_setpoint: Some(26.),
            target_relative_humidity: None,
            max_dehumidification_power: None,
        };

        let from_json5: Hvac = json5::from_str(
            "{
            name: 'Living room split',
            target_room: 'Living room',
            kind: { type: 'Convective', max_heating_power: 2500, max_cooling_power: 2500 },
            heating_setpoint: 20,
            cooling_setpoint: 26,
        }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_json5);

        let rust_json = serde_json::to_string(&hardcoded_ref).map_err(|e| e.to_string())?;
        let from_serialized: Hvac = serde_json::from_str(&rust_json).map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_serialized);
        Ok(())
    }

    #[test]
    fn test_serde_radiant() -> Result<(), String> {
        let hardcoded_ref = EquipmentKind::Radiant {
            max_heating_flux: 60.,
            max_cooling_flux: 40.,
        };
        let from_json5: EquipmentKind = json5::from_str(
            "{ type: 'Radiant', max_heating_flux: 60, max_cooling_flux: 40 }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_json5);
        Ok(())
    }
}
