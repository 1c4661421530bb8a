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

use crate::state_accessors;
use crate::{Float, StateElementField};
use serde::{Deserialize, Serialize};

/// A volume of air with homogeneous temperature and humidity. It is
/// often an actual room enclosed by walls, but it can also lump
/// several well-mixed rooms together.
///
/// Rooms own their [`crate::BoundarySurface`]s: every surface names
/// exactly one room on its interior side.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "name": "Living room",
///     "volume": 62.5,
///     "furniture_sensible_capacity": 150000,
///     "ventilation_rate": 0.02
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Room {
    /// The name of the room
    pub name: String,

    /// The volume of the room, in m3
    pub volume: Float,

    /// The sensible heat capacity of the furniture, lumped into the
    /// air node, in J/K
    #[serde(default)]
    pub furniture_sensible_capacity: Float,

    /// The moisture buffering capacity of the furniture, lumped into
    /// the air node, in kg of air-equivalent mass
    #[serde(default)]
    pub furniture_moisture_capacity: Float,

    /// The mechanical ventilation flow, in m3/s, always active
    #[serde(default)]
    pub ventilation_rate: Float,

    /// The extra ventilation flow through the open window, in m3/s,
    /// active while the room is in `StopOpen` mode
    #[serde(default)]
    pub window_ventilation_rate: Float,

    #[serde(skip)]
    air_temperature: StateElementField,

    #[serde(skip)]
    air_moisture: StateElementField,

    #[serde(skip)]
    operating_mode: StateElementField,

    #[serde(skip)]
    sensible_load: StateElementField,

    #[serde(skip)]
    latent_load: StateElementField,
}

impl Room {
    /// Creates a new room of a certain volume
    pub fn new<S: Into<String>>(name: S, volume: Float) -> Self {
        Self {
            name: name.into(),
            volume,
            ..Self::default()
        }
    }

    state_accessors!(
        air_temperature,
        set_air_temperature_index,
        air_temperature_index,
        air_temperature,
        set_air_temperature
    );

    state_accessors!(
        air_moisture,
        set_air_moisture_index,
        air_moisture_index,
        air_moisture,
        set_air_moisture
    );

    state_accessors!(
        operating_mode,
        set_operating_mode_index,
        operating_mode_index,
        operating_mode,
        set_operating_mode
    );

    state_accessors!(
        sensible_load,
        set_sensible_load_index,
        sensible_load_index,
        sensible_load,
        set_sensible_load
    );

    state_accessors!(
        latent_load,
        set_latent_load_index,
        latent_load_index,
        latent_load,
        set_latent_load
    );
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use crate::{SimulationStateElement, SimulationStateHeader};

    #[test]
    fn test_accessors() -> Result<(), String> {
        let room = Room::new("Studio", 31.5);
        assert!(room.air_temperature_index().is_none());

        let mut header = SimulationStateHeader::new();
        let i = header.push(SimulationStateElement::RoomAirTemperature(0), 22.0);
        room.set_air_temperature_index(i)?;
        assert_eq!(room.air_temperature_index(), Some(i));

        let mut state = header.take_values().ok_or("no values")?;
        assert!((room.air_temperature(&state).ok_or("unmapped")? - 22.0).abs() < 1e-9);
        room.set_air_temperature(&mut state, 18.0)?;
        assert!((room.air_temperature(&state).ok_or("unmapped")? - 18.0).abs() < 1e-9);

        // unmapped fields complain when written
        assert!(room.set_sensible_load(&mut state, 100.).is_err());
        Ok(())
    }

    #[test]
    fn test_serde() -> Result<(), String> {
        let mut hardcoded_ref = Room::new("Living room", 62.5);
        hardcoded_ref.furniture_sensible_capacity = 150_000.;
        hardcoded_ref.ventilation_rate = 0.02;

        let from_json5: Room = json5::from_str(
            "{
            name: 'Living room',
            volume: 62.5,
            furniture_sensible_capacity: 150000,
            ventilation_rate: 0.02,
        }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(
            format!("{:?}", hardcoded_ref),
            format!("{:?}", from_json5)
        );

        let rust_json = serde_json::to_string(&hardcoded_ref).map_err(|e| e.to_string())?;
        let from_serialized: Room = serde_json::from_str(&rust_json).map_err(|e| e.to_string())?;
        assert_eq!(
            format!("{:?}", hardcoded_ref),
            format!("{:?}", from_serialized)
        );
        Ok(())
    }
}
