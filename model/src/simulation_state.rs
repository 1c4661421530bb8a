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

use crate::model::Model;
use crate::Float;
use std::sync::{Arc, Mutex};

/// The type used for storing—inside model objects—the index at which
/// a certain physical quantity lives within the [`SimulationState`].
pub type StateElementField = Arc<Mutex<Option<usize>>>;

/// Generates the four accessors that connect a model object's field
/// to the [`SimulationState`]: an index setter, an index getter, and
/// value read/write methods.
macro_rules! state_accessors {
    ($field:ident, $set_index:ident, $get_index:ident, $get_value:ident, $set_value:ident) => {
        #[doc = concat!("Maps the `", stringify!($field), "` of this object into index `i` of the `SimulationState`")]
        pub fn $set_index(&self, i: usize) -> Result<(), String> {
            let mut guard = self.$field.lock().map_err(|e| e.to_string())?;
            *guard = Some(i);
            Ok(())
        }

        #[doc = concat!("The index at which `", stringify!($field), "` lives within the `SimulationState`, if mapped")]
        pub fn $get_index(&self) -> Option<usize> {
            *self.$field.lock().ok()?
        }

        #[doc = concat!("Retrieves `", stringify!($field), "` from the `SimulationState`")]
        pub fn $get_value(&self, state: &crate::SimulationState) -> Option<crate::Float> {
            let i = self.$get_index()?;
            Some(state[i])
        }

        #[doc = concat!("Writes `", stringify!($field), "` into the `SimulationState`")]
        pub fn $set_value(
            &self,
            state: &mut crate::SimulationState,
            v: crate::Float,
        ) -> Result<(), String> {
            match self.$get_index() {
                Some(i) => {
                    state[i] = v;
                    Ok(())
                }
                None => Err(format!(
                    "Field '{}' has not been mapped into the SimulationState",
                    stringify!($field)
                )),
            }
        }
    };
}
pub(crate) use state_accessors;

/// Describes one entry of the [`SimulationState`]. Objects are
/// identified by their index in the corresponding [`Model`] vector.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimulationStateElement {
    /// A room's air dry bulb temperature, in C
    RoomAirTemperature(usize),

    /// A room's air absolute humidity, in kg of water per kg of dry air
    RoomAirMoisture(usize),

    /// A room's HVAC operating mode, stored as the code of
    /// [`crate::Mode`]
    RoomOperatingMode(usize),

    /// The sensible heat injected into a room by its HVAC during the
    /// step, in W (positive when heating, negative when cooling)
    RoomSensibleLoad(usize),

    /// The latent heat injected into a room by its HVAC during the
    /// step, in W (negative when dehumidifying)
    RoomLatentLoad(usize),

    /// The interior temperature of a boundary surface, in C
    SurfaceTemperature(usize),
}

impl SimulationStateElement {
    /// Produces a human-readable header entry (e.g., for CSV reports)
    pub fn stringify(&self, model: &Model) -> String {
        let room_name = |i: &usize| -> String {
            match model.rooms.get(*i) {
                Some(r) => r.name.clone(),
                None => format!("Room {}", i),
            }
        };
        match self {
            Self::RoomAirTemperature(i) => {
                format!("{} Dry Bulb Temperature [C]", room_name(i))
            }
            Self::RoomAirMoisture(i) => {
                format!("{} Absolute Humidity [kg/kg]", room_name(i))
            }
            Self::RoomOperatingMode(i) => format!("{} Operating Mode [-]", room_name(i)),
            Self::RoomSensibleLoad(i) => format!("{} Sensible Load [W]", room_name(i)),
            Self::RoomLatentLoad(i) => format!("{} Latent Load [W]", room_name(i)),
            Self::SurfaceTemperature(i) => {
                let name = match model.surfaces.get(*i) {
                    Some(s) => s.name.clone(),
                    None => format!("Surface {}", i),
                };
                format!("{} Temperature [C]", name)
            }
        }
    }
}

/// The simulation results of a single timestep: a compact vector of
/// floating point numbers, cheap to read, write and move around.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState(Vec<Float>);

impl SimulationState {
    /// The number of entries in the state
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether the state is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<usize> for SimulationState {
    type Output = Float;
    fn index(&self, i: usize) -> &Float {
        &self.0[i]
    }
}

impl std::ops::IndexMut<usize> for SimulationState {
    fn index_mut(&mut self, i: usize) -> &mut Float {
        &mut self.0[i]
    }
}

/// Couples each entry of the future [`SimulationState`] with the
/// description of what it contains. Once all simulation modules have
/// pushed their elements, [`SimulationStateHeader::take_values`]
/// decouples the values from the (heavier) descriptions.
#[derive(Debug, Default)]
pub struct SimulationStateHeader {
    /// The description of each entry of the state
    pub elements: Vec<SimulationStateElement>,

    values: Option<Vec<Float>>,
}

impl SimulationStateHeader {
    /// Creates a new, empty header
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            values: Some(Vec::new()),
        }
    }

    /// Registers a new state element with its initial value, returning
    /// the index at which it will live within the [`SimulationState`]
    pub fn push(&mut self, element: SimulationStateElement, value: Float) -> usize {
        self.elements.push(element);
        if let Some(values) = &mut self.values {
            values.push(value);
        }
        self.elements.len() - 1
    }

    /// The number of elements registered so far
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Checks whether the header is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Extracts the values, leaving the descriptions behind. Returns
    /// `None` the second time it is called.
    pub fn take_values(&mut self) -> Option<SimulationState> {
        self.values.take().map(SimulationState)
    }
}

/***********/
/* TESTING */
/***********/
