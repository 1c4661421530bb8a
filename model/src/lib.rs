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

#![deny(missing_docs)]

//! The data structures describing a building for heat-and-moisture
//! simulation: rooms, the boundary surfaces they own, constructions with
//! their response-factor coefficients, and HVAC equipment.
//!
//! The model and the simulation modules remain immutable once built; all
//! per-step results live in the [`SimulationState`], a compact vector of
//! floating point numbers whose entries are described by the
//! [`SimulationStateHeader`]. Simulation modules map the fields they are
//! responsible for (e.g., a room's air temperature) into indices of that
//! vector, and everyone else reads results back through the objects' own
//! accessors.
//!
//! # Example
//!
//! ```
//! use model::{Model, Room, SimulationStateElement, SimulationStateHeader};
//!
//! let mut model = Model::default();
//! let bedroom = model.add_room(Room::new("bedroom", 42.0));
//!
//! // a simulation module maps the room's air temperature into the state
//! let mut header = SimulationStateHeader::new();
//! let i = header.push(SimulationStateElement::RoomAirTemperature(0), 22.0);
//! bedroom.set_air_temperature_index(i).unwrap();
//!
//! // ... and writes results during the simulation
//! let mut state = header.take_values().unwrap();
//! bedroom.set_air_temperature(&mut state, 19.5).unwrap();
//! assert!((bedroom.air_temperature(&state).unwrap() - 19.5).abs() < 1e-9);
//! ```

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(feature = "float")]
pub type Float = f32;

/// The kind of Floating point number used in the
/// library... the `"float"` feature means it becomes `f32`
/// and `f64` is used otherwise.
#[cfg(not(feature = "float"))]
pub type Float = f64;

mod simulation_state;
pub use simulation_state::{
    SimulationState, SimulationStateElement, SimulationStateHeader, StateElementField,
};
pub(crate) use simulation_state::state_accessors;

mod constants;
pub use constants::PhysicalConstants;

mod boundary;
pub use boundary::Boundary;

mod construction;
pub use construction::{
    soil_layer, Construction, Layer, SOIL_CONDUCTIVITY, SOIL_THICKNESS,
    SOIL_VOLUMETRIC_HEAT_CAPACITY,
};

mod response_factors;
pub use response_factors::ResponseFactors;

mod hvac;
pub use hvac::{EquipmentKind, Hvac, Mode};

mod room;
pub use room::Room;

mod surface;
pub use surface::BoundarySurface;

mod model;
pub use crate::model::Model;
