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

//! The coupled heat-and-moisture balance solver.
//!
//! Transient conduction through each wall is reduced to a handful of
//! exponentially-decaying response terms, which keeps every surface
//! temperature a *linear* function of its room's air temperature. That
//! linearity lets each timestep eliminate the surfaces and solve a
//! dense system sized by the number of rooms, coupled—through a
//! bounded fixed-point iteration—with the discrete choice of each
//! room's HVAC operating mode.

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

/// The response-factor recurrence and the arena storing every
/// surface's thermal memory.
pub mod response;

/// Reduces a construction's layer stack to a 1-D thermal network and
/// fits response factors to its step responses.
pub mod discretization;

/// Moist-air property relations.
pub mod psychrometrics;

/// Fanger-comfort calculations for deriving operative-temperature
/// setpoints.
pub mod comfort;

/// The per-room equipment and the operating-mode decision.
pub mod hvac;

/// Walls, windows, floors and roofs as the balance solver sees them.
pub mod surface;

/// Rooms as the balance solver sees them.
pub mod zone;

/// The main thermal model, which manages the whole time-marching
/// solution.
pub mod model;

pub use crate::model::{RoomSchedules, ThermalAlloc, ThermalModel, ThermalModelOptions};
pub use crate::response::ResponseArena;
pub use crate::surface::ThermalSurface;
pub use crate::zone::ThermalZone;
