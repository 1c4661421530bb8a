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

use crate::{
    Boundary, BoundarySurface, Construction, Float, Hvac, PhysicalConstants, Room,
    SimulationStateHeader,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A whole building: rooms, the surfaces they own, the constructions
/// those surfaces are made of, and the equipment conditioning them.
///
/// The model is built once—deserialized or assembled through the
/// `add_*` methods—and stays topologically unchanged for the whole
/// run; everything that varies per timestep lives in the
/// [`crate::SimulationState`].
///
/// ## Example (in `.json5`)
/// ```json5
/// {
///     name: 'Cabin',
///     rooms: [ { name: 'Main', volume: 40 } ],
///     surfaces: [
///         { name: 'Wall', room: 'Main', area: 10, construction: 'Brick' }
///     ],
///     constructions: [
///         {
///             name: 'Brick',
///             layers: [
///                 { thickness: 0.11, conductivity: 0.72, density: 1920, specific_heat: 835 }
///             ]
///         }
///     ],
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct Model {
    /// The name of the building
    pub name: String,

    /// The physical constants used throughout the simulation
    pub constants: PhysicalConstants,

    /// The temperature of the deep-soil node referenced by surfaces
    /// whose boundary is [`Boundary::Ground`], in C
    pub ground_temperature: Float,

    /// The rooms in the building
    pub rooms: Vec<Arc<Room>>,

    /// The boundary surfaces in the building
    pub surfaces: Vec<Arc<BoundarySurface>>,

    /// The constructions referenced by the surfaces
    pub constructions: Vec<Arc<Construction>>,

    /// The heating/cooling systems, at most one per room
    pub hvacs: Vec<Arc<Hvac>>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: String::new(),
            constants: PhysicalConstants::default(),
            ground_temperature: 10.,
            rooms: Vec::new(),
            surfaces: Vec::new(),
            constructions: Vec::new(),
            hvacs: Vec::new(),
        }
    }
}

impl Model {
    /// Adds a [`Room`] to the model, returning a counted reference
    /// to it
    pub fn add_room(&mut self, room: Room) -> Arc<Room> {
        let room = Arc::new(room);
        self.rooms.push(Arc::clone(&room));
        room
    }

    /// Adds a [`BoundarySurface`] to the model, returning a counted
    /// reference to it
    pub fn add_surface(&mut self, surface: BoundarySurface) -> Arc<BoundarySurface> {
        let surface = Arc::new(surface);
        self.surfaces.push(Arc::clone(&surface));
        surface
    }

    /// Adds a [`Construction`] to the model, returning a counted
    /// reference to it
    pub fn add_construction(&mut self, construction: Construction) -> Arc<Construction> {
        let construction = Arc::new(construction);
        self.constructions.push(Arc::clone(&construction));
        construction
    }

    /// Adds an [`Hvac`] to the model, returning a counted reference
    /// to it
    pub fn add_hvac(&mut self, hvac: Hvac) -> Arc<Hvac> {
        let hvac = Arc::new(hvac);
        self.hvacs.push(Arc::clone(&hvac));
        hvac
    }

    /// The index of the room of a certain name
    pub fn get_room_index(&self, name: &str) -> Result<usize, String> {
        self.rooms
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| format!("Could not find room '{}' in model", name))
    }

    /// The construction of a certain name
    pub fn get_construction(&self, name: &str) -> Result<Arc<Construction>, String> {
        self.constructions
            .iter()
            .find(|c| c.name == name)
            .map(Arc::clone)
            .ok_or_else(|| format!("Could not find construction '{}' in model", name))
    }

    /// Checks the cross-references within the model: surfaces name
    /// existing rooms and constructions, boundaries name existing
    /// rooms, and systems target existing rooms. Geometrical or
    /// physical nonsense (non-positive volumes or areas, negative
    /// capacities) is reported here as well, before any stepping
    /// begins.
    pub fn check(&self) -> Result<(), String> {
        for room in self.rooms.iter() {
            if room.volume <= 0. {
                return Err(format!(
                    "Room '{}' has a non-positive volume ({} m3)",
                    room.name, room.volume
                ));
            }
            if room.furniture_sensible_capacity < 0. || room.furniture_moisture_capacity < 0. {
                return Err(format!(
                    "Room '{}' has a negative furniture capacity",
                    room.name
                ));
            }
            if room.ventilation_rate < 0. || room.window_ventilation_rate < 0. {
                return Err(format!(
                    "Room '{}' has a negative ventilation rate",
                    room.name
                ));
            }
        }
        for surface in self.surfaces.iter() {
            if surface.area <= 0. {
                return Err(format!(
                    "Surface '{}' has a non-positive area ({} m2)",
                    surface.name, surface.area
                ));
            }
            if surface.h_front <= 0. {
                return Err(format!(
                    "Surface '{}' has a non-positive interior film coefficient",
                    surface.name
                ));
            }
            self.get_room_index(&surface.room)
                .map_err(|e| format!("Surface '{}': {}", surface.name, e))?;
            self.get_construction(&surface.construction)
                .map_err(|e| format!("Surface '{}': {}", surface.name, e))?;
            if let Boundary::Room { room } = &surface.boundary {
                let i = self
                    .get_room_index(room)
                    .map_err(|e| format!("Surface '{}': {}", surface.name, e))?;
                if self.rooms[i].name == surface.room {
                    return Err(format!(
                        "Surface '{}' has room '{}' on both sides",
                        surface.name, surface.room
                    ));
                }
            }
        }
        for hvac in self.hvacs.iter() {
            self.get_room_index(&hvac.target_room)
                .map_err(|e| format!("Hvac '{}': {}", hvac.name, e))?;
        }
        Ok(())
    }

    /// Builds a model from the bytes of a JSON/JSON5 document,
    /// together with a fresh [`SimulationStateHeader`] for the
    /// simulation modules to push their elements into
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, SimulationStateHeader), String> {
        let s = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        let model: Self = json5::from_str(s).map_err(|e| e.to_string())?;
        model.check()?;
        Ok((model, SimulationStateHeader::new()))
    }

    /// Builds a model from a JSON/JSON5 file, together with a fresh
    /// [`SimulationStateHeader`] for the simulation modules to push
    /// their elements into
    pub fn from_file<S: AsRef<std::path::Path>>(
        path: S,
    ) -> Result<(Self, SimulationStateHeader), String> {
        let s = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            format!(
                "Could not read model file '{}' : {}",
                path.as_ref().display(),
                e
            )
        })?;
        Self::from_bytes(s.as_bytes())
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/***********/
/* TESTING */
/***********/
