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
use crate::{Boundary, Float, StateElementField};
use serde::{Deserialize, Serialize};

/// A planar envelope or partition element—wall, window, floor,
/// roof—owned by exactly one [`crate::Room`] on its interior (front)
/// side.
///
/// What sits on the exterior (back) side is given by its
/// [`Boundary`]. Solar geometry is resolved outside of the
/// simulation: the static `solar_factor` maps the weather's global
/// horizontal irradiance to the irradiance incident on this surface.
///
/// ## Example (in `.json`)
/// ```json
/// {
///     "name": "South window",
///     "room": "Living room",
///     "area": 4.2,
///     "azimuth": 180,
///     "tilt": 90,
///     "construction": "Double glazing",
///     "solar_transmittance": 0.7,
///     "solar_factor": 0.4
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BoundarySurface {
    /// The name of the surface
    pub name: String,

    /// The name of the room on the interior side
    pub room: String,

    /// The area of the surface, in m2
    pub area: Float,

    /// The azimuth the exterior side faces, in degrees clockwise from
    /// North
    #[serde(default)]
    pub azimuth: Float,

    /// The tilt of the surface, in degrees from horizontal (a vertical
    /// wall is 90)
    #[serde(default = "default_tilt")]
    pub tilt: Float,

    /// What lies on the exterior side
    #[serde(default)]
    pub boundary: Boundary,

    /// The name of the [`crate::Construction`] of this surface
    pub construction: String,

    /// The convective film coefficient on the interior side, in
    /// W/m2 K
    #[serde(default = "default_h_front")]
    pub h_front: Float,

    /// The convective film coefficient on the exterior side, in
    /// W/m2 K
    #[serde(default = "default_h_back")]
    pub h_back: Float,

    /// The solar absorptance of the exterior face (0 to 1)
    #[serde(default = "default_absorptance")]
    pub solar_absorptance: Float,

    /// The solar transmittance of the surface (0 for opaque parts)
    #[serde(default)]
    pub solar_transmittance: Float,

    /// The static incidence coefficient mapping global horizontal
    /// irradiance to the irradiance on this surface, supplied by an
    /// external solar-geometry processor
    #[serde(default)]
    pub solar_factor: Float,

    #[serde(skip)]
    temperature: StateElementField,
}

fn default_tilt() -> Float {
    90.
}

fn default_h_front() -> Float {
    // still indoor air
    7.7
}

fn default_h_back() -> Float {
    // moving outdoor air
    25.
}

fn default_absorptance() -> Float {
    0.7
}

impl BoundarySurface {
    /// Creates a new surface of a certain area, interior room, and
    /// construction
    pub fn new<S: Into<String>, R: Into<String>, C: Into<String>>(
        name: S,
        room: R,
        construction: C,
        area: Float,
    ) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            construction: construction.into(),
            area,
            tilt: default_tilt(),
            h_front: default_h_front(),
            h_back: default_h_back(),
            solar_absorptance: default_absorptance(),
            ..Self::default()
        }
    }

    /// Whether the surface lets solar radiation through
    pub fn is_transparent(&self) -> bool {
        self.solar_transmittance > 0.
    }

    state_accessors!(
        temperature,
        set_temperature_index,
        temperature_index,
        temperature,
        set_temperature
    );
}

/***********/
/* TESTING */
/***********/
