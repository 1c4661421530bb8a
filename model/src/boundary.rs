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

use serde::{Deserialize, Serialize};

/// What lies on the exterior side of a `BoundarySurface`.
///
/// The interior side is always the room that owns the surface; a
/// physical partition between two simulated rooms is declared twice,
/// once per room, each declaration pointing at the other room.
///
/// ## Examples
///
/// #### A `Room` boundary (in `.json`)
/// ```json
/// { "type": "Room", "room": "Some Room" }
/// ```
/// #### A `Ground` boundary (in `.json`)
/// ```json
/// { "type": "Ground" }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(tag = "type")]
#[serde(deny_unknown_fields)]
pub enum Boundary {
    /// Leads outdoors. This is also the default (i.e., when no
    /// boundary is set)
    #[default]
    Outdoor,

    /// The surface is in contact with the ground. Its conduction is
    /// referenced to a fixed deep-soil temperature, and its thermal
    /// network gets the standard soil layer appended (see
    /// [`crate::soil_layer`])
    Ground,

    /// The surface leads to another room whose temperature is part of
    /// the simulation
    Room {
        /// The room this boundary leads to
        room: String,
    },
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_serde_ground() -> Result<(), String> {
        let hardcoded_ref = Boundary::Ground;

        let from_json5: Boundary = json5::from_str(
            "{
            type: 'Ground',
        }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_json5);

        // Serialize and deserialize again
        let rust_json = serde_json::to_string(&hardcoded_ref).map_err(|e| e.to_string())?;
        let from_serialized: Boundary =
            serde_json::from_str(&rust_json).map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_serialized);

        Ok(())
    }

    #[test]
    fn test_serde_room() -> Result<(), String> {
        let hardcoded_ref = Boundary::Room {
            room: "Some Room".into(),
        };

        let from_json5: Boundary = json5::from_str(
            "{
            type: 'Room',
            room: 'Some Room',
        }",
        )
        .map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_json5);

        let rust_json = serde_json::to_string(&hardcoded_ref).map_err(|e| e.to_string())?;
        let from_serialized: Boundary =
            serde_json::from_str(&rust_json).map_err(|e| e.to_string())?;
        assert_eq!(hardcoded_ref, from_serialized);

        Ok(())
    }

    #[test]
    fn test_default() {
        assert_eq!(Boundary::default(), Boundary::Outdoor);
    }
}
