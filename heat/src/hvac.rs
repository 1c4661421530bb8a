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

use crate::comfort::{self, ComfortParameters};
use crate::Float;
use model::{EquipmentKind, Hvac, Mode, Model};
use std::sync::Arc;

/// Picks a room's operating mode from its free-floating temperature:
/// above the cooling threshold the room cools, below the heating
/// threshold it heats, and in between it free-floats with the window
/// state the caller's window-operation policy dictates.
///
/// The decision carries no hysteresis; identical inputs always yield
/// the identical mode.
pub fn choose_mode(
    free_floating_temperature: Float,
    heating_setpoint: Option<Float>,
    cooling_setpoint: Option<Float>,
    window_open: bool,
) -> Mode {
    if let Some(sp) = cooling_setpoint {
        if free_floating_temperature > sp {
            return Mode::Cooling;
        }
    }
    if let Some(sp) = heating_setpoint {
        if free_floating_temperature < sp {
            return Mode::Heating;
        }
    }
    if window_open {
        Mode::StopOpen
    } else {
        Mode::StopClose
    }
}

/// An [`Hvac`] resolved against its room: capacities turned into
/// watts and comfort targets pre-computed for its equipment kind.
#[derive(Debug, Clone)]
pub struct ZoneEquipment {
    /// A clone of the element in the model which this struct
    /// represents
    pub parent: Arc<Hvac>,

    /// The index of the conditioned room
    pub zone_index: usize,

    /// Whether the equipment delivers onto the room's surfaces
    /// rather than into its air
    pub radiant: bool,

    /// The maximum sensible heating power, in W
    pub max_heating: Float,

    /// The maximum sensible cooling power (positive), in W
    pub max_cooling: Float,

    /// The neutral operative temperature under the heating-season
    /// comfort assumptions, in C
    heating_neutral: Float,

    /// The neutral operative temperature under the cooling-season
    /// comfort assumptions, in C
    cooling_neutral: Float,
}

impl ZoneEquipment {
    /// Resolves an [`Hvac`] against the model. `room_surface_area` is
    /// the total surface area of the conditioned room, in m2, which
    /// turns the area-normalized caps of radiant equipment into
    /// watts.
    pub fn new(hvac: &Arc<Hvac>, model: &Model, room_surface_area: Float) -> Result<Self, String> {
        let zone_index = model.get_room_index(&hvac.target_room)?;

        let (radiant, max_heating, max_cooling) = match hvac.kind {
            EquipmentKind::Radiant {
                max_heating_flux,
                max_cooling_flux,
            } => (
                true,
                max_heating_flux * room_surface_area,
                max_cooling_flux * room_surface_area,
            ),
            EquipmentKind::Convective {
                max_heating_power,
                max_cooling_power,
            } => (false, max_heating_power, max_cooling_power),
        };
        if max_heating < 0. || max_cooling < 0. {
            return Err(format!(
                "Hvac '{}' has a negative rated capacity",
                hvac.name
            ));
        }

        let heating_neutral =
            comfort::neutral_operative_temperature(ComfortParameters::heating(&hvac.kind))?;
        let cooling_neutral =
            comfort::neutral_operative_temperature(ComfortParameters::cooling(&hvac.kind))?;

        Ok(Self {
            parent: Arc::clone(hvac),
            zone_index,
            radiant,
            max_heating,
            max_cooling,
            heating_neutral,
            cooling_neutral,
        })
    }

    /// The air temperature below which the room heats, in C: the
    /// configured setpoint when one is given, otherwise the air
    /// temperature realizing the comfort-neutral operative target for
    /// the room's current mean surface temperature
    pub fn heating_setpoint(&self, mean_surface_temperature: Float) -> Float {
        match self.parent.heating_setpoint {
            Some(sp) => sp,
            None => comfort::air_setpoint(self.heating_neutral, mean_surface_temperature),
        }
    }

    /// The air temperature above which the room cools, in C:
    /// analogous to [`ZoneEquipment::heating_setpoint`]
    pub fn cooling_setpoint(&self, mean_surface_temperature: Float) -> Float {
        match self.parent.cooling_setpoint {
            Some(sp) => sp,
            None => comfort::air_setpoint(self.cooling_neutral, mean_surface_temperature),
        }
    }

    /// Clamps a required sensible injection (positive heating,
    /// negative cooling) to the rated capacity, reporting whether it
    /// saturated
    pub fn clamp_injection(&self, required: Float) -> (Float, bool) {
        if required > self.max_heating {
            (self.max_heating, true)
        } else if required < -self.max_cooling {
            (-self.max_cooling, true)
        } else {
            (required, false)
        }
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use model::Room;

    #[test]
    fn test_choose_mode() {
        // conditioning thresholds
        assert_eq!(choose_mode(28., Some(20.), Some(26.), false), Mode::Cooling);
        assert_eq!(choose_mode(15., Some(20.), Some(26.), false), Mode::Heating);
        // comfortable band follows the window policy
        assert_eq!(choose_mode(22., Some(20.), Some(26.), false), Mode::StopClose);
        assert_eq!(choose_mode(22., Some(20.), Some(26.), true), Mode::StopOpen);
        // no equipment, no conditioning
        assert_eq!(choose_mode(35., None, None, true), Mode::StopOpen);
        assert_eq!(choose_mode(-5., None, None, false), Mode::StopClose);
    }

    #[test]
    fn test_choose_mode_is_idempotent() {
        let first = choose_mode(17.3, Some(20.), Some(26.), false);
        for _ in 0..10 {
            assert_eq!(choose_mode(17.3, Some(20.), Some(26.), false), first);
        }
    }

    fn model_with_room() -> Model {
        let mut model = Model::default();
        model.add_room(Room::new("Main", 40.));
        model
    }

    #[test]
    fn test_radiant_cap_scales_with_area() -> Result<(), String> {
        let mut model = model_with_room();
        let hvac = model.add_hvac(Hvac::new(
            "Floor",
            "Main",
            EquipmentKind::Radiant {
                max_heating_flux: 60.,
                max_cooling_flux: 40.,
            },
        ));
        let eq = ZoneEquipment::new(&hvac, &model, 25.)?;
        assert!(eq.radiant);
        assert!((eq.max_heating - 1500.).abs() < 1e-9);
        assert!((eq.max_cooling - 1000.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_clamp_injection() -> Result<(), String> {
        let mut model = model_with_room();
        let hvac = model.add_hvac(Hvac::new(
            "Split",
            "Main",
            EquipmentKind::Convective {
                max_heating_power: 2000.,
                max_cooling_power: 1500.,
            },
        ));
        let eq = ZoneEquipment::new(&hvac, &model, 25.)?;

        assert_eq!(eq.clamp_injection(1200.), (1200., false));
        assert_eq!(eq.clamp_injection(2500.), (2000., true));
        assert_eq!(eq.clamp_injection(-1200.), (-1200., false));
        assert_eq!(eq.clamp_injection(-2500.), (-1500., true));
        Ok(())
    }

    #[test]
    fn test_explicit_setpoints_override_comfort() -> Result<(), String> {
        let mut model = model_with_room();
        let mut h = Hvac::new(
            "Split",
            "Main",
            EquipmentKind::Convective {
                max_heating_power: 2000.,
                max_cooling_power: 1500.,
            },
        );
        h.heating_setpoint = Some(19.);
        let hvac = model.add_hvac(h);
        let eq = ZoneEquipment::new(&hvac, &model, 25.)?;

        assert_eq!(eq.heating_setpoint(15.), 19.);
        // the comfort-derived cooling setpoint rises when surfaces
        // are cold
        let cold_walls = eq.cooling_setpoint(18.);
        let warm_walls = eq.cooling_setpoint(26.);
        assert!(cold_walls > warm_walls);
        Ok(())
    }
}
