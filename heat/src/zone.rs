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
use model::{Mode, PhysicalConstants, Room, SimulationStateElement, SimulationStateHeader};
use std::sync::Arc;

/// A [`Room`] as the balance solver sees it: an air node with the
/// furniture lumped in, registered in the simulation state.
#[derive(Debug, Clone)]
pub struct ThermalZone {
    /// A clone of the element in the model which this struct
    /// represents
    pub parent: Arc<Room>,

    volume: Float,
    furniture_sensible_capacity: Float,
    furniture_moisture_capacity: Float,
    ventilation_rate: Float,
    window_ventilation_rate: Float,
}

impl ThermalZone {
    /// Creates a zone from a room, registering the room's air
    /// temperature, humidity, operating mode, and realized loads in
    /// the simulation state.
    pub fn from_room(
        room: &Arc<Room>,
        state: &mut SimulationStateHeader,
        room_index: usize,
        initial_temperature: Float,
        initial_moisture: Float,
    ) -> Result<Self, String> {
        let i = state.push(
            SimulationStateElement::RoomAirTemperature(room_index),
            initial_temperature,
        );
        room.set_air_temperature_index(i)?;

        let i = state.push(
            SimulationStateElement::RoomAirMoisture(room_index),
            initial_moisture,
        );
        room.set_air_moisture_index(i)?;

        let i = state.push(
            SimulationStateElement::RoomOperatingMode(room_index),
            Mode::StopClose.code(),
        );
        room.set_operating_mode_index(i)?;

        let i = state.push(SimulationStateElement::RoomSensibleLoad(room_index), 0.0);
        room.set_sensible_load_index(i)?;

        let i = state.push(SimulationStateElement::RoomLatentLoad(room_index), 0.0);
        room.set_latent_load_index(i)?;

        Ok(Self {
            parent: Arc::clone(room),
            volume: room.volume,
            furniture_sensible_capacity: room.furniture_sensible_capacity,
            furniture_moisture_capacity: room.furniture_moisture_capacity,
            ventilation_rate: room.ventilation_rate,
            window_ventilation_rate: room.window_ventilation_rate,
        })
    }

    /// The sensible heat capacity attached to the air node, in J/K:
    /// the air itself plus the furniture
    pub fn heat_capacity(&self, constants: &PhysicalConstants) -> Float {
        constants.air_heat_capacity(self.volume) + self.furniture_sensible_capacity
    }

    /// The moisture-buffering mass attached to the air node, in kg:
    /// the air itself plus the furniture
    pub fn moisture_mass(&self, constants: &PhysicalConstants) -> Float {
        constants.air_density * self.volume + self.furniture_moisture_capacity
    }

    /// The outdoor-air exchange of the zone, in m3/s, under a certain
    /// operating mode: the open window adds its flow on top of the
    /// mechanical ventilation
    pub fn ventilation_flow(&self, mode: Mode) -> Float {
        match mode {
            Mode::StopOpen => self.ventilation_rate + self.window_ventilation_rate,
            Mode::Heating | Mode::Cooling | Mode::StopClose => self.ventilation_rate,
        }
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    fn room() -> Arc<Room> {
        let mut r = Room::new("Main", 50.);
        r.furniture_sensible_capacity = 20_000.;
        r.furniture_moisture_capacity = 10.;
        r.ventilation_rate = 0.01;
        r.window_ventilation_rate = 0.1;
        Arc::new(r)
    }

    #[test]
    fn test_from_room_registers_states() -> Result<(), String> {
        let room = room();
        let mut header = SimulationStateHeader::new();
        let zone = ThermalZone::from_room(&room, &mut header, 0, 22., 0.008)?;

        assert_eq!(header.len(), 5);
        let state = header.take_values().ok_or("no values")?;
        assert!((room.air_temperature(&state).ok_or("unmapped")? - 22.).abs() < 1e-9);
        assert!((room.air_moisture(&state).ok_or("unmapped")? - 0.008).abs() < 1e-12);
        let mode = Mode::from_code(room.operating_mode(&state).ok_or("unmapped")?)?;
        assert_eq!(mode, Mode::StopClose);

        let constants = PhysicalConstants::default();
        let expected = 1.2 * 1005. * 50. + 20_000.;
        assert!((zone.heat_capacity(&constants) - expected).abs() < 1e-6);
        let expected = 1.2 * 50. + 10.;
        assert!((zone.moisture_mass(&constants) - expected).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_window_changes_ventilation() -> Result<(), String> {
        let room = room();
        let mut header = SimulationStateHeader::new();
        let zone = ThermalZone::from_room(&room, &mut header, 0, 22., 0.008)?;

        assert!((zone.ventilation_flow(Mode::StopClose) - 0.01).abs() < 1e-12);
        assert!((zone.ventilation_flow(Mode::Heating) - 0.01).abs() < 1e-12);
        assert!((zone.ventilation_flow(Mode::Cooling) - 0.01).abs() < 1e-12);
        assert!((zone.ventilation_flow(Mode::StopOpen) - 0.11).abs() < 1e-12);
        Ok(())
    }
}
