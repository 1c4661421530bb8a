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

use crate::hvac::{choose_mode, ZoneEquipment};
use crate::response::ResponseArena;
use crate::surface::{SurfaceBoundary, SurfaceCoefficients, ThermalSurface};
use crate::zone::ThermalZone;
use crate::{psychrometrics, Float};
use calendar::Date;
use communication::{ErrorHandling, MetaOptions, SimulationModel};
use matrix::Matrix;
use model::{Mode, Model, PhysicalConstants, SimulationState, SimulationStateHeader};
use schedule::Schedule;
use std::borrow::Borrow;
use weather::WeatherTrait;

/// The cap on the per-step fixed-point iteration between the balance
/// solve and the operating-mode decision. Exceeding it means the
/// equipment/capacity configuration is inconsistent, which is fatal
/// for the run.
pub const MAX_MODE_ITERATIONS: usize = 20;

/// Two setpoints closer than this (in C) count as unchanged when
/// checking the fixed point for convergence
const SETPOINT_TOLERANCE: Float = 0.01;

/// The air temperature every room and surface starts the run at, in C
const INITIAL_TEMPERATURE: Float = 22.0;

/// The humidity ratio every room starts the run at, in kg/kg
const INITIAL_MOISTURE: Float = 0.008;

/// The sensible heat released by one seated occupant, in W
const OCCUPANT_SENSIBLE_HEAT: Float = 70.;

/// The latent heat released by one seated occupant, in W
const OCCUPANT_LATENT_HEAT: Float = 45.;

/// The time-varying boundary conditions of one room, each one a value
/// per step queried from its own schedule. Fields left unset fall
/// back to sensible defaults (no loads, window closed, equipment
/// available); a schedule that is set but has no value for a
/// requested date is an input error.
#[derive(Default)]
pub struct RoomSchedules {
    /// The number of occupants in the room
    pub occupancy: Option<Box<dyn Schedule<Float>>>,

    /// The sensible gain of the room's lighting, in W
    pub lighting: Option<Box<dyn Schedule<Float>>>,

    /// The sensible gain of the room's appliances, in W
    pub equipment: Option<Box<dyn Schedule<Float>>>,

    /// Moisture released into the room (cooking, showers...), in kg/s
    pub moisture: Option<Box<dyn Schedule<Float>>>,

    /// The window-operation policy: whether the window is open while
    /// the room free-floats
    pub window_open: Option<Box<dyn Schedule<bool>>>,

    /// Whether the room's equipment is allowed to run
    pub hvac_available: Option<Box<dyn Schedule<bool>>>,
}

impl RoomSchedules {
    fn value<T: Copy>(
        schedule: &Option<Box<dyn Schedule<T>>>,
        date: Date,
        default: T,
        what: &str,
        room: &str,
    ) -> Result<T, String> {
        match schedule {
            None => Ok(default),
            Some(s) => match s.get(date) {
                Some(v) => Ok(v),
                None => ThermalModel::user_error(format!(
                    "The {} schedule of room '{}' has no value for {}",
                    what, room, date
                )),
            },
        }
    }
}

/// The options for building a [`ThermalModel`]
#[derive(Default)]
pub struct ThermalModelOptions {
    /// One set of schedules per room, in the model's room order.
    /// Rooms beyond the end of this vector get default schedules.
    pub schedules: Vec<RoomSchedules>,
}

/// What a step's fixed-point iteration decides about one room: its
/// operating mode and—while conditioning—the setpoint it is pinned
/// at, or the capped injection it saturated at.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoneDecision {
    mode: Mode,
    setpoint: Float,
    saturated: bool,
    injection: Float,
}

impl ZoneDecision {
    fn free_floating(window_open: bool) -> Self {
        Self {
            mode: if window_open {
                Mode::StopOpen
            } else {
                Mode::StopClose
            },
            setpoint: 0.,
            saturated: false,
            injection: 0.,
        }
    }

    fn matches(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.saturated == other.saturated
            && (self.setpoint - other.setpoint).abs() <= SETPOINT_TOLERANCE
            && (self.injection - other.injection).abs() <= 1e-6
    }
}

/// The mutable memory of a simulation, allocated once and reused
/// every step: the response-state arena (the only data carried from
/// step to step besides the simulation state itself) plus the scratch
/// of the per-step solve.
pub struct ThermalAlloc {
    /// The thermal memory of every surface
    pub response: ResponseArena,

    a: Matrix,
    b: Matrix,

    // per-surface scratch
    histories: Vec<Float>,
    exterior_temperatures: Vec<Float>,
    absorbed_radiation: Vec<Float>,
    coefficients: Vec<SurfaceCoefficients>,
    surface_temperatures: Vec<Float>,

    // per-zone scratch
    internal_gains: Vec<Float>,
    moisture_gains: Vec<Float>,
    window_open: Vec<bool>,
    hvac_on: Vec<bool>,
    zone_solar: Vec<Float>,
    previous_temperatures: Vec<Float>,
    temperatures: Vec<Float>,
    free_floating: Vec<Float>,
    solved_injections: Vec<Float>,
    heating_setpoints: Vec<Float>,
    cooling_setpoints: Vec<Float>,
    decisions: Vec<ZoneDecision>,
    proposed: Vec<ZoneDecision>,
}

/// The coupled heat-and-moisture model of a whole building.
///
/// Built once from a [`Model`], it marches the building's rooms and
/// surfaces one timestep at a time. Each step it assembles the
/// room-sized linear system (surfaces eliminated through their
/// response factors), solves it, lets every room's equipment react to
/// the solved state, and repeats until mode, setpoint and saturation
/// stop changing; only then is the response-state arena advanced.
pub struct ThermalModel {
    /// The rooms, in model order
    pub zones: Vec<ThermalZone>,

    /// The surfaces, in model order
    pub surfaces: Vec<ThermalSurface>,

    /// The equipment conditioning each zone, if any
    equipment: Vec<Option<ZoneEquipment>>,

    /// The schedules of each zone
    schedules: Vec<RoomSchedules>,

    /// The total surface area of each zone, in m2
    zone_surface_area: Vec<Float>,

    constants: PhysicalConstants,
    ground_temperature: Float,

    /// The timestep, in seconds
    pub dt: Float,
}

impl ErrorHandling for ThermalModel {
    fn module_name() -> &'static str {
        "heat"
    }
}

impl SimulationModel for ThermalModel {
    type OutputType = Self;
    type OptionType = ThermalModelOptions;
    type AllocType = ThermalAlloc;

    fn new<M: Borrow<Model>>(
        _meta_options: &MetaOptions,
        options: Self::OptionType,
        model: M,
        state: &mut SimulationStateHeader,
        n: usize,
    ) -> Result<Self::OutputType, String> {
        let model = model.borrow();
        if n == 0 {
            return Self::user_error("The number of timesteps per hour must be positive".into());
        }
        let dt = 60. * 60. / n as Float;

        model.check().or_else(Self::user_error)?;

        let mut zones = Vec::with_capacity(model.rooms.len());
        for (i, room) in model.rooms.iter().enumerate() {
            let zone =
                ThermalZone::from_room(room, state, i, INITIAL_TEMPERATURE, INITIAL_MOISTURE)
                    .or_else(Self::internal_error)?;
            zones.push(zone);
        }

        let mut surfaces = Vec::with_capacity(model.surfaces.len());
        let mut zone_surface_area = vec![0.0; zones.len()];
        for (i, parent) in model.surfaces.iter().enumerate() {
            let surface =
                ThermalSurface::new(state, model, i, parent, dt, INITIAL_TEMPERATURE)
                    .or_else(Self::user_error)?;
            zone_surface_area[surface.zone_index] += surface.area;
            surfaces.push(surface);
        }

        let mut equipment: Vec<Option<ZoneEquipment>> = vec![None; zones.len()];
        for hvac in model.hvacs.iter() {
            let area = zone_surface_area[model.get_room_index(&hvac.target_room)?];
            let eq = ZoneEquipment::new(hvac, model, area).or_else(Self::user_error)?;
            if equipment[eq.zone_index].is_some() {
                return Self::user_error(format!(
                    "Room '{}' is conditioned by more than one system",
                    hvac.target_room
                ));
            }
            if eq.radiant && area <= 0. {
                return Self::user_error(format!(
                    "Radiant system '{}' targets room '{}', which has no surfaces to deliver onto",
                    hvac.name, hvac.target_room
                ));
            }
            let zone_index = eq.zone_index;
            equipment[zone_index] = Some(eq);
        }

        if options.schedules.len() > zones.len() {
            return Self::user_error(format!(
                "Received schedules for {} rooms... the model only has {}",
                options.schedules.len(),
                zones.len()
            ));
        }
        let mut schedules = options.schedules;
        while schedules.len() < zones.len() {
            schedules.push(RoomSchedules::default());
        }

        Ok(Self {
            zones,
            surfaces,
            equipment,
            schedules,
            zone_surface_area,
            constants: model.constants,
            ground_temperature: model.ground_temperature,
            dt,
        })
    }

    fn allocate_memory(&self) -> Result<Self::AllocType, String> {
        let n_zones = self.zones.len();
        let n_surfaces = self.surfaces.len();

        let terms: Vec<usize> = self.surfaces.iter().map(|s| s.n_terms()).collect();
        let mut response = ResponseArena::new(&terms);
        for (i, surface) in self.surfaces.iter().enumerate() {
            let (flux, exterior) = response.surface_mut(i);
            surface.warm_up(flux, exterior, INITIAL_TEMPERATURE);
        }

        Ok(ThermalAlloc {
            response,
            a: Matrix::new(0.0, n_zones, n_zones),
            b: Matrix::new(0.0, n_zones, 1),
            histories: vec![0.0; n_surfaces],
            exterior_temperatures: vec![0.0; n_surfaces],
            absorbed_radiation: vec![0.0; n_surfaces],
            coefficients: vec![SurfaceCoefficients::default(); n_surfaces],
            surface_temperatures: vec![0.0; n_surfaces],
            internal_gains: vec![0.0; n_zones],
            moisture_gains: vec![0.0; n_zones],
            window_open: vec![false; n_zones],
            hvac_on: vec![false; n_zones],
            zone_solar: vec![0.0; n_zones],
            previous_temperatures: vec![0.0; n_zones],
            temperatures: vec![0.0; n_zones],
            free_floating: vec![0.0; n_zones],
            solved_injections: vec![0.0; n_zones],
            heating_setpoints: vec![0.0; n_zones],
            cooling_setpoints: vec![0.0; n_zones],
            decisions: vec![ZoneDecision::free_floating(false); n_zones],
            proposed: vec![ZoneDecision::free_floating(false); n_zones],
        })
    }

    fn march<W: WeatherTrait, M: Borrow<Model>>(
        &self,
        date: Date,
        weather: &W,
        _model: M,
        state: &mut SimulationState,
        alloc: &mut Self::AllocType,
    ) -> Result<(), String> {
        let weather_data = weather.get_weather_data(date);
        let t_out = weather_data.dry_bulb_temperature;
        let x_out = psychrometrics::humidity_ratio(t_out, weather_data.relative_humidity);

        // last step's converged state
        for (i, zone) in self.zones.iter().enumerate() {
            alloc.previous_temperatures[i] = match zone.parent.air_temperature(state) {
                Some(v) => v,
                None => {
                    return Self::internal_error(format!(
                        "Room '{}' has no air temperature in the state",
                        zone.parent.name
                    ))
                }
            };
        }

        // this step's boundary conditions
        for (i, zone) in self.zones.iter().enumerate() {
            let name = &zone.parent.name;
            let schedules = &self.schedules[i];
            let occupancy =
                RoomSchedules::value(&schedules.occupancy, date, 0., "occupancy", name)?;
            let lighting = RoomSchedules::value(&schedules.lighting, date, 0., "lighting", name)?;
            let appliances =
                RoomSchedules::value(&schedules.equipment, date, 0., "equipment", name)?;
            let moisture = RoomSchedules::value(&schedules.moisture, date, 0., "moisture", name)?;
            alloc.window_open[i] =
                RoomSchedules::value(&schedules.window_open, date, false, "window", name)?;
            alloc.hvac_on[i] =
                RoomSchedules::value(&schedules.hvac_available, date, true, "HVAC", name)?;

            alloc.internal_gains[i] = occupancy * OCCUPANT_SENSIBLE_HEAT + lighting + appliances;
            alloc.moisture_gains[i] = moisture
                + occupancy * OCCUPANT_LATENT_HEAT / self.constants.latent_heat_of_vaporization;
        }

        self.prepare_surfaces(&weather_data, alloc);

        // free-floating pass: every room unconditioned, windows as
        // the window policy says
        for i in 0..self.zones.len() {
            alloc.decisions[i] = ZoneDecision::free_floating(alloc.window_open[i]);
            alloc.solved_injections[i] = 0.;
        }
        self.assemble_and_solve(t_out, alloc)?;
        alloc.free_floating.copy_from_slice(&alloc.temperatures);

        // comfort targets evaluated against the free-floating state
        self.back_substitute_surfaces(alloc);
        self.compute_setpoints(alloc);

        // fixed point over (mode, setpoint, saturation)
        let mut iterations = 0;
        loop {
            self.evaluate_decisions(alloc);
            let matches = alloc
                .decisions
                .iter()
                .zip(alloc.proposed.iter())
                .all(|(d, p)| d.matches(p));
            if matches {
                break;
            }
            if iterations >= MAX_MODE_ITERATIONS {
                let culprit = alloc
                    .decisions
                    .iter()
                    .zip(alloc.proposed.iter())
                    .position(|(d, p)| !d.matches(p))
                    .unwrap_or(0);
                return Self::user_error(format!(
                    "The operating mode of room '{}' did not settle within {} iterations at {}... check the equipment capacities",
                    self.zones[culprit].parent.name,
                    MAX_MODE_ITERATIONS,
                    date
                ));
            }
            std::mem::swap(&mut alloc.decisions, &mut alloc.proposed);
            self.assemble_and_solve(t_out, alloc)?;
            iterations += 1;
        }

        // fold the realized radiant output into the surfaces, settle
        // their temperatures, and advance the response states
        self.commit(x_out, state, alloc)
    }
}

impl ThermalModel {
    /// Histories, exterior references and absorbed solar of every
    /// surface; static within the step.
    fn prepare_surfaces(&self, weather_data: &weather::CurrentWeather, alloc: &mut ThermalAlloc) {
        #[cfg(not(feature = "parallel"))]
        {
            for (i, surface) in self.surfaces.iter().enumerate() {
                let (flux, exterior) = alloc.response.surface(i);
                alloc.histories[i] = surface.history(flux, exterior);
                alloc.exterior_temperatures[i] =
                    surface.exterior_temperature(weather_data, self.ground_temperature);
            }
        }
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let response = &alloc.response;
            let surfaces = &self.surfaces;
            let ground = self.ground_temperature;
            alloc
                .histories
                .par_iter_mut()
                .zip_eq(alloc.exterior_temperatures.par_iter_mut())
                .enumerate()
                .for_each(|(i, (history, exterior_temperature))| {
                    let surface = &surfaces[i];
                    let (flux, exterior) = response.surface(i);
                    *history = surface.history(flux, exterior);
                    *exterior_temperature =
                        surface.exterior_temperature(weather_data, ground);
                });
        }

        // transmitted solar, spread over each room's surfaces by area
        for v in alloc.zone_solar.iter_mut() {
            *v = 0.;
        }
        for surface in self.surfaces.iter() {
            alloc.zone_solar[surface.zone_index] += surface.transmitted_solar(weather_data);
        }
        for (i, surface) in self.surfaces.iter().enumerate() {
            let area = self.zone_surface_area[surface.zone_index];
            alloc.absorbed_radiation[i] = if area > 0. {
                alloc.zone_solar[surface.zone_index] / area
            } else {
                0.
            };
        }
    }

    /// Assembles and solves the room-sized system for the current
    /// decisions.
    ///
    /// Unknowns are air temperatures, except for rooms pinned at a
    /// setpoint, whose unknown becomes the injection their equipment
    /// must deliver; saturated rooms keep their temperature unknown
    /// and inject their cap. Results land in `alloc.temperatures` and
    /// `alloc.solved_injections`.
    fn assemble_and_solve(&self, t_out: Float, alloc: &mut ThermalAlloc) -> Result<(), String> {
        let n = self.zones.len();

        // surfaces eliminated; saturated radiant output is part of
        // the absorbed flux
        for (i, surface) in self.surfaces.iter().enumerate() {
            let z = surface.zone_index;
            let mut q_abs = alloc.absorbed_radiation[i];
            if let Some(eq) = &self.equipment[z] {
                let decision = &alloc.decisions[z];
                if eq.radiant && decision.saturated {
                    q_abs += decision.injection / self.zone_surface_area[z];
                }
            }
            alloc.coefficients[i] =
                surface.coefficients(q_abs, alloc.exterior_temperatures[i], alloc.histories[i]);
        }

        alloc.a *= 0.0;
        alloc.b *= 0.0;

        for (z, zone) in self.zones.iter().enumerate() {
            let decision = &alloc.decisions[z];
            let capacity = zone.heat_capacity(&self.constants) / self.dt;
            let ventilation = self.constants.air_density
                * self.constants.air_specific_heat
                * zone.ventilation_flow(decision.mode);

            alloc.a.add_to_element(z, z, capacity + ventilation)?;
            let mut rhs = capacity * alloc.previous_temperatures[z]
                + ventilation * t_out
                + alloc.internal_gains[z];
            if decision.saturated {
                if let Some(eq) = &self.equipment[z] {
                    if !eq.radiant {
                        rhs += decision.injection;
                    }
                }
            }
            alloc.b.add_to_element(z, 0, rhs)?;
        }

        for (i, surface) in self.surfaces.iter().enumerate() {
            let z = surface.zone_index;
            let ha = surface.h_front * surface.area;
            let coefs = &alloc.coefficients[i];
            alloc.a.add_to_element(z, z, ha * (1. - coefs.b))?;
            alloc.b.add_to_element(z, 0, ha * coefs.a)?;
            if let SurfaceBoundary::Adjacent(k) = surface.boundary {
                alloc.a.add_to_element(z, k, -ha * coefs.c)?;
            }
        }

        // pinned rooms: their temperature column moves to the right
        // hand side, and their column hosts the injection unknown
        for p in 0..n {
            let decision = &alloc.decisions[p];
            if !(decision.mode.is_conditioning() && !decision.saturated) {
                continue;
            }
            for j in 0..n {
                let coef = alloc.a.get(j, p)?;
                if coef != 0. {
                    alloc.b.add_to_element(j, 0, -coef * decision.setpoint)?;
                    alloc.a.set(j, p, 0.)?;
                }
            }
            let kappa = match &self.equipment[p] {
                Some(eq) if eq.radiant => {
                    // only the convective share of the radiant output
                    // reaches the air; the rest conducts away
                    let mut k = 0.;
                    for (i, surface) in self.surfaces.iter().enumerate() {
                        if surface.zone_index == p {
                            k += alloc.coefficients[i].b * surface.area;
                        }
                    }
                    k / self.zone_surface_area[p]
                }
                _ => 1.0,
            };
            alloc.a.set(p, p, -kappa)?;
        }

        alloc.a.mut_gaussian(&mut alloc.b)?;

        for z in 0..n {
            let x = alloc.b.get(z, 0)?;
            let decision = &alloc.decisions[z];
            if decision.mode.is_conditioning() && !decision.saturated {
                alloc.temperatures[z] = decision.setpoint;
                alloc.solved_injections[z] = x;
            } else {
                alloc.temperatures[z] = x;
                alloc.solved_injections[z] = decision.injection;
            }
        }
        Ok(())
    }

    /// Surface temperatures from the solved air temperatures and the
    /// coefficients of the last assembly
    fn back_substitute_surfaces(&self, alloc: &mut ThermalAlloc) {
        for (i, surface) in self.surfaces.iter().enumerate() {
            let coefs = &alloc.coefficients[i];
            let t_adjacent = match surface.boundary {
                SurfaceBoundary::Adjacent(k) => alloc.temperatures[k],
                _ => 0.,
            };
            alloc.surface_temperatures[i] =
                coefs.a + coefs.b * alloc.temperatures[surface.zone_index] + coefs.c * t_adjacent;
        }
    }

    /// Heating/cooling air setpoints per zone, derived from the
    /// free-floating state: explicit ones pass through, comfort-based
    /// ones compensate the room's mean surface temperature
    fn compute_setpoints(&self, alloc: &mut ThermalAlloc) {
        for z in 0..self.zones.len() {
            let eq = match &self.equipment[z] {
                Some(eq) => eq,
                None => continue,
            };
            let area = self.zone_surface_area[z];
            let t_mean = if area > 0. {
                let mut sum = 0.;
                for (i, surface) in self.surfaces.iter().enumerate() {
                    if surface.zone_index == z {
                        sum += alloc.surface_temperatures[i] * surface.area;
                    }
                }
                sum / area
            } else {
                alloc.free_floating[z]
            };
            alloc.heating_setpoints[z] = eq.heating_setpoint(t_mean);
            alloc.cooling_setpoints[z] = eq.cooling_setpoint(t_mean);
        }
    }

    /// Re-evaluates every room against the latest solve, writing the
    /// next candidate decisions into `alloc.proposed`
    fn evaluate_decisions(&self, alloc: &mut ThermalAlloc) {
        for z in 0..self.zones.len() {
            let current = alloc.decisions[z];
            let eq = match &self.equipment[z] {
                Some(eq) if alloc.hvac_on[z] => eq,
                _ => {
                    alloc.proposed[z] = ZoneDecision::free_floating(alloc.window_open[z]);
                    continue;
                }
            };

            let mode = choose_mode(
                alloc.free_floating[z],
                Some(alloc.heating_setpoints[z]),
                Some(alloc.cooling_setpoints[z]),
                alloc.window_open[z],
            );
            alloc.proposed[z] = match mode {
                Mode::StopOpen | Mode::StopClose => ZoneDecision::free_floating(alloc.window_open[z]),
                Mode::Heating | Mode::Cooling => {
                    let setpoint = match mode {
                        Mode::Heating => alloc.heating_setpoints[z],
                        _ => alloc.cooling_setpoints[z],
                    };
                    if current.mode == mode && !current.saturated {
                        // the last solve pinned this room; cap its
                        // required injection
                        let (injection, saturated) =
                            eq.clamp_injection(alloc.solved_injections[z]);
                        ZoneDecision {
                            mode,
                            setpoint,
                            saturated,
                            injection: if saturated { injection } else { 0. },
                        }
                    } else if current.mode == mode && current.saturated {
                        // the last solve ran at the cap; release it if
                        // the room overshot its setpoint
                        let overshoot = match mode {
                            Mode::Heating => {
                                alloc.temperatures[z] > setpoint + SETPOINT_TOLERANCE
                            }
                            _ => alloc.temperatures[z] < setpoint - SETPOINT_TOLERANCE,
                        };
                        if overshoot {
                            ZoneDecision {
                                mode,
                                setpoint,
                                saturated: false,
                                injection: 0.,
                            }
                        } else {
                            current
                        }
                    } else {
                        // entering conditioning: pin at the setpoint
                        ZoneDecision {
                            mode,
                            setpoint,
                            saturated: false,
                            injection: 0.,
                        }
                    }
                }
            };
        }
    }

    /// Realized sensible injection of a zone, in W
    fn realized_injection(&self, z: usize, alloc: &ThermalAlloc) -> Float {
        let decision = &alloc.decisions[z];
        if !decision.mode.is_conditioning() {
            0.
        } else if decision.saturated {
            decision.injection
        } else {
            alloc.solved_injections[z]
        }
    }

    /// Settles the converged step: folds the realized radiant output
    /// into the surfaces, back-substitutes their temperatures, solves
    /// each room's moisture balance, writes everything into the
    /// state, and advances the response arena (the once-per-step
    /// mutation).
    fn commit(
        &self,
        x_out: Float,
        state: &mut SimulationState,
        alloc: &mut ThermalAlloc,
    ) -> Result<(), String> {
        // final absorbed flux: the base radiation plus the realized
        // radiant output (the assembly only folded it in for
        // saturated rooms, and never into this vector)
        for (i, surface) in self.surfaces.iter().enumerate() {
            let z = surface.zone_index;
            let mut q_abs = alloc.absorbed_radiation[i];
            if let Some(eq) = &self.equipment[z] {
                if eq.radiant && alloc.decisions[z].mode.is_conditioning() {
                    q_abs += self.realized_injection(z, alloc) / self.zone_surface_area[z];
                }
            }
            alloc.absorbed_radiation[i] = q_abs;
            alloc.coefficients[i] =
                surface.coefficients(q_abs, alloc.exterior_temperatures[i], alloc.histories[i]);
        }
        self.back_substitute_surfaces(alloc);

        for (i, surface) in self.surfaces.iter().enumerate() {
            let t_room = alloc.temperatures[surface.zone_index];
            let t_surface = alloc.surface_temperatures[i];
            let q = surface.flux_into(t_room, t_surface, alloc.absorbed_radiation[i]);
            let exterior = match surface.boundary {
                SurfaceBoundary::Adjacent(k) => alloc.temperatures[k],
                _ => alloc.exterior_temperatures[i],
            };
            let (flux, exterior_theta) = alloc.response.surface_mut(i);
            surface.commit(flux, exterior_theta, q, exterior);
            surface.parent.set_temperature(state, t_surface)?;
        }

        let h_fg = self.constants.latent_heat_of_vaporization;
        for (z, zone) in self.zones.iter().enumerate() {
            let decision = &alloc.decisions[z];
            let x_previous = match zone.parent.air_moisture(state) {
                Some(v) => v,
                None => {
                    return Self::internal_error(format!(
                        "Room '{}' has no humidity in the state",
                        zone.parent.name
                    ))
                }
            };

            let mass = zone.moisture_mass(&self.constants) / self.dt;
            let ventilation = self.constants.air_density * zone.ventilation_flow(decision.mode);
            let gain = alloc.moisture_gains[z];

            let mut x = (mass * x_previous + ventilation * x_out + gain) / (mass + ventilation);
            let mut latent = 0.0;
            if decision.mode == Mode::Cooling {
                if let Some(eq) = &self.equipment[z] {
                    if let Some(rh) = eq.parent.target_relative_humidity {
                        let x_target =
                            psychrometrics::humidity_ratio(decision.setpoint, rh);
                        if x > x_target {
                            let mut power = h_fg
                                * ((mass + ventilation) * x_target
                                    - mass * x_previous
                                    - ventilation * x_out
                                    - gain);
                            if let Some(cap) = eq.parent.max_dehumidification_power {
                                if power < -cap {
                                    power = -cap;
                                }
                            }
                            x = (mass * x_previous
                                + ventilation * x_out
                                + gain
                                + power / h_fg)
                                / (mass + ventilation);
                            latent = power;
                        }
                    }
                }
            }

            zone.parent.set_air_temperature(state, alloc.temperatures[z])?;
            zone.parent.set_air_moisture(state, x)?;
            zone.parent.set_operating_mode(state, decision.mode.code())?;
            zone.parent
                .set_sensible_load(state, self.realized_injection(z, alloc))?;
            zone.parent.set_latent_load(state, latent)?;
        }
        Ok(())
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use model::{BoundarySurface, Construction, ResponseFactors, Room};
    use schedule::{EmptySchedule, ScheduleConstant};
    use weather::SyntheticWeather;

    fn noon() -> Date {
        Date {
            month: 1,
            day: 15,
            hour: 12.,
        }
    }

    fn wall_factors() -> ResponseFactors {
        ResponseFactors {
            ratios: vec![0.9],
            flux_gains: vec![0.05],
            exterior_gains: vec![0.1],
        }
    }

    fn single_room_model() -> Model {
        let mut model = Model::default();
        let mut room = Room::new("Main", 50.);
        room.ventilation_rate = 0.01;
        model.add_room(room);
        let mut c = Construction::new("Wall");
        c.response_factors = Some(wall_factors());
        model.add_construction(c);
        model.add_surface(BoundarySurface::new("Wall", "Main", "Wall", 10.));
        model
    }

    fn cold_weather(t: Float) -> SyntheticWeather {
        let mut w = SyntheticWeather::default();
        w.dry_bulb_temperature = Box::new(ScheduleConstant::new(t));
        w.relative_humidity = Box::new(ScheduleConstant::new(0.5));
        w
    }

    fn build(
        model: &Model,
        options: ThermalModelOptions,
    ) -> Result<(ThermalModel, model::SimulationState, ThermalAlloc), String> {
        let meta = MetaOptions::default();
        let mut header = SimulationStateHeader::new();
        let thermal = ThermalModel::new(&meta, options, model, &mut header, 4)?;
        let state = header.take_values().ok_or("no values")?;
        let alloc = thermal.allocate_memory()?;
        Ok((thermal, state, alloc))
    }

    #[test]
    fn test_free_float_matches_closed_form() -> Result<(), String> {
        let model = single_room_model();
        let (thermal, mut state, mut alloc) =
            build(&model, ThermalModelOptions::default())?;

        let t_out = 0.;
        let weather = cold_weather(t_out);
        thermal.march(noon(), &weather, &model, &mut state, &mut alloc)?;

        // one room, one exterior surface, no solar and no HVAC: the
        // assembled balance collapses to a single closed-form line
        let (ra, rt, ratio) = (0.05, 0.1, 0.9);
        let h = 7.7;
        let area = 10.;
        let dt = 900.;
        let capacity = 1.2 * 1005. * 50. / dt;
        let ventilation = 1.2 * 1005. * 0.01;

        // warm-up leaves the exterior accumulator at 22 C equivalent
        let history = ratio * (rt * 22. / (1. - ratio));
        let d = 1. + ra * h;
        let b = ra * h / d;
        let a = (rt * t_out + history) / d;
        let expected = (capacity * 22. + h * area * a + ventilation * t_out)
            / (capacity + h * area * (1. - b) + ventilation);

        let found = thermal.zones[0]
            .parent
            .air_temperature(&state)
            .ok_or("no temperature")?;
        assert!(
            (found - expected).abs() < 1e-9,
            "expected {}, found {}",
            expected,
            found
        );

        // the surface agrees with its own elimination line
        let t_s = model.surfaces[0].temperature(&state).ok_or("no temp")?;
        assert!((t_s - (a + b * found)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_cold_outdoors_cools_the_room() -> Result<(), String> {
        let model = single_room_model();
        let (thermal, mut state, mut alloc) =
            build(&model, ThermalModelOptions::default())?;
        let weather = cold_weather(-5.);

        let mut previous = 22.;
        let mut date = noon();
        for _ in 0..20 {
            thermal.march(date, &weather, &model, &mut state, &mut alloc)?;
            let t = thermal.zones[0]
                .parent
                .air_temperature(&state)
                .ok_or("no temperature")?;
            assert!(t < previous, "{} did not drop below {}", t, previous);
            previous = t;
            date.hour += 0.25;
        }
        let mode = Mode::from_code(
            thermal.zones[0]
                .parent
                .operating_mode(&state)
                .ok_or("no mode")?,
        )?;
        assert_eq!(mode, Mode::StopClose);
        Ok(())
    }

    #[test]
    fn test_open_window_follows_policy_and_cools_faster() -> Result<(), String> {
        let run = |window: bool| -> Result<(Float, Mode), String> {
            let mut model = single_room_model();
            let mut room = (*model.rooms[0]).clone();
            room.window_ventilation_rate = 0.5;
            model.rooms[0] = std::sync::Arc::new(room);

            let schedules = RoomSchedules {
                window_open: Some(Box::new(ScheduleConstant::new(window))),
                ..RoomSchedules::default()
            };
            let (thermal, mut state, mut alloc) = build(
                &model,
                ThermalModelOptions {
                    schedules: vec![schedules],
                },
            )?;
            let weather = cold_weather(0.);
            let mut date = noon();
            for _ in 0..8 {
                thermal.march(date, &weather, &model, &mut state, &mut alloc)?;
                date.hour += 0.25;
            }
            let t = thermal.zones[0]
                .parent
                .air_temperature(&state)
                .ok_or("no temperature")?;
            let mode = Mode::from_code(
                thermal.zones[0]
                    .parent
                    .operating_mode(&state)
                    .ok_or("no mode")?,
            )?;
            Ok((t, mode))
        };

        let (t_closed, mode_closed) = run(false)?;
        let (t_open, mode_open) = run(true)?;
        assert_eq!(mode_closed, Mode::StopClose);
        assert_eq!(mode_open, Mode::StopOpen);
        assert!(t_open < t_closed, "open {} vs closed {}", t_open, t_closed);
        Ok(())
    }

    #[test]
    fn test_internal_gains_warm_the_room() -> Result<(), String> {
        let model = single_room_model();
        let schedules = RoomSchedules {
            equipment: Some(Box::new(ScheduleConstant::new(500.))),
            ..RoomSchedules::default()
        };
        let (thermal, mut state, mut alloc) = build(
            &model,
            ThermalModelOptions {
                schedules: vec![schedules],
            },
        )?;
        let weather = cold_weather(22.);
        thermal.march(noon(), &weather, &model, &mut state, &mut alloc)?;
        let t = thermal.zones[0]
            .parent
            .air_temperature(&state)
            .ok_or("no temperature")?;
        assert!(t > 22., "found {}", t);
        Ok(())
    }

    #[test]
    fn test_missing_schedule_value_is_an_input_error() -> Result<(), String> {
        let model = single_room_model();
        let schedules = RoomSchedules {
            lighting: Some(Box::new(EmptySchedule)),
            ..RoomSchedules::default()
        };
        let (thermal, mut state, mut alloc) = build(
            &model,
            ThermalModelOptions {
                schedules: vec![schedules],
            },
        )?;
        let weather = cold_weather(0.);
        let res = thermal.march(noon(), &weather, &model, &mut state, &mut alloc);
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn test_humidity_tracks_ventilation() -> Result<(), String> {
        let model = single_room_model();
        let (thermal, mut state, mut alloc) =
            build(&model, ThermalModelOptions::default())?;
        let weather = cold_weather(22.);
        let x_out = psychrometrics::humidity_ratio(22., 0.5);

        let mut date = noon();
        for _ in 0..2000 {
            thermal.march(date, &weather, &model, &mut state, &mut alloc)?;
            date.hour += 0.25;
        }
        let x = thermal.zones[0]
            .parent
            .air_moisture(&state)
            .ok_or("no moisture")?;
        assert!((x - x_out).abs() < 1e-5, "x={} vs outdoor {}", x, x_out);
        Ok(())
    }

    #[test]
    fn test_too_many_schedules_is_fatal() {
        let model = single_room_model();
        let options = ThermalModelOptions {
            schedules: vec![RoomSchedules::default(), RoomSchedules::default()],
        };
        assert!(build(&model, options).is_err());
    }
}
