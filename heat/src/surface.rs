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

use crate::discretization::Discretization;
use crate::response;
use crate::Float;
use model::{
    Boundary, BoundarySurface, Model, ResponseFactors, SimulationStateElement,
    SimulationStateHeader,
};
use std::sync::Arc;
use weather::CurrentWeather;

/// What sits on the exterior side of a surface, resolved to indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceBoundary {
    /// Outdoor air (or sol-air, for opaque surfaces)
    Exterior,

    /// The fixed deep-soil node
    Ground,

    /// The air node of another simulated room
    Adjacent(usize),
}

/// The linear dependence of a surface's temperature on the air
/// temperatures around it, once its conduction history is folded in:
///
/// ```math
/// T_s = a + b T_{room} + c T_{adjacent}
/// ```
///
/// (`c` is zero unless the surface is a partition towards another
/// simulated room.)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceCoefficients {
    /// The affine part: history, absorbed radiation, and the exterior
    /// reference
    pub a: Float,

    /// The sensitivity to the room's own air temperature
    pub b: Float,

    /// The sensitivity to the adjacent room's air temperature
    pub c: Float,
}

/// A [`BoundarySurface`] as the balance solver sees it: its response
/// factors resolved, its boundary resolved to room indices, and its
/// spot in the response-state arena assigned.
#[derive(Debug, Clone)]
pub struct ThermalSurface {
    /// A clone of the element in the [`Model`] which this struct
    /// represents
    pub parent: Arc<BoundarySurface>,

    /// The index of the room on the interior side
    pub zone_index: usize,

    /// What lies on the exterior side
    pub boundary: SurfaceBoundary,

    /// The area, in m2
    pub area: Float,

    /// The interior film coefficient, in W/m2 K
    pub h_front: Float,

    /// The exterior film coefficient, in W/m2 K
    pub h_back: Float,

    /// The response factors of this surface's construction
    pub factors: ResponseFactors,

    /// Cached sum of the flux gains, in m2 K/W
    ra: Float,

    /// Cached sum of the exterior gains
    rt: Float,
}

impl ThermalSurface {
    /// Resolves a model surface against its model: looks up its room
    /// and construction, derives response factors when the
    /// construction carries none, and registers the surface's
    /// temperature in the simulation state.
    pub fn new(
        state: &mut SimulationStateHeader,
        model: &Model,
        surface_index: usize,
        parent: &Arc<BoundarySurface>,
        dt: Float,
        initial_temperature: Float,
    ) -> Result<Self, String> {
        let zone_index = model.get_room_index(&parent.room)?;
        let boundary = match &parent.boundary {
            Boundary::Outdoor => SurfaceBoundary::Exterior,
            Boundary::Ground => SurfaceBoundary::Ground,
            Boundary::Room { room } => SurfaceBoundary::Adjacent(model.get_room_index(room)?),
        };

        let construction = model.get_construction(&parent.construction)?;
        let factors = match &construction.response_factors {
            Some(f) => {
                f.validate()
                    .map_err(|e| format!("Construction '{}': {}", construction.name, e))?;
                f.clone()
            }
            None => {
                let discretization =
                    Discretization::new(&construction, &parent.boundary, parent.h_back)?;
                discretization.fit_response_factors(dt)?
            }
        };

        let ra = factors.flux_gain_sum();
        if ra <= 0. {
            return Err(format!(
                "Surface '{}' has a non-positive immediate flux response ({} m2K/W)",
                parent.name, ra
            ));
        }
        let rt = factors.exterior_gain_sum();

        let i = state.push(
            SimulationStateElement::SurfaceTemperature(surface_index),
            initial_temperature,
        );
        parent.set_temperature_index(i)?;

        Ok(Self {
            parent: Arc::clone(parent),
            zone_index,
            boundary,
            area: parent.area,
            h_front: parent.h_front,
            h_back: parent.h_back,
            factors,
            ra,
            rt,
        })
    }

    /// The number of decay terms of this surface
    pub fn n_terms(&self) -> usize {
        self.factors.n_terms()
    }

    /// The equivalent temperature on the exterior side for surfaces
    /// that do not face another simulated room: sol-air for opaque
    /// exterior surfaces, plain outdoor air for transparent ones
    /// (whose solar enters the room instead), and the deep-soil node
    /// for ground-coupled ones.
    pub fn exterior_temperature(
        &self,
        weather: &CurrentWeather,
        ground_temperature: Float,
    ) -> Float {
        match self.boundary {
            SurfaceBoundary::Ground => ground_temperature,
            SurfaceBoundary::Adjacent(_) => 0.0, // replaced by the coupling term
            SurfaceBoundary::Exterior => {
                let t_out = weather.dry_bulb_temperature;
                if self.parent.is_transparent() {
                    t_out
                } else {
                    let incident =
                        self.parent.solar_factor * weather.global_horizontal_radiation;
                    t_out + self.parent.solar_absorptance * incident / self.h_back
                }
            }
        }
    }

    /// The solar power this surface lets into its room, in W
    pub fn transmitted_solar(&self, weather: &CurrentWeather) -> Float {
        self.parent.solar_transmittance
            * self.parent.solar_factor
            * weather.global_horizontal_radiation
            * self.area
    }

    /// The decayed contribution of this surface's past excitations to
    /// its temperature, from its accumulators in the arena
    pub fn history(&self, flux_theta: &[Float], exterior_theta: &[Float]) -> Float {
        response::history(flux_theta, &self.factors.ratios)
            + response::history(exterior_theta, &self.factors.ratios)
    }

    /// Eliminates this surface: given the radiation absorbed on its
    /// interior face (`q_abs`, W/m2), its exterior equivalent
    /// temperature and its history, produce the coefficients that
    /// express its temperature as a linear function of the air
    /// temperatures around it.
    pub fn coefficients(
        &self,
        q_abs: Float,
        exterior_temperature: Float,
        history: Float,
    ) -> SurfaceCoefficients {
        let d = 1. + self.ra * self.h_front;
        let b = self.ra * self.h_front / d;
        match self.boundary {
            SurfaceBoundary::Adjacent(_) => SurfaceCoefficients {
                a: (self.ra * q_abs + history) / d,
                b,
                c: self.rt / d,
            },
            SurfaceBoundary::Exterior | SurfaceBoundary::Ground => SurfaceCoefficients {
                a: (self.ra * q_abs + self.rt * exterior_temperature + history) / d,
                b,
                c: 0.0,
            },
        }
    }

    /// The heat flux into the interior face (W/m2) once the air and
    /// surface temperatures are known: convection plus absorbed
    /// radiation. This is the excitation committed to the flux series.
    pub fn flux_into(&self, t_room: Float, t_surface: Float, q_abs: Float) -> Float {
        self.h_front * (t_room - t_surface) + q_abs
    }

    /// Advances this surface's accumulators with the step's converged
    /// excitations. Called exactly once per step, after the balance
    /// has converged.
    pub fn commit(
        &self,
        flux_theta: &mut [Float],
        exterior_theta: &mut [Float],
        q: Float,
        exterior_temperature: Float,
    ) {
        response::advance(flux_theta, &self.factors.flux_gains, &self.factors.ratios, q);
        response::advance(
            exterior_theta,
            &self.factors.exterior_gains,
            &self.factors.ratios,
            exterior_temperature,
        );
    }

    /// Sets the accumulators to the steady state of a uniform
    /// temperature and no interior flux, the defined warm-up state at
    /// simulation start
    pub fn warm_up(
        &self,
        flux_theta: &mut [Float],
        exterior_theta: &mut [Float],
        temperature: Float,
    ) {
        for t in flux_theta.iter_mut() {
            *t = 0.;
        }
        response::warm_up(
            exterior_theta,
            &self.factors.exterior_gains,
            &self.factors.ratios,
            temperature,
        );
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use model::{Construction, Layer, Room};

    fn single_room_model(boundary: Boundary, factors: Option<ResponseFactors>) -> Model {
        let mut model = Model::default();
        model.add_room(Room::new("Main", 40.));
        let mut c = Construction::new("Wall");
        c.layers.push(Layer {
            thickness: 0.1,
            conductivity: 1.0,
            density: 2000.,
            specific_heat: 900.,
        });
        c.response_factors = factors;
        model.add_construction(c);
        let mut s = BoundarySurface::new("Wall", "Main", "Wall", 10.);
        s.boundary = boundary;
        model.add_surface(s);
        model
    }

    fn simple_factors() -> ResponseFactors {
        ResponseFactors {
            ratios: vec![0.9],
            flux_gains: vec![0.05],
            exterior_gains: vec![0.1],
        }
    }

    #[test]
    fn test_new_resolves_and_registers() -> Result<(), String> {
        let model = single_room_model(Boundary::Outdoor, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let ts = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.)?;

        assert_eq!(ts.zone_index, 0);
        assert_eq!(ts.boundary, SurfaceBoundary::Exterior);
        assert_eq!(ts.n_terms(), 1);
        assert_eq!(header.len(), 1);
        assert_eq!(model.surfaces[0].temperature_index(), Some(0));
        Ok(())
    }

    #[test]
    fn test_bad_ratio_is_fatal() {
        let mut factors = simple_factors();
        factors.ratios[0] = 1.1;
        let model = single_room_model(Boundary::Outdoor, Some(factors));
        let mut header = SimulationStateHeader::new();
        let res = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.);
        assert!(res.is_err());
    }

    #[test]
    fn test_elimination_matches_hand_computation() -> Result<(), String> {
        let model = single_room_model(Boundary::Outdoor, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let ts = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.)?;

        let h = ts.h_front;
        let (ra, rt) = (0.05, 0.1);
        let (q_abs, t_eo, hist) = (30., -5., 12.);
        let coefs = ts.coefficients(q_abs, t_eo, hist);

        let d = 1. + ra * h;
        assert!((coefs.b - ra * h / d).abs() < 1e-12);
        assert!((coefs.a - (ra * q_abs + rt * t_eo + hist) / d).abs() < 1e-12);
        assert_eq!(coefs.c, 0.0);

        // the eliminated form agrees with the surface balance:
        // q = h (T_room - T_s) + q_abs and T_s = ra q + rt t_eo + hist
        let t_room = 21.;
        let t_s = coefs.a + coefs.b * t_room;
        let q = ts.flux_into(t_room, t_s, q_abs);
        assert!((t_s - (ra * q + rt * t_eo + hist)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_partition_couples_both_rooms() -> Result<(), String> {
        let mut model = Model::default();
        model.add_room(Room::new("A", 40.));
        model.add_room(Room::new("B", 40.));
        let mut c = Construction::new("Partition");
        c.response_factors = Some(simple_factors());
        model.add_construction(c);
        let mut s = BoundarySurface::new("A-B", "A", "Partition", 8.);
        s.boundary = Boundary::Room { room: "B".into() };
        model.add_surface(s);

        let mut header = SimulationStateHeader::new();
        let ts = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.)?;
        assert_eq!(ts.boundary, SurfaceBoundary::Adjacent(1));

        let coefs = ts.coefficients(0., 0., 0.);
        assert!(coefs.c > 0.);
        // both air nodes pull the surface temperature
        let warm_b = coefs.a + coefs.b * 20. + coefs.c * 30.;
        let cold_b = coefs.a + coefs.b * 20. + coefs.c * 10.;
        assert!(warm_b > cold_b);
        Ok(())
    }

    #[test]
    fn test_sol_air_and_ground_references() -> Result<(), String> {
        let weather = CurrentWeather {
            dry_bulb_temperature: 10.,
            global_horizontal_radiation: 500.,
            ..CurrentWeather::default()
        };

        // opaque exterior surface sees sol-air above outdoor air
        let model = single_room_model(Boundary::Outdoor, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let mut parent = (*model.surfaces[0]).clone();
        parent.solar_factor = 0.5;
        let parent = Arc::new(parent);
        let ts = ThermalSurface::new(&mut header, &model, 0, &parent, 900., 22.)?;
        let t_eo = ts.exterior_temperature(&weather, 10.);
        let expected = 10. + 0.7 * 0.5 * 500. / ts.h_back;
        assert!((t_eo - expected).abs() < 1e-9);

        // ground surfaces see the deep-soil node, whatever the weather
        let model = single_room_model(Boundary::Ground, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let ts = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.)?;
        assert_eq!(ts.exterior_temperature(&weather, 9.5), 9.5);
        Ok(())
    }

    #[test]
    fn test_transparent_surface_transmits() -> Result<(), String> {
        let model = single_room_model(Boundary::Outdoor, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let mut parent = (*model.surfaces[0]).clone();
        parent.solar_transmittance = 0.7;
        parent.solar_factor = 0.4;
        let parent = Arc::new(parent);
        let ts = ThermalSurface::new(&mut header, &model, 0, &parent, 900., 22.)?;

        let weather = CurrentWeather {
            dry_bulb_temperature: 10.,
            global_horizontal_radiation: 500.,
            ..CurrentWeather::default()
        };
        // transparent surfaces use plain outdoor air as reference...
        assert!((ts.exterior_temperature(&weather, 10.) - 10.).abs() < 1e-9);
        // ... and pass their solar indoors instead
        assert!((ts.transmitted_solar(&weather) - 0.7 * 0.4 * 500. * 10.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_warm_up_holds_steady() -> Result<(), String> {
        let model = single_room_model(Boundary::Outdoor, Some(simple_factors()));
        let mut header = SimulationStateHeader::new();
        let ts = ThermalSurface::new(&mut header, &model, 0, &model.surfaces[0], 900., 22.)?;

        let mut flux = vec![0.0; 1];
        let mut ext = vec![0.0; 1];
        ts.warm_up(&mut flux, &mut ext, 22.);

        // under the same constant excitation, the state does not move
        let before: Float = ext.iter().sum();
        ts.commit(&mut flux, &mut ext, 0.0, 22.);
        let after: Float = ext.iter().sum();
        assert!((before - after).abs() < 1e-9);
        assert!(flux.iter().all(|v| *v == 0.));
        Ok(())
    }
}
