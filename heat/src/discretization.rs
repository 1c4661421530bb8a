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
use matrix::Matrix;
use model::{soil_layer, Boundary, Construction, ResponseFactors};

/// The number of decay terms fitted for a massive construction
pub const N_TERMS: usize = 12;

/// The longest time constant of the fitted decay ladder: 30 days
const MAX_TIME_CONSTANT: Float = 30. * 24. * 3600.;

/// The target thickness when subdividing layers into segments, in m
const MAX_SEGMENT_THICKNESS: Float = 0.05;

/// Below this areal heat capacity (J/m2 K) a construction is treated
/// as massless and gets exact single-term factors
const NO_MASS_CAPACITY: Float = 1000.;

/// Hard cap on the number of recorded step-response samples
const MAX_SAMPLES: usize = 100_000;

/// A sample is considered steady after this many consecutive
/// relative changes below `STEADY_EPS`
const STEADY_RUN: usize = 10;
const STEADY_EPS: Float = 1e-9;

/// The weight of the steady-state equation within the least-squares
/// fit, preserving the fixed points of the responses
const STEADY_WEIGHT: Float = 1000.;

/// A construction reduced to a chain of resistance/capacity segments,
/// from the interior surface to the exterior reference.
///
/// This network exists only at setup time: its exact discrete step
/// responses—computed by marching the chain with an implicit
/// scheme—are fitted into [`ResponseFactors`], and the run-time
/// conduction model is the fitted recurrence.
#[derive(Debug, Clone)]
pub struct Discretization {
    /// The resistance of each segment, in m2 K/W
    pub segment_resistances: Vec<Float>,

    /// The heat capacity of each segment, in J/m2 K
    pub segment_capacities: Vec<Float>,

    /// The film resistance between the last segment and the exterior
    /// reference, in m2 K/W (zero for ground-coupled constructions,
    /// whose reference is the deep-soil node itself)
    pub exterior_film_resistance: Float,
}

impl Discretization {
    /// Builds the thermal network of a construction as seen from a
    /// surface with a certain boundary and exterior film coefficient.
    ///
    /// Ground-coupled surfaces get the standard soil layer appended
    /// to their stack and no exterior film.
    pub fn new(
        construction: &Construction,
        boundary: &Boundary,
        h_back: Float,
    ) -> Result<Self, String> {
        let mut layers = construction.layers.clone();
        let exterior_film_resistance = match boundary {
            Boundary::Ground => {
                layers.push(soil_layer());
                0.0
            }
            Boundary::Outdoor | Boundary::Room { .. } => {
                if h_back <= 0. {
                    return Err(format!(
                        "Construction '{}' needs a positive exterior film coefficient... found {}",
                        construction.name, h_back
                    ));
                }
                1. / h_back
            }
        };
        if layers.is_empty() {
            return Err(format!(
                "Construction '{}' has no layers and no response factors",
                construction.name
            ));
        }

        let mut segment_resistances = Vec::new();
        let mut segment_capacities = Vec::new();
        for layer in layers.iter() {
            if layer.thickness <= 0. || layer.conductivity <= 0. {
                return Err(format!(
                    "Construction '{}' has a layer with non-positive thickness or conductivity",
                    construction.name
                ));
            }
            let n = (layer.thickness / MAX_SEGMENT_THICKNESS).ceil().max(1.) as usize;
            for _ in 0..n {
                segment_resistances.push(layer.resistance() / n as Float);
                segment_capacities.push(layer.areal_heat_capacity() / n as Float);
            }
        }

        Ok(Self {
            segment_resistances,
            segment_capacities,
            exterior_film_resistance,
        })
    }

    /// The resistance from the interior surface to the exterior
    /// reference, in m2 K/W
    pub fn total_resistance(&self) -> Float {
        self.segment_resistances.iter().sum::<Float>() + self.exterior_film_resistance
    }

    /// The heat capacity of the whole chain, in J/m2 K
    pub fn total_capacity(&self) -> Float {
        self.segment_capacities.iter().sum()
    }

    /// The interior surface temperature after each of a series of
    /// steps of length `dt` under a constant unit excitation, starting
    /// from a uniformly zero chain.
    ///
    /// With `flux_excitation`, a unit heat flux (1 W/m2) enters the
    /// interior surface; otherwise the exterior reference is held at
    /// 1 C. The chain is marched with a backward-Euler scheme, solving
    /// its tridiagonal system at every step, until the response is
    /// steady.
    fn step_response(&self, dt: Float, flux_excitation: bool) -> Result<Vec<Float>, String> {
        let n = self.segment_resistances.len();
        let r = &self.segment_resistances;
        let c = &self.segment_capacities;
        let u_ext = 1. / (r[n - 1] / 2. + self.exterior_film_resistance);

        let mut temps = vec![0.0; n];
        let mut k_matrix = Matrix::new(0.0, n, n);
        let mut b = Matrix::new(0.0, n, 1);

        let mut samples = Vec::new();
        let mut steady_count = 0;
        let mut previous = 0.0;

        while samples.len() < MAX_SAMPLES {
            for i in 0..n {
                let mut diag = c[i] / dt;
                if i > 0 {
                    let u = 1. / (r[i - 1] / 2. + r[i] / 2.);
                    k_matrix.set(i, i - 1, -u)?;
                    diag += u;
                }
                if i < n - 1 {
                    let u = 1. / (r[i] / 2. + r[i + 1] / 2.);
                    k_matrix.set(i, i + 1, -u)?;
                    diag += u;
                } else {
                    diag += u_ext;
                }
                k_matrix.set(i, i, diag)?;

                let mut rhs = c[i] / dt * temps[i];
                if flux_excitation && i == 0 {
                    rhs += 1.0;
                }
                if !flux_excitation && i == n - 1 {
                    rhs += u_ext;
                }
                b.set(i, 0, rhs)?;
            }

            k_matrix.mut_n_diag_gaussian(&mut b, 3)?;
            for (i, t) in temps.iter_mut().enumerate() {
                *t = b.get(i, 0)?;
            }

            // the interior surface sits half a segment away from the
            // first node; only the flux excitation crosses that gap
            let y = if flux_excitation {
                temps[0] + r[0] / 2.
            } else {
                temps[0]
            };
            samples.push(y);

            if (y - previous).abs() < STEADY_EPS * y.abs().max(1.) {
                steady_count += 1;
                if steady_count >= STEADY_RUN {
                    break;
                }
            } else {
                steady_count = 0;
            }
            previous = y;
        }
        Ok(samples)
    }

    /// Fits [`ResponseFactors`] for this chain at a certain timestep.
    ///
    /// Gains are fitted by least squares against a fixed geometric
    /// ladder of decay ratios, with the steady state weighted in so
    /// that the fixed points of the recurrence reproduce the chain's
    /// own: a constant unit flux converges to the interior-to-exterior
    /// resistance, and a unit exterior step to a transmission ratio
    /// of one. Massless constructions skip the fit and get the exact
    /// single-term factors.
    pub fn fit_response_factors(&self, dt: Float) -> Result<ResponseFactors, String> {
        let total_r = self.total_resistance();
        if self.total_capacity() < NO_MASS_CAPACITY {
            let factors = ResponseFactors {
                ratios: vec![0.0],
                flux_gains: vec![total_r],
                exterior_gains: vec![1.0],
            };
            factors.validate()?;
            return Ok(factors);
        }

        let ratios: Vec<Float> = (0..N_TERMS)
            .map(|m| {
                let x = m as Float / (N_TERMS - 1) as Float;
                let tau = dt * (MAX_TIME_CONSTANT / dt).powf(x);
                (-dt / tau).exp()
            })
            .collect();

        let flux_samples = self.step_response(dt, true)?;
        let exterior_samples = self.step_response(dt, false)?;

        let flux_gains = fit_gains(&ratios, &flux_samples, total_r)?;
        let exterior_gains = fit_gains(&ratios, &exterior_samples, 1.0)?;

        let mut factors = ResponseFactors {
            ratios,
            flux_gains,
            exterior_gains,
        };
        factors.validate()?;

        // the fixed points must survive the fit exactly; the least
        // squares gets them close, the rescale pins them down
        let steady_flux = factors.steady_flux_response();
        if (steady_flux - total_r).abs() > 0.2 * total_r {
            return Err(format!(
                "Response-factor fit lost the steady flux response... expected {} m2K/W, fitted {}",
                total_r, steady_flux
            ));
        }
        for g in factors.flux_gains.iter_mut() {
            *g *= total_r / steady_flux;
        }
        let steady_exterior = factors.steady_exterior_response();
        if (steady_exterior - 1.).abs() > 0.2 {
            return Err(format!(
                "Response-factor fit lost the steady transmission... expected 1, fitted {}",
                steady_exterior
            ));
        }
        for g in factors.exterior_gains.iter_mut() {
            *g *= 1. / steady_exterior;
        }
        Ok(factors)
    }
}

/// Least-squares gains reproducing `samples`, the response to a
/// constant unit excitation: the model value at step `k` is
/// $`\sum_m g_m (1-r_m^{k+1})/(1-r_m)`$, and the steady state
/// $`\sum_m g_m/(1-r_m)`$ is constrained (by weight) to `steady`.
fn fit_gains(ratios: &[Float], samples: &[Float], steady: Float) -> Result<Vec<Float>, String> {
    let n = ratios.len();
    let mut normal = Matrix::new(0.0, n, n);
    let mut rhs = Matrix::new(0.0, n, 1);

    let mut pows = vec![1.0; n];
    let mut basis = vec![0.0; n];
    for y in samples.iter() {
        for m in 0..n {
            pows[m] *= ratios[m];
            basis[m] = (1. - pows[m]) / (1. - ratios[m]);
        }
        for a in 0..n {
            for b in 0..n {
                normal.add_to_element(a, b, basis[a] * basis[b])?;
            }
            rhs.add_to_element(a, 0, basis[a] * y)?;
        }
    }

    // steady-state equation, heavily weighted
    let w2 = STEADY_WEIGHT * STEADY_WEIGHT;
    for a in 0..n {
        let pa = 1. / (1. - ratios[a]);
        for b in 0..n {
            let pb = 1. / (1. - ratios[b]);
            normal.add_to_element(a, b, w2 * pa * pb)?;
        }
        rhs.add_to_element(a, 0, w2 * steady * pa)?;
    }

    normal.mut_gaussian(&mut rhs)?;
    (0..n).map(|m| rhs.get(m, 0)).collect()
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;
    use model::Layer;

    fn concrete_wall() -> Construction {
        let mut c = Construction::new("Concrete wall");
        c.layers.push(Layer {
            thickness: 0.2,
            conductivity: 1.63,
            density: 2400.,
            specific_heat: 900.,
        });
        c
    }

    fn glazing() -> Construction {
        let mut c = Construction::new("Single glazing");
        c.layers.push(Layer {
            thickness: 0.003,
            conductivity: 1.0,
            density: 0.,
            specific_heat: 0.,
        });
        c
    }

    #[test]
    fn test_segments() -> Result<(), String> {
        let d = Discretization::new(&concrete_wall(), &Boundary::Outdoor, 25.)?;
        // 0.2 m at 0.05 m per segment
        assert_eq!(d.segment_resistances.len(), 4);
        assert!((d.total_resistance() - (0.2 / 1.63 + 1. / 25.)).abs() < 1e-9);
        assert!((d.total_capacity() - 0.2 * 2400. * 900.).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_ground_appends_soil() -> Result<(), String> {
        let wall = concrete_wall();
        let outdoor = Discretization::new(&wall, &Boundary::Outdoor, 25.)?;
        let ground = Discretization::new(&wall, &Boundary::Ground, 25.)?;

        // the soil layer adds exactly 3.0 m2K/W and 9.9 MJ/m2K, and
        // the exterior film disappears
        let added_r = ground.total_resistance() - (outdoor.total_resistance() - 1. / 25.);
        let added_c = ground.total_capacity() - outdoor.total_capacity();
        assert!((added_r - 3.0).abs() < 1e-9, "added resistance {}", added_r);
        assert!(
            (added_c - 9_900_000.).abs() < 1e-3,
            "added capacity {}",
            added_c
        );
        assert_eq!(ground.exterior_film_resistance, 0.0);
        Ok(())
    }

    #[test]
    fn test_massless_factors_are_exact() -> Result<(), String> {
        let d = Discretization::new(&glazing(), &Boundary::Outdoor, 25.)?;
        let factors = d.fit_response_factors(900.)?;
        assert_eq!(factors.n_terms(), 1);
        assert_eq!(factors.ratios[0], 0.0);
        assert!((factors.flux_gains[0] - d.total_resistance()).abs() < 1e-12);
        assert!((factors.exterior_gains[0] - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_fit_preserves_fixed_points() -> Result<(), String> {
        let d = Discretization::new(&concrete_wall(), &Boundary::Outdoor, 25.)?;
        let factors = d.fit_response_factors(900.)?;
        assert_eq!(factors.n_terms(), N_TERMS);
        factors.validate()?;

        // the rescale pins the fixed points down exactly
        let total_r = d.total_resistance();
        assert!(
            (factors.steady_flux_response() - total_r).abs() < 1e-9 * total_r,
            "steady flux response {} vs resistance {}",
            factors.steady_flux_response(),
            total_r
        );
        assert!((factors.steady_exterior_response() - 1.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_fit_tracks_step_response() -> Result<(), String> {
        // the fitted recurrence should reproduce the chain's own
        // exterior step response along the way, not only at the ends
        let d = Discretization::new(&concrete_wall(), &Boundary::Outdoor, 25.)?;
        let factors = d.fit_response_factors(900.)?;
        let samples = d.step_response(900., false)?;

        let mut theta = vec![0.0; factors.n_terms()];
        for (k, y) in samples.iter().enumerate() {
            crate::response::advance(&mut theta, &factors.exterior_gains, &factors.ratios, 1.0);
            let fitted: Float = theta.iter().sum();
            assert!(
                (fitted - y).abs() < 0.05,
                "step {}: fitted {} vs chain {}",
                k,
                fitted,
                y
            );
        }
        Ok(())
    }
}
