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

/// Advances the accumulators of one excitation series by one step:
///
/// ```math
/// \theta_m \leftarrow g_m u + r_m \theta_m
/// ```
///
/// The three slices must be of the same length.
pub fn advance(theta: &mut [Float], gains: &[Float], ratios: &[Float], u: Float) {
    debug_assert_eq!(theta.len(), gains.len());
    debug_assert_eq!(theta.len(), ratios.len());
    for ((t, g), r) in theta.iter_mut().zip(gains.iter()).zip(ratios.iter()) {
        *t = g * u + r * *t;
    }
}

/// The decayed contribution of past excitations,
/// $`\sum_m r_m \theta_m`$: what the accumulators will add to the
/// surface temperature this step before the current excitation is
/// known.
pub fn history(theta: &[Float], ratios: &[Float]) -> Float {
    debug_assert_eq!(theta.len(), ratios.len());
    theta
        .iter()
        .zip(ratios.iter())
        .map(|(t, r)| r * t)
        .sum()
}

/// Sets the accumulators to the fixed point of a constant excitation
/// `u`, i.e., $`\theta_m = g_m u / (1 - r_m)`$. Used to warm the
/// simulation up at a defined state instead of a cold start.
pub fn warm_up(theta: &mut [Float], gains: &[Float], ratios: &[Float], u: Float) {
    debug_assert_eq!(theta.len(), gains.len());
    debug_assert_eq!(theta.len(), ratios.len());
    for ((t, g), r) in theta.iter_mut().zip(gains.iter()).zip(ratios.iter()) {
        *t = g * u / (1. - r);
    }
}

/// The thermal memory of every surface in the model, stored as one
/// flat table rather than a graph of objects.
///
/// Each surface owns one contiguous block holding its interior-flux
/// accumulators followed by its exterior-temperature accumulators.
/// The arena is mutated exactly once per step, after the step's
/// balance has converged.
#[derive(Debug, Clone)]
pub struct ResponseArena {
    offsets: Vec<usize>,
    n_terms: Vec<usize>,
    data: Vec<Float>,
}

impl ResponseArena {
    /// Creates an arena for surfaces with the given number of decay
    /// terms each, zero-initialized
    pub fn new(terms_per_surface: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(terms_per_surface.len());
        let mut total = 0;
        for n in terms_per_surface {
            offsets.push(total);
            total += 2 * n;
        }
        Self {
            offsets,
            n_terms: terms_per_surface.to_vec(),
            data: vec![0.0; total],
        }
    }

    /// The number of surfaces in the arena
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Checks whether the arena holds no surface
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The accumulators of surface `i`, as
    /// `(interior flux series, exterior temperature series)`
    pub fn surface(&self, i: usize) -> (&[Float], &[Float]) {
        let ini = self.offsets[i];
        let n = self.n_terms[i];
        (&self.data[ini..ini + n], &self.data[ini + n..ini + 2 * n])
    }

    /// The mutable accumulators of surface `i`, as
    /// `(interior flux series, exterior temperature series)`
    pub fn surface_mut(&mut self, i: usize) -> (&mut [Float], &mut [Float]) {
        let ini = self.offsets[i];
        let n = self.n_terms[i];
        let block = &mut self.data[ini..ini + 2 * n];
        block.split_at_mut(n)
    }
}

/***********/
/* TESTING */
/***********/

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_zero_flux_decays_to_zero() {
        let ratios = [0.9, 0.5, 0.0];
        let gains = [0.05, 0.01, 0.002];
        let mut theta = [3.0, -2.0, 1.0];
        for _ in 0..1000 {
            advance(&mut theta, &gains, &ratios, 0.0);
        }
        for t in theta {
            assert!(t.abs() < 1e-20, "found {}", t);
        }
    }

    #[test]
    fn test_constant_flux_fixed_point() {
        let ratios = [0.9, 0.5];
        let gains = [0.05, 0.01];
        let q = 100.;
        let mut theta = [0.0, 0.0];
        for _ in 0..1000 {
            advance(&mut theta, &gains, &ratios, q);
        }
        assert!((theta[0] - 0.05 * q / 0.1).abs() < 1e-9);
        assert!((theta[1] - 0.01 * q / 0.5).abs() < 1e-9);

        // warm_up jumps straight to the same place
        let mut warm = [0.0, 0.0];
        warm_up(&mut warm, &gains, &ratios, q);
        assert!((warm[0] - theta[0]).abs() < 1e-9);
        assert!((warm[1] - theta[1]).abs() < 1e-9);

        // and the fixed point is indeed fixed
        advance(&mut warm, &gains, &ratios, q);
        assert!((warm[0] - theta[0]).abs() < 1e-9);
    }

    #[test]
    fn test_history_plus_gains_is_next_sum() {
        let ratios = [0.8, 0.3];
        let gains = [0.04, 0.02];
        let mut theta = [1.0, 0.5];
        let u = 7.;

        let expected = history(&theta, &ratios) + (gains[0] + gains[1]) * u;
        advance(&mut theta, &gains, &ratios, u);
        let total: Float = theta.iter().sum();
        assert!((total - expected).abs() < 1e-12);
    }

    #[test]
    fn test_arena_layout() {
        let mut arena = ResponseArena::new(&[3, 1, 2]);
        assert_eq!(arena.len(), 3);
        assert!(!arena.is_empty());

        {
            let (flux, ext) = arena.surface_mut(1);
            assert_eq!(flux.len(), 1);
            assert_eq!(ext.len(), 1);
            flux[0] = 1.5;
            ext[0] = -1.5;
        }
        // neighbours are untouched
        let (flux, ext) = arena.surface(0);
        assert!(flux.iter().chain(ext.iter()).all(|v| *v == 0.0));
        let (flux, ext) = arena.surface(2);
        assert!(flux.iter().chain(ext.iter()).all(|v| *v == 0.0));

        let (flux, ext) = arena.surface(1);
        assert_eq!(flux[0], 1.5);
        assert_eq!(ext[0], -1.5);
    }
}
