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

//! A small dense-matrix library, sufficient for the linear systems that
//! appear in building simulation (room balances are sized by the number
//! of rooms; conduction chains are banded).

use serde::{Deserialize, Serialize};

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

/// A dense matrix of [`Float`], stored in row-major order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    data: Vec<Float>,
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for nrow in 0..self.nrows {
            for ncol in 0..self.ncols {
                write!(f, "{:12.5} ", self.data[nrow * self.ncols + ncol])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Matrix {
    /// Creates a new matrix of `nrows` by `ncols`, filled with the value `v`
    pub fn new(v: Float, nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![v; nrows * ncols],
        }
    }

    /// Creates a matrix from its raw row-major data
    pub fn from_data(nrows: usize, ncols: usize, data: Vec<Float>) -> Result<Self, String> {
        if data.len() != nrows * ncols {
            return Err(format!(
                "Matrix of {}x{} requires {} elements... found {}",
                nrows,
                ncols,
                nrows * ncols,
                data.len()
            ));
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Creates an `n` by `n` identity matrix
    pub fn eye(n: usize) -> Self {
        let mut ret = Self::new(0.0, n, n);
        for i in 0..n {
            ret.data[i * n + i] = 1.0;
        }
        ret
    }

    /// Returns the size of the matrix as `(nrows, ncols)`
    pub fn size(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn check(&self, nrow: usize, ncol: usize) -> Result<(), String> {
        if nrow >= self.nrows || ncol >= self.ncols {
            return Err(format!(
                "Index ({},{}) is out of bounds... matrix is of size {}x{}",
                nrow, ncol, self.nrows, self.ncols
            ));
        }
        Ok(())
    }

    /// Retrieves an element
    pub fn get(&self, nrow: usize, ncol: usize) -> Result<Float, String> {
        self.check(nrow, ncol)?;
        Ok(self.data[nrow * self.ncols + ncol])
    }

    /// Sets an element
    pub fn set(&mut self, nrow: usize, ncol: usize, v: Float) -> Result<(), String> {
        self.check(nrow, ncol)?;
        self.data[nrow * self.ncols + ncol] = v;
        Ok(())
    }

    /// Adds `v` to an element
    pub fn add_to_element(&mut self, nrow: usize, ncol: usize, v: Float) -> Result<(), String> {
        self.check(nrow, ncol)?;
        self.data[nrow * self.ncols + ncol] += v;
        Ok(())
    }

    /// Multiplies an element by `v`
    pub fn scale_element(&mut self, nrow: usize, ncol: usize, v: Float) -> Result<(), String> {
        self.check(nrow, ncol)?;
        self.data[nrow * self.ncols + ncol] *= v;
        Ok(())
    }

    /// Copies the contents of `other` into `self`. Both matrices
    /// must already be of the same size.
    pub fn copy_from(&mut self, other: &Matrix) {
        debug_assert_eq!(self.nrows, other.nrows);
        debug_assert_eq!(self.ncols, other.ncols);
        self.data.copy_from_slice(&other.data);
    }

    /// Multiplies `self` by `other`, writing the result into `into`
    /// (which must be of the correct size already)
    pub fn prod_into(&self, other: &Matrix, into: &mut Matrix) -> Result<(), String> {
        if self.ncols != other.nrows {
            return Err(format!(
                "Cannot multiply a {}x{} matrix by a {}x{} one",
                self.nrows, self.ncols, other.nrows, other.ncols
            ));
        }
        if into.nrows != self.nrows || into.ncols != other.ncols {
            return Err(format!(
                "Target matrix should be of size {}x{}... found {}x{}",
                self.nrows, other.ncols, into.nrows, into.ncols
            ));
        }
        for nrow in 0..self.nrows {
            for ncol in 0..other.ncols {
                let mut v = 0.0;
                for k in 0..self.ncols {
                    v += self.data[nrow * self.ncols + k] * other.data[k * other.ncols + ncol];
                }
                into.data[nrow * other.ncols + ncol] = v;
            }
        }
        Ok(())
    }

    /// Solves `self * x = b` in place through Gaussian elimination with
    /// partial pivoting. `self` is destroyed and `b` ends up containing `x`.
    pub fn mut_gaussian(&mut self, b: &mut Matrix) -> Result<(), String> {
        let n = self.nrows;
        if self.ncols != n {
            return Err(format!(
                "Gaussian elimination requires a square matrix... found {}x{}",
                self.nrows, self.ncols
            ));
        }
        if b.nrows != n || b.ncols != 1 {
            return Err(format!(
                "Expecting 'b' to be of size {}x1... found {}x{}",
                n, b.nrows, b.ncols
            ));
        }

        for col in 0..n {
            // pivot
            let mut pivot_row = col;
            let mut pivot_val = self.data[col * n + col].abs();
            for row in col + 1..n {
                let v = self.data[row * n + col].abs();
                if v > pivot_val {
                    pivot_val = v;
                    pivot_row = row;
                }
            }
            if pivot_val < Float::EPSILON {
                return Err("Cannot solve: matrix is singular".to_string());
            }
            if pivot_row != col {
                for k in 0..n {
                    self.data.swap(col * n + k, pivot_row * n + k);
                }
                b.data.swap(col, pivot_row);
            }

            // eliminate
            for row in col + 1..n {
                let factor = self.data[row * n + col] / self.data[col * n + col];
                if factor == 0.0 {
                    continue;
                }
                for k in col..n {
                    self.data[row * n + k] -= factor * self.data[col * n + k];
                }
                b.data[row] -= factor * b.data[col];
            }
        }

        // back-substitution
        for row in (0..n).rev() {
            let mut v = b.data[row];
            for k in row + 1..n {
                v -= self.data[row * n + k] * b.data[k];
            }
            b.data[row] = v / self.data[row * n + row];
        }
        Ok(())
    }

    /// Solves `self * x = b` in place for a banded matrix whose non-zero
    /// elements are all within `n_diag` diagonals of the main one (e.g.,
    /// `n_diag = 3` is a tridiagonal matrix). No pivoting is performed,
    /// which is fine for the diagonally dominant systems that conduction
    /// chains produce.
    pub fn mut_n_diag_gaussian(&mut self, b: &mut Matrix, n_diag: usize) -> Result<(), String> {
        let n = self.nrows;
        if self.ncols != n {
            return Err(format!(
                "Banded Gaussian elimination requires a square matrix... found {}x{}",
                self.nrows, self.ncols
            ));
        }
        if b.nrows != n || b.ncols != 1 {
            return Err(format!(
                "Expecting 'b' to be of size {}x1... found {}x{}",
                n, b.nrows, b.ncols
            ));
        }
        let half_band = n_diag / 2;

        for col in 0..n {
            let pivot = self.data[col * n + col];
            if pivot.abs() < Float::EPSILON {
                return Err("Cannot solve: zero pivot in banded matrix".to_string());
            }
            let last_row = (col + half_band).min(n - 1);
            for row in col + 1..=last_row {
                let factor = self.data[row * n + col] / pivot;
                if factor == 0.0 {
                    continue;
                }
                let last_col = (col + half_band).min(n - 1);
                for k in col..=last_col {
                    self.data[row * n + k] -= factor * self.data[col * n + k];
                }
                b.data[row] -= factor * b.data[col];
            }
        }

        for row in (0..n).rev() {
            let mut v = b.data[row];
            let last_col = (row + half_band).min(n - 1);
            for k in row + 1..=last_col {
                v -= self.data[row * n + k] * b.data[k];
            }
            b.data[row] = v / self.data[row * n + row];
        }
        Ok(())
    }
}

impl std::ops::AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, other: &Matrix) {
        debug_assert_eq!(self.nrows, other.nrows);
        debug_assert_eq!(self.ncols, other.ncols);
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }
}

impl std::ops::SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, other: &Matrix) {
        debug_assert_eq!(self.nrows, other.nrows);
        debug_assert_eq!(self.ncols, other.ncols);
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= b;
        }
    }
}

impl std::ops::MulAssign<Float> for Matrix {
    fn mul_assign(&mut self, s: Float) {
        for a in self.data.iter_mut() {
            *a *= s;
        }
    }
}

/***********/
/* TESTING */
/***********/
