//! Flat row-major complex matrix, specialized to `Complex<f64>` rather than
//! generic over a numeric trait, since nothing here needs other precisions.

use crate::maths::Complex;
use core::fmt;

#[macro_export]
macro_rules! matrix {
    ($([$($elem:expr),* $(,)?]);* $(;)?) => {
        {
            let rows: Vec<Vec<$crate::maths::Complex>> = vec![$(vec![$($elem),*]),*];
            let nrows = rows.len();
            let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
            let data: Vec<$crate::maths::Complex> = rows.into_iter().flatten().collect();
            $crate::maths::Matrix::new(nrows, ncols, data)
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Complex>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<Complex>) -> Self {
        assert_eq!(rows * cols, data.len(), "matrix data does not match dims");
        Matrix { rows, cols, data }
    }

    pub fn identity(dim: usize) -> Self {
        let mut data = vec![Complex::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex::one();
        }
        Matrix::new(dim, dim, data)
    }

    pub fn get(&self, r: usize, c: usize) -> Complex {
        self.data[r * self.cols + c]
    }

    /// Number of qubits this matrix acts over, assuming a square 2^k dimension.
    pub fn num_qubits(&self) -> usize {
        (self.rows as f64).log2().round() as usize
    }

    pub fn dot(&self, other: &Matrix) -> Option<Matrix> {
        if self.cols != other.rows {
            return None;
        }
        let mut data = vec![Complex::zero(); self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = Complex::zero();
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                data[i * other.cols + j] = sum;
            }
        }
        Some(Matrix::new(self.rows, other.cols, data))
    }
}

impl core::ops::Mul<Complex> for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Complex) -> Matrix {
        let data = self.data.into_iter().map(|c| c * rhs).collect();
        Matrix::new(self.rows, self.cols, data)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                write!(f, "{} ", self.get(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
