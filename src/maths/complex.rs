//! Complex amplitude type used throughout the state-vector pieces, specialized
//! directly to `f64` rather than generic over a float trait, since nothing
//! here needs other precisions.

use core::{fmt, ops};

#[macro_export]
macro_rules! complex {
    ($real:expr, $imaginary:expr) => {
        $crate::maths::Complex::new($real, $imaginary)
    };
}

#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Complex {
    pub real: f64,
    pub imaginary: f64,
}

impl Complex {
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Complex { real, imaginary }
    }

    pub const fn zero() -> Self {
        Complex::new(0.0, 0.0)
    }

    pub const fn one() -> Self {
        Complex::new(1.0, 0.0)
    }

    pub fn conjugate(&self) -> Complex {
        Complex::new(self.real, -self.imaginary)
    }

    pub fn norm2(&self) -> f64 {
        self.real * self.real + self.imaginary * self.imaginary
    }

    pub fn abs(&self) -> f64 {
        libm::sqrt(self.norm2())
    }

    /// Phase angle in radians, in `(-pi, pi]`.
    pub fn arg(&self) -> f64 {
        libm::atan2(self.imaginary, self.real)
    }

    pub fn is_negligible(&self) -> bool {
        self.real.abs() < 1e-12 && self.imaginary.abs() < 1e-12
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i", self.real, self.imaginary)
    }
}

impl ops::Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.real + rhs.real, self.imaginary + rhs.imaginary)
    }
}

impl ops::Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.real - rhs.real, self.imaginary - rhs.imaginary)
    }
}

impl ops::Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.real * rhs.real - self.imaginary * rhs.imaginary,
            self.real * rhs.imaginary + self.imaginary * rhs.real,
        )
    }
}

impl ops::Mul<f64> for Complex {
    type Output = Complex;
    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.real * rhs, self.imaginary * rhs)
    }
}

impl ops::AddAssign for Complex {
    fn add_assign(&mut self, rhs: Complex) {
        self.real += rhs.real;
        self.imaginary += rhs.imaginary;
    }
}

impl ops::Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.real, -self.imaginary)
    }
}

impl Default for Complex {
    fn default() -> Self {
        Complex::zero()
    }
}
