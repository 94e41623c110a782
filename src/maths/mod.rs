pub mod complex;
pub mod format;
pub mod matrix;

pub use complex::Complex;
pub use format::{format_amplitude, format_probability};
pub use matrix::Matrix;
