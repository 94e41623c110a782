//! Gate-algebra matrix library.
//!
//! Control qubits are tracked separately from targets (see `gate.rs`), so
//! the Wave Builder can turn a global control into a per-device activation
//! mask instead of a swap; every two-/three-qubit gate below is therefore
//! re-expressed as a single- or two-qubit *target* matrix plus an implicit
//! control count, rather than one fused matrix per controlled gate.
use crate::maths::{Complex, Matrix};
use crate::{complex, matrix};
use std::f64::consts::FRAC_1_SQRT_2;

pub fn rx_matrix(theta: f64) -> Matrix {
    let cos = (theta / 2.0).cos();
    let sin = (theta / 2.0).sin();
    matrix!(
        [complex!(cos, 0.0), complex!(0.0, -sin)];
        [complex!(0.0, -sin), complex!(cos, 0.0)]
    )
}

pub fn ry_matrix(theta: f64) -> Matrix {
    let cos = (theta / 2.0).cos();
    let sin = (theta / 2.0).sin();
    matrix!(
        [complex!(cos, 0.0), complex!(-sin, 0.0)];
        [complex!(sin, 0.0), complex!(cos, 0.0)]
    )
}

pub fn rz_matrix(theta: f64) -> Matrix {
    let half = theta / 2.0;
    matrix!(
        [complex!(half.cos(), -half.sin()), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(half.cos(), half.sin())]
    )
}

pub fn p_matrix(theta: f64) -> Matrix {
    matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(theta.cos(), theta.sin())]
    )
}

lazy_static::lazy_static! {
    pub static ref HADAMARD: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(1.0, 0.0)];
        [complex!(1.0, 0.0), complex!(-1.0, 0.0)]
    ) * complex!(FRAC_1_SQRT_2, 0.0);

    pub static ref PAULI_X: Matrix = matrix!(
        [complex!(0.0, 0.0), complex!(1.0, 0.0)];
        [complex!(1.0, 0.0), complex!(0.0, 0.0)]
    );

    pub static ref PAULI_Y: Matrix = matrix!(
        [complex!(0.0, 0.0), complex!(0.0, -1.0)];
        [complex!(0.0, 1.0), complex!(0.0, 0.0)]
    );

    pub static ref PAULI_Z: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(-1.0, 0.0)]
    );

    pub static ref S_GATE: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, 1.0)]
    );

    pub static ref SDG_GATE: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, -1.0)]
    );

    pub static ref T_GATE: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(FRAC_1_SQRT_2, FRAC_1_SQRT_2)]
    );

    pub static ref TDG_GATE: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)]
    );

    pub static ref IDENTITY: Matrix = Matrix::identity(2);

    /// Target-basis matrix for SWAP. Used with zero controls for a plain
    /// local-local SWAP and with one control for CSWAP/Fredkin.
    pub static ref SWAP_MATRIX: Matrix = matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(1.0, 0.0)]
    );
}
