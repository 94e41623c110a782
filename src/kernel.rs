//! Per-piece / per-full-state application kernel (`apply`/`apply_full`).
//!
//! Takes a separate local-control list: a reduced gate's global controls
//! were already turned into a per-piece activation mask by the Wave
//! Builder, but any *local* control qubit still needs to gate the kernel
//! itself.

use crate::error::Result;
use crate::maths::{Complex, Matrix};
use rayon::prelude::*;

const PARALLEL_THRESHOLD: usize = 8;

/// The device-side application kernel.
pub trait DeviceKernel: Send + Sync {
    /// Applies `matrix` over `targets`, gated by `controls` (qubit ids local
    /// to `piece`'s address space), in place over one piece.
    fn apply(
        &self,
        piece: &mut [Complex],
        matrix: &Matrix,
        targets: &[usize],
        controls: &[usize],
        nlocal: usize,
    ) -> Result<()>;

    /// Applies `matrix` over `targets`/`controls` to a merged full state
    /// vector, the Bridge's non-callback case.
    fn apply_full(
        &self,
        state: &mut [Complex],
        matrix: &Matrix,
        targets: &[usize],
        controls: &[usize],
        n: usize,
    ) -> Result<()>;
}

/// Default CPU kernel. Parallelizes over amplitude indices with `rayon` once
/// the local qubit count clears `PARALLEL_THRESHOLD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernel {
    pub parallel_threshold: usize,
}

impl ReferenceKernel {
    pub fn new() -> Self {
        ReferenceKernel {
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

impl DeviceKernel for ReferenceKernel {
    fn apply(
        &self,
        piece: &mut [Complex],
        matrix: &Matrix,
        targets: &[usize],
        controls: &[usize],
        nlocal: usize,
    ) -> Result<()> {
        let new_state = if nlocal >= self.parallel_threshold {
            apply_matrix_parallel(piece, matrix, targets, controls, nlocal)
        } else {
            apply_matrix_direct(piece, matrix, targets, controls, nlocal)
        };
        piece.copy_from_slice(&new_state);
        Ok(())
    }

    fn apply_full(
        &self,
        state: &mut [Complex],
        matrix: &Matrix,
        targets: &[usize],
        controls: &[usize],
        n: usize,
    ) -> Result<()> {
        self.apply(state, matrix, targets, controls, n)
    }
}

fn control_mask(controls: &[usize], n: usize) -> Vec<usize> {
    controls.iter().map(|&c| n - 1 - c).collect()
}

fn controls_satisfied(i: usize, control_bits: &[usize]) -> bool {
    control_bits.iter().all(|&pos| (i >> pos) & 1 == 1)
}

fn apply_matrix_direct(
    state: &[Complex],
    matrix: &Matrix,
    targets: &[usize],
    controls: &[usize],
    n: usize,
) -> Vec<Complex> {
    let dim = 1 << n;
    let g = targets.len();
    let gate_dim = 1 << g;

    let target_bits: Vec<usize> = targets.iter().map(|&t| n - 1 - t).collect();
    let control_bits = control_mask(controls, n);

    let mut non_target_mask: usize = dim - 1;
    for &pos in &target_bits {
        non_target_mask &= !(1 << pos);
    }

    let mut new_state = vec![Complex::zero(); dim];
    for i in 0..dim {
        if !controls_satisfied(i, &control_bits) {
            new_state[i] = state[i];
            continue;
        }
        let mut target_idx = 0usize;
        for (k, &pos) in target_bits.iter().enumerate() {
            if (i >> pos) & 1 == 1 {
                target_idx |= 1 << (g - 1 - k);
            }
        }

        let mut sum = Complex::zero();
        for j in 0..gate_dim {
            let gate_elem = matrix.get(target_idx, j);
            if gate_elem.is_negligible() {
                continue;
            }
            let mut source_idx = i & non_target_mask;
            for (k, &pos) in target_bits.iter().enumerate() {
                if (j >> (g - 1 - k)) & 1 == 1 {
                    source_idx |= 1 << pos;
                }
            }
            sum += gate_elem * state[source_idx];
        }
        new_state[i] = sum;
    }
    new_state
}

fn apply_matrix_parallel(
    state: &[Complex],
    matrix: &Matrix,
    targets: &[usize],
    controls: &[usize],
    n: usize,
) -> Vec<Complex> {
    let dim = 1 << n;
    let g = targets.len();
    let gate_dim = 1 << g;

    let target_bits: Vec<usize> = targets.iter().map(|&t| n - 1 - t).collect();
    let control_bits = control_mask(controls, n);

    let mut non_target_mask: usize = dim - 1;
    for &pos in &target_bits {
        non_target_mask &= !(1 << pos);
    }

    (0..dim)
        .into_par_iter()
        .map(|i| {
            if !controls_satisfied(i, &control_bits) {
                return state[i];
            }
            let mut target_idx = 0usize;
            for (k, &pos) in target_bits.iter().enumerate() {
                if (i >> pos) & 1 == 1 {
                    target_idx |= 1 << (g - 1 - k);
                }
            }

            let mut sum = Complex::zero();
            for j in 0..gate_dim {
                let gate_elem = matrix.get(target_idx, j);
                if gate_elem.is_negligible() {
                    continue;
                }
                let mut source_idx = i & non_target_mask;
                for (k, &pos) in target_bits.iter().enumerate() {
                    if (j >> (g - 1 - k)) & 1 == 1 {
                        source_idx |= 1 << pos;
                    }
                }
                sum += gate_elem * state[source_idx];
            }
            sum
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrices::{HADAMARD, PAULI_X};

    #[test]
    fn hadamard_on_ground_state_gives_uniform_superposition() {
        let mut piece = vec![Complex::one(), Complex::zero()];
        let k = ReferenceKernel::new();
        k.apply(&mut piece, &HADAMARD, &[0], &[], 1).unwrap();
        let expected = 1.0 / std::f64::consts::SQRT_2;
        assert!((piece[0].real - expected).abs() < 1e-9);
        assert!((piece[1].real - expected).abs() < 1e-9);
    }

    #[test]
    fn controlled_x_skips_when_control_bit_clear() {
        // 2-qubit local state |00>, control on qubit 0, target qubit 1: no-op.
        let mut piece = vec![Complex::one(), Complex::zero(), Complex::zero(), Complex::zero()];
        let k = ReferenceKernel::new();
        k.apply(&mut piece, &PAULI_X, &[1], &[0], 2).unwrap();
        assert_eq!(piece[0], Complex::one());
    }

    #[test]
    fn controlled_x_flips_target_when_control_bit_set() {
        // |10> (qubit 0 = 1, qubit 1 = 0) -> |11>
        let mut piece = vec![Complex::zero(), Complex::zero(), Complex::one(), Complex::zero()];
        let k = ReferenceKernel::new();
        k.apply(&mut piece, &PAULI_X, &[1], &[0], 2).unwrap();
        assert_eq!(piece[3], Complex::one());
        assert_eq!(piece[2], Complex::zero());
    }
}
