//! Wave Builder: slices the swap-normalized queue into execution waves,
//! producing per-device reduced gates for non-special waves.

use crate::error::{Result, SchedulerError};
use crate::gate::Gate;
use crate::maths::Matrix;
use crate::partition::Partition;

/// A gate reduced into one device's local-address space. `origin` is a
/// read-only backlink index into the plan's gate list, never a shared
/// pointer.
#[derive(Debug, Clone)]
pub struct ReducedGate {
    pub origin: usize,
    pub matrix: Matrix,
    pub targets: Vec<usize>,
    pub controls: Vec<usize>,
}

#[derive(Debug, Clone)]
pub enum Wave {
    /// One list of reduced gates per device piece, `len == D`.
    Gates(Vec<Vec<ReducedGate>>),
    /// `SWAP(global, local)` — dispatched via the Global-Swap Engine.
    GlobalSwap { global: usize, local: usize },
    /// Index into the plan's gate list of a callback/full-state gate.
    Special(usize),
}

/// Walks `queue` in order against `partition`, the plan's fixed global/local
/// assignment — never mutated here. The Queue Transformer already rewrote
/// later gates' ids so that a gate downstream of an inserted swap names its
/// *local* partner instead of the original global qubit; by the time a gate
/// reaches here its ids are already correct under the one fixed partition,
/// so nothing about "which qubits are global" ever needs to change
/// mid-pass.
pub fn build_waves(queue: &[Gate], partition: &Partition) -> Result<Vec<Wave>> {
    let d = 1usize << partition.nglobal();
    let mut waves: Vec<Wave> = Vec::new();
    let mut current: Option<Vec<Vec<ReducedGate>>> = None;

    macro_rules! close_current {
        () => {
            if let Some(w) = current.take() {
                waves.push(Wave::Gates(w));
            }
        };
    }

    for (i, gate) in queue.iter().enumerate() {
        if gate.is_special() {
            close_current!();
            waves.push(Wave::Special(i));
            continue;
        }

        if gate.is_swap() {
            let targets = gate.target_qubits();
            let (a, b) = (targets[0], targets[1]);
            match (partition.is_global(a), partition.is_global(b)) {
                (true, true) => {
                    return Err(SchedulerError::InvalidGlobalSwap {
                        reason: format!("SWAP({a}, {b}) is between two global qubits after transform"),
                    })
                }
                (true, false) => {
                    close_current!();
                    waves.push(Wave::GlobalSwap { global: a, local: b });
                    continue;
                }
                (false, true) => {
                    close_current!();
                    waves.push(Wave::GlobalSwap { global: b, local: a });
                    continue;
                }
                // Both local: an ordinary SWAP between two local qubits, no
                // reconfiguration needed — falls through to the regular
                // reduced-gate path below, carrying `SWAP_MATRIX`.
                (false, false) => {}
            }
        }

        let wave = current.get_or_insert_with(|| vec![Vec::new(); d]);
        let matrix = gate
            .matrix()
            .cloned()
            .expect("non-swap, non-special gate must carry a unitary matrix");

        let mut local_controls: Vec<usize> = Vec::new();
        let mut global_control_bits: Vec<usize> = Vec::new();
        for &c in gate.control_qubits() {
            if let Some(pos) = partition.global_reduced(c) {
                global_control_bits.push(partition.nglobal() - pos - 1);
            } else {
                local_controls.push(
                    partition
                        .local_reduced(c)
                        .expect("non-global control qubit must be local"),
                );
            }
        }

        let targets: Vec<usize> = gate
            .target_qubits()
            .iter()
            .map(|&t| {
                partition
                    .local_reduced(t)
                    .expect("swap-normalized queue must only target local qubits")
            })
            .collect();

        for (piece, slot) in wave.iter_mut().enumerate() {
            let active = global_control_bits.iter().all(|&ic| (piece >> ic) & 1 == 1);
            if !active {
                continue;
            }
            slot.push(ReducedGate {
                origin: i,
                matrix: matrix.clone(),
                targets: targets.clone(),
                controls: local_controls.clone(),
            });
        }
    }

    close_current!();
    Ok(waves)
}
