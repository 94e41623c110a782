//! Special-Gate Bridge: executes callback and full-state gates, which need a
//! single merged state vector rather than per-device pieces.
//!
//! Reverts every swap recorded in the gate's `swap_reset` list (most recent
//! first), runs the callback or full-state op against the merged state,
//! then redoes the same swaps (oldest first) so dispatch can resume from
//! the distributed layout it left off at.

use crate::error::Result;
use crate::executor::Pieces;
use crate::gate::{Gate, GateKind};
use crate::kernel::DeviceKernel;
use crate::partition::Partition;
use crate::swap;

/// Applies `do_global_swap` once per pair in `pairs`, resolving which side of
/// each pair is global from the plan's fixed `partition` — the same fixed
/// assignment used everywhere else, never which qubit happened to be global
/// most recently.
fn toggle_pairs(pieces: &mut Pieces, partition: &Partition, pairs: &[(usize, usize)], nlocal: usize) {
    for &(a, b) in pairs {
        let (global, local) = if partition.is_global(a) { (a, b) } else { (b, a) };
        swap::do_global_swap(&mut pieces.data, partition, global, local, nlocal);
    }
}

/// Runs the callback or full-state gate at `queue[origin]`'s position.
/// `gate` must be a `Callback` or `FullState` special gate carrying a
/// `swap_reset` snapshot from the Queue Transformer.
pub fn execute_special(
    gate: &Gate,
    pieces: &mut Pieces,
    partition: &Partition,
    kernel: &dyn DeviceKernel,
    n: usize,
    nlocal: usize,
    memory_device: &str,
) -> Result<()> {
    let pairs = gate.swap_reset.clone().unwrap_or_default();
    let reverted: Vec<(usize, usize)> = pairs.iter().rev().copied().collect();
    toggle_pairs(pieces, partition, &reverted, nlocal);

    match &gate.kind {
        GateKind::Callback(f) => {
            let full = pieces.merge(partition, n, memory_device);
            f(&full);
        }
        GateKind::FullState(f) => {
            let full = pieces.merge(partition, n, memory_device);
            let new_full = f(full);
            *pieces = Pieces::split(&new_full, partition, n, memory_device);
        }
        GateKind::Unitary(matrix) => {
            // A non-special unitary tagged special only via direct construction
            // (never produced by the transformer); treated as a full-state op
            // so the bridge stays total over every `GateKind`.
            let mut full = pieces.merge(partition, n, memory_device);
            kernel.apply_full(&mut full, matrix, gate.target_qubits(), gate.control_qubits(), n)?;
            *pieces = Pieces::split(&full, partition, n, memory_device);
        }
        GateKind::Swap => unreachable!("execute_special called with a SWAP gate"),
    }

    toggle_pairs(pieces, partition, &pairs, nlocal);
    Ok(())
}
