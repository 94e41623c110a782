//! Parallel Dispatcher: runs one non-special wave, one worker per device
//! name via `rayon::scope`, each worker draining its assigned piece ids
//! sequentially.
//!
//! Pieces are split into disjoint `&mut` slices up front instead of locking:
//! `device_to_pieces` hands out contiguous, non-overlapping piece-id ranges
//! (`config::AcceleratorConfig::device_to_pieces`), so a chain of
//! `split_at_mut` calls gives each device its own slice with no runtime
//! borrow-checking needed.

use crate::device::Device;
use crate::error::Result;
use crate::kernel::DeviceKernel;
use crate::maths::Complex;
use crate::wave::ReducedGate;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Runs `per_device_gates[i]` against `pieces[i]` for every device name's
/// assigned piece ids, in parallel across device names. Gate order within a
/// single piece is preserved; pieces are processed sequentially within a
/// worker. The call is a barrier: it does not return until every worker has
/// joined.
#[instrument(skip_all, fields(devices = device_to_pieces.len()))]
pub fn dispatch_wave(
    device_to_pieces: &[(String, Vec<usize>)],
    pieces: &mut [Vec<Complex>],
    per_device_gates: &[Vec<ReducedGate>],
    nlocal: usize,
    kernel: &dyn DeviceKernel,
    memory_budget_bytes: Option<usize>,
) -> Result<()> {
    let piece_bytes = (1usize << nlocal) * std::mem::size_of::<Complex>();

    let mut remaining: &mut [Vec<Complex>] = pieces;
    let mut chunks: Vec<(&str, &[usize], &mut [Vec<Complex>])> = Vec::new();
    for (name, ids) in device_to_pieces {
        let (head, tail) = remaining.split_at_mut(ids.len());
        chunks.push((name.as_str(), ids.as_slice(), head));
        remaining = tail;
    }

    let errors: Mutex<Vec<crate::error::SchedulerError>> = Mutex::new(Vec::new());
    rayon::scope(|scope| {
        for (name, ids, chunk) in chunks {
            let errors = &errors;
            scope.spawn(move |_| {
                if let Some(budget) = memory_budget_bytes {
                    if piece_bytes > budget {
                        errors.lock().unwrap().push(crate::error::SchedulerError::ResourceExhausted {
                            device: name.to_string(),
                            reason: format!("piece needs {piece_bytes} bytes, budget is {budget}"),
                        });
                        return;
                    }
                }
                let _device = Device::new(name).enter();
                debug!(device = name, pieces = ids.len(), "dispatching wave to device");
                for (&piece_id, piece) in ids.iter().zip(chunk.iter_mut()) {
                    for rg in &per_device_gates[piece_id] {
                        if let Err(e) = kernel.apply(piece, &rg.matrix, &rg.targets, &rg.controls, nlocal) {
                            errors.lock().unwrap().push(e);
                        }
                    }
                }
            });
        }
    });

    match errors.into_inner().unwrap().into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ReferenceKernel;

    #[test]
    fn resource_exhausted_when_piece_exceeds_memory_budget() {
        let device_to_pieces = vec![("gpu0".to_string(), vec![0])];
        let mut pieces = vec![vec![Complex::zero(); 2]];
        let per_device_gates: Vec<Vec<ReducedGate>> = vec![vec![]];
        let kernel = ReferenceKernel::new();
        let err = dispatch_wave(&device_to_pieces, &mut pieces, &per_device_gates, 1, &kernel, Some(16))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::SchedulerError::ResourceExhausted { ref device, .. } if device.as_str() == "gpu0"
        ));
    }

    #[test]
    fn dispatch_within_budget_succeeds() {
        let device_to_pieces = vec![("gpu0".to_string(), vec![0])];
        let mut pieces = vec![vec![Complex::zero(); 2]];
        let per_device_gates: Vec<Vec<ReducedGate>> = vec![vec![]];
        let kernel = ReferenceKernel::new();
        dispatch_wave(&device_to_pieces, &mut pieces, &per_device_gates, 1, &kernel, Some(1 << 20)).unwrap();
    }
}
