//! Queue Transformer: rewrites the input gate queue into a swap-normalized
//! queue where no non-SWAP gate targets a global qubit, inserting
//! `SWAP(global, local)` gates and remapping later gates' ids.
//!
//! Implemented as an explicit loop over rounds rather than recursion: each
//! round either shrinks the remaining-gate count or grows the accepted
//! count, bounded by the queue length, so the loop always terminates without
//! growing a stack frame per swap round on large circuits.

use crate::error::{Result, SchedulerError};
use crate::gate::Gate;
use std::collections::{HashMap, HashSet};

/// Output of one transform pass: the swap-normalized queue (tail included)
/// and the ordered list of swap pairs inserted before the undo tail
/// (`(min, max)` qubit ids, push order).
pub struct Transformed {
    pub queue: Vec<Gate>,
    pub swap_pairs: Vec<(usize, usize)>,
}

/// `global_set` is the planning-time global assignment and is read-only here
/// and never reassigned. Only `counter` and the ids carried by gates change
/// as rounds proceed, via a qubit-id substitution: a gate that targeted a
/// global qubit `q` is renamed to target its chosen local partner `qs` for
/// the remainder of the pass, so the *label* `qs` (always local under the
/// fixed `global_set`) carries its data forward rather than the role
/// assignment itself moving. The real global/local role flip happens later,
/// when `wave`/`bridge` actually dispatch the inserted `SWAP` gate.
pub fn transform(
    queue: Vec<Gate>,
    n: usize,
    counter: &mut [usize],
    global_set: &HashSet<usize>,
) -> Result<Transformed> {
    let mut swap_pairs: Vec<(usize, usize)> = Vec::new();
    let mut out: Vec<Gate> = Vec::new();
    let mut current: Vec<Gate> = queue;

    loop {
        let mut round_out: Vec<Gate> = Vec::new();
        let mut rem: Vec<Gate> = Vec::new();

        for mut g in current.into_iter() {
            if g.is_special() {
                g.swap_reset = Some(swap_pairs.clone());
                round_out.push(g);
                continue;
            }

            let tg: Vec<usize> = g
                .target_qubits()
                .iter()
                .copied()
                .filter(|q| global_set.contains(q))
                .collect();
            let acceptable = (tg.is_empty() || (g.is_swap() && tg.len() == 1))
                && rem.iter().all(|r: &Gate| g.commutes(r));

            if acceptable {
                for q in g.target_qubits() {
                    if counter[*q] > 0 {
                        counter[*q] -= 1;
                    }
                }
                round_out.push(g);
            } else {
                rem.push(g);
            }
        }

        out.extend(round_out);

        if rem.is_empty() {
            break;
        }

        let h_targets: Vec<usize> = rem[0].target_qubits().to_vec();
        let h_target_set: HashSet<usize> = h_targets.iter().copied().collect();
        let th: Vec<usize> = h_targets
            .iter()
            .copied()
            .filter(|q| global_set.contains(q))
            .collect();

        if rem[0].is_swap() && th.len() == 2 {
            return Err(SchedulerError::InvalidGlobalSwap {
                reason: format!(
                    "user-supplied SWAP({}, {}) is between two global qubits",
                    h_targets[0], h_targets[1]
                ),
            });
        }

        let excluded: HashSet<usize> = global_set.union(&h_target_set).copied().collect();
        let mut candidates: Vec<usize> = (0..n).filter(|id| !excluded.contains(id)).collect();
        candidates.sort_by_key(|&id| counter[id]);
        let mut candidates = candidates.into_iter();

        let mut role_map: HashMap<usize, usize> = HashMap::new();
        for q in th {
            let qs = candidates.next().ok_or_else(|| SchedulerError::InvalidGlobalSwap {
                reason: "no local qubit available as a swap partner".to_string(),
            })?;

            out.push(Gate::make_swap(q, qs));
            swap_pairs.push((q.min(qs), q.max(qs)));

            counter.swap(q, qs);
            role_map.insert(q, qs);
            role_map.insert(qs, q);
        }

        for g in rem.iter_mut() {
            g.remap_qubits(&role_map);
        }

        current = rem;
    }

    for &(a, b) in swap_pairs.iter().rev() {
        out.push(Gate::make_swap(a, b));
    }

    Ok(Transformed {
        queue: out,
        swap_pairs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_on_local_qubits_pass_through_untouched() {
        let mut counter = vec![1, 1];
        let global_set: HashSet<usize> = [0].into_iter().collect();
        let queue = vec![Gate::h(1)];
        let t = transform(queue, 2, &mut counter, &global_set).unwrap();
        assert_eq!(t.swap_pairs.len(), 0);
        assert_eq!(t.queue.len(), 1);
        assert!(!t.queue[0].is_swap());
    }

    #[test]
    fn gate_on_global_qubit_triggers_a_swap_and_an_undo_tail() {
        let mut counter = vec![1, 1];
        let global_set: HashSet<usize> = [0].into_iter().collect();
        let queue = vec![Gate::h(0)];
        let t = transform(queue, 2, &mut counter, &global_set).unwrap();
        // SWAP(0,1), H(remapped onto the local partner), SWAP(0,1) undo tail.
        assert_eq!(t.queue.len(), 3);
        assert!(t.queue[0].is_swap());
        assert!(t.queue[2].is_swap());
        assert_eq!(t.swap_pairs, vec![(0, 1)]);
        assert!(!t.queue[1].is_swap());
        assert_eq!(t.queue[1].target_qubits(), &[1]);
    }

    #[test]
    fn two_global_swap_is_rejected() {
        let mut counter = vec![1, 1, 1, 1];
        let global_set: HashSet<usize> = [0, 1].into_iter().collect();
        let queue = vec![Gate::swap(0, 1)];
        let err = transform(queue, 4, &mut counter, &global_set).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidGlobalSwap { .. }));
    }

    #[test]
    fn global_swap_with_one_local_target_is_accepted_without_reconfiguration() {
        let mut counter = vec![1, 1, 1];
        let global_set: HashSet<usize> = [0].into_iter().collect();
        let queue = vec![Gate::swap(0, 2)];
        let t = transform(queue, 3, &mut counter, &global_set).unwrap();
        assert_eq!(t.swap_pairs.len(), 0);
        assert_eq!(t.queue.len(), 1);
        assert!(t.queue[0].is_swap());
    }
}
