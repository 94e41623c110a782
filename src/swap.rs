//! Global-Swap Engine: exchanges one global qubit with one local qubit by
//! permuting amplitudes across exactly two pieces at a time.

use crate::maths::Complex;
use crate::partition::Partition;

/// In-place cross-piece bit exchange: the SWAP unitary between the global
/// qubit that distinguishes `piece_a` from `piece_b` and the local qubit at
/// `local_bit`.
///
/// `piece_a` is the piece with the global qubit clear, `piece_b` the piece
/// with it set. For every local address with `local_bit` clear, its
/// amplitude in `piece_b` trades places with the address with `local_bit` set
/// in `piece_a` — swapping two qubits' *values* means the pair of addresses
/// that differ in exactly one of the two qubits exchange contents, while
/// addresses where both or neither are set are left alone.
///
/// `nlocal` is the local qubit count (`piece_a.len() == piece_b.len() == 1 <<
/// nlocal`); `local_bit` is the *qubit id* in local-address space (MSB-first,
/// matching `kernel`'s bit convention), not a raw bit position.
pub fn swap_amplitudes(piece_a: &mut [Complex], piece_b: &mut [Complex], local_bit: usize, nlocal: usize) {
    debug_assert_eq!(piece_a.len(), 1 << nlocal);
    debug_assert_eq!(piece_b.len(), 1 << nlocal);
    let pos = nlocal - 1 - local_bit;
    let bit = 1usize << pos;
    let dim = 1 << nlocal;
    for idx in 0..dim {
        if idx & bit == 0 {
            std::mem::swap(&mut piece_a[idx | bit], &mut piece_b[idx]);
        }
    }
}

/// Executes the full global<->local swap: pairs every piece `i` with `i + t`
/// where `t = 1 << m`, `m = nglobal - global_reduced(g) - 1`, and exchanges
/// the local-qubit bit `local_reduced(l)` between each pair. `pieces` must
/// have length `1 << nglobal`.
pub fn swap_global_local(pieces: &mut [Vec<Complex>], nglobal: usize, m: usize, local_bit: usize, nlocal: usize) {
    let t = 1usize << m;
    let d = pieces.len();
    debug_assert_eq!(d, 1 << nglobal);
    for gp in 0..d / 2 {
        let i = ((gp >> m) << (m + 1)) | (gp & (t - 1));
        let (lo, hi) = (i, i + t);
        let (left, right) = pieces.split_at_mut(hi);
        swap_amplitudes(&mut left[lo], &mut right[0], local_bit, nlocal);
    }
}

/// Exchanges `global` and `local`'s *values* across `pieces`.
///
/// `partition` stays the plan's fixed assignment throughout: `global` is
/// always a member of the fixed global set and `local` always a member of
/// its local set (the Queue Transformer only ever emits `SWAP` gates pairing
/// an original global qubit with an original local one, and substitutes
/// every later gate's ids accordingly), so the fixed maps are always the
/// right ones to consult — this call never needs to, and must not, update
/// which ids `partition` considers global or local.
pub fn do_global_swap(
    pieces: &mut [Vec<Complex>],
    partition: &Partition,
    global: usize,
    local: usize,
    nlocal: usize,
) {
    let pos = partition
        .global_reduced(global)
        .expect("do_global_swap: `global` must be a global qubit in the fixed partition");
    let m = partition.nglobal() - pos - 1;
    let local_bit = partition
        .local_reduced(local)
        .expect("do_global_swap: `local` must be a local qubit in the fixed partition");
    swap_global_local(pieces, partition.nglobal(), m, local_bit, nlocal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_amplitudes_exchanges_the_cross_bit_pair() {
        // nlocal = 1: piece_a = [a0, a1], piece_b = [b0, b1]; swapping the
        // global qubit piece_a/piece_b sit on with local qubit 0 trades a1
        // (local bit set, global bit clear) with b0 (local bit clear, global
        // bit set) and leaves a0/b1 alone.
        let mut a = vec![Complex::new(1.0, 0.0), Complex::new(2.0, 0.0)];
        let mut b = vec![Complex::new(3.0, 0.0), Complex::new(4.0, 0.0)];
        swap_amplitudes(&mut a, &mut b, 0, 1);
        assert_eq!(a, vec![Complex::new(1.0, 0.0), Complex::new(3.0, 0.0)]);
        assert_eq!(b, vec![Complex::new(2.0, 0.0), Complex::new(4.0, 0.0)]);
    }

    #[test]
    fn swap_global_local_pairs_pieces_across_the_split() {
        let mut pieces = vec![
            vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
            vec![Complex::new(2.0, 0.0), Complex::new(3.0, 0.0)],
        ];
        // nglobal=1, m=0 (single global qubit), local_bit 0 of nlocal=1.
        swap_global_local(&mut pieces, 1, 0, 0, 1);
        assert_eq!(pieces[0], vec![Complex::new(0.0, 0.0), Complex::new(2.0, 0.0)]);
        assert_eq!(pieces[1], vec![Complex::new(1.0, 0.0), Complex::new(3.0, 0.0)]);
    }
}
