//! Shot sampling from a merged full state vector: draws computational-basis
//! outcomes weighted by amplitude probability.

use crate::maths::Complex;
use rand::Rng;

/// Draws `nshots` computational-basis outcomes from `state`'s Born-rule
/// probability distribution. Outcomes are bitstrings packed as `usize`.
pub fn sample(state: &[Complex], nshots: usize) -> Vec<usize> {
    let probabilities: Vec<f64> = state.iter().map(|c| c.norm2()).collect();
    let total: f64 = probabilities.iter().sum();
    let mut rng = rand::rng();
    (0..nshots)
        .map(|_| draw_one(&probabilities, total, &mut rng))
        .collect()
}

fn draw_one(probabilities: &[f64], total: f64, rng: &mut impl Rng) -> usize {
    let mut target = rng.random::<f64>() * total;
    for (idx, &p) in probabilities.iter().enumerate() {
        if target < p {
            return idx;
        }
        target -= p;
    }
    probabilities.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_a_basis_state_always_returns_that_outcome() {
        let state = vec![Complex::zero(), Complex::one(), Complex::zero(), Complex::zero()];
        let samples = sample(&state, 16);
        assert!(samples.iter().all(|&s| s == 1));
    }

    #[test]
    fn sample_count_matches_requested_shots() {
        let state = vec![Complex::one(), Complex::zero()];
        assert_eq!(sample(&state, 10).len(), 10);
    }
}
