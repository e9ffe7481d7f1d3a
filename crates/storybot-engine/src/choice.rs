//! Injectable selection policy for multiple-choice answers
//!
//! Answer correctness is not a requirement, only forward progress, so the
//! production policy is deliberately unweighted. Tests inject a
//! deterministic policy and assert exact selections.

use rand::Rng;

/// Picks one index out of `len` candidates (`len` >= 1)
pub trait ChoicePolicy: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random selection
#[derive(Debug, Default)]
pub struct RandomChoice;

impl ChoicePolicy for RandomChoice {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_choice_stays_in_bounds() {
        let policy = RandomChoice;
        for len in 1..=8 {
            for _ in 0..50 {
                assert!(policy.pick(len) < len);
            }
        }
    }
}
