//! Global vector initialization for the first round.

use protocol::{GroupRole, ModelShape};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Symmetric range for initial weight values.
const WEIGHT_INIT_RANGE: f32 = 0.1;

/// Produces the initial global vector for a shape: weight groups sampled
/// uniformly from `[-0.1, 0.1]`, bias groups zeroed.
///
/// # Arguments
/// * `shape` - The model shape to initialize.
/// * `seed` - Optional seed for a deterministic starting vector.
pub fn initial_global(shape: &ModelShape, seed: Option<u64>) -> Vec<f32> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut global = Vec::with_capacity(shape.total_len());
    for group in &shape.groups {
        match group.role {
            GroupRole::Weight => global.extend(
                (0..group.len).map(|_| rng.random_range(-WEIGHT_INIT_RANGE..=WEIGHT_INIT_RANGE)),
            ),
            GroupRole::Bias => global.extend(std::iter::repeat_n(0.0, group.len)),
        }
    }

    global
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn bias_groups_start_at_zero() {
        let shape = ModelShape::mlp(nz(3), nz(2));
        let global = initial_global(&shape, Some(7));

        assert_eq!(global.len(), shape.total_len());

        // Layout: [w_ih (6), b_h (2), w_ho (2), b_o (1)]
        assert_eq!(&global[6..8], [0.0, 0.0]);
        assert_eq!(global[10], 0.0);
    }

    #[test]
    fn weights_stay_in_range() {
        let shape = ModelShape::logistic_regression(nz(64));
        let global = initial_global(&shape, None);

        for &w in &global[..64] {
            assert!(w.abs() <= WEIGHT_INIT_RANGE);
        }
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let shape = ModelShape::logistic_regression(nz(8));

        let a = initial_global(&shape, Some(42));
        let b = initial_global(&shape, Some(42));
        assert_eq!(a, b);
    }
}
