use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::selection_engine::error::SelectionError;

/// Draw one position in `0..weights.len()` with probability proportional to
/// its weight. Consumes a single draw from `rng`.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, SelectionError> {
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(SelectionError::invalid_input("weights must be finite and non-negative"));
    }
    // Scale by the largest weight so the running total cannot overflow.
    let max = weights.iter().copied().fold(0.0_f64, f64::max);
    let scaled: Vec<f64> = if max > 0.0 {
        weights.iter().map(|w| w / max).collect()
    } else {
        weights.to_vec()
    };
    let dist = WeightedIndex::<f64>::new(&scaled).map_err(|e| match e {
        WeightedError::NoItem => SelectionError::invalid_input("weighted choice over an empty collection"),
        WeightedError::InvalidWeight => {
            SelectionError::invalid_input("weights must be finite and non-negative")
        }
        WeightedError::AllWeightsZero => SelectionError::invalid_input("weights sum to zero"),
        other => SelectionError::invalid_input(other.to_string()),
    })?;
    Ok(dist.sample(rng))
}

/// Pick one item from `items` with probability proportional to `weights`.
///
/// Knows nothing about puzzles or themes; used for both selection stages.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Result<&'a T, SelectionError> {
    if items.len() != weights.len() {
        return Err(SelectionError::invalid_input(format!(
            "{} items but {} weights",
            items.len(),
            weights.len()
        )));
    }
    let idx = weighted_index(weights, rng)?;
    Ok(&items[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_item_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(*weighted_choice(&["only"], &[0.3], &mut rng).unwrap(), "only");
        }
    }

    #[test]
    fn zero_weight_item_is_never_chosen() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pick = weighted_choice(&['a', 'b', 'c'], &[1.0, 0.0, 2.0], &mut rng).unwrap();
            assert_ne!(*pick, 'b');
        }
    }

    #[test]
    fn heavier_weight_dominates() {
        let mut rng = StdRng::seed_from_u64(42);
        let heavy = (0..1000)
            .filter(|_| *weighted_choice(&[0, 1], &[1.0, 99.0], &mut rng).unwrap() == 1)
            .count();
        assert!(heavy > 950, "heavy item drawn only {heavy}/1000 times");
    }

    #[test]
    fn same_seed_same_draws() {
        let draw = |seed: u64| -> Vec<usize> {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| weighted_index(&[1.0, 2.0, 3.0, 4.0], &mut rng).unwrap())
                .collect()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn huge_weights_do_not_overflow_the_total() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 2];
        for _ in 0..200 {
            seen[weighted_index(&[1e308, 1e308], &mut rng).unwrap()] = true;
        }
        assert_eq!(seen, [true, true]);
        assert_eq!(weighted_index(&[f64::MAX, 0.0], &mut rng).unwrap(), 0);
    }

    #[test]
    fn length_mismatch_is_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = weighted_choice(&[1, 2], &[1.0], &mut rng).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidInput { .. }));
    }

    #[test]
    fn all_zero_weights_are_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = weighted_choice(&[1, 2], &[0.0, 0.0], &mut rng).unwrap_err();
        assert_eq!(err, SelectionError::invalid_input("weights sum to zero"));
    }

    #[test]
    fn empty_and_negative_weights_are_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: [u8; 0] = [];
        assert!(weighted_choice(&empty, &[], &mut rng).is_err());
        assert!(weighted_choice(&[1, 2], &[1.0, -1.0], &mut rng).is_err());
        assert!(weighted_choice(&[1, 2], &[1.0, f64::NAN], &mut rng).is_err());
    }
}
