//! Helpers shared by the tests

use rand::{SeedableRng as _, seq::SliceRandom as _};

use crate::engine::{Choice, MergeEngine};

/// The seed shared by all tests
pub const TEST_SEED: u64 = 0xa8bf17eb656f828d;
/// The rng used by each test
pub type Rng = rand::rngs::SmallRng;

/// Generate the `Rng` for a test
pub fn test_rng() -> Rng {
    Rng::seed_from_u64(TEST_SEED)
}

/// A judge that always prefers the smaller item, standing in for a consistent human
pub fn ascending<T: Ord>(left: &T, right: &T) -> Choice {
    if left <= right { Choice::Left } else { Choice::Right }
}

/// Return a sorted copy of `values`
pub fn sorted_copy<T: Ord + Clone>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted
}

/// Sort shuffled slices of every size up to `MAX_SIZE` with [`ascending`] and check the
/// result is sorted and did not take more decisions than the estimate
pub fn test_random_sorted<const RUNS: usize, const MAX_SIZE: usize>() {
    let mut rng = test_rng();

    for size in 0..=MAX_SIZE {
        let mut values: Box<[usize]> = (0..size).map(|value| value / 2).collect();

        for run in 0..RUNS.div_ceil(10) {
            values.shuffle(&mut rng);

            let mut engine = MergeEngine::with_rng(values.iter().copied(), &mut rng);
            let result = engine.run_with(ascending);

            assert!(result.is_sorted(), "Run {run} of size {size} was not sorted");
            assert_eq!(result, &*sorted_copy(&values), "Run {run} of size {size} lost items");
            assert!(
                engine.comparisons() <= engine.max_comparisons(),
                "Run {run} of size {size} took {} decisions, estimate was {}",
                engine.comparisons(),
                engine.max_comparisons()
            );
        }
    }
}
