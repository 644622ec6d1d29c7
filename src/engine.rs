//! The incremental bottom-up mergesort
//!
//! Instead of calling a comparison function, the engine stops at every comparison
//! and waits for the caller to report which of two items is preferred. All loop
//! state of the bottom-up mergesort lives in plain fields, so the sort can be
//! paused, saved through [`MergeEngine::snapshot`] and continued later.
//!
//! The engine has no way to detect inconsistent answers (a cycle like `a < b < c < a`).
//! Such answers still terminate, the resulting order is just whatever the merges produce.

use rand::seq::SliceRandom as _;

/// The side of a pending comparison that was preferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Choice {
    /// The left item goes first
    Left,
    /// The right item goes first
    Right,
}

/// What the engine is waiting for
#[derive(Debug, PartialEq, Eq)]
pub enum Next<'a, T> {
    /// Two items waiting for a decision
    Pending { left: &'a T, right: &'a T },
    /// The final ordering, preferred items first
    Done(&'a [T]),
}

/// Rough upper bound on the decisions needed to sort `len` items: `len * ceil(log2(len))`.
///
/// Only used for progress reporting.
pub fn max_comparison_estimate(len: usize) -> usize {
    if len < 2 {
        return 0;
    }

    len * len.next_power_of_two().trailing_zeros() as usize
}

/// A bottom-up mergesort whose comparisons are answered from outside
#[derive(Debug, Clone)]
pub struct MergeEngine<T> {
    /// The working sequence, sorted in blocks of `step`
    pub(crate) items: Vec<T>,
    /// Merged output of the current block pair
    pub(crate) buffer: Vec<T>,
    /// The current block size, always a power of two
    pub(crate) step: usize,
    /// Index of the left block of the pair being merged
    pub(crate) pair_index: usize,
    pub(crate) left_head: usize,
    pub(crate) right_head: usize,
    pub(crate) comparisons: usize,
    pub(crate) max_comparisons: usize,
    pub(crate) done: bool,
}

impl<T> MergeEngine<T> {
    /// Create an engine over a shuffled copy of `items`, using the thread rng
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self::with_rng(items, &mut rand::rng())
    }

    /// Create an engine over a copy of `items` shuffled with `rng`
    pub fn with_rng<R: rand::Rng + ?Sized>(items: impl IntoIterator<Item = T>, rng: &mut R) -> Self {
        let mut items: Vec<T> = items.into_iter().collect();
        // Merge costs depend on the input order, shuffling keeps the progress estimate honest
        items.shuffle(rng);

        let len = items.len();
        tracing::debug!(len, "starting manual sort");

        Self {
            items,
            buffer: Vec::new(),
            step: 1,
            pair_index: 0,
            left_head: 0,
            right_head: 0,
            comparisons: 0,
            max_comparisons: max_comparison_estimate(len),
            done: len <= 1,
        }
    }

    /// Returns the pending comparison, or the final order once sorting is done.
    ///
    /// Has no side effects, calling it repeatedly returns the same answer.
    pub fn peek(&self) -> Next<'_, T> {
        if self.done {
            return Next::Done(&self.items);
        }

        Next::Pending {
            left: &self.items[self.left_start() + self.left_head],
            right: &self.items[self.right_start() + self.right_head],
        }
    }

    /// The fraction of the estimated work done, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.done {
            return 1.0;
        }

        // The estimate is not a hard bound, so clamp
        (self.comparisons as f64 / self.max_comparisons as f64).clamp(0.0, 1.0)
    }

    /// [`Self::progress`] as a percentage
    pub fn percent(&self) -> f64 {
        self.progress() * 100.0
    }

    /// Number of items being sorted
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of decisions applied so far
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// The decision estimate fixed at construction
    pub fn max_comparisons(&self) -> usize {
        self.max_comparisons
    }

    /// The current block size
    pub fn step(&self) -> usize {
        self.step
    }

    /// The working sequence in its current order.
    ///
    /// Items of the block pair being merged are not moved until that merge finishes.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume a finished engine and return the final order, or give the engine back
    pub fn into_sorted(self) -> Result<Vec<T>, Self> {
        if self.done { Ok(self.items) } else { Err(self) }
    }

    fn left_start(&self) -> usize {
        self.pair_index * self.step
    }

    fn right_start(&self) -> usize {
        (self.pair_index + 1) * self.step
    }

    /// The length of the right block, which is shorter than `step` at the end of the sequence
    fn right_limit(&self) -> usize {
        self.step.min(self.items.len().saturating_sub(self.right_start()))
    }
}

impl<T: Clone> MergeEngine<T> {
    /// Apply the decision for the pending comparison.
    ///
    /// Once one side of the block pair runs out, the rest of the other side is
    /// appended without asking and the merged block is written back. Does nothing
    /// after sorting is done.
    pub fn apply(&mut self, choice: Choice) {
        if self.done {
            tracing::debug!(?choice, "ignoring decision, sorting is already done");
            return;
        }

        let right_limit = self.right_limit();

        if self.left_head < self.step && self.right_head < right_limit {
            match choice {
                Choice::Left => self.take_left(),
                Choice::Right => self.take_right(),
            }
            self.comparisons += 1;
            tracing::trace!(?choice, comparisons = self.comparisons, "decision applied");
        }

        if self.left_head < self.step && self.right_head < right_limit {
            return;
        }

        // One side is exhausted, nothing left to compare
        while self.left_head < self.step {
            self.take_left();
        }
        while self.right_head < right_limit {
            self.take_right();
        }

        self.flush();
    }

    /// Drive the engine to completion, asking `judge` for every decision
    pub fn run_with(&mut self, mut judge: impl FnMut(&T, &T) -> Choice) -> &[T] {
        loop {
            let choice = match self.peek() {
                Next::Pending { left, right } => judge(left, right),
                Next::Done(_) => break,
            };
            self.apply(choice);
        }

        &self.items
    }

    fn take_left(&mut self) {
        let index = self.left_start() + self.left_head;
        self.buffer.push(self.items[index].clone());
        self.left_head += 1;
    }

    fn take_right(&mut self) {
        let index = self.right_start() + self.right_head;
        self.buffer.push(self.items[index].clone());
        self.right_head += 1;
    }

    /// Write the merged pair back and move on to the next pair
    fn flush(&mut self) {
        let start = self.left_start();
        let merged = self.buffer.len();
        for (offset, item) in self.buffer.drain(..).enumerate() {
            self.items[start + offset] = item;
        }

        tracing::debug!(step = self.step, pair = self.pair_index, merged, "block pair merged");

        self.pair_index += 2;
        if (self.pair_index + 1) * self.step >= self.items.len() {
            // A trailing block without partner stays where it is
            self.step *= 2;
            self.pair_index = 0;
            tracing::debug!(step = self.step, comparisons = self.comparisons, "merge pass finished");
        }

        if self.step >= self.items.len() {
            self.done = true;
            tracing::info!(
                comparisons = self.comparisons,
                estimate = self.max_comparisons,
                "sorting finished"
            );
        }

        self.left_head = 0;
        self.right_head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{ascending, test_rng};

    const RUNS: usize = 100;
    const MAX_SIZE: usize = 200;

    #[test]
    fn estimate() {
        assert_eq!(max_comparison_estimate(0), 0);
        assert_eq!(max_comparison_estimate(1), 0);
        assert_eq!(max_comparison_estimate(2), 2);
        assert_eq!(max_comparison_estimate(4), 8);
        assert_eq!(max_comparison_estimate(5), 15);
        assert_eq!(max_comparison_estimate(1024), 10_240);
    }

    #[test]
    fn empty() {
        let engine = MergeEngine::with_rng(Vec::<usize>::new(), &mut test_rng());

        assert!(engine.is_done());
        assert_eq!(engine.comparisons(), 0);
        assert!(matches!(engine.peek(), Next::Done([])));
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn singleton() {
        let mut engine = MergeEngine::with_rng(["only"], &mut test_rng());

        assert!(engine.is_done());
        engine.apply(Choice::Right);
        assert_eq!(engine.comparisons(), 0);
        assert_eq!(engine.peek(), Next::Done(&["only"][..]));
    }

    #[test]
    fn four_items() {
        let mut rng = test_rng();

        for run in 0..RUNS {
            let mut engine = MergeEngine::with_rng(['C', 'A', 'D', 'B'], &mut rng);
            let sorted = engine.run_with(ascending).to_vec();

            assert_eq!(sorted, ['A', 'B', 'C', 'D'], "Run {run} was not sorted");
            assert!(
                (4..=5).contains(&engine.comparisons()),
                "Run {run} used {} comparisons",
                engine.comparisons()
            );
        }
    }

    #[test]
    fn random() {
        crate::test::test_random_sorted::<RUNS, MAX_SIZE>();
    }

    #[test]
    fn duplicates_are_kept() {
        let mut rng = test_rng();
        let values: Vec<usize> = std::iter::repeat_n(0..10, 5).flatten().collect();

        let mut engine = MergeEngine::with_rng(values.iter().copied(), &mut rng);
        let result = engine.run_with(ascending).to_vec();

        assert_eq!(result, crate::test::sorted_copy(&values));
    }

    #[test]
    fn trailing_block_passes_through() {
        let mut engine = MergeEngine::with_rng(0..5, &mut test_rng());
        let initial = engine.items().to_vec();

        // Two merges of single items, one decision each
        engine.apply(Choice::Left);
        assert_eq!((engine.step(), engine.pair_index), (1, 2));
        engine.apply(Choice::Left);

        assert_eq!(engine.comparisons(), 2);
        assert_eq!(engine.step(), 2);
        assert_eq!(engine.pair_index, 0);
        assert_eq!(engine.items()[4], initial[4]);
        assert_eq!(&engine.items()[..4], &initial[..4]);
    }

    #[test]
    fn short_right_block_is_drained() {
        let mut engine = MergeEngine::with_rng(0..3, &mut test_rng());

        engine.apply(Choice::Right);
        assert_eq!(engine.step(), 2);

        // Merging a block of two with a block of one
        assert!(matches!(engine.peek(), Next::Pending { .. }));
        engine.apply(Choice::Right);

        assert!(engine.is_done());
        assert_eq!(engine.comparisons(), 2);
    }

    #[test]
    fn pending_pair_is_stable() {
        let engine = MergeEngine::with_rng(0..10, &mut test_rng());

        assert_eq!(engine.peek(), engine.peek());
        let Next::Pending { left, right } = engine.peek() else {
            panic!("Ten items can not be done before any decision");
        };
        assert_eq!((left, right), (&engine.items()[0], &engine.items()[1]));
    }

    #[test]
    fn completion_is_idempotent() {
        let mut engine = MergeEngine::with_rng(0..20, &mut test_rng());
        engine.run_with(ascending);

        let comparisons = engine.comparisons();
        let first: Vec<_> = engine.items().to_vec();

        for choice in [Choice::Left, Choice::Right] {
            engine.apply(choice);
            assert_eq!(engine.peek(), Next::Done(&first[..]));
        }
        assert_eq!(engine.comparisons(), comparisons);
    }

    #[test]
    fn inconsistent_decisions_terminate() {
        let mut rng = test_rng();
        let values: Vec<usize> = (0..37).collect();

        for choice in [Choice::Left, Choice::Right] {
            let mut engine = MergeEngine::with_rng(values.iter().copied(), &mut rng);
            let result = engine.run_with(|_, _| choice).to_vec();

            assert_eq!(crate::test::sorted_copy(&result), values);
            assert!(engine.comparisons() <= engine.max_comparisons());
        }
    }

    #[test]
    fn progress_is_monotone() {
        let mut engine = MergeEngine::with_rng(0..50, &mut test_rng());
        let mut previous = engine.progress();
        assert_eq!(previous, 0.0);

        while let Next::Pending { left, right } = engine.peek() {
            let choice = ascending(left, right);
            engine.apply(choice);

            let current = engine.progress();
            assert!((previous..=1.0).contains(&current));
            previous = current;
        }

        assert_eq!(engine.percent(), 100.0);
    }

    #[test]
    fn into_sorted_requires_done() {
        let engine = MergeEngine::with_rng(0..3, &mut test_rng());
        let mut engine = engine.into_sorted().unwrap_err();

        engine.run_with(ascending);
        assert_eq!(engine.into_sorted().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn shuffle_reaches_every_permutation() {
        let mut rng = test_rng();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..RUNS {
            seen.insert(MergeEngine::with_rng(0..3, &mut rng).items().to_vec());
        }

        assert_eq!(seen.len(), 6);
    }
}
