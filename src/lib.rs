//! Sorting by hand: a bottom-up mergesort whose comparisons come from outside.
//!
//! Every comparison is a pause. The caller asks the [`MergeEngine`] what to compare
//! with [`MergeEngine::peek`], gets an answer from a person (or anything else) and hands
//! it back with [`MergeEngine::apply`]. At any point the whole state can be captured in
//! a [`Snapshot`] and restored later, down to the half-finished merge.
//!
//! ```
//! use manual_sort::{Choice, MergeEngine, Next};
//!
//! let mut engine = MergeEngine::new(["pear", "apple", "fig"]);
//! while let Next::Pending { left, right } = engine.peek() {
//!     let choice = if left <= right { Choice::Left } else { Choice::Right };
//!     engine.apply(choice);
//! }
//! assert_eq!(engine.items(), ["apple", "fig", "pear"]);
//! ```

pub mod engine;
pub mod error;
pub mod snapshot;

#[cfg(test)]
mod test;

pub use engine::{Choice, MergeEngine, Next, max_comparison_estimate};
pub use error::SnapshotError;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
