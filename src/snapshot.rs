//! Saving and restoring a sort in progress
//!
//! A [`Snapshot`] is a flat copy of every field of a [`MergeEngine`], including
//! the half-merged buffer of the current block pair. Restoring it yields an engine
//! that asks for exactly the same comparison the original was waiting on.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::engine::{MergeEngine, max_comparison_estimate};
use crate::error::{Result, SnapshotError};

/// The snapshot format written by this version
pub const SNAPSHOT_VERSION: u32 = 1;

/// The complete state of a [`MergeEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub version: u32,
    pub items: Vec<T>,
    pub buffer: Vec<T>,
    pub step: usize,
    pub pair_index: usize,
    pub left_head: usize,
    pub right_head: usize,
    pub comparisons: usize,
    pub max_comparisons: usize,
    pub done: bool,
}

impl<T: Serialize> Snapshot<T> {
    /// Encode as a JSON blob
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }
}

impl<T: DeserializeOwned> Snapshot<T> {
    /// Decode a JSON blob written by [`Snapshot::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        // Check the version first, a newer layout would otherwise just look malformed
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| SnapshotError::Inconsistent("missing snapshot version".into()))?;
        if found != u64::from(SNAPSHOT_VERSION) {
            return Err(SnapshotError::UnsupportedVersion {
                found,
                expected: SNAPSHOT_VERSION,
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl<T> Snapshot<T> {
    /// Check that the snapshot describes a state the engine can actually be in
    pub fn validate(&self) -> Result<()> {
        fn inconsistent(message: impl Into<String>) -> Result<()> {
            Err(SnapshotError::Inconsistent(message.into()))
        }

        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version.into(),
                expected: SNAPSHOT_VERSION,
            });
        }

        let len = self.items.len();

        if !self.step.is_power_of_two() {
            return inconsistent(format!("block size {} is not a power of two", self.step));
        }
        if self.max_comparisons != max_comparison_estimate(len) {
            return inconsistent(format!(
                "comparison estimate {} does not match {len} items",
                self.max_comparisons
            ));
        }
        if self.done != (self.step >= len) {
            return inconsistent(format!(
                "done is {} with block size {} and {len} items",
                self.done, self.step
            ));
        }

        if self.done {
            if self.left_head != 0 || self.right_head != 0 || !self.buffer.is_empty() {
                return inconsistent("finished sort has an open merge");
            }
            return Ok(());
        }

        if self.pair_index % 2 != 0 {
            return inconsistent(format!("block pair index {} is odd", self.pair_index));
        }
        let right_start = match (self.pair_index + 1).checked_mul(self.step) {
            Some(start) if start < len => start,
            _ => {
                return inconsistent(format!(
                    "block pair {} has no right block",
                    self.pair_index
                ));
            }
        };
        let right_limit = self.step.min(len - right_start);

        if self.left_head >= self.step || self.right_head >= right_limit {
            return inconsistent(format!(
                "merge cursors ({}, {}) out of range for blocks of {} and {right_limit}",
                self.left_head, self.right_head, self.step
            ));
        }
        if self.buffer.len() != self.left_head + self.right_head {
            return inconsistent(format!(
                "merge buffer holds {} items, cursors consumed {}",
                self.buffer.len(),
                self.left_head + self.right_head
            ));
        }
        if self.comparisons < self.buffer.len() {
            return inconsistent(format!(
                "{} comparisons can not have merged {} items",
                self.comparisons,
                self.buffer.len()
            ));
        }

        Ok(())
    }
}

impl<T: Clone> MergeEngine<T> {
    /// Capture the complete state of the engine
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            version: SNAPSHOT_VERSION,
            items: self.items.clone(),
            buffer: self.buffer.clone(),
            step: self.step,
            pair_index: self.pair_index,
            left_head: self.left_head,
            right_head: self.right_head,
            comparisons: self.comparisons,
            max_comparisons: self.max_comparisons,
            done: self.done,
        }
    }
}

impl<T> MergeEngine<T> {
    /// Rebuild an engine from a [`Snapshot`], rejecting impossible states
    pub fn restore(snapshot: Snapshot<T>) -> Result<Self> {
        snapshot.validate()?;

        let Snapshot {
            version: _,
            items,
            buffer,
            step,
            pair_index,
            left_head,
            right_head,
            comparisons,
            max_comparisons,
            done,
        } = snapshot;

        tracing::debug!(len = items.len(), step, comparisons, "restored manual sort");

        Ok(Self {
            items,
            buffer,
            step,
            pair_index,
            left_head,
            right_head,
            comparisons,
            max_comparisons,
            done,
        })
    }
}
