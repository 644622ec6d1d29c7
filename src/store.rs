//! Keeping a [`Snapshot`] in a file between sessions.
//!
//! A missing file means there is no saved progress, it is not an error.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use manual_sort::{MergeEngine, Snapshot};
use serde::{Serialize, de::DeserializeOwned};

/// Load saved progress from `path`
pub fn load<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<MergeEngine<T>>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let engine = Snapshot::from_json(&json)
        .and_then(MergeEngine::restore)
        .with_context(|| {
            format!(
                "Could not resume from {}, pass --fresh to start over",
                path.display()
            )
        })?;

    tracing::info!(path = %path.display(), comparisons = engine.comparisons(), "progress loaded");
    Ok(Some(engine))
}

/// Save the progress of `engine` to `path`, replacing the file in one step
pub fn save<T: Clone + Serialize>(path: &Path, engine: &MergeEngine<T>) -> anyhow::Result<()> {
    let json = engine.snapshot().to_json()?;

    let temporary = temporary_path(path);
    std::fs::write(&temporary, json)
        .with_context(|| format!("Failed to write {}", temporary.display()))?;
    std::fs::rename(&temporary, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::debug!(path = %path.display(), comparisons = engine.comparisons(), "progress saved");
    Ok(())
}

/// Remove saved progress, if there is any
pub fn clear(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "progress removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
