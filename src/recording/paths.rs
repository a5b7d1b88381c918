//! Recording file path generation.
//!
//! Every recording session gets a fresh unique path under the user's data
//! directory, so repeated sessions never overwrite each other.

use anyhow::anyhow;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter to disambiguate sessions started within the same
/// millisecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Returns the directory recordings are stored in, creating it if needed.
pub fn recordings_dir() -> anyhow::Result<PathBuf> {
    let dir = data_dir()?.join("recordings");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the vmemo data directory (`~/.local/share/vmemo`).
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".local")
        .join("share")
        .join("vmemo");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Produces a fresh unique WAV path for one recording session.
pub fn new_recording_path() -> anyhow::Result<PathBuf> {
    let dir = recordings_dir()?;
    Ok(dir.join(recording_file_name(Local::now())))
}

fn recording_file_name(at: DateTime<Local>) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("vmemo-{}-{}.wav", at.timestamp_millis(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_shape() {
        let at = Local::now();
        let name = recording_file_name(at);
        assert!(name.starts_with("vmemo-"));
        assert!(name.ends_with(".wav"));
    }

    #[test]
    fn test_names_are_unique_within_one_millisecond() {
        let at = Local::now();
        let first = recording_file_name(at);
        let second = recording_file_name(at);
        assert_ne!(first, second);
    }
}
