//! Append-only record of the files the sorter copied or moved.
//!
//! One JSON object per line, so a crash mid-session never corrupts earlier
//! entries and the file can be tailed or grepped.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAction {
    Copy,
    Move,
}

impl std::fmt::Display for SortAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortAction::Copy => write!(f, "copy"),
            SortAction::Move => write!(f, "move"),
        }
    }
}

/// A single transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: SortAction,
    pub timestamp: DateTime<Utc>,
}

impl ManifestEntry {
    pub fn new(source: PathBuf, destination: PathBuf, action: SortAction) -> Self {
        Self {
            source,
            destination,
            action,
            timestamp: Utc::now(),
        }
    }
}

/// Handle to the manifest file inside the sort folder.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file and its folder if needed.
    pub fn append(&self, entry: &ManifestEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| manifest_io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| manifest_io(&self.path, e))?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json).map_err(|e| manifest_io(&self.path, e))?;

        Ok(())
    }

    /// Reads every entry. A missing manifest is empty; unparsable lines are skipped.
    pub fn read_all(&self) -> Result<Vec<ManifestEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| manifest_io(&self.path, e))?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| manifest_io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => log::warn!("Failed to parse manifest entry: {}", e),
            }
        }

        Ok(entries)
    }
}

fn manifest_io(path: &Path, err: std::io::Error) -> AppError {
    AppError::Manifest(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_read_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(dir.path().join("Sort/manifest.jsonl"));
        assert!(manifest.read_all().unwrap().is_empty());

        let first = ManifestEntry::new("a.png".into(), "Sort/a.png".into(), SortAction::Copy);
        let second = ManifestEntry::new("b.png".into(), "Sort/b.png".into(), SortAction::Move);
        manifest.append(&first).unwrap();
        manifest.append(&second).unwrap();

        assert_eq!(manifest.read_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn lines_are_plain_json_objects() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(dir.path().join("manifest.jsonl"));
        manifest
            .append(&ManifestEntry::new(
                "x.png".into(),
                "Sort/x.png".into(),
                SortAction::Move,
            ))
            .unwrap();

        let text = fs::read_to_string(manifest.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["action"], "move");
        assert_eq!(value["source"], "x.png");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(dir.path().join("manifest.jsonl"));
        fs::write(manifest.path(), "not json\n\n").unwrap();
        manifest
            .append(&ManifestEntry::new(
                "y.png".into(),
                "Sort/y.png".into(),
                SortAction::Copy,
            ))
            .unwrap();

        let entries = manifest.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, SortAction::Copy);
    }
}
