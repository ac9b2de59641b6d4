//! Service that copies or moves a part's files into the sort folder.
//!
//! Every file goes to `<root>/<sort dir>/<path relative to root>` and gets one
//! manifest entry. Failures are collected per file; files already handled
//! stay where they are.

use crate::config::{Settings, SortScope};
use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use crate::manifest::{Manifest, ManifestEntry, SortAction};
use crate::part::PartGroup;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A file that could not be transferred.
#[derive(Debug)]
pub struct SortFailure {
    pub source: PathBuf,
    pub error: AppError,
}

/// Outcome of sorting one part.
#[derive(Debug)]
pub struct SortReport {
    pub action: SortAction,
    pub transferred: Vec<ManifestEntry>,
    pub failures: Vec<SortFailure>,
}

impl SortReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary for the status bar.
    pub fn summary(&self) -> String {
        let verb = match self.action {
            SortAction::Copy => "Copied",
            SortAction::Move => "Moved",
        };
        if self.failures.is_empty() {
            format!("{} {} file(s) to the sort folder", verb, self.transferred.len())
        } else {
            let failed: Vec<String> = self
                .failures
                .iter()
                .map(|f| format!("{} ({})", f.source.format_for_log(), f.error))
                .collect();
            format!(
                "{} {} file(s); {} failed: {}",
                verb,
                self.transferred.len(),
                self.failures.len(),
                failed.join(", ")
            )
        }
    }
}

/// Service for transferring reviewed files.
#[derive(Debug, Clone)]
pub struct SortService {
    root: PathBuf,
    sort_dir: PathBuf,
    manifest: Manifest,
}

impl SortService {
    /// Creates a service for the generator folder at `root`.
    pub fn new(root: &Path, settings: &Settings) -> Self {
        let sort_dir = root.join(&settings.sort_dir_name);
        Self {
            root: root.to_path_buf(),
            manifest: Manifest::new(sort_dir.join(&settings.manifest_file_name)),
            sort_dir,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Where `source` lands inside the sort folder.
    pub fn destination_for(&self, source: &Path) -> Result<PathBuf> {
        let rel = file_utils::relative_to(source, &self.root).ok_or_else(|| {
            AppError::Io(format!(
                "{} is outside {}",
                source.display(),
                self.root.display()
            ))
        })?;
        Ok(self.sort_dir.join(rel))
    }

    /// Copies or moves the files of `part` selected by `scope`.
    pub fn execute(&self, part: &PartGroup, action: SortAction, scope: SortScope) -> SortReport {
        let files: Vec<&Path> = match scope {
            SortScope::AllVariants => part.variants().iter().map(PathBuf::as_path).collect(),
            SortScope::SelectedVariant => part.selected_path().into_iter().collect(),
        };

        let mut report = SortReport {
            action,
            transferred: Vec::new(),
            failures: Vec::new(),
        };

        for source in files {
            match self.transfer_one(source, action) {
                Ok(entry) => {
                    info!(
                        "{} {} -> {}",
                        action,
                        entry.source.display(),
                        entry.destination.display()
                    );
                    report.transferred.push(entry);
                }
                Err(error) => {
                    warn!("Failed to {} {}: {}", action, source.display(), error);
                    report.failures.push(SortFailure {
                        source: source.to_path_buf(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn transfer_one(&self, source: &Path, action: SortAction) -> Result<ManifestEntry> {
        let destination = self.destination_for(source)?;
        if destination.exists() {
            return Err(AppError::DestinationExists(destination));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::at_path(parent, e))?;
        }

        match action {
            SortAction::Copy => copy_file(source, &destination)?,
            SortAction::Move => move_file(source, &destination)?,
        }

        let entry = ManifestEntry::new(source.to_path_buf(), destination, action);
        self.manifest.append(&entry)?;
        Ok(entry)
    }
}

/// Copies a file, removing a half-written destination on failure.
fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    if let Err(e) = fs::copy(source, destination) {
        if destination.exists() {
            let _ = fs::remove_file(destination);
        }
        return Err(AppError::at_path(source, e));
    }
    Ok(())
}

/// Moves a file so it ends up in exactly one place.
///
/// Falls back to copy + delete when a rename is impossible (e.g. across
/// devices). If the source cannot be deleted the copy is removed again.
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    let Err(rename_err) = fs::rename(source, destination) else {
        return Ok(());
    };
    debug!(
        "Rename of {} failed ({}), falling back to copy",
        source.format_for_log(),
        rename_err
    );

    copy_file(source, destination)?;
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(AppError::at_path(source, e));
    }
    Ok(())
}
