//! Filesystem scanner: turns a generator folder into an ordered list of parts.

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use crate::grouping::{self, VariantMatcher};
use crate::part::PartGroup;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An entry the scanner could not read and left out.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: AppError,
}

/// Result of one scan pass.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub groups: Vec<PartGroup>,
    pub skipped: Vec<SkippedEntry>,
}

/// Scans `root` recursively and groups image files into parts.
///
/// The sort folder is never descended into. Unreadable entries are recorded
/// in [`ScanOutcome::skipped`] and the scan continues.
pub fn scan_generator(root: &Path, settings: &Settings) -> Result<ScanOutcome> {
    let start = std::time::Instant::now();

    if !root.exists() {
        return Err(AppError::NotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(AppError::NotFound(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    fs::read_dir(root).map_err(|e| AppError::at_path(root, e))?;

    let matcher = settings.variant_rule.compile()?;
    let sort_dir = root.join(&settings.sort_dir_name);

    let mut outcome = ScanOutcome::default();
    let mut by_folder: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != sort_dir);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                let error = match err.into_io_error() {
                    Some(io) => AppError::at_path(&path, io),
                    None => AppError::Io(format!("{}: filesystem loop", path.display())),
                };
                warn!("Skipping unreadable entry: {}", error);
                outcome.skipped.push(SkippedEntry { path, error });
                continue;
            }
        };

        if !entry.file_type().is_file() || !file_utils::is_supported_image(entry.path()) {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(
                "Skipping file with non UTF-8 name: {}",
                entry.path().display()
            );
            continue;
        };
        let folder = entry
            .path()
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        by_folder.entry(folder).or_default().push(name.to_string());
    }

    for (folder, names) in by_folder {
        outcome
            .groups
            .extend(groups_for_folder(root, &folder, &names, &matcher));
    }

    debug!(
        "Scanned {} into {} parts ({} skipped) in {:?}",
        root.format_for_log(),
        outcome.groups.len(),
        outcome.skipped.len(),
        start.elapsed()
    );

    Ok(outcome)
}

fn groups_for_folder(
    root: &Path,
    folder: &Path,
    names: &[String],
    matcher: &VariantMatcher,
) -> Vec<PartGroup> {
    let abs_folder = root.join(folder);
    grouping::group_file_names(names, matcher)
        .into_iter()
        .map(|family| {
            let variants = family.members.iter().map(|n| abs_folder.join(n)).collect();
            PartGroup::new(folder.to_path_buf(), family.name, variants)
                .with_key(family.key)
                .with_mask_count(family.mask_count)
        })
        .collect()
}
