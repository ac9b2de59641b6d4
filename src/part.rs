//! A reviewable part: one family of variant images inside one subfolder.

use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartGroup {
    subfolder: PathBuf,
    family: String,
    key: String,
    variants: Vec<PathBuf>,
    mask_count: usize,
    selected: usize,
}

impl PartGroup {
    /// Creates a group. `variants` must be non-empty absolute paths.
    pub fn new(subfolder: PathBuf, family: String, variants: Vec<PathBuf>) -> Self {
        debug_assert!(!variants.is_empty(), "a part needs at least one variant");
        Self {
            subfolder,
            key: family.to_ascii_lowercase(),
            family,
            variants,
            mask_count: 0,
            selected: 0,
        }
    }

    /// Overrides the ordering key (defaults to the lowercased family).
    pub fn with_key(mut self, key: String) -> Self {
        self.key = key;
        self
    }

    /// Marks the last `count` variants as mask sheets.
    pub fn with_mask_count(mut self, count: usize) -> Self {
        self.mask_count = count.min(self.variants.len());
        self
    }

    /// Subfolder relative to the generator root (empty for the root itself).
    pub fn subfolder(&self) -> &Path {
        &self.subfolder
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Family key as ordered by the scanner.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn variants(&self) -> &[PathBuf] {
        &self.variants
    }

    pub fn mask_count(&self) -> usize {
        self.mask_count
    }

    pub fn main_count(&self) -> usize {
        self.variants.len() - self.mask_count
    }

    /// A part made only of mask sheets, with no main sheet to pair them with.
    pub fn is_orphan_mask(&self) -> bool {
        self.mask_count > 0 && self.main_count() == 0
    }

    pub fn is_mask(&self, index: usize) -> bool {
        index < self.variants.len() && index >= self.main_count()
    }

    /// One-line summary of main and mask sheets.
    pub fn mask_status(&self) -> String {
        match (self.main_count(), self.mask_count) {
            (_, 0) => "no mask".to_string(),
            (0, masks) => format!("mask-only entry: {masks} mask sheet(s), no main sheet"),
            (_, 1) => "mask: 1 sheet".to_string(),
            (_, masks) => format!("mask: {masks} sheets"),
        }
    }

    /// True when none of the variant files exist any more.
    pub fn is_gone(&self) -> bool {
        self.variants.iter().all(|p| !p.exists())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.variants.get(self.selected).map(PathBuf::as_path)
    }

    /// Changes the displayed variant.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.variants.len() {
            return Err(AppError::VariantOutOfRange {
                index,
                len: self.variants.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// File names of the variants, for the dropdown.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Human-readable title such as `SV/Female · Clothing`.
    pub fn title(&self) -> String {
        if self.subfolder.as_os_str().is_empty() {
            self.family.clone()
        } else {
            format!("{} · {}", self.subfolder.display(), self.family)
        }
    }

    /// Case-insensitive substring match on family and subfolder.
    pub fn matches_filter(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.family.to_lowercase().contains(&needle)
            || self
                .subfolder
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
    }
}
