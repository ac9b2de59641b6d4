//! Application configuration constants and per-folder settings.

use crate::error::{AppError, Result};
use crate::grouping::VariantRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supported image file extensions for scanning directories.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Output folder created under the generator root.
pub const DEFAULT_SORT_DIR_NAME: &str = "Sort";

/// Manifest written inside the sort folder.
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "manifest.jsonl";

/// Longest edge of the preview thumbnail, in pixels.
pub const DEFAULT_PREVIEW_SIZE: u32 = 260;

/// Number of decoded thumbnails kept around.
pub const PREVIEW_CACHE_CAPACITY: usize = 32;

/// Optional settings file looked up in the generator root.
pub const SETTINGS_FILE_NAME: &str = "mz-part-sorter.toml";

/// Which files of a part a sort action transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortScope {
    /// Every variant of the part.
    #[default]
    AllVariants,
    /// Only the variant currently shown in the preview.
    SelectedVariant,
}

/// Runtime settings, overridable per generator folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sort_dir_name: String,
    pub manifest_file_name: String,
    pub preview_size: u32,
    pub sort_scope: SortScope,
    pub variant_rule: VariantRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_dir_name: DEFAULT_SORT_DIR_NAME.to_string(),
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            preview_size: DEFAULT_PREVIEW_SIZE,
            sort_scope: SortScope::default(),
            variant_rule: VariantRule::default(),
        }
    }
}

impl Settings {
    /// Loads `mz-part-sorter.toml` from the generator root, or defaults when absent.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|e| AppError::at_path(&path, e))?;
        let settings = Self::from_toml(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parses settings from TOML text and validates them.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let name_ok = |name: &str| {
            !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
        };
        if !name_ok(&self.sort_dir_name) {
            return Err(AppError::Config(format!(
                "sort_dir_name must be a plain folder name, got {:?}",
                self.sort_dir_name
            )));
        }
        if !name_ok(&self.manifest_file_name) {
            return Err(AppError::Config(format!(
                "manifest_file_name must be a plain file name, got {:?}",
                self.manifest_file_name
            )));
        }
        if self.preview_size == 0 {
            return Err(AppError::Config("preview_size must be positive".to_string()));
        }
        Ok(())
    }
}
