//! Unified error types for the part sorter.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Application-specific errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required path (usually the generator root) does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A path exists but could not be read or written.
    #[error("permission denied: {0}")]
    Permission(String),
    /// An image could not be decoded
    #[error("failed to decode image: {0}")]
    Decode(String),
    /// Any other I/O failure during scanning, copying or moving.
    #[error("I/O error: {0}")]
    Io(String),
    /// Sorting never overwrites an existing file.
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    /// A part action was requested with nothing under the cursor.
    #[error("no part selected")]
    NoCurrentPart,
    /// Every file of the part has already been moved to the sort folder.
    #[error("already moved to the sort folder: {0}")]
    AlreadyMoved(String),
    #[error("variant index {index} out of range (part has {len} variants)")]
    VariantOutOfRange { index: usize, len: usize },
    /// The manifest could not be written or parsed.
    #[error("manifest error: {0}")]
    Manifest(String),
    /// The settings file is malformed.
    #[error("invalid settings: {0}")]
    Config(String),
    /// The variant rule could not be compiled into a matcher.
    #[error("invalid variant rule: {0}")]
    Pattern(String),
}

impl AppError {
    /// Builds an error for an I/O failure that happened at `path`.
    pub fn at_path(path: &std::path::Path, err: io::Error) -> Self {
        let msg = format!("{}: {}", path.display(), err);
        match err.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(msg),
            io::ErrorKind::PermissionDenied => AppError::Permission(msg),
            _ => AppError::Io(msg),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => AppError::Permission(err.to_string()),
            _ => AppError::Io(err.to_string()),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => AppError::from(e),
            other => AppError::Decode(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Manifest(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Pattern(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_by_kind() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(AppError::from(denied), AppError::Permission(_)));

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(AppError::from(missing), AppError::NotFound(_)));

        let other = io::Error::other("disk on fire");
        assert!(matches!(AppError::from(other), AppError::Io(_)));
    }

    #[test]
    fn at_path_includes_the_path() {
        let err = AppError::at_path(
            std::path::Path::new("/gen/Face"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, AppError::Permission(_)));
        assert!(err.to_string().contains("/gen/Face"));
    }
}
