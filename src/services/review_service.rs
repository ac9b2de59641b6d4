//! Service for the review workflow.
//!
//! Coordinates the session, the preview cache and the sort service so UI
//! handlers stay thin.

use crate::config::{Settings, SortScope};
use crate::error::{AppError, Result};
use crate::manifest::SortAction;
use crate::services::sort_service::{SortReport, SortService};
use crate::state::{AppState, ReviewSession, SessionState};
use log::warn;
use std::path::{Path, PathBuf};

/// What opening a folder found.
#[derive(Debug)]
pub struct OpenSummary {
    pub parts: usize,
    pub skipped: usize,
    pub sort_scope: SortScope,
    /// Set when the settings file was unusable and defaults were used.
    pub settings_warning: Option<String>,
    /// Entries already in the manifest from earlier sessions.
    pub earlier_sorts: usize,
    pub manifest_path: PathBuf,
}

impl OpenSummary {
    pub fn message(&self) -> String {
        let mut msg = format!("Found {} part(s)", self.parts);
        if self.skipped > 0 {
            msg.push_str(&format!(", skipped {} unreadable entr(ies)", self.skipped));
        }
        if self.earlier_sorts > 0 {
            msg.push_str(&format!(
                ", {} earlier sort(s) logged in {}",
                self.earlier_sorts,
                self.manifest_path.display()
            ));
        }
        if let Some(w) = &self.settings_warning {
            msg.push_str(&format!(" (using default settings: {w})"));
        }
        msg
    }
}

/// Service for driving a review session.
#[derive(Clone)]
pub struct ReviewService {
    state: AppState,
}

impl ReviewService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Loads settings for `root`, scans it and replaces the current session.
    pub fn open_folder(&self, root: &Path) -> Result<OpenSummary> {
        let (settings, settings_warning) = match Settings::load_for_root(root) {
            Ok(settings) => (settings, None),
            Err(e) => {
                warn!("Ignoring settings for {}: {}", root.display(), e);
                (Settings::default(), Some(e.to_string()))
            }
        };

        let session = ReviewSession::open(root, settings)?;
        let sorter = SortService::new(root, session.settings());
        let earlier_sorts = match sorter.manifest().read_all() {
            Ok(entries) => entries.len(),
            Err(e) => {
                warn!("Cannot read manifest: {}", e);
                0
            }
        };
        let summary = OpenSummary {
            parts: session.queue().total_parts(),
            skipped: session.skipped().len(),
            sort_scope: session.settings().sort_scope,
            settings_warning,
            earlier_sorts,
            manifest_path: sorter.manifest().path().to_path_buf(),
        };

        self.state.image_cache.borrow_mut().clear();
        *self.state.session.borrow_mut() = Some(session);
        Ok(summary)
    }

    /// Rescans the open folder.
    pub fn rescan(&self) -> Result<()> {
        self.with_session(|s| s.rescan())?;
        self.state.image_cache.borrow_mut().clear();
        Ok(())
    }

    pub fn next(&self) -> Result<SessionState> {
        self.with_session(|s| Ok(s.advance()))
    }

    pub fn previous(&self) -> Result<SessionState> {
        self.with_session(|s| Ok(s.retreat()))
    }

    pub fn mark_ok(&self) -> Result<SessionState> {
        self.with_session(|s| Ok(s.mark_ok()))
    }

    pub fn select_variant(&self, index: usize) -> Result<()> {
        self.with_session(|s| s.select_variant(index))
    }

    pub fn apply_filter(&self, needle: &str, orphan_masks_only: bool) -> Result<()> {
        self.with_session(|s| {
            s.apply_filter(needle, orphan_masks_only);
            Ok(())
        })
    }

    /// Sorts the current part.
    ///
    /// The part is marked as sorted when at least one file was transferred.
    /// The session advances only when every file succeeded, so failures can
    /// be retried. A part whose files were all moved already is refused.
    pub fn sort_current(&self, action: SortAction, scope: SortScope) -> Result<SortReport> {
        let report = self.with_session(|session| {
            if session.current_is_gone() {
                let title = session.current().map(|p| p.title()).unwrap_or_default();
                return Err(AppError::AlreadyMoved(title));
            }
            let part = session.current().ok_or(AppError::NoCurrentPart)?;
            let service = SortService::new(session.root(), session.settings());
            let report = service.execute(part, action, scope);

            if !report.transferred.is_empty() {
                session.record_sort(action);
            }
            if report.is_complete() {
                session.advance();
            }
            Ok(report)
        })?;

        if action == SortAction::Move {
            let mut cache = self.state.image_cache.borrow_mut();
            for entry in &report.transferred {
                cache.evict(&entry.source);
            }
        }

        Ok(report)
    }

    fn with_session<T>(&self, f: impl FnOnce(&mut ReviewSession) -> Result<T>) -> Result<T> {
        let mut guard = self.state.session.borrow_mut();
        let session = guard
            .as_mut()
            .ok_or_else(|| AppError::NotFound("no generator folder open".to_string()))?;
        f(session)
    }
}
