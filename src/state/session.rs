//! The review session for one generator folder.

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::manifest::SortAction;
use crate::part::PartGroup;
use crate::scanner::{self, SkippedEntry};
use crate::state::navigation::{Disposition, QueueFilter, ReviewQueue, SessionState};
use std::path::{Path, PathBuf};

/// Everything the UI needs to review one folder.
///
/// Owned by the UI layer and passed explicitly to handlers.
#[derive(Debug)]
pub struct ReviewSession {
    root: PathBuf,
    settings: Settings,
    queue: ReviewQueue,
    skipped: Vec<SkippedEntry>,
    filter: QueueFilter,
}

impl ReviewSession {
    /// Scans `root` with `settings` and starts reviewing at the first part.
    pub fn open(root: &Path, settings: Settings) -> Result<Self> {
        let outcome = scanner::scan_generator(root, &settings)?;
        log::info!(
            "Opened {} with {} parts",
            root.display(),
            outcome.groups.len()
        );
        Ok(Self {
            root: root.to_path_buf(),
            settings,
            queue: ReviewQueue::new(outcome.groups),
            skipped: outcome.skipped,
            filter: QueueFilter::default(),
        })
    }

    /// Scans again, keeping the filter, the review marks and the position.
    ///
    /// The cursor returns to the part that was current, matched on subfolder
    /// and family key. If that part is gone it lands on the next one in scan
    /// order.
    pub fn rescan(&mut self) -> Result<()> {
        let anchor = self
            .queue
            .current()
            .map(|p| (p.subfolder().to_path_buf(), p.key().to_string()));

        let outcome = scanner::scan_generator(&self.root, &self.settings)?;
        let previous = std::mem::replace(&mut self.queue, ReviewQueue::new(outcome.groups));
        self.queue.carry_over(previous);
        self.skipped = outcome.skipped;
        self.queue.apply_filter(&self.filter);

        if let Some((folder, key)) = anchor {
            let anchor = (folder.as_path(), key.as_str());
            if !self.queue.seek(|p| (p.subfolder(), p.key()) == anchor) {
                self.queue.seek(|p| (p.subfolder(), p.key()) > anchor);
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn state(&self) -> SessionState {
        self.queue.state()
    }

    pub fn current(&self) -> Option<&PartGroup> {
        self.queue.current()
    }

    /// Shows variant `index` of the current part.
    pub fn select_variant(&mut self, index: usize) -> Result<()> {
        match self.queue.current_mut() {
            Some(part) => part.select(index),
            None => Err(AppError::VariantOutOfRange { index, len: 0 }),
        }
    }

    pub fn advance(&mut self) -> SessionState {
        self.queue.advance()
    }

    pub fn retreat(&mut self) -> SessionState {
        self.queue.retreat()
    }

    /// Leaves the current part alone and moves on.
    pub fn mark_ok(&mut self) -> SessionState {
        if self.queue.state() == SessionState::Finished {
            return SessionState::Finished;
        }
        self.queue.set_current_disposition(Disposition::Accepted);
        self.queue.advance()
    }

    /// Records that the current part was sorted.
    pub fn record_sort(&mut self, action: SortAction) {
        self.queue.set_current_disposition(action.into());
    }

    /// Filters the view by text and, optionally, to mask-only parts.
    pub fn apply_filter(&mut self, needle: &str, orphan_masks_only: bool) {
        self.filter = QueueFilter {
            text: needle.trim().to_string(),
            orphan_masks_only,
        };
        self.queue.apply_filter(&self.filter);
    }

    /// True when the current part was moved away and none of its files remain.
    pub fn current_is_gone(&self) -> bool {
        self.queue.current_disposition() == Some(Disposition::Moved)
            && self.queue.current().is_some_and(PartGroup::is_gone)
    }
}
