//! Review queue: the ordered parts of one scan and the cursor over them.

use crate::manifest::SortAction;
use crate::part::PartGroup;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;

/// Direction for navigation through parts.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

/// Whether there is still something to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reviewing,
    Finished,
}

/// What the reviewer did with a part during this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    #[default]
    Pending,
    /// Left alone with Ok.
    Accepted,
    Copied,
    Moved,
}

impl From<SortAction> for Disposition {
    fn from(action: SortAction) -> Self {
        match action {
            SortAction::Copy => Disposition::Copied,
            SortAction::Move => Disposition::Moved,
        }
    }
}

/// Which parts the view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    /// Case-insensitive substring of family or subfolder. Blank matches all.
    pub text: String,
    /// Only mask sheets with no main sheet.
    pub orphan_masks_only: bool,
}

impl QueueFilter {
    pub fn matches(&self, part: &PartGroup) -> bool {
        part.matches_filter(&self.text) && (!self.orphan_masks_only || part.is_orphan_mask())
    }
}

/// Parts in review order, their dispositions, and a filtered view with a cursor.
///
/// The cursor indexes into `view`; `cursor == view.len()` means finished.
#[derive(Debug, Default)]
pub struct ReviewQueue {
    groups: Vec<PartGroup>,
    dispositions: Vec<Disposition>,
    /// Dispositions of parts that vanished in a rescan.
    retired: Vec<Disposition>,
    view: Vec<usize>,
    cursor: usize,
}

impl ReviewQueue {
    pub fn new(groups: Vec<PartGroup>) -> Self {
        let view = (0..groups.len()).collect();
        Self {
            dispositions: vec![Disposition::Pending; groups.len()],
            groups,
            retired: Vec::new(),
            view,
            cursor: 0,
        }
    }

    /// Takes over dispositions and variant selections from an earlier scan.
    ///
    /// Parts are matched on subfolder and family key. Reviewed parts that no
    /// longer exist still count towards [`ReviewQueue::count`].
    pub fn carry_over(&mut self, previous: ReviewQueue) {
        let mut index: HashMap<(PathBuf, String), usize> = HashMap::new();
        for (i, g) in self.groups.iter().enumerate() {
            index.insert((g.subfolder().to_path_buf(), g.key().to_string()), i);
        }

        self.retired = previous.retired;
        for (old, disposition) in previous.groups.into_iter().zip(previous.dispositions) {
            let key = (old.subfolder().to_path_buf(), old.key().to_string());
            match index.get(&key) {
                Some(&i) => {
                    self.dispositions[i] = disposition;
                    if let Some(selected) = old.selected_path() {
                        let group = &mut self.groups[i];
                        if let Some(pos) = group.variants().iter().position(|v| v == selected) {
                            let _ = group.select(pos);
                        }
                    }
                }
                None if disposition != Disposition::Pending => self.retired.push(disposition),
                None => {}
            }
        }
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.view.len() {
            SessionState::Reviewing
        } else {
            SessionState::Finished
        }
    }

    /// Number of parts in the current view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Total parts found by the scan, ignoring the filter.
    pub fn total_parts(&self) -> usize {
        self.groups.len()
    }

    /// Zero-based position of the cursor in the view.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&PartGroup> {
        self.view.get(self.cursor).map(|&i| &self.groups[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut PartGroup> {
        let i = *self.view.get(self.cursor)?;
        self.groups.get_mut(i)
    }

    pub fn current_disposition(&self) -> Option<Disposition> {
        self.view.get(self.cursor).map(|&i| self.dispositions[i])
    }

    pub fn set_current_disposition(&mut self, disposition: Disposition) {
        if let Some(&i) = self.view.get(self.cursor) {
            self.dispositions[i] = disposition;
        }
    }

    /// Counts parts with the given disposition across the whole session.
    pub fn count(&self, disposition: Disposition) -> usize {
        self.dispositions
            .iter()
            .chain(&self.retired)
            .filter(|&&d| d == disposition)
            .count()
    }

    /// Puts the cursor on the first part in the view matching `pred`.
    ///
    /// Without a match the queue is finished and `false` is returned.
    pub fn seek(&mut self, pred: impl Fn(&PartGroup) -> bool) -> bool {
        match self.view.iter().position(|&i| pred(&self.groups[i])) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => {
                self.cursor = self.view.len();
                false
            }
        }
    }

    fn navigate_to(&mut self, direction: Direction) -> SessionState {
        match direction {
            Direction::Next => {
                if self.cursor < self.view.len() {
                    self.cursor += 1;
                } else {
                    debug!("Already past the last part");
                }
            }
            Direction::Previous => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.min(self.view.len()).saturating_sub(1);
                } else {
                    warn!("No previous part available");
                }
            }
        }
        self.state()
    }

    /// Moves forward; past the last part the queue is finished.
    pub fn advance(&mut self) -> SessionState {
        self.navigate_to(Direction::Next)
    }

    /// Moves back one part. From the finished state this returns to the last part.
    pub fn retreat(&mut self) -> SessionState {
        self.navigate_to(Direction::Previous)
    }

    /// Restricts the view to parts matching `filter` and rewinds to the first match.
    pub fn apply_filter(&mut self, filter: &QueueFilter) {
        self.view = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| filter.matches(g))
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
        debug!(
            "Filter {:?} keeps {} of {} parts",
            filter,
            self.view.len(),
            self.groups.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn part(folder: &str, family: &str, variants: usize) -> PartGroup {
        PartGroup::new(
            PathBuf::from(folder),
            family.to_string(),
            (1..=variants)
                .map(|i| PathBuf::from(format!("/gen/{folder}/{family}{i}.png")))
                .collect(),
        )
    }

    fn text(needle: &str) -> QueueFilter {
        QueueFilter {
            text: needle.to_string(),
            ..QueueFilter::default()
        }
    }

    fn queue() -> ReviewQueue {
        ReviewQueue::new(vec![
            part("Face", "Clothing", 2),
            part("Face", "Hair", 1),
            part("SV", "Tail", 3),
        ])
    }

    #[test]
    fn advancing_past_the_end_finishes() {
        let mut q = queue();
        assert_eq!(q.state(), SessionState::Reviewing);
        assert_eq!(q.current().unwrap().family(), "Clothing");

        assert_eq!(q.advance(), SessionState::Reviewing);
        assert_eq!(q.advance(), SessionState::Reviewing);
        assert_eq!(q.current().unwrap().family(), "Tail");
        assert_eq!(q.advance(), SessionState::Finished);
        assert!(q.current().is_none());

        assert_eq!(q.advance(), SessionState::Finished);
        assert_eq!(q.position(), 3);
    }

    #[test]
    fn retreat_from_finished_returns_to_last() {
        let mut q = queue();
        for _ in 0..5 {
            q.advance();
        }
        assert_eq!(q.retreat(), SessionState::Reviewing);
        assert_eq!(q.current().unwrap().family(), "Tail");

        q.retreat();
        q.retreat();
        assert_eq!(q.position(), 0);
        q.retreat();
        assert_eq!(q.position(), 0);
    }

    #[test]
    fn empty_queue_is_finished() {
        let mut q = ReviewQueue::new(Vec::new());
        assert_eq!(q.state(), SessionState::Finished);
        assert_eq!(q.advance(), SessionState::Finished);
        assert_eq!(q.retreat(), SessionState::Finished);
    }

    #[test]
    fn filter_restricts_view_and_rewinds() {
        let mut q = queue();
        q.advance();
        q.apply_filter(&text("sv"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.total_parts(), 3);
        assert_eq!(q.position(), 0);
        assert_eq!(q.current().unwrap().family(), "Tail");

        q.apply_filter(&text("nothing matches"));
        assert!(q.is_empty());
        assert_eq!(q.state(), SessionState::Finished);

        q.apply_filter(&QueueFilter::default());
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn dispositions_survive_filtering() {
        let mut q = queue();
        q.advance();
        q.set_current_disposition(Disposition::Moved);
        q.apply_filter(&text("hair"));
        assert_eq!(q.current_disposition(), Some(Disposition::Moved));
        assert_eq!(q.count(Disposition::Moved), 1);
        assert_eq!(q.count(Disposition::Pending), 2);
    }

    #[test]
    fn selection_is_kept_per_part() {
        let mut q = queue();
        q.current_mut().unwrap().select(1).unwrap();
        q.advance();
        q.retreat();
        assert_eq!(q.current().unwrap().selected_index(), 1);
    }

    #[test]
    fn orphan_mask_filter_keeps_mask_only_parts() {
        let orphan = PartGroup::new(
            PathBuf::from("SV"),
            "SV_Tail_p02".to_string(),
            vec![PathBuf::from("/gen/SV/SV_Tail_p02_c.png")],
        )
        .with_mask_count(1);
        let mut q = ReviewQueue::new(vec![part("SV", "Clothing", 2), orphan]);

        q.apply_filter(&QueueFilter {
            orphan_masks_only: true,
            ..QueueFilter::default()
        });
        assert_eq!(q.len(), 1);
        assert_eq!(q.current().unwrap().family(), "SV_Tail_p02");

        q.apply_filter(&QueueFilter {
            text: "clothing".to_string(),
            orphan_masks_only: true,
        });
        assert!(q.is_empty());
    }

    #[test]
    fn carry_over_restores_marks_and_selection() {
        let mut old = queue();
        old.set_current_disposition(Disposition::Accepted);
        old.advance();
        old.advance();
        old.current_mut().unwrap().select(2).unwrap();
        old.set_current_disposition(Disposition::Copied);

        let mut fresh = queue();
        fresh.carry_over(old);
        assert_eq!(fresh.count(Disposition::Accepted), 1);
        assert_eq!(fresh.count(Disposition::Copied), 1);
        assert_eq!(fresh.current_disposition(), Some(Disposition::Accepted));
        fresh.advance();
        fresh.advance();
        assert_eq!(fresh.current().unwrap().selected_index(), 2);
    }

    #[test]
    fn vanished_parts_still_count() {
        let mut old = queue();
        old.set_current_disposition(Disposition::Moved);

        let mut fresh = ReviewQueue::new(vec![part("Face", "Hair", 1), part("SV", "Tail", 3)]);
        fresh.carry_over(old);
        assert_eq!(fresh.count(Disposition::Moved), 1);
        assert_eq!(fresh.count(Disposition::Pending), 2);
    }

    #[test]
    fn seek_finds_part_or_finishes() {
        let mut q = queue();
        assert!(q.seek(|g| g.family() == "Tail"));
        assert_eq!(q.position(), 2);

        assert!(!q.seek(|g| g.family() == "Wings"));
        assert_eq!(q.state(), SessionState::Finished);
    }
}
