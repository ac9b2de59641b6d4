//! State management for the part sorter.
//!
//! Everything runs on the Slint event loop thread, so shared state is
//! `Rc<RefCell<_>>` rather than `Arc<Mutex<_>>`.

use crate::config::PREVIEW_CACHE_CAPACITY;
use crate::image_cache::ImageCache;
use std::cell::RefCell;
use std::rc::Rc;

pub mod navigation;
pub mod session;

pub use navigation::{Disposition, SessionState};
pub use session::ReviewSession;

/// Application-wide state container, cloned into each UI callback.
#[derive(Clone)]
pub struct AppState {
    /// The open folder, if any.
    pub session: Rc<RefCell<Option<ReviewSession>>>,
    /// LRU cache for decoded previews.
    pub image_cache: Rc<RefCell<ImageCache>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            image_cache: Rc::new(RefCell::new(ImageCache::new(PREVIEW_CACHE_CAPACITY))),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
