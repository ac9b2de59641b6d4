//! UI module for handling user interactions and UI updates.
//!
//! Threading model: everything runs on the Slint event loop thread.
//! - `slint::spawn_local`: the folder dialog, which must be awaited on the main thread
//! - scanning, decoding and file transfers run inline in the callbacks

pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use handlers::{open_folder, setup_handlers};
