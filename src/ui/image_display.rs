//! Preview rendering.
//!
//! Everything here runs on the event loop thread: the session is read,
//! the selected variant is decoded (or fetched from the cache) and the
//! ViewState globals are updated in one pass.

use crate::file_utils::PathExt;
use crate::image_loader;
use crate::state::{AppState, Disposition, SessionState};
use crate::ui::state_helpers::{
    clear_part_info, set_error_with_prefix, set_navigation_info, set_part_info,
    set_part_notice, set_preview_placeholder,
};
use slint::ComponentHandle;
use std::path::Path;

fn disposition_label(disposition: Disposition) -> &'static str {
    match disposition {
        Disposition::Pending => "",
        Disposition::Accepted => "reviewed: OK",
        Disposition::Copied => "reviewed: copied to Sort",
        Disposition::Moved => "reviewed: moved to Sort",
    }
}

/// Redraws everything that depends on the session.
pub fn refresh_view(ui: &crate::AppWindow, state: &AppState) {
    let session = state.session.borrow();
    let Some(session) = session.as_ref() else {
        set_navigation_info(ui, 0, 0, true);
        clear_part_info(ui, "");
        set_preview_placeholder(ui, "No folder open");
        return;
    };

    let queue = session.queue();
    let finished = session.state() == SessionState::Finished;
    set_navigation_info(ui, queue.position(), queue.len(), finished);

    let Some(part) = session.current() else {
        let title = if queue.is_empty() {
            "No matching parts found"
        } else {
            "All parts reviewed"
        };
        clear_part_info(ui, title);
        set_preview_placeholder(
            ui,
            &format!(
                "{} OK, {} copied, {} moved",
                queue.count(Disposition::Accepted),
                queue.count(Disposition::Copied),
                queue.count(Disposition::Moved)
            ),
        );
        return;
    };

    let disposition = queue.current_disposition().unwrap_or_default();
    let mut status = format!("{} option(s) · {}", part.variants().len(), part.mask_status());
    if part.is_mask(part.selected_index()) {
        status.push_str(" · showing mask");
    }
    let label = disposition_label(disposition);
    if !label.is_empty() {
        status.push_str(" · ");
        status.push_str(label);
    }

    set_part_info(
        ui,
        &part.title(),
        &status,
        part.variant_names(),
        part.selected_index(),
    );
    if part.is_orphan_mask() {
        set_part_notice(
            ui,
            "Mask-only entry: no main sheet was found for these mask sheets.",
        );
    } else {
        set_part_notice(ui, "");
    }

    match part.selected_path() {
        Some(path) if disposition == Disposition::Moved && !path.exists() => {
            set_preview_placeholder(ui, "Moved to Sort")
        }
        Some(path) => show_preview(ui, state, path, session.settings().preview_size),
        None => set_preview_placeholder(ui, "Missing"),
    }
}

/// Displays the preview for `path`, decoding it on a cache miss.
///
/// A file that cannot be decoded shows a placeholder and an error line.
fn show_preview(ui: &crate::AppWindow, state: &AppState, path: &Path, max_edge: u32) {
    let cached = state.image_cache.borrow_mut().get(path);
    let preview = match cached {
        Some(preview) => preview,
        None => match image_loader::load_preview(path, max_edge) {
            Ok(preview) => {
                state
                    .image_cache
                    .borrow_mut()
                    .put(path.to_path_buf(), preview.clone());
                preview
            }
            Err(e) => {
                set_preview_placeholder(ui, "Failed to load");
                set_error_with_prefix(
                    ui,
                    &format!("Preview of {}", path.format_for_log()),
                    e.to_string(),
                );
                return;
            }
        },
    };

    let view_state = ui.global::<crate::ViewState>();
    view_state.set_preview_image(image_loader::create_slint_image(&preview));
    view_state.set_preview_loaded(true);
}

/// Opens the full-size viewer for the selected variant.
pub fn open_viewer(ui: &crate::AppWindow, state: &AppState) {
    let path = {
        let session = state.session.borrow();
        session
            .as_ref()
            .and_then(|s| s.current())
            .and_then(|p| p.selected_path())
            .map(Path::to_path_buf)
    };
    let Some(path) = path else {
        return;
    };

    match image_loader::load_full(&path) {
        Ok(full) => {
            let view_state = ui.global::<crate::ViewState>();
            view_state.set_viewer_image(image_loader::create_slint_image(&full));
            view_state.set_viewer_title(
                format!("{} ({}x{})", path.format_for_log(), full.width, full.height).into(),
            );
            view_state.set_viewer_open(true);
        }
        Err(e) => set_error_with_prefix(ui, "Failed to open viewer", e.to_string()),
    }
}

pub fn close_viewer(ui: &crate::AppWindow) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_viewer_open(false);
    view_state.set_viewer_image(slint::Image::default());
}
