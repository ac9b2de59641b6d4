//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (browse_folder, next_part, sort_move, etc.).
//! Each handler calls the review service and then redraws the view.

use crate::config::SortScope;
use crate::manifest::SortAction;
use crate::services::ReviewService;
use crate::state::AppState;
use crate::ui::image_display::{close_viewer, open_viewer, refresh_view};
use crate::ui::state_helpers::{clear_error, set_error_with_prefix, set_status};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::PathBuf;

/// Scans `path` and shows its first part.
pub fn open_folder(ui: &crate::AppWindow, state: &AppState, path: PathBuf) {
    let service = ReviewService::new(state.clone());
    ui.global::<crate::ViewState>()
        .set_root_path(path.display().to_string().into());
    close_viewer(ui);

    match service.open_folder(&path) {
        Ok(summary) => {
            clear_error(ui);
            set_status(ui, &summary.message());
            ui.global::<crate::ViewState>()
                .set_selected_only(summary.sort_scope == SortScope::SelectedVariant);
        }
        Err(e) => {
            *state.session.borrow_mut() = None;
            set_status(ui, "");
            set_error_with_prefix(ui, "Cannot open folder", e.to_string());
        }
    }
    refresh_view(ui, state);
}

fn sort_current(ui: &crate::AppWindow, state: &AppState, action: SortAction) {
    let scope = if ui.global::<crate::ViewState>().get_selected_only() {
        SortScope::SelectedVariant
    } else {
        SortScope::AllVariants
    };

    clear_error(ui);
    match ReviewService::new(state.clone()).sort_current(action, scope) {
        Ok(report) if report.is_complete() => set_status(ui, &report.summary()),
        Ok(report) => set_error_with_prefix(ui, "Sort incomplete", report.summary()),
        Err(e) => set_error_with_prefix(ui, "Sort failed", e.to_string()),
    }
    refresh_view(ui, state);
}

/// Runs `f` against a fresh service and redraws, reporting errors with `prefix`.
///
/// The previous error line is cleared first; the redraw may set a new one.
fn with_service<T>(
    ui: &crate::AppWindow,
    state: &AppState,
    prefix: &str,
    f: impl FnOnce(&ReviewService) -> crate::error::Result<T>,
) {
    clear_error(ui);
    let service = ReviewService::new(state.clone());
    if let Err(e) = f(&service) {
        set_error_with_prefix(ui, prefix, e.to_string());
    }
    refresh_view(ui, state);
}

/// Sets up all UI event handlers for the application.
///
/// Takes the UI handle and the shared application state, then registers
/// callbacks for folder selection, navigation, sorting and the viewer.
pub fn setup_handlers(ui: &crate::AppWindow, state: AppState) {
    let logic = ui.global::<crate::Logic>();

    // Folder selection handler
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    logic.on_browse_folder({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let state = state.clone();
            let _ = slint::spawn_local(async move {
                let Some(folder) = AsyncFileDialog::new()
                    .set_title("Select Generator Root Folder")
                    .pick_folder()
                    .await
                else {
                    return;
                };

                if let Some(ui) = ui_handle.upgrade() {
                    open_folder(&ui, &state, folder.path().to_path_buf());
                }
            });
        }
    });

    logic.on_scan_folder({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |path| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let path = path.trim();
            if path.is_empty() {
                set_error_with_prefix(
                    &ui,
                    "Invalid folder",
                    "please pick a generator root folder".to_string(),
                );
                return;
            }

            let path = PathBuf::from(path);
            let same_root = state
                .session
                .borrow()
                .as_ref()
                .is_some_and(|s| s.root() == path.as_path());
            if same_root {
                with_service(&ui, &state, "Rescan failed", |s| s.rescan());
            } else {
                open_folder(&ui, &state, path);
            }
        }
    });

    logic.on_select_variant({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |index| {
            if let Some(ui) = ui_handle.upgrade() {
                with_service(&ui, &state, "Cannot select variant", |s| {
                    s.select_variant(usize::try_from(index).unwrap_or(usize::MAX))
                });
            }
        }
    });

    logic.on_next_part({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                with_service(&ui, &state, "Cannot go to next part", ReviewService::next);
            }
        }
    });

    logic.on_prev_part({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                with_service(&ui, &state, "Cannot go to previous part", ReviewService::previous);
            }
        }
    });

    logic.on_mark_ok({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                with_service(&ui, &state, "Cannot mark part", ReviewService::mark_ok);
            }
        }
    });

    logic.on_sort_copy({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                sort_current(&ui, &state, SortAction::Copy);
            }
        }
    });

    logic.on_sort_move({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                sort_current(&ui, &state, SortAction::Move);
            }
        }
    });

    logic.on_filter_changed({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                let view_state = ui.global::<crate::ViewState>();
                let text = view_state.get_filter_text();
                let orphans = view_state.get_orphan_masks_only();
                with_service(&ui, &state, "Cannot filter", |s| s.apply_filter(&text, orphans));
            }
        }
    });

    logic.on_open_viewer({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                open_viewer(&ui, &state);
            }
        }
    });

    logic.on_close_viewer({
        let ui_handle = ui.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                close_viewer(&ui);
            }
        }
    });
}
