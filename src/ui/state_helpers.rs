//! Helper functions to set multiple ViewState properties in a grouped manner.
//!
//! Instead of calling individual setters like set_part_title, set_variant_names, etc.,
//! these functions group related properties together.

use log::error;
use slint::ComponentHandle;

/// Sets all navigation-related properties at once.
///
/// Groups: current-index (one-based for display), total-index, finished
pub fn set_navigation_info(ui: &crate::AppWindow, position: usize, total: usize, finished: bool) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_current_index(i32::try_from(position + 1).unwrap_or(i32::MAX));
    view_state.set_total_index(i32::try_from(total).unwrap_or(i32::MAX));
    view_state.set_finished(finished);
}

/// Sets all part-related properties at once.
///
/// Groups: part-title, part-status, variant-names, selected-variant, selected-variant-name
pub fn set_part_info(
    ui: &crate::AppWindow,
    title: &str,
    status: &str,
    variant_names: Vec<String>,
    selected: usize,
) {
    let view_state = ui.global::<crate::ViewState>();
    let selected_name = variant_names.get(selected).cloned().unwrap_or_default();
    let names: Vec<slint::SharedString> = variant_names.into_iter().map(Into::into).collect();

    view_state.set_part_title(title.into());
    view_state.set_part_status(status.into());
    view_state.set_variant_names(slint::ModelRc::new(slint::VecModel::from(names)));
    view_state.set_selected_variant(i32::try_from(selected).unwrap_or(0));
    view_state.set_selected_variant_name(selected_name.into());
}

/// Clears all part-related properties.
pub fn clear_part_info(ui: &crate::AppWindow, title: &str) {
    set_part_info(ui, title, "", Vec::new(), 0);
    set_part_notice(ui, "");
    set_preview_placeholder(ui, "");
}

/// Warning line shown under the part title; empty hides it.
pub fn set_part_notice(ui: &crate::AppWindow, notice: &str) {
    ui.global::<crate::ViewState>().set_part_notice(notice.into());
}

/// Shows a placeholder text instead of a preview image.
pub fn set_preview_placeholder(ui: &crate::AppWindow, text: &str) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_preview_loaded(false);
    view_state.set_preview_placeholder(text.into());
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the ViewState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}

pub fn clear_error(ui: &crate::AppWindow) {
    ui.global::<crate::ViewState>().set_error_message("".into());
}

pub fn set_status(ui: &crate::AppWindow, message: &str) {
    ui.global::<crate::ViewState>()
        .set_status_message(message.into());
}
