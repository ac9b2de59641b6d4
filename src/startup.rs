//! Command line handling and the initial folder scan.

use crate::state::AppState;
use clap::Parser;
use std::path::PathBuf;

/// Review and sort RPG Maker MZ generator part sprites.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Generator root folder to scan on startup.
    pub folder: Option<PathBuf>,
}

/// Scans the folder given on the command line, if any.
pub fn configure_startup_opening(app: &crate::AppWindow, app_state: &AppState, args: Args) {
    if let Some(folder) = args.folder {
        log::info!("Opening startup folder {}", folder.display());
        crate::ui::open_folder(app, app_state, folder);
    } else {
        crate::ui::image_display::refresh_view(app, app_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_argument_is_optional() {
        let args = Args::try_parse_from(["mz-part-sorter"]).unwrap();
        assert!(args.folder.is_none());

        let args = Args::try_parse_from(["mz-part-sorter", "/gen"]).unwrap();
        assert_eq!(args.folder, Some(PathBuf::from("/gen")));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["mz-part-sorter", "--batch"]).is_err());
    }
}
