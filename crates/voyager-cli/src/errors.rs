// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `VoyagerError` and appends a tip for the
//! errors a user can fix. The library keeps structured data; this module
//! owns presentation.

use anyhow::Error;
use voyager_core::VoyagerError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error chain holds no `VoyagerError`, returns the full chain.
pub fn format_error(error: &Error) -> String {
    let Some(err) = error.chain().find_map(|e| e.downcast_ref::<VoyagerError>()) else {
        return format!("{error:#}");
    };

    match err {
        VoyagerError::Config { .. } => format!(
            "{err}\n\nTip: Pass a migration file with --config, or create voyager.toml in the current directory."
        ),
        VoyagerError::Selection { repo, .. } => format!(
            "{err}\n\nTip: Check that {repo} exists and that your token can read its issues."
        ),
        VoyagerError::NotAuthenticated { .. } => {
            format!("{err}\n\nTip: Run `gh auth login`, or export GH_TOKEN.")
        }
        VoyagerError::GitHub { .. } => {
            format!("{err}\n\nTip: Check your network connection and token scopes.")
        }
        VoyagerError::Io { path, .. } => format!(
            "{err}\n\nTip: Check that {} is writable, or change options.export_path.",
            path.display()
        ),
        VoyagerError::NoIssuesFound
        | VoyagerError::FetchNotFound { .. }
        | VoyagerError::Sink { .. } => err.to_string(),
    }
}
