// SPDX-License-Identifier: Apache-2.0

//! Error types for Issue Voyager.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Errors scoped to a single issue (`FetchNotFound`, `Sink`) are caught by the
//! orchestrator and recorded as outcomes; everything else ends the run.
//! Application code should use `anyhow::Result` for top-level error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a migration run.
#[derive(Error, Debug)]
pub enum VoyagerError {
    /// Configuration file is missing, malformed, or fails validation.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// The source repository could not be resolved or its issues listed.
    #[error("Issue selection failed for {repo}: {message}")]
    Selection {
        /// Repository in `owner/name` form.
        repo: String,
        /// Underlying failure.
        message: String,
    },

    /// The selection produced no issues. Not fatal: the run ends with zero work.
    #[error("No issues found")]
    NoIssuesFound,

    /// A single issue requested by number does not exist or is not visible.
    #[error("No issue found matching issue number: {number}")]
    FetchNotFound {
        /// Requested issue number.
        number: u64,
    },

    /// Creating or exporting one issue failed.
    #[error("Failed to migrate issue #{issue_number}: {message}")]
    Sink {
        /// Source issue number.
        issue_number: u64,
        /// Underlying failure.
        message: String,
    },

    /// Export directory or file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path that could not be created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// GitHub API error from octocrab.
    #[error("GitHub API error: {message}")]
    GitHub {
        /// Error message.
        message: String,
    },

    /// No token could be resolved for a repository.
    #[error(
        "Authentication required for {repo} - set access_token in the config file, or set GH_TOKEN/GITHUB_TOKEN"
    )]
    NotAuthenticated {
        /// Repository in `owner/name` form.
        repo: String,
    },
}

impl VoyagerError {
    /// Wraps any error as a [`VoyagerError::Sink`] for the given issue.
    pub fn sink(issue_number: u64, err: impl std::fmt::Display) -> Self {
        VoyagerError::Sink {
            issue_number,
            message: err.to_string(),
        }
    }
}

impl From<octocrab::Error> for VoyagerError {
    fn from(err: octocrab::Error) -> Self {
        VoyagerError::GitHub {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for VoyagerError {
    fn from(err: config::ConfigError) -> Self {
        VoyagerError::Config {
            message: err.to_string(),
        }
    }
}
