// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Voyager Core
//!
//! Core library for Issue Voyager - move GitHub issues to another repository
//! or into a Jira-importable CSV file.
//!
//! The pipeline has three stages, run one issue at a time:
//! - [`selector`] resolves which source issues take part
//! - [`transform`] applies user and label mappings and formats text
//! - [`sink`] recreates the issue remotely or buffers a CSV row
//!
//! [`orchestrator::Migration`] drives the stages; [`run_migration`] wires a
//! loaded configuration to GitHub.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voyager_core::{RunOptions, load_config, run_migration};
//! use anyhow::Result;
//!
//! # async fn example() -> Result<()> {
//! let config = load_config(None)?;
//! let summary = run_migration(&config, RunOptions::default(), |outcome| {
//!     println!("{outcome:?}");
//! })
//! .await?;
//! println!("Migrated {} of {}", summary.succeeded, summary.attempted);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Error Handling
// ============================================================================

pub use error::VoyagerError;

/// Convenience Result type for Voyager operations.
///
/// This is equivalent to `std::result::Result<T, VoyagerError>`.
pub type Result<T> = std::result::Result<T, VoyagerError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    MappingsConfig, MigrationConfig, MigrationKind, MigrationOptions, RepoConfig,
    SelectionMethod, load_config, parse_config, resolve_config_path,
};

// ============================================================================
// Pipeline
// ============================================================================

pub use mapping::{LabelMapping, MappingTable, MentionStyle, UserMapping};
pub use model::{DestinationIssue, NewIssue, RepoRef, SourceComment, SourceIssue};
pub use orchestrator::{Migration, PostActions};
pub use outcome::{MigrationOutcome, MigrationSummary};
pub use selector::{IssueSelector, Selected, SelectionCriteria};
pub use sink::{ExportSink, PreviewSink, RecreateSink, RunContext, Sink, SinkReceipt};
pub use transform::{TransformMode, TransformedIssue, Transformer};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::GitHubTracker;
pub use github::auth::TokenSource;
pub use tracker::{IssueFilter, IssuePage, IssueTracker};

// ============================================================================
// Retry Logic
// ============================================================================

pub use retry::{is_retryable_http, is_retryable_octocrab, retry_backoff};

// ============================================================================
// Platform-Agnostic Facade
// ============================================================================

pub use facade::{RunOptions, run_migration};

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod facade;
pub mod github;
pub mod mapping;
pub mod model;
pub mod orchestrator;
pub mod outcome;
pub mod retry;
pub mod selector;
pub mod sink;
pub mod tracker;
pub mod transform;
pub mod utils;

#[cfg(test)]
mod testing;
