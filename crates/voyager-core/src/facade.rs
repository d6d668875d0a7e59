// SPDX-License-Identifier: Apache-2.0

//! Entry point that wires a validated configuration to the pipeline.
//!
//! Callers only supply the configuration and run options; credential
//! resolution, client creation, and sink selection happen here.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::config::{MigrationConfig, MigrationKind};
use crate::error::VoyagerError;
use crate::github::GitHubTracker;
use crate::github::auth::create_client;
use crate::mapping::MappingTable;
use crate::orchestrator::{Migration, PostActions};
use crate::outcome::{MigrationOutcome, MigrationSummary};
use crate::sink::{ExportSink, PreviewSink, RecreateSink};
use crate::transform::TransformMode;

/// Per-invocation options that are not part of the migration file.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Select and transform only; write nothing anywhere.
    pub dry_run: bool,
    /// Reference time for relative comment timestamps.
    pub now: DateTime<Utc>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            now: Utc::now(),
        }
    }
}

/// Runs the migration described by `config`.
///
/// `on_outcome` is called after each issue, in migration order.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration fails validation
/// - no token can be resolved for a repository
/// - the source repository cannot be read
/// - the export file cannot be written
#[instrument(skip_all, fields(source = %config.source.repo_ref(), kind = %config.migration_type, dry_run = options.dry_run))]
pub async fn run_migration<F>(
    config: &MigrationConfig,
    options: RunOptions,
    on_outcome: F,
) -> crate::Result<MigrationSummary>
where
    F: FnMut(&MigrationOutcome) + Send,
{
    config.validate()?;

    let source = config.source.repo_ref();
    let source_tracker =
        GitHubTracker::new(create_client(config.source.token(), &source.to_string())?);

    let mappings = MappingTable::new(
        config.mappings.users.clone(),
        config.mappings.types.clone(),
        config.mappings.priorities.clone(),
        config.options.sticky_users,
    );
    let mode = match config.migration_type {
        MigrationKind::GitHub => TransformMode::Recreate {
            source: source.clone(),
        },
        MigrationKind::Jira => TransformMode::Export,
    };
    let post = if options.dry_run {
        PostActions::default()
    } else {
        PostActions {
            add_source_comment: config.options.add_source_comment,
            close_source: config.options.close_issue_when_complete,
        }
    };

    let migration = Migration::new(
        &source_tracker,
        source.clone(),
        config.selection_criteria(),
        mappings,
        mode,
        options.now,
    )
    .with_post_actions(post);

    let mut summary = if options.dry_run {
        info!("Dry run: nothing will be written");
        migration.run(&mut PreviewSink::new(), on_outcome).await?
    } else {
        match config.migration_type {
            MigrationKind::GitHub => {
                let destination = config.destination.as_ref().ok_or_else(|| {
                    VoyagerError::Config {
                        message: "destination repository is required".to_string(),
                    }
                })?;
                let dest_ref = destination.repo_ref();
                let dest_tracker = GitHubTracker::new(create_client(
                    destination.token(),
                    &dest_ref.to_string(),
                )?);
                let mut sink = RecreateSink::new(&dest_tracker, dest_ref);
                migration.run(&mut sink, on_outcome).await?
            }
            MigrationKind::Jira => {
                let mut sink = ExportSink::new(&config.options.export_path, &source.name);
                migration.run(&mut sink, on_outcome).await?
            }
        }
    };

    summary.dry_run = options.dry_run;
    Ok(summary)
}
