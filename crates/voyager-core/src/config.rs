// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Issue Voyager.
//!
//! Provides layered configuration from a migration file and environment variables.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `VOYAGER_`)
//! 2. Config file given with `--config`, or `voyager.toml` / `config.json`
//!    in the working directory
//!
//! Keys are snake_case. The camelCase names used by existing `config.json`
//! files (`sourceRepository.repoOwner`, `options.issueNumbers`, ...) are
//! accepted as aliases.
//!
//! # Examples
//!
//! ```bash
//! # Supply the source token without writing it into the file
//! VOYAGER_SOURCE__ACCESS_TOKEN=ghp_xxx voyager --config migrate.toml
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::VoyagerError;
use crate::mapping::{LabelMapping, UserMapping};
use crate::model::RepoRef;
use crate::selector::SelectionCriteria;

/// Config files looked up in the working directory when `--config` is omitted.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["voyager.toml", "config.json"];

/// Default folder for Jira CSV exports.
pub const DEFAULT_EXPORT_PATH: &str = "export";

/// Where migrated issues go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MigrationKind {
    /// Recreate issues in another GitHub repository.
    #[serde(rename = "github")]
    GitHub,
    /// Export issues to a CSV file importable into Jira.
    #[serde(rename = "jira")]
    Jira,
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationKind::GitHub => write!(f, "github"),
            MigrationKind::Jira => write!(f, "jira"),
        }
    }
}

/// How source issues are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Every open issue.
    #[default]
    All,
    /// Open issues carrying the configured labels.
    Label,
    /// An explicit list of issue numbers.
    #[serde(alias = "issueNumber")]
    IssueNumber,
}

/// A repository plus the credential used to reach it.
#[derive(Clone, Deserialize)]
pub struct RepoConfig {
    /// Repository owner (user or organization).
    #[serde(alias = "repoOwner")]
    pub owner: String,
    /// Repository name.
    #[serde(alias = "repoName")]
    pub name: String,
    /// Personal access token. Falls back to `GH_TOKEN`/`GITHUB_TOKEN`/`gh` when absent.
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
}

impl fmt::Debug for RepoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoConfig")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl RepoConfig {
    /// Returns the repository identity without credentials.
    #[must_use]
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.owner, &self.name)
    }

    /// Returns the configured token, if any and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_string()))
    }
}

/// Run options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationOptions {
    /// Selection method.
    pub method: SelectionMethod,
    /// Labels used by the `label` method.
    pub labels: Vec<String>,
    /// Issue numbers used by the `issue_number` method, in migration order.
    #[serde(alias = "issueNumbers")]
    pub issue_numbers: Vec<u64>,
    /// Keep source usernames instead of mapping them.
    #[serde(alias = "stickyUsers")]
    pub sticky_users: bool,
    /// Close each source issue once it has been migrated.
    #[serde(alias = "closeIssueWhenComplete")]
    pub close_issue_when_complete: bool,
    /// Post a back-reference comment on each source issue (github mode).
    #[serde(alias = "addSourceComment")]
    pub add_source_comment: bool,
    /// Folder that receives the CSV file (jira mode).
    #[serde(alias = "exportPath")]
    pub export_path: PathBuf,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            method: SelectionMethod::All,
            labels: Vec::new(),
            issue_numbers: Vec::new(),
            sticky_users: true,
            close_issue_when_complete: false,
            add_source_comment: true,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

/// User, type, and priority mapping lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MappingsConfig {
    /// Source login to destination login/display name.
    pub users: Vec<UserMapping>,
    /// Source label to Jira issue type.
    pub types: Vec<LabelMapping>,
    /// Source label to Jira priority.
    pub priorities: Vec<LabelMapping>,
}

/// A complete migration definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationConfig {
    /// Migration strategy.
    #[serde(alias = "migrationType")]
    pub migration_type: MigrationKind,
    /// Repository issues are read from.
    #[serde(alias = "sourceRepository")]
    pub source: RepoConfig,
    /// Repository issues are recreated in (github mode only).
    #[serde(default, alias = "destinationRepository")]
    pub destination: Option<RepoConfig>,
    /// Run options.
    #[serde(default)]
    pub options: MigrationOptions,
    /// Mapping lists.
    #[serde(default)]
    pub mappings: MappingsConfig,
}

impl MigrationConfig {
    /// Checks required fields that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), VoyagerError> {
        check_repo("source", &self.source)?;

        if self.migration_type == MigrationKind::GitHub {
            let destination = self.destination.as_ref().ok_or_else(|| VoyagerError::Config {
                message: "destination repository is required when migration_type = \"github\""
                    .to_string(),
            })?;
            check_repo("destination", destination)?;
        }

        if self.options.method == SelectionMethod::IssueNumber {
            if self.options.issue_numbers.is_empty() {
                return Err(VoyagerError::Config {
                    message: "options.issue_numbers must not be empty when method = \"issue_number\""
                        .to_string(),
                });
            }
            if self.options.issue_numbers.contains(&0) {
                return Err(VoyagerError::Config {
                    message: "options.issue_numbers must be positive".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Resolves the configured method into concrete selection criteria.
    ///
    /// A `label` method without labels selects every open issue.
    #[must_use]
    pub fn selection_criteria(&self) -> SelectionCriteria {
        match self.options.method {
            SelectionMethod::All => SelectionCriteria::AllOpen,
            SelectionMethod::Label if self.options.labels.is_empty() => {
                warn!("method = \"label\" without labels; selecting all open issues");
                SelectionCriteria::AllOpen
            }
            SelectionMethod::Label => SelectionCriteria::ByLabel(self.options.labels.clone()),
            SelectionMethod::IssueNumber => {
                SelectionCriteria::ByNumber(self.options.issue_numbers.clone())
            }
        }
    }
}

fn check_repo(role: &str, repo: &RepoConfig) -> Result<(), VoyagerError> {
    if repo.owner.trim().is_empty() || repo.name.trim().is_empty() {
        return Err(VoyagerError::Config {
            message: format!("{role}.owner and {role}.name are required"),
        });
    }
    Ok(())
}

/// Picks the config file: the explicit path, or the first default present.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, VoyagerError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(VoyagerError::Config {
                message: format!(
                    "Unable to locate the specified configuration file: {}",
                    path.display()
                ),
            });
        }
        return Ok(path.to_path_buf());
    }

    for candidate in DEFAULT_CONFIG_FILES {
        let path = PathBuf::from(candidate);
        if path.is_file() {
            info!(path = %path.display(), "Using default config file from working directory");
            return Ok(path);
        }
    }

    Err(VoyagerError::Config {
        message: format!(
            "Please provide a config file using --config (looked for {})",
            DEFAULT_CONFIG_FILES.join(", ")
        ),
    })
}

/// Load and validate a migration config.
///
/// Environment variables use the prefix `VOYAGER_` and double underscore
/// for nested keys (e.g., `VOYAGER_DESTINATION__ACCESS_TOKEN`).
///
/// # Errors
///
/// Returns `VoyagerError::Config` if the file is missing, invalid, or incomplete.
pub fn load_config(explicit: Option<&Path>) -> Result<MigrationConfig, VoyagerError> {
    let path = resolve_config_path(explicit)?;
    debug!(path = %path.display(), "Loading migration config");

    let config = Config::builder()
        .add_source(File::from(path.as_path()))
        .add_source(
            Environment::with_prefix("VOYAGER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let migration: MigrationConfig = config.try_deserialize()?;
    migration.validate()?;

    Ok(migration)
}

/// Parse and validate a migration config from a string.
pub fn parse_config(contents: &str, format: FileFormat) -> Result<MigrationConfig, VoyagerError> {
    let config = Config::builder()
        .add_source(File::from_str(contents, format))
        .build()?;

    let migration: MigrationConfig = config.try_deserialize()?;
    migration.validate()?;

    Ok(migration)
}
