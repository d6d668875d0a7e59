// SPDX-License-Identifier: Apache-2.0

//! Converts a source issue and its comments into a destination-ready record.
//!
//! Transformation is pure: it reads the [`MappingTable`] and a fixed reference
//! time, and never touches the network. Only the first assignee is carried
//! forward.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mapping::{MappingTable, MentionStyle};
use crate::model::{RepoRef, SourceComment, SourceIssue};
use crate::utils::{format_jira_timestamp, format_long_date, format_relative_time};

/// Output strategy the transform prepares text for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformMode {
    /// Recreate in another repository; bodies carry provenance prose.
    Recreate {
        /// Repository the issues come from.
        source: RepoRef,
    },
    /// Jira CSV export; text fields are escaped and provenance lives in columns.
    Export,
}

/// A source issue rewritten for its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformedIssue {
    /// Source issue number.
    pub source_number: u64,
    /// Title (escaped in export mode).
    pub title: String,
    /// Label names, carried through verbatim.
    pub labels: Vec<String>,
    /// Mapped first assignee, or empty.
    pub assignee: String,
    /// Mapped author.
    pub reporter: String,
    /// Issue type derived from labels.
    pub issue_type: String,
    /// Priority derived from labels.
    pub priority: String,
    /// Provenance note (recreate mode only).
    pub provenance: Option<String>,
    /// Rewritten body (escaped in export mode).
    pub body: String,
    /// Final comment texts, in source chronological order.
    pub comments: Vec<String>,
}

impl TransformedIssue {
    /// Body to post in the destination: provenance note, blank line, body.
    #[must_use]
    pub fn full_body(&self) -> String {
        match &self.provenance {
            Some(note) => format!("{note}\n\n{}", self.body),
            None => self.body.clone(),
        }
    }
}

/// Escapes a CSV text field for Jira import.
///
/// Double quotes become single quotes, en/em dashes become hyphens, and every
/// line break becomes CRLF. Applying it twice gives the same result.
#[must_use]
pub fn escape_export_field(text: &str) -> String {
    text.replace('"', "'")
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

/// Applies mappings and formatting to source issues.
#[derive(Debug, Clone)]
pub struct Transformer {
    mappings: MappingTable,
    mode: TransformMode,
    now: DateTime<Utc>,
}

impl Transformer {
    /// Creates a transformer. `now` anchors relative timestamps.
    #[must_use]
    pub fn new(mappings: MappingTable, mode: TransformMode, now: DateTime<Utc>) -> Self {
        Self {
            mappings,
            mode,
            now,
        }
    }

    fn mention_style(&self) -> MentionStyle {
        match self.mode {
            TransformMode::Recreate { .. } => MentionStyle::Login,
            TransformMode::Export => MentionStyle::DisplayName,
        }
    }

    /// Transforms one issue and its comments.
    #[must_use]
    pub fn transform(&self, issue: &SourceIssue, comments: &[SourceComment]) -> TransformedIssue {
        let reporter = self.mappings.resolve_user(&issue.author);
        let assignee = issue
            .assignees
            .first()
            .map(|login| self.mappings.resolve_user(login))
            .unwrap_or_default();
        let issue_type = self.mappings.map_type(&issue.labels);
        let priority = self.mappings.map_priority(&issue.labels);

        let style = self.mention_style();
        let body = self.mappings.rewrite_mentions(&issue.body, style);

        match &self.mode {
            TransformMode::Recreate { source } => {
                let provenance = format!(
                    "_Issue migrated from {source}._\n_@{reporter} created the original issue on {}._",
                    format_long_date(&issue.created_at)
                );
                let comments = comments
                    .iter()
                    .map(|c| self.recreate_comment(c))
                    .collect();
                TransformedIssue {
                    source_number: issue.number,
                    title: issue.title.clone(),
                    labels: issue.labels.clone(),
                    assignee,
                    reporter,
                    issue_type,
                    priority,
                    provenance: Some(provenance),
                    body,
                    comments,
                }
            }
            TransformMode::Export => {
                let comments = comments.iter().map(|c| self.export_comment(c)).collect();
                TransformedIssue {
                    source_number: issue.number,
                    title: escape_export_field(&issue.title),
                    labels: issue.labels.clone(),
                    assignee,
                    reporter,
                    issue_type,
                    priority,
                    provenance: None,
                    body: escape_export_field(&body),
                    comments,
                }
            }
        }
    }

    fn recreate_comment(&self, comment: &SourceComment) -> String {
        let author = self.mappings.resolve_user(&comment.author);
        let body = self
            .mappings
            .rewrite_mentions(&comment.body, MentionStyle::Login);
        format!(
            "_@{author} originally added this comment on {}._\n\n{body}",
            format_relative_time(&comment.created_at, &self.now)
        )
    }

    fn export_comment(&self, comment: &SourceComment) -> String {
        let author = self.mappings.resolve_user(&comment.author);
        let body = self
            .mappings
            .rewrite_mentions(&comment.body, MentionStyle::DisplayName);
        escape_export_field(&format!(
            "{}; {author}; {body}",
            format_jira_timestamp(&comment.created_at)
        ))
    }
}
