// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{RunContext, Sink, SinkReceipt};
use crate::Result;
use crate::error::VoyagerError;
use crate::transform::TransformedIssue;

/// Fixed leading columns of a Jira import file.
pub const EXPORT_HEADER: &str = "Summary,Assignee,Reporter,Issue Type,Priority,Description";

const LINE_END: &str = "\r\n";

/// One buffered CSV row.
///
/// Text fields are already escaped by the transform stage, so quoting them
/// is enough to keep the row well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    summary: String,
    assignee: String,
    reporter: String,
    issue_type: String,
    priority: String,
    description: String,
    comments: Vec<String>,
}

impl ExportRow {
    fn from_issue(issue: &TransformedIssue) -> Self {
        Self {
            summary: issue.title.clone(),
            assignee: issue.assignee.clone(),
            reporter: issue.reporter.clone(),
            issue_type: issue.issue_type.clone(),
            priority: issue.priority.clone(),
            description: issue.body.clone(),
            comments: issue.comments.clone(),
        }
    }

    /// Renders the row padded with empty cells up to `width` comment columns.
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        let mut line = format!(
            "\"{}\",{},{},{},{},\"{}\"",
            self.summary,
            self.assignee,
            self.reporter,
            self.issue_type,
            self.priority,
            self.description
        );
        for comment in &self.comments {
            line.push_str(",\"");
            line.push_str(comment);
            line.push('"');
        }
        for _ in self.comments.len()..width {
            line.push(',');
        }
        line
    }
}

/// Header line with `width` trailing `Comment` columns.
fn header(width: usize) -> String {
    let mut line = EXPORT_HEADER.to_string();
    for _ in 0..width {
        line.push_str(",Comment");
    }
    line
}

/// Buffers rows and writes one Jira-importable CSV file on flush.
///
/// The comment column count is fixed from the selection before any row is
/// added. If an issue gained comments after selection, the file is widened at
/// flush so every row keeps the same column count.
#[derive(Debug)]
pub struct ExportSink {
    path: PathBuf,
    width: usize,
    rows: Vec<ExportRow>,
}

impl ExportSink {
    /// Creates a sink writing `{folder}/{source_name}.csv`.
    pub fn new(folder: impl AsRef<Path>, source_name: &str) -> Self {
        Self {
            path: folder.as_ref().join(format!("{source_name}.csv")),
            width: 0,
            rows: Vec::new(),
        }
    }

    /// Target file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows buffered so far.
    #[must_use]
    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    /// Full file contents for the buffered rows.
    #[must_use]
    pub fn render(&self) -> String {
        let widest = self.rows.iter().map(|r| r.comments.len()).max().unwrap_or(0);
        let width = if widest > self.width {
            warn!(
                expected = self.width,
                actual = widest,
                "Comment count changed since selection; widening export"
            );
            widest
        } else {
            self.width
        };

        let mut out = header(width);
        out.push_str(LINE_END);
        for row in &self.rows {
            out.push_str(&row.render(width));
            out.push_str(LINE_END);
        }
        out
    }
}

#[async_trait]
impl Sink for ExportSink {
    fn name(&self) -> &'static str {
        "jira"
    }

    fn begin(&mut self, ctx: &RunContext) {
        self.width = ctx.max_comment_count;
        self.rows.reserve(ctx.total);
    }

    async fn create(&mut self, issue: &TransformedIssue) -> Result<SinkReceipt> {
        self.rows.push(ExportRow::from_issue(issue));
        debug!(number = issue.source_number, rows = self.rows.len(), "Row buffered");
        Ok(SinkReceipt::default())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn flush(&mut self) -> Result<Option<PathBuf>> {
        if self.rows.is_empty() {
            info!("No rows to export");
            return Ok(None);
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| VoyagerError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&self.path, self.render())
            .await
            .map_err(|source| VoyagerError::Io {
                path: self.path.clone(),
                source,
            })?;

        info!(rows = self.rows.len(), "Export written");
        Ok(Some(self.path.clone()))
    }
}
