// SPDX-License-Identifier: Apache-2.0

//! Output strategies for transformed issues.
//!
//! The orchestrator drives every strategy through [`Sink`] and never needs to
//! know which one is active:
//! - [`RecreateSink`] creates issues and comments in a destination repository.
//! - [`ExportSink`] buffers CSV rows and writes one file on flush.
//! - [`PreviewSink`] records what would happen, for dry runs.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;
use crate::model::DestinationIssue;
use crate::transform::TransformedIssue;

mod export;
mod preview;
mod recreate;

pub use export::{EXPORT_HEADER, ExportRow, ExportSink};
pub use preview::PreviewSink;
pub use recreate::RecreateSink;

/// Run-wide values computed once from the full selection before any issue is visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Number of selection slots, including missing placeholders.
    pub total: usize,
    /// Largest comment count reported across the selection.
    pub max_comment_count: usize,
}

/// What a sink produced for one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkReceipt {
    /// Issue created in the destination, when the sink writes live.
    pub destination: Option<DestinationIssue>,
}

/// Destination for transformed issues.
#[async_trait]
pub trait Sink: Send {
    /// Short name for logs (e.g., "github", "jira").
    fn name(&self) -> &'static str;

    /// Receives run-wide values before the first [`Sink::create`].
    fn begin(&mut self, _ctx: &RunContext) {}

    /// Writes or buffers one issue.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VoyagerError::Sink`] when this issue could not be written.
    async fn create(&mut self, issue: &TransformedIssue) -> Result<SinkReceipt>;

    /// Completes the run. Returns the written file, if the sink produces one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VoyagerError::Io`] when buffered output cannot be written.
    async fn flush(&mut self) -> Result<Option<PathBuf>>;
}
