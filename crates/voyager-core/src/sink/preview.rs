// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::{Sink, SinkReceipt};
use crate::Result;
use crate::transform::TransformedIssue;

/// Dry-run sink. Keeps every transformed issue and writes nothing.
#[derive(Debug, Default)]
pub struct PreviewSink {
    issues: Vec<TransformedIssue>,
}

impl PreviewSink {
    /// Creates an empty preview.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues that would have been written.
    #[must_use]
    pub fn issues(&self) -> &[TransformedIssue] {
        &self.issues
    }
}

#[async_trait]
impl Sink for PreviewSink {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn create(&mut self, issue: &TransformedIssue) -> Result<SinkReceipt> {
        info!(
            number = issue.source_number,
            title = %issue.title,
            comments = issue.comments.len(),
            "Would migrate issue"
        );
        self.issues.push(issue.clone());
        Ok(SinkReceipt::default())
    }

    async fn flush(&mut self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
