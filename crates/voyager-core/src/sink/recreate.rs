// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{Sink, SinkReceipt};
use crate::Result;
use crate::error::VoyagerError;
use crate::model::{NewIssue, RepoRef};
use crate::tracker::IssueTracker;
use crate::transform::TransformedIssue;

/// Recreates issues and their comments in a destination repository.
///
/// Comments are created one at a time, in source order, since GitHub orders
/// comments by arrival. A failed comment stops the remaining ones so the
/// destination never shows comments out of order; the issue already created
/// is left in place.
pub struct RecreateSink<'a> {
    tracker: &'a dyn IssueTracker,
    destination: RepoRef,
}

impl<'a> RecreateSink<'a> {
    /// Creates a sink writing to `destination` through `tracker`.
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker, destination: RepoRef) -> Self {
        Self {
            tracker,
            destination,
        }
    }
}

#[async_trait]
impl Sink for RecreateSink<'_> {
    fn name(&self) -> &'static str {
        "github"
    }

    #[instrument(skip(self, issue), fields(destination = %self.destination, source_number = issue.source_number))]
    async fn create(&mut self, issue: &TransformedIssue) -> Result<SinkReceipt> {
        let new_issue = NewIssue {
            title: issue.title.clone(),
            body: issue.full_body(),
            labels: issue.labels.clone(),
            assignees: if issue.assignee.is_empty() {
                Vec::new()
            } else {
                vec![issue.assignee.clone()]
            },
        };

        let created = self
            .tracker
            .create_issue(&self.destination, &new_issue)
            .await
            .map_err(|e| VoyagerError::sink(issue.source_number, e))?;

        let total = issue.comments.len();
        for (idx, body) in issue.comments.iter().enumerate() {
            self.tracker
                .create_comment(&self.destination, created.number, body)
                .await
                .map_err(|e| {
                    VoyagerError::sink(
                        issue.source_number,
                        format!(
                            "created {}#{} but comment {}/{total} failed: {e}",
                            self.destination,
                            created.number,
                            idx + 1
                        ),
                    )
                })?;
        }

        debug!(number = created.number, comments = total, "Issue recreated");
        Ok(SinkReceipt {
            destination: Some(created),
        })
    }

    async fn flush(&mut self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FIRST_CREATED_NUMBER, MockTracker};

    fn transformed(number: u64, comments: &[&str]) -> TransformedIssue {
        TransformedIssue {
            source_number: number,
            title: format!("Issue {number}"),
            labels: vec!["bug".to_string()],
            assignee: String::new(),
            reporter: "bob".to_string(),
            issue_type: String::new(),
            priority: String::new(),
            provenance: Some("_note_".to_string()),
            body: "body".to_string(),
            comments: comments.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_creates_issue_then_comments_in_order() {
        let tracker = MockTracker::new();
        let mut sink = RecreateSink::new(&tracker, RepoRef::new("octocat", "new-repo"));

        let receipt = sink
            .create(&transformed(1, &["first", "second", "third"]))
            .await
            .unwrap();

        let created = receipt.destination.unwrap();
        assert_eq!(created.number, FIRST_CREATED_NUMBER);

        let issues = tracker.created_issues();
        assert_eq!(issues[0].body, "_note_\n\nbody");
        assert_eq!(issues[0].labels, vec!["bug".to_string()]);
        assert!(issues[0].assignees.is_empty());

        let comments = tracker.created_comments();
        let bodies: Vec<&str> = comments.iter().map(|(_, b)| b.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
        assert!(comments.iter().all(|(n, _)| *n == FIRST_CREATED_NUMBER));
    }

    #[tokio::test]
    async fn test_assignee_is_passed_when_mapped() {
        let tracker = MockTracker::new();
        let mut sink = RecreateSink::new(&tracker, RepoRef::new("octocat", "new-repo"));
        let mut issue = transformed(1, &[]);
        issue.assignee = "bob".to_string();

        sink.create(&issue).await.unwrap();

        assert_eq!(tracker.created_issues()[0].assignees, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn test_create_failure_is_sink_error() {
        let tracker = MockTracker::new().failing_create("Issue 7");
        let mut sink = RecreateSink::new(&tracker, RepoRef::new("octocat", "new-repo"));

        let err = sink.create(&transformed(7, &["c"])).await.unwrap_err();

        assert!(matches!(err, VoyagerError::Sink { issue_number: 7, .. }));
        assert!(tracker.created_comments().is_empty());
    }

    #[tokio::test]
    async fn test_comment_failure_stops_remaining_comments() {
        let tracker = MockTracker::new().failing_comment("second");
        let mut sink = RecreateSink::new(&tracker, RepoRef::new("octocat", "new-repo"));

        let err = sink
            .create(&transformed(1, &["first", "second", "third"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("comment 2/3"));
        assert_eq!(tracker.created_issues().len(), 1);
        assert_eq!(tracker.created_comments().len(), 1);
    }
}
