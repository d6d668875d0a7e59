// SPDX-License-Identifier: Apache-2.0

//! Remote issue-tracker abstraction.
//!
//! The pipeline talks to GitHub only through [`IssueTracker`], so selection,
//! sinks, and the orchestrator can be exercised against an in-memory tracker.
//! Every method is one independent round-trip; the core never retries.

use async_trait::async_trait;

use crate::Result;
use crate::model::{DestinationIssue, NewIssue, RepoRef, SourceComment, SourceIssue};

/// Page size used for every paginated listing.
pub const PER_PAGE: u8 = 100;

/// Server-side filter for open issue listings.
#[derive(Debug, Clone, Copy)]
pub enum IssueFilter<'a> {
    /// Every open issue.
    Open,
    /// Open issues carrying all of the given labels.
    Labels(&'a [String]),
}

/// One page of an issue listing.
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    /// Issues (and pull requests) on this page, oldest first.
    pub items: Vec<SourceIssue>,
    /// Whether another page can be fetched.
    pub has_next: bool,
}

/// Operations the migration needs from a GitHub-compatible tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Confirms the repository exists and is reachable.
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<()>;

    /// Fetches one page (1-based) of open issues in ascending creation order.
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        filter: IssueFilter<'_>,
        page: u32,
    ) -> Result<IssuePage>;

    /// Fetches a single issue. Returns `Ok(None)` when it does not exist.
    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> Result<Option<SourceIssue>>;

    /// Fetches every comment on an issue in chronological order.
    async fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<SourceComment>>;

    /// Creates an issue.
    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<DestinationIssue>;

    /// Adds a comment to an issue.
    async fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()>;

    /// Transitions an issue to closed.
    async fn close_issue(&self, repo: &RepoRef, number: u64) -> Result<()>;
}
