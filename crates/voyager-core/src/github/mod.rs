// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Implements [`IssueTracker`] over octocrab. Reads are retried with
//! exponential backoff on transient failures; writes are sent exactly once.

use async_trait::async_trait;
use backon::Retryable;
use octocrab::Octocrab;
use octocrab::models::IssueState;
use octocrab::models::issues::{Comment, Issue};
use octocrab::params;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::error::VoyagerError;
use crate::model::{DestinationIssue, NewIssue, RepoRef, SourceComment, SourceIssue};
use crate::retry::{is_not_found, is_retryable_octocrab, retry_backoff};
use crate::tracker::{IssueFilter, IssuePage, IssueTracker, PER_PAGE};

pub mod auth;

/// [`IssueTracker`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubTracker {
    client: Octocrab,
}

impl GitHubTracker {
    /// Wraps an authenticated client.
    #[must_use]
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

fn to_source_issue(issue: Issue) -> SourceIssue {
    SourceIssue {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        author: issue.user.login,
        assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        created_at: issue.created_at,
        comment_count: issue.comments,
        is_pull_request: issue.pull_request.is_some(),
    }
}

fn to_source_comment(comment: Comment) -> SourceComment {
    SourceComment {
        author: comment.user.login,
        body: comment.body.unwrap_or_default(),
        created_at: comment.created_at,
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    #[instrument(skip(self), fields(repo = %repo))]
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<()> {
        debug!("Fetching repository");

        (|| async { self.client.repos(&repo.owner, &repo.name).get().await })
            .retry(retry_backoff())
            .when(is_retryable_octocrab)
            .notify(|err, dur| {
                warn!(error = %err, retry_after = ?dur, "Retrying fetch_repository");
            })
            .await
            .map_err(|e| VoyagerError::Selection {
                repo: repo.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo, page = page))]
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        filter: IssueFilter<'_>,
        page: u32,
    ) -> Result<IssuePage> {
        debug!(?filter, "Fetching issue page");

        let result = (|| async {
            let handler = self.client.issues(&repo.owner, &repo.name);
            let mut builder = handler
                .list()
                .state(params::State::Open)
                .sort(params::issues::Sort::Created)
                .direction(params::Direction::Ascending)
                .per_page(PER_PAGE)
                .page(page);
            if let IssueFilter::Labels(labels) = filter {
                builder = builder.labels(labels);
            }
            builder.send().await
        })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .notify(|err, dur| {
            warn!(error = %err, retry_after = ?dur, "Retrying list_open_issues");
        })
        .await?;

        let has_next = result.next.is_some();
        let items: Vec<SourceIssue> = result.items.into_iter().map(to_source_issue).collect();

        debug!(count = items.len(), has_next, "Fetched issue page");
        Ok(IssuePage { items, has_next })
    }

    #[instrument(skip(self), fields(repo = %repo, number = number))]
    async fn fetch_issue(&self, repo: &RepoRef, number: u64) -> Result<Option<SourceIssue>> {
        debug!("Fetching issue");

        let result = (|| async { self.client.issues(&repo.owner, &repo.name).get(number).await })
            .retry(retry_backoff())
            .when(is_retryable_octocrab)
            .notify(|err, dur| {
                warn!(error = %err, retry_after = ?dur, "Retrying fetch_issue");
            })
            .await;

        match result {
            Ok(issue) => Ok(Some(to_source_issue(issue))),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(repo = %repo, number = number))]
    async fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<SourceComment>> {
        debug!("Fetching comments");

        let first = (|| async {
            self.client
                .issues(&repo.owner, &repo.name)
                .list_comments(number)
                .per_page(PER_PAGE)
                .send()
                .await
        })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .notify(|err, dur| {
            warn!(error = %err, retry_after = ?dur, "Retrying list_comments");
        })
        .await?;

        let mut comments: Vec<SourceComment> =
            first.items.into_iter().map(to_source_comment).collect();
        let mut next = first.next;

        while let Some(page) = self.client.get_page::<Comment>(&next).await? {
            comments.extend(page.items.into_iter().map(to_source_comment));
            next = page.next;
        }

        // Stable: comments sharing a timestamp keep API order.
        comments.sort_by_key(|c| c.created_at);

        debug!(count = comments.len(), "Fetched comments");
        Ok(comments)
    }

    #[instrument(skip(self, issue), fields(repo = %repo))]
    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<DestinationIssue> {
        debug!("Creating issue");

        let handler = self.client.issues(&repo.owner, &repo.name);
        let mut builder = handler
            .create(issue.title.clone())
            .body(issue.body.clone())
            .labels(issue.labels.clone());
        if !issue.assignees.is_empty() {
            builder = builder.assignees(issue.assignees.clone());
        }
        let created = builder.send().await?;

        debug!(number = created.number, "Issue created");
        Ok(DestinationIssue {
            number: created.number,
            url: created.html_url.to_string(),
        })
    }

    #[instrument(skip(self, body), fields(repo = %repo, number = number))]
    async fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        self.client
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await?;
        debug!("Comment created");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo, number = number))]
    async fn close_issue(&self, repo: &RepoRef, number: u64) -> Result<()> {
        self.client
            .issues(&repo.owner, &repo.name)
            .update(number)
            .state(IssueState::Closed)
            .send()
            .await?;
        debug!("Issue closed");
        Ok(())
    }
}
