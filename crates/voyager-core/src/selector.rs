// SPDX-License-Identifier: Apache-2.0

//! Resolves a selection method into the ordered list of source issues to migrate.
//!
//! - All-open and by-label selections page through the issues endpoint,
//!   drop pull requests and duplicates, and return issues oldest first.
//! - By-number selection fetches every requested issue concurrently and then
//!   restores the requested order. Issues that cannot be fetched become
//!   [`Selected::Missing`] placeholders instead of failing the selection.

use std::collections::HashSet;

use futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::VoyagerError;
use crate::model::{RepoRef, SourceIssue};
use crate::tracker::{IssueFilter, IssueTracker};

/// Maximum number of concurrent single-issue fetches.
pub const FETCH_CONCURRENCY: usize = 5;

/// Concrete selection criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriteria {
    /// Every open issue.
    AllOpen,
    /// Open issues filtered server-side by these labels.
    ByLabel(Vec<String>),
    /// These issue numbers, in this order.
    ByNumber(Vec<u64>),
}

/// One slot in a selection.
#[derive(Debug, Clone)]
pub enum Selected {
    /// A fetched issue.
    Issue(SourceIssue),
    /// A requested issue that could not be fetched.
    Missing {
        /// Requested issue number.
        number: u64,
        /// Why the fetch failed.
        reason: String,
    },
}

impl Selected {
    /// The source issue number this slot refers to.
    #[must_use]
    pub fn number(&self) -> u64 {
        match self {
            Selected::Issue(issue) => issue.number,
            Selected::Missing { number, .. } => *number,
        }
    }

    /// The fetched issue, if any.
    #[must_use]
    pub fn issue(&self) -> Option<&SourceIssue> {
        match self {
            Selected::Issue(issue) => Some(issue),
            Selected::Missing { .. } => None,
        }
    }
}

/// Largest reported comment count across the fetched issues in a selection.
#[must_use]
pub fn max_comment_count(selection: &[Selected]) -> usize {
    selection
        .iter()
        .filter_map(Selected::issue)
        .map(|i| i.comment_count as usize)
        .max()
        .unwrap_or(0)
}

/// Selects issues from one source repository.
pub struct IssueSelector<'a> {
    tracker: &'a dyn IssueTracker,
    repo: &'a RepoRef,
}

impl<'a> IssueSelector<'a> {
    /// Creates a selector reading from `repo` through `tracker`.
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker, repo: &'a RepoRef) -> Self {
        Self { tracker, repo }
    }

    /// Resolves `criteria` into an ordered selection.
    ///
    /// # Errors
    ///
    /// - [`VoyagerError::Selection`] if the repository cannot be resolved or listed.
    /// - [`VoyagerError::NoIssuesFound`] if nothing was selected.
    #[instrument(skip(self), fields(repo = %self.repo))]
    pub async fn select(&self, criteria: &SelectionCriteria) -> Result<Vec<Selected>> {
        self.tracker
            .fetch_repository(self.repo)
            .await
            .map_err(|e| self.selection_error(e))?;

        let selected = match criteria {
            SelectionCriteria::AllOpen => self.select_paginated(IssueFilter::Open).await?,
            SelectionCriteria::ByLabel(labels) => {
                self.select_paginated(IssueFilter::Labels(labels)).await?
            }
            SelectionCriteria::ByNumber(numbers) => self.select_by_number(numbers).await,
        };

        if selected.is_empty() {
            warn!("No issues found");
            return Err(VoyagerError::NoIssuesFound);
        }

        info!(count = selected.len(), "Issues selected");
        Ok(selected)
    }

    fn selection_error(&self, err: VoyagerError) -> VoyagerError {
        match err {
            VoyagerError::Selection { .. } => err,
            other => VoyagerError::Selection {
                repo: self.repo.to_string(),
                message: other.to_string(),
            },
        }
    }

    async fn select_paginated(&self, filter: IssueFilter<'_>) -> Result<Vec<Selected>> {
        let mut all: Vec<SourceIssue> = Vec::new();
        let mut page = 1;

        loop {
            let result = self
                .tracker
                .list_open_issues(self.repo, filter, page)
                .await
                .map_err(|e| self.selection_error(e))?;
            all.extend(result.items);
            if !result.has_next {
                break;
            }
            page += 1;
        }

        let fetched = all.len();
        all.retain(|issue| !issue.is_pull_request);

        // Items can shift between pages while paging; keep the first copy.
        let mut seen = HashSet::new();
        all.retain(|issue| seen.insert(issue.number));

        // Stable, so equal timestamps keep API order.
        all.sort_by_key(|issue| issue.created_at);

        debug!(pages = page, fetched, kept = all.len(), "Paginated selection complete");
        Ok(all.into_iter().map(Selected::Issue).collect())
    }

    async fn select_by_number(&self, numbers: &[u64]) -> Vec<Selected> {
        let mut seen = HashSet::new();
        let requested: Vec<u64> = numbers.iter().copied().filter(|n| seen.insert(*n)).collect();
        if requested.len() < numbers.len() {
            warn!(
                duplicates = numbers.len() - requested.len(),
                "Ignoring duplicate issue numbers"
            );
        }

        let mut results: Vec<(usize, Selected)> = stream::iter(requested.into_iter().enumerate())
            .map(|(idx, number)| async move { (idx, self.fetch_one(number).await) })
            .buffer_unordered(FETCH_CONCURRENCY)
            .collect()
            .await;

        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, selected)| selected).collect()
    }

    async fn fetch_one(&self, number: u64) -> Selected {
        match self.tracker.fetch_issue(self.repo, number).await {
            Ok(Some(issue)) => Selected::Issue(issue),
            Ok(None) => {
                let err = VoyagerError::FetchNotFound { number };
                warn!(number, "{err}");
                Selected::Missing {
                    number,
                    reason: err.to_string(),
                }
            }
            Err(e) => {
                warn!(number, error = %e, "Failed to fetch issue");
                Selected::Missing {
                    number,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTracker, issue};

    fn repo() -> RepoRef {
        RepoRef::new("octocat", "old-repo")
    }

    fn numbers(selection: &[Selected]) -> Vec<u64> {
        selection.iter().map(Selected::number).collect()
    }

    #[tokio::test]
    async fn test_all_open_follows_pagination_and_drops_pull_requests() {
        let mut pr = issue(2, "alice");
        pr.is_pull_request = true;
        let tracker = MockTracker::new()
            .with_pages(vec![vec![issue(1, "alice"), pr], vec![issue(3, "bob")]]);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::AllOpen)
            .await
            .unwrap();

        assert_eq!(numbers(&selection), vec![1, 3]);
        assert_eq!(tracker.pages_requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_all_open_orders_by_creation_and_dedupes() {
        // Issue 5 is older than 4; issue 4 appears on both pages.
        let mut older = issue(5, "alice");
        older.created_at = issue(1, "alice").created_at;
        let tracker = MockTracker::new().with_pages(vec![
            vec![issue(4, "alice")],
            vec![issue(4, "alice"), older],
        ]);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::AllOpen)
            .await
            .unwrap();

        assert_eq!(numbers(&selection), vec![5, 4]);
        let times: Vec<_> = selection
            .iter()
            .filter_map(Selected::issue)
            .map(|i| i.created_at)
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_by_label_passes_labels_to_tracker() {
        let tracker = MockTracker::new().with_pages(vec![vec![issue(1, "alice")]]);
        let repo = repo();
        let labels = vec!["bug".to_string()];

        IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::ByLabel(labels.clone()))
            .await
            .unwrap();

        assert_eq!(tracker.label_filters(), vec![Some(labels)]);
    }

    #[tokio::test]
    async fn test_by_number_preserves_requested_order_with_missing() {
        let tracker =
            MockTracker::new().with_issues(vec![issue(10, "alice"), issue(3, "bob")]);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::ByNumber(vec![10, 999, 3]))
            .await
            .unwrap();

        assert_eq!(numbers(&selection), vec![10, 999, 3]);
        assert!(selection[0].issue().is_some());
        assert!(matches!(selection[1], Selected::Missing { number: 999, .. }));
        assert!(selection[2].issue().is_some());
    }

    #[tokio::test]
    async fn test_by_number_restores_order_when_fetches_finish_reversed() {
        let tracker = MockTracker::new()
            .with_issues(vec![
                issue(1, "alice"),
                issue(2, "alice"),
                issue(4, "alice"),
                issue(8, "alice"),
            ])
            .with_fetch_delay(1, 120)
            .with_fetch_delay(2, 80)
            .with_fetch_delay(4, 40);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::ByNumber(vec![1, 2, 4, 8]))
            .await
            .unwrap();

        assert_eq!(tracker.fetch_completions(), vec![8, 4, 2, 1]);
        assert_eq!(numbers(&selection), vec![1, 2, 4, 8]);
    }

    #[tokio::test]
    async fn test_by_number_ignores_duplicates() {
        let tracker = MockTracker::new().with_issues(vec![issue(10, "alice")]);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::ByNumber(vec![10, 10]))
            .await
            .unwrap();

        assert_eq!(numbers(&selection), vec![10]);
    }

    #[tokio::test]
    async fn test_by_number_transport_error_becomes_placeholder() {
        let tracker = MockTracker::new()
            .with_issues(vec![issue(1, "alice")])
            .failing_fetch(2);
        let repo = repo();

        let selection = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::ByNumber(vec![1, 2]))
            .await
            .unwrap();

        assert!(matches!(selection[1], Selected::Missing { number: 2, .. }));
    }

    #[tokio::test]
    async fn test_empty_selection_is_no_issues_found() {
        let mut pr = issue(1, "alice");
        pr.is_pull_request = true;
        let tracker = MockTracker::new().with_pages(vec![vec![pr]]);
        let repo = repo();

        let err = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::AllOpen)
            .await
            .unwrap_err();

        assert!(matches!(err, VoyagerError::NoIssuesFound));
    }

    #[tokio::test]
    async fn test_unreachable_repository_is_selection_error() {
        let tracker = MockTracker::new().unreachable();
        let repo = repo();

        let err = IssueSelector::new(&tracker, &repo)
            .select(&SelectionCriteria::AllOpen)
            .await
            .unwrap_err();

        assert!(matches!(err, VoyagerError::Selection { .. }));
    }

    #[test]
    fn test_max_comment_count_ignores_missing() {
        let mut busy = issue(1, "alice");
        busy.comment_count = 4;
        let selection = vec![
            Selected::Issue(issue(2, "bob")),
            Selected::Missing {
                number: 3,
                reason: "gone".to_string(),
            },
            Selected::Issue(busy),
        ];
        assert_eq!(max_comment_count(&selection), 4);
        assert_eq!(max_comment_count(&[]), 0);
    }
}
