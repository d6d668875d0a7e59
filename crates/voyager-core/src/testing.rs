// SPDX-License-Identifier: Apache-2.0

//! In-memory [`IssueTracker`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::Result;
use crate::error::VoyagerError;
use crate::model::{DestinationIssue, NewIssue, RepoRef, SourceComment, SourceIssue};
use crate::tracker::{IssueFilter, IssuePage, IssueTracker};

/// Number given to the first issue created in a mock tracker.
pub const FIRST_CREATED_NUMBER: u64 = 100;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// An open issue created `number` hours after [`base_time`].
pub fn issue(number: u64, author: &str) -> SourceIssue {
    SourceIssue::builder()
        .number(number)
        .title(format!("Issue {number}"))
        .body(format!("Body of issue {number}"))
        .author(author)
        .created_at(base_time() + Duration::hours(i64::try_from(number).unwrap()))
        .build()
}

pub fn comment(author: &str, body: &str, minutes: i64) -> SourceComment {
    SourceComment {
        author: author.to_string(),
        body: body.to_string(),
        created_at: base_time() + Duration::minutes(minutes),
    }
}

#[derive(Default)]
struct Recorded {
    pages: Vec<u32>,
    label_filters: Vec<Option<Vec<String>>>,
    created: Vec<NewIssue>,
    comments: Vec<(u64, String)>,
    closed: Vec<u64>,
    fetched: Vec<u64>,
}

#[derive(Default)]
pub struct MockTracker {
    pages: Vec<Vec<SourceIssue>>,
    issues: HashMap<u64, SourceIssue>,
    comments: HashMap<u64, Vec<SourceComment>>,
    unreachable: bool,
    failing_fetch: HashSet<u64>,
    fetch_delays: HashMap<u64, StdDuration>,
    failing_comment_list: HashSet<u64>,
    failing_create_titles: HashSet<String>,
    failing_comment_bodies: HashSet<String>,
    failing_close: bool,
    recorded: Mutex<Recorded>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, pages: Vec<Vec<SourceIssue>>) -> Self {
        for issue in pages.iter().flatten() {
            self.issues.insert(issue.number, issue.clone());
        }
        self.pages = pages;
        self
    }

    pub fn with_issues(mut self, issues: Vec<SourceIssue>) -> Self {
        for issue in issues {
            self.issues.insert(issue.number, issue);
        }
        self
    }

    pub fn with_comments(mut self, number: u64, comments: Vec<SourceComment>) -> Self {
        self.comments.insert(number, comments);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn failing_fetch(mut self, number: u64) -> Self {
        self.failing_fetch.insert(number);
        self
    }

    /// Delays the single-issue fetch of `number` by `millis`.
    pub fn with_fetch_delay(mut self, number: u64, millis: u64) -> Self {
        self.fetch_delays
            .insert(number, StdDuration::from_millis(millis));
        self
    }

    pub fn failing_comment_list(mut self, number: u64) -> Self {
        self.failing_comment_list.insert(number);
        self
    }

    pub fn failing_create(mut self, title: &str) -> Self {
        self.failing_create_titles.insert(title.to_string());
        self
    }

    pub fn failing_comment(mut self, body_fragment: &str) -> Self {
        self.failing_comment_bodies.insert(body_fragment.to_string());
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.recorded.lock().unwrap().pages.clone()
    }

    pub fn label_filters(&self) -> Vec<Option<Vec<String>>> {
        self.recorded.lock().unwrap().label_filters.clone()
    }

    /// Issue numbers in the order their single-issue fetches completed.
    pub fn fetch_completions(&self) -> Vec<u64> {
        self.recorded.lock().unwrap().fetched.clone()
    }

    pub fn created_issues(&self) -> Vec<NewIssue> {
        self.recorded.lock().unwrap().created.clone()
    }

    pub fn created_comments(&self) -> Vec<(u64, String)> {
        self.recorded.lock().unwrap().comments.clone()
    }

    pub fn closed_issues(&self) -> Vec<u64> {
        self.recorded.lock().unwrap().closed.clone()
    }
}

fn api_error(message: &str) -> VoyagerError {
    VoyagerError::GitHub {
        message: message.to_string(),
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<()> {
        if self.unreachable {
            return Err(VoyagerError::Selection {
                repo: repo.to_string(),
                message: "Not Found".to_string(),
            });
        }
        Ok(())
    }

    async fn list_open_issues(
        &self,
        _repo: &RepoRef,
        filter: IssueFilter<'_>,
        page: u32,
    ) -> Result<IssuePage> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.pages.push(page);
        recorded.label_filters.push(match filter {
            IssueFilter::Open => None,
            IssueFilter::Labels(labels) => Some(labels.to_vec()),
        });

        let idx = usize::try_from(page).unwrap() - 1;
        Ok(IssuePage {
            items: self.pages.get(idx).cloned().unwrap_or_default(),
            has_next: idx + 1 < self.pages.len(),
        })
    }

    async fn fetch_issue(&self, _repo: &RepoRef, number: u64) -> Result<Option<SourceIssue>> {
        if let Some(delay) = self.fetch_delays.get(&number) {
            tokio::time::sleep(*delay).await;
        }
        self.recorded.lock().unwrap().fetched.push(number);
        if self.failing_fetch.contains(&number) {
            return Err(api_error("Service unavailable"));
        }
        Ok(self.issues.get(&number).cloned())
    }

    async fn list_comments(&self, _repo: &RepoRef, number: u64) -> Result<Vec<SourceComment>> {
        if self.failing_comment_list.contains(&number) {
            return Err(api_error("comments unavailable"));
        }
        Ok(self.comments.get(&number).cloned().unwrap_or_default())
    }

    async fn create_issue(&self, _repo: &RepoRef, issue: &NewIssue) -> Result<DestinationIssue> {
        if self.failing_create_titles.contains(&issue.title) {
            return Err(api_error("Validation Failed"));
        }
        let mut recorded = self.recorded.lock().unwrap();
        recorded.created.push(issue.clone());
        let number = FIRST_CREATED_NUMBER + recorded.created.len() as u64 - 1;
        Ok(DestinationIssue {
            number,
            url: format!("https://github.com/mock/repo/issues/{number}"),
        })
    }

    async fn create_comment(&self, _repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        if self
            .failing_comment_bodies
            .iter()
            .any(|fragment| body.contains(fragment.as_str()))
        {
            return Err(api_error("comment rejected"));
        }
        self.recorded
            .lock()
            .unwrap()
            .comments
            .push((number, body.to_string()));
        Ok(())
    }

    async fn close_issue(&self, _repo: &RepoRef, number: u64) -> Result<()> {
        if self.failing_close {
            return Err(api_error("Forbidden"));
        }
        self.recorded.lock().unwrap().closed.push(number);
        Ok(())
    }
}
