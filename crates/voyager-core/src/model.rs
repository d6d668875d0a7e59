// SPDX-License-Identifier: Apache-2.0

//! Source and destination records exchanged with the remote tracker.
//!
//! These are snapshots: once fetched they are never mutated, only read by the
//! transform stage and then dropped.

use std::fmt;

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a repository (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web URL of an issue in this repository.
    #[must_use]
    pub fn issue_url(&self, number: u64) -> String {
        format!(
            "https://github.com/{}/{}/issues/{number}",
            self.owner, self.name
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A comment on a source issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceComment {
    /// Login of the comment author.
    pub author: String,
    /// Markdown body.
    pub body: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An issue fetched from the source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct SourceIssue {
    /// Issue number, stable within the repository.
    pub number: u64,
    /// Title.
    #[builder(into)]
    pub title: String,
    /// Markdown body (empty when the issue has none).
    #[builder(into, default)]
    pub body: String,
    /// Login of the issue author.
    #[builder(into)]
    pub author: String,
    /// Assignee logins, in the order the API returns them.
    #[builder(default)]
    pub assignees: Vec<String>,
    /// Label names.
    #[builder(default)]
    pub labels: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Comment count reported by the API; used for export column sizing.
    #[builder(default)]
    pub comment_count: u32,
    /// The issues endpoint also returns pull requests; these are flagged.
    #[builder(default)]
    pub is_pull_request: bool,
}

/// An issue to create in the destination repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Label names.
    pub labels: Vec<String>,
    /// Assignee logins.
    pub assignees: Vec<String>,
}

/// An issue created in the destination repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationIssue {
    /// Destination issue number.
    pub number: u64,
    /// Web URL.
    pub url: String,
}
