// SPDX-License-Identifier: Apache-2.0

//! Lookup tables translating source users and labels into destination values.
//!
//! Every lookup is total: an unmapped input yields an empty string.
//!
//! Two policies are deliberate and pinned by tests:
//! - user lookups use the first mapping whose `source` matches;
//! - type/priority lookups walk the whole mapping list and the last matching
//!   entry wins.

use regex::{NoExpand, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Maps a source login to a destination login and optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMapping {
    /// Source login.
    pub source: String,
    /// Destination login.
    pub destination: String,
    /// Destination display name (used in CSV exports).
    #[serde(default, alias = "destinationName")]
    pub destination_name: Option<String>,
}

/// Maps a source label to a destination value (issue type or priority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    /// Source label name.
    pub source: String,
    /// Destination value.
    pub destination: String,
}

/// Which destination identity replaces an `@mention`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionStyle {
    /// `@destination` login (recreate mode).
    Login,
    /// `@destination_name` display name (export mode).
    DisplayName,
}

/// The loaded mapping configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    users: Vec<UserMapping>,
    types: Vec<LabelMapping>,
    priorities: Vec<LabelMapping>,
    sticky_users: bool,
}

impl MappingTable {
    /// Creates a table from the configured lists.
    #[must_use]
    pub fn new(
        users: Vec<UserMapping>,
        types: Vec<LabelMapping>,
        priorities: Vec<LabelMapping>,
        sticky_users: bool,
    ) -> Self {
        Self {
            users,
            types,
            priorities,
            sticky_users,
        }
    }

    fn find_user(&self, source_login: &str) -> Option<&UserMapping> {
        self.users.iter().find(|u| u.source == source_login)
    }

    /// Destination login for a source login, or `""` when unmapped.
    #[must_use]
    pub fn map_user(&self, source_login: &str) -> String {
        self.find_user(source_login)
            .map(|u| u.destination.clone())
            .unwrap_or_default()
    }

    /// Destination display name for a source login, or `""` when unmapped.
    #[must_use]
    pub fn map_user_display_name(&self, source_login: &str) -> String {
        self.find_user(source_login)
            .and_then(|u| u.destination_name.clone())
            .unwrap_or_default()
    }

    /// The login to show for a source user: unchanged when sticky, mapped otherwise.
    #[must_use]
    pub fn resolve_user(&self, source_login: &str) -> String {
        if self.sticky_users {
            source_login.to_string()
        } else {
            self.map_user(source_login)
        }
    }

    /// Issue type for a label set; last matching mapping wins.
    #[must_use]
    pub fn map_type(&self, labels: &[String]) -> String {
        last_match(&self.types, labels)
    }

    /// Priority for a label set; last matching mapping wins.
    #[must_use]
    pub fn map_priority(&self, labels: &[String]) -> String {
        last_match(&self.priorities, labels)
    }

    /// Replaces `@source` mentions with the mapped destination identity.
    ///
    /// Matching is case-insensitive and ignores word boundaries after the
    /// login, so `@al` also rewrites the prefix of `@alice`. Mappings are
    /// applied one after another in list order, which means a later mapping
    /// can rewrite text produced by an earlier one. No-op when sticky.
    #[must_use]
    pub fn rewrite_mentions(&self, text: &str, style: MentionStyle) -> String {
        if self.sticky_users {
            return text.to_string();
        }

        let mut result = text.to_string();
        for user in &self.users {
            let replacement = match style {
                MentionStyle::Login => self.map_user(&user.source),
                MentionStyle::DisplayName => self.map_user_display_name(&user.source),
            };
            let pattern = format!("@{}", regex::escape(&user.source));
            let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
                continue;
            };
            let replacement = format!("@{replacement}");
            result = re
                .replace_all(&result, NoExpand(&replacement))
                .into_owned();
        }
        result
    }
}

fn last_match(mappings: &[LabelMapping], labels: &[String]) -> String {
    let mut result = String::new();
    for mapping in mappings {
        if labels.iter().any(|l| *l == mapping.source) {
            result.clone_from(&mapping.destination);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(source: &str, destination: &str, name: Option<&str>) -> UserMapping {
        UserMapping {
            source: source.to_string(),
            destination: destination.to_string(),
            destination_name: name.map(str::to_string),
        }
    }

    fn label(source: &str, destination: &str) -> LabelMapping {
        LabelMapping {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn table(sticky: bool) -> MappingTable {
        MappingTable::new(
            vec![user("alice", "bob", Some("Bob Builder"))],
            vec![label("bug", "Bug"), label("feature", "Story")],
            vec![label("p1", "High"), label("p0", "Highest")],
            sticky,
        )
    }

    #[test]
    fn test_map_user_known_and_unknown() {
        let t = table(false);
        assert_eq!(t.map_user("alice"), "bob");
        assert_eq!(t.map_user("mallory"), "");
        assert_eq!(t.map_user_display_name("alice"), "Bob Builder");
        assert_eq!(t.map_user_display_name("mallory"), "");
    }

    #[test]
    fn test_map_user_is_case_sensitive() {
        assert_eq!(table(false).map_user("Alice"), "");
    }

    #[test]
    fn test_map_user_is_pure() {
        let t = table(false);
        assert_eq!(t.map_user("alice"), t.map_user("alice"));
        assert_eq!(t.map_priority(&labels(&["p1"])), t.map_priority(&labels(&["p1"])));
    }

    #[test]
    fn test_duplicate_user_source_first_match_wins() {
        let t = MappingTable::new(
            vec![user("alice", "bob", None), user("alice", "carol", None)],
            vec![],
            vec![],
            false,
        );
        assert_eq!(t.map_user("alice"), "bob");
    }

    #[test]
    fn test_display_name_missing_yields_empty() {
        let t = MappingTable::new(vec![user("alice", "bob", None)], vec![], vec![], false);
        assert_eq!(t.map_user_display_name("alice"), "");
    }

    #[test]
    fn test_resolve_user_sticky_passes_through() {
        assert_eq!(table(true).resolve_user("alice"), "alice");
        assert_eq!(table(true).resolve_user("mallory"), "mallory");
        assert_eq!(table(false).resolve_user("alice"), "bob");
        assert_eq!(table(false).resolve_user("mallory"), "");
    }

    #[test]
    fn test_priority_last_matching_mapping_wins() {
        // Both p1 and p0 match; p0 is listed later so it wins regardless of label order.
        let t = table(false);
        assert_eq!(t.map_priority(&labels(&["p0", "p1"])), "Highest");
        assert_eq!(t.map_priority(&labels(&["p1", "p0"])), "Highest");
    }

    #[test]
    fn test_type_mapping_and_unmapped_labels() {
        let t = table(false);
        assert_eq!(t.map_type(&labels(&["bug"])), "Bug");
        assert_eq!(t.map_type(&labels(&["bug", "feature"])), "Story");
        assert_eq!(t.map_type(&labels(&["question"])), "");
        assert_eq!(t.map_type(&[]), "");
    }

    #[test]
    fn test_rewrite_mentions_case_insensitive() {
        let t = table(false);
        assert_eq!(
            t.rewrite_mentions("ping @Alice and @ALICE", MentionStyle::Login),
            "ping @bob and @bob"
        );
        assert_eq!(
            t.rewrite_mentions("thanks @alice", MentionStyle::DisplayName),
            "thanks @Bob Builder"
        );
    }

    #[test]
    fn test_rewrite_mentions_ignores_word_boundaries() {
        let t = MappingTable::new(vec![user("al", "x", None)], vec![], vec![], false);
        assert_eq!(t.rewrite_mentions("@alice", MentionStyle::Login), "@xice");
    }

    #[test]
    fn test_rewrite_mentions_chained_substitution() {
        // a -> b, then b -> c: the second mapping rewrites the output of the first.
        let t = MappingTable::new(
            vec![user("a", "b", None), user("b", "c", None)],
            vec![],
            vec![],
            false,
        );
        assert_eq!(t.rewrite_mentions("hi @a", MentionStyle::Login), "hi @c");
    }

    #[test]
    fn test_rewrite_mentions_literal_replacement() {
        let t = MappingTable::new(vec![user("alice", "$1bob", None)], vec![], vec![], false);
        assert_eq!(t.rewrite_mentions("@alice", MentionStyle::Login), "@$1bob");
    }

    #[test]
    fn test_rewrite_mentions_sticky_is_noop() {
        assert_eq!(
            table(true).rewrite_mentions("ping @alice", MentionStyle::Login),
            "ping @alice"
        );
    }
}
