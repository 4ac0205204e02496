//! Case search over the store snapshot.
//!
//! # Responsibility
//! - Normalize free-text queries and match them against case names and
//!   nicknames.
//!
//! # Invariants
//! - Pure and total: a blank query returns every case in store order.
//! - Matching is case-insensitive substring matching; no ranking.

use crate::model::case::Case;
use crate::repo::case_store::CaseStore;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Collapses whitespace, trims and lowercases a query or candidate.
pub fn normalize_query(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Filters the store's cases by name or nickname substring.
pub fn search_cases<'a>(store: &'a CaseStore, query: &str) -> Vec<&'a Case> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return store.cases().iter().collect();
    }

    store
        .cases()
        .iter()
        .filter(|case| {
            normalize_query(&case.name).contains(&needle)
                || case
                    .nickname
                    .as_deref()
                    .is_some_and(|nickname| normalize_query(nickname).contains(&needle))
        })
        .collect()
}
