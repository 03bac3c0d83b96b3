//! Artifact Complexity Classifier
//!
//! Assigns a structural difficulty tier (1–5) to a submitted query by spotting SQL constructs
//! in its surface syntax. This is a keyword heuristic, not a parser, and never executes anything.
//!
//! | Tier | Triggered by |
//! |------|--------------|
//! | 1 | none of the rules below |
//! | 2 | exactly one `JOIN`, no `GROUP BY`, no subquery |
//! | 3 | `GROUP BY` (with or without a single join) |
//! | 4 | two or more joins together with `GROUP BY`; or any subquery, `HAVING`, or `CASE … WHEN` |
//! | 5 | a subquery together with `GROUP BY` or two or more joins |
//!
//! The highest triggered tier wins. `ORDER BY` is detected and reported but never raises the tier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static JOIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bJOIN\b").expect("valid regex"));
static GROUP_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bGROUP\s+BY\b").expect("valid regex"));
static SUBQUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*SELECT\b").expect("valid regex"));
static ORDER_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));
static HAVING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bHAVING\b").expect("valid regex"));
static CASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bCASE\b.*?\bWHEN\b").expect("valid regex"));

/// Structural features of a submitted artifact and its derived tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactComplexity {
    pub has_join: bool,
    pub join_count: usize,
    pub has_group_by: bool,
    pub has_subquery: bool,
    pub has_order_by: bool,
    pub has_having: bool,
    pub has_case: bool,
    /// Difficulty tier in `1..=5`.
    pub tier: u8,
    /// Length of the artifact text in characters.
    pub length: usize,
}

impl ArtifactComplexity {
    /// Tier mapped onto `[0, 1]` for difficulty blending.
    pub fn normalized_tier(&self) -> f64 {
        (f64::from(self.tier) - 1.0) / 4.0
    }
}

/// Classifies an artifact's source text.
pub fn classify(artifact: &str) -> ArtifactComplexity {
    let join_count = JOIN_RE.find_iter(artifact).count();
    let has_group_by = GROUP_BY_RE.is_match(artifact);
    let has_subquery = SUBQUERY_RE.is_match(artifact);
    let has_order_by = ORDER_BY_RE.is_match(artifact);
    let has_having = HAVING_RE.is_match(artifact);
    let has_case = CASE_RE.is_match(artifact);

    let mut tier = 1;
    if join_count == 1 && !has_group_by && !has_subquery {
        tier = 2;
    }
    if has_group_by {
        tier = tier.max(3);
    }
    if (join_count >= 2 && has_group_by) || has_subquery || has_having || has_case {
        tier = tier.max(4);
    }
    if has_subquery && (has_group_by || join_count >= 2) {
        tier = 5;
    }

    ArtifactComplexity {
        has_join: join_count > 0,
        join_count,
        has_group_by,
        has_subquery,
        has_order_by,
        has_having,
        has_case,
        tier,
        length: artifact.chars().count(),
    }
}
