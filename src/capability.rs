//! Streaming Capability Checks
//!
//! This module decides whether a rule program can run one line at a time or
//! must buffer the whole input first.

use crate::rule::{DocumentRule, Rule};

/// Check if a rule program can be executed in streaming mode
///
/// # Streaming Limitations
///
/// Any top-level document rule forces buffering:
/// - `sort`, `reverse`, `join`
/// - `if` / `between` blocks that contain one of those
///
/// Blocks holding only line rules were already resolved to line rules by the
/// parser, so a single pass over the top level is enough.
pub fn can_stream(rules: &[Rule]) -> bool {
    rules.iter().all(Rule::is_line_rule)
}

/// Name of the first rule that forces buffering, for diagnostics
pub fn buffering_reason(rules: &[Rule]) -> Option<&'static str> {
    rules.iter().find_map(|rule| match rule {
        Rule::Line(_) => None,
        Rule::Document(rule) => Some(document_rule_name(rule)),
    })
}

fn document_rule_name(rule: &DocumentRule) -> &'static str {
    match rule {
        DocumentRule::Sort(_) => "sort",
        DocumentRule::Reverse(_) => "reverse",
        DocumentRule::Join(_) => "join",
        DocumentRule::Conditional(_) => "if block",
        DocumentRule::Between(_) => "between block",
        DocumentRule::ApplyAll(_) => "line rule group",
    }
}
