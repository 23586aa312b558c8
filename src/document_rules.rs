//! Buffering rules that need the whole document

use crate::context::LineContext;
use crate::error::Result;
use crate::rule::{LineRule, Pipeline};

/// `sort`: byte-wise lexicographic order
#[derive(Debug, Clone, Default)]
pub struct SortRule;

impl SortRule {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_document(&self, mut lines: Vec<String>) -> Vec<String> {
        lines.sort();
        lines
    }
}

/// `reverse`
#[derive(Debug, Clone, Default)]
pub struct ReverseRule;

impl ReverseRule {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_document(&self, mut lines: Vec<String>) -> Vec<String> {
        lines.reverse();
        lines
    }
}

/// `join` / `join/sep/`: collapses the document into one line
#[derive(Debug, Clone, Default)]
pub struct JoinRule {
    separator: String,
}

impl JoinRule {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// An empty document stays empty rather than becoming one empty line.
    pub fn apply_document(&self, lines: Vec<String>) -> Vec<String> {
        if lines.is_empty() {
            return lines;
        }
        vec![lines.join(&self.separator)]
    }
}

/// Runs a list of line rules over every line of a document.
///
/// Each invocation gets a fresh `LineContext` and rule state, so line
/// numbers are positions within the document handed to this rule.
#[derive(Debug, Clone)]
pub struct ApplyAllRule {
    rules: Vec<LineRule>,
}

impl ApplyAllRule {
    pub fn new(rules: Vec<LineRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// # Errors
    ///
    /// Stops at the first rule error.
    pub fn apply_document(&self, lines: Vec<String>) -> Result<Vec<String>> {
        let mut ctx = LineContext::new();
        let mut pipeline = Pipeline::new(&self.rules);
        pipeline.setup(&mut ctx);

        let mut result = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            ctx.line_num = index + 1;
            result.extend(pipeline.emit(line, &mut ctx)?);
        }

        Ok(result)
    }
}
