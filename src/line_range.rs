//! Line-number ranges for the `p:`, `d:` and `s:` rule variants

use crate::error::{Result, RuleError};
use std::str::FromStr;

/// A set of 1-indexed line numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRange {
    /// `5`
    SingleLine(usize),

    /// `2-4`, inclusive on both ends
    Range { start: usize, end: usize },

    /// `5-`, line 5 to the end of input
    StartingAt(usize),

    /// `-5`, the beginning of input up to line 5
    EndingAt(usize),

    /// `1,3,5-7`, any member matches
    Composite(Vec<LineRange>),
}

impl LineRange {
    pub fn contains(&self, line_num: usize) -> bool {
        match self {
            LineRange::SingleLine(n) => line_num == *n,
            LineRange::Range { start, end } => line_num >= *start && line_num <= *end,
            LineRange::StartingAt(from) => line_num >= *from,
            LineRange::EndingAt(to) => line_num <= *to,
            LineRange::Composite(ranges) => ranges.iter().any(|r| r.contains(line_num)),
        }
    }

    /// Parse a line range specification.
    ///
    /// Supported forms: `5`, `2-4`, `5-`, `-5` and comma-separated lists of
    /// any of those. Whitespace around list items is ignored.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidLineRange` for empty specs, empty list items
    /// and anything that is not a line number.
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(invalid(spec, "empty line range"));
        }

        if spec.contains(',') {
            let ranges = spec
                .split(',')
                .map(|part| Self::parse(part.trim()))
                .collect::<Result<Vec<_>>>()?;
            return Ok(LineRange::Composite(ranges));
        }

        if let Some(from) = spec.strip_suffix('-') {
            return Ok(LineRange::StartingAt(parse_line_number(spec, from)?));
        }

        if let Some(to) = spec.strip_prefix('-') {
            return Ok(LineRange::EndingAt(parse_line_number(spec, to)?));
        }

        if let Some((start, end)) = spec.split_once('-') {
            return Ok(LineRange::Range {
                start: parse_line_number(spec, start)?,
                end: parse_line_number(spec, end)?,
            });
        }

        Ok(LineRange::SingleLine(parse_line_number(spec, spec)?))
    }
}

impl FromStr for LineRange {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_line_number(spec: &str, number: &str) -> Result<usize> {
    number
        .parse::<usize>()
        .map_err(|_| invalid(spec, &format!("invalid line number {:?}", number)))
}

fn invalid(spec: &str, reason: &str) -> RuleError {
    RuleError::InvalidLineRange {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}
