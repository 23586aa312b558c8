//! Error types for rule construction and rule parsing
//!
//! `RuleError` covers failures while building or applying a single rule.
//! `ParseError` covers the structure of the rule program itself. Both are
//! raised before any input line is read.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid regex pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("replacement {replacement:?} refers to unknown capture group ${group}{hint}")]
    UnknownGroup {
        replacement: String,
        group: String,
        /// Spelling suggestion for `$1b`-style references, or empty
        hint: String,
    },

    #[error("invalid line range {spec:?}: {reason}")]
    InvalidLineRange { spec: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid rule {0:?}: too short")]
    TooShort(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid delimiter {delimiter:?} in rule {rule:?}")]
    InvalidDelimiter { rule: String, delimiter: char },

    #[error("{0} requires a pattern")]
    MissingPattern(&'static str),

    #[error("{0} pattern cannot be empty")]
    EmptyPattern(&'static str),

    #[error("substitution requires pattern and replacement")]
    MissingReplacement,

    #[error("unknown flag {flag:?} for {command}")]
    UnknownFlag { command: &'static str, flag: char },

    #[error("expected '{{' after {0}")]
    ExpectedBlockOpen(&'static str),

    #[error("expected '}}'")]
    ExpectedBlockClose,

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

pub type Result<T> = std::result::Result<T, RuleError>;
