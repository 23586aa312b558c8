//! ged: line-oriented text transformation
//!
//! A program is a list of rules parsed from command-line tokens. Line rules
//! stream one line at a time; document rules see the whole input. `if` and
//! `between` blocks scope either kind to a subset of lines.
//!
//! The main binary is at src/main.rs.

pub mod capability;
pub mod cli;
pub mod config;
pub mod context;
pub mod control;
pub mod document_rules;
pub mod error;
pub mod line_range;
pub mod line_rules;
pub mod logger;
pub mod parser;
pub mod pattern;
pub mod processor;
pub mod rule;
pub mod rule_parser;
pub mod scoped;

// Re-export commonly used types for convenience
pub use capability::can_stream;
pub use context::{LineContext, Printing, RuleState};
pub use error::{ParseError, RuleError};
pub use line_range::LineRange;
pub use parser::parse_args;
pub use pattern::{Pattern, PatternOptions};
pub use processor::{Processor, Program};
pub use rule::{DocumentRule, LineRule, Pipeline, Rule};
pub use rule_parser::{ParsedRule, parse_rule};
pub use scoped::weave;
