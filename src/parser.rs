//! Rule program parser
//!
//! Turns the command-line rule tokens into a flat list of `Rule`s. Each token
//! is one rule string, except for the `{` and `}` tokens delimiting the block
//! that must follow every `if` and `between` condition. A block made only of
//! line rules becomes a streaming line rule; a block holding any document
//! rule becomes a document rule.

use crate::error::ParseError;
use crate::rule::{DocumentRule, LineRule, Rule, build_document_rules};
use crate::rule_parser::{ParsedRule, parse_rule};
use crate::scoped::{BetweenDocRule, BetweenLineRule, ConditionalDocRule, ConditionalLineRule};
use std::iter::Peekable;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, ParseError>;

/// Parse a complete rule program.
///
/// # Errors
///
/// Fails on the first malformed rule string or unbalanced block.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<Rule>> {
    let mut tokens = args.iter().map(|arg| arg.as_ref()).peekable();
    let rules = parse_sequence(&mut tokens)?;

    if let Some(token) = tokens.next() {
        return Err(ParseError::UnexpectedToken(token.to_string()));
    }

    debug!(
        rules = rules.len(),
        streaming = rules.iter().all(Rule::is_line_rule),
        "parsed rule program"
    );
    Ok(rules)
}

/// Consume rules up to a closing `}` (left in place) or the end of input.
fn parse_sequence<'a, I>(tokens: &mut Peekable<I>) -> Result<Vec<Rule>>
where
    I: Iterator<Item = &'a str>,
{
    let mut rules = Vec::new();

    while let Some(&token) = tokens.peek() {
        match token {
            "}" => break,
            "{" => return Err(ParseError::UnexpectedToken(token.to_string())),
            _ => {}
        }
        tokens.next();
        trace!(token, "parsing rule");

        let rule = match parse_rule(token)? {
            ParsedRule::Line(rule) => Rule::Line(rule),
            ParsedRule::Document(rule) => Rule::Document(rule),
            ParsedRule::Condition(pattern) => match collect_block(tokens, "if condition")? {
                Block::Line(inner) => Rule::Line(ConditionalLineRule::new(pattern, inner).into()),
                Block::Document(inner) => Rule::Document(ConditionalDocRule::new(pattern, inner).into()),
            },
            ParsedRule::Between(gate) => match collect_block(tokens, "between condition")? {
                Block::Line(inner) => Rule::Line(BetweenLineRule::new(gate, inner).into()),
                Block::Document(inner) => Rule::Document(BetweenDocRule::new(gate, inner).into()),
            },
        };
        rules.push(rule);
    }

    Ok(rules)
}

/// The resolved contents of a `{ … }` block
enum Block {
    Line(Vec<LineRule>),
    Document(Vec<DocumentRule>),
}

impl Block {
    fn from_rules(rules: Vec<Rule>) -> Self {
        if !rules.iter().all(Rule::is_line_rule) {
            return Block::Document(build_document_rules(rules));
        }

        Block::Line(
            rules
                .into_iter()
                .filter_map(|rule| match rule {
                    Rule::Line(rule) => Some(rule),
                    Rule::Document(_) => None,
                })
                .collect(),
        )
    }
}

fn collect_block<'a, I>(tokens: &mut Peekable<I>, context: &'static str) -> Result<Block>
where
    I: Iterator<Item = &'a str>,
{
    if tokens.next_if_eq(&"{").is_none() {
        return Err(ParseError::ExpectedBlockOpen(context));
    }

    let inner = parse_sequence(tokens)?;

    if tokens.next_if_eq(&"}").is_none() {
        return Err(ParseError::ExpectedBlockClose);
    }

    Ok(Block::from_rules(inner))
}
