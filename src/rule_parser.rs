//! Single rule strings: `s/foo/bar/g`, `p:1-3:`, `sort`, `if/x/` …
//!
//! A rule string is a command, a delimiter and delimiter-separated parts.
//! Block openers (`if`, `between`) cannot be resolved on their own; they come
//! back as conditions for the argument parser to pair with a `{ … }` block.

use crate::control::{AfterRule, OffRule, OnRule, ToggleRule};
use crate::document_rules::{JoinRule, ReverseRule, SortRule};
use crate::error::ParseError;
use crate::line_range::LineRange;
use crate::line_rules::{
    DeleteLineNumRule, DeleteLineRule, PrintLineNumRule, PrintLineRule, SubLineNumRule,
    SubstitutionRule,
};
use crate::pattern::{Pattern, PatternOptions};
use crate::rule::{DocumentRule, LineRule};
use crate::scoped::RangeGate;

type Result<T> = std::result::Result<T, ParseError>;

/// Result of parsing one rule string
#[derive(Debug, Clone)]
pub enum ParsedRule {
    Line(LineRule),
    Document(DocumentRule),
    /// `if` / `!if`; the pattern carries the inversion
    Condition(Pattern),
    /// `between` / `!between`
    Between(RangeGate),
}

/// Word commands taking a delimited pattern, matched before the single
/// letter commands so `sort` is never read as `s` with delimiter `o`.
const WORD_COMMANDS: &[&str] = &["!if", "if", "!between", "between", "on", "off", "after", "toggle"];

pub fn parse_rule(input: &str) -> Result<ParsedRule> {
    match input {
        "sort" => return Ok(ParsedRule::Document(SortRule::new().into())),
        "reverse" => return Ok(ParsedRule::Document(ReverseRule::new().into())),
        "join" => return Ok(ParsedRule::Document(JoinRule::new("").into())),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix("join") {
        return parse_join(input, rest);
    }

    for &word in WORD_COMMANDS {
        if let Some(rest) = input.strip_prefix(word) {
            return parse_word_command(input, word, rest);
        }
    }

    let mut chars = input.chars();
    let (Some(command), Some(_)) = (chars.next(), chars.next()) else {
        return Err(ParseError::TooShort(input.to_string()));
    };
    let rest = &input[command.len_utf8()..];

    match command {
        's' | 'p' | 'd' => {}
        _ => return Err(ParseError::UnknownCommand(command.to_string())),
    }

    let tokens = Tokens::split(input, rest)?;

    match (command, tokens.delimiter) {
        ('s', ':') => parse_sub_line_num(&tokens),
        ('p', ':') => {
            let range = tokens.line_range()?;
            tokens.no_flags("print", 1)?;
            Ok(ParsedRule::Line(PrintLineNumRule::new(range).into()))
        }
        ('d', ':') => {
            let range = tokens.line_range()?;
            tokens.no_flags("delete", 1)?;
            Ok(ParsedRule::Line(DeleteLineNumRule::new(range).into()))
        }
        ('s', _) => parse_substitution(&tokens),
        ('p', _) => {
            let flags = Flags::parse("print", &tokens.flags(1), false)?;
            let pattern = tokens.pattern(0, flags)?;
            Ok(ParsedRule::Line(PrintLineRule::new(pattern).into()))
        }
        _ => {
            let flags = Flags::parse("delete", &tokens.flags(1), false)?;
            let pattern = tokens.pattern(0, flags)?;
            Ok(ParsedRule::Line(DeleteLineRule::new(pattern).into()))
        }
    }
}

fn parse_join(input: &str, rest: &str) -> Result<ParsedRule> {
    let tokens = Tokens::split(input, rest)?;
    tokens.no_flags("join", 1)?;
    Ok(ParsedRule::Document(JoinRule::new(&tokens.parts[0]).into()))
}

fn parse_substitution(tokens: &Tokens) -> Result<ParsedRule> {
    if tokens.parts.len() < 2 {
        return Err(ParseError::MissingReplacement);
    }
    let flags = Flags::parse("substitution", &tokens.flags(2), true)?;
    let pattern = tokens.pattern(0, flags)?;
    let rule = SubstitutionRule::new(pattern, &tokens.parts[1], flags.global)?;
    Ok(ParsedRule::Line(rule.into()))
}

fn parse_sub_line_num(tokens: &Tokens) -> Result<ParsedRule> {
    if tokens.parts.len() < 2 {
        return Err(ParseError::MissingReplacement);
    }
    let range = tokens.line_range()?;
    tokens.no_flags("substitution", 2)?;
    Ok(ParsedRule::Line(SubLineNumRule::new(range, &tokens.parts[1]).into()))
}

fn parse_word_command(input: &str, word: &'static str, rest: &str) -> Result<ParsedRule> {
    let name = word.trim_start_matches('!');
    let inverted = word.starts_with('!');

    if rest.is_empty() {
        return Err(ParseError::MissingPattern(name));
    }
    let tokens = Tokens::split(input, rest)?;

    if name == "between" {
        if tokens.parts.len() < 2 {
            return Err(ParseError::MissingPattern(name));
        }
        let flags = Flags::parse(name, &tokens.flags(2), false)?;
        let start = tokens.required_pattern(name, 0, flags)?;
        let end = tokens.required_pattern(name, 1, flags)?;
        return Ok(ParsedRule::Between(RangeGate::new(start, end, inverted)));
    }

    let flags = Flags::parse(name, &tokens.flags(1), false)?;
    let pattern = tokens.required_pattern(name, 0, flags)?;

    let rule: LineRule = match name {
        "if" => return Ok(ParsedRule::Condition(pattern.inverted(inverted))),
        "on" => OnRule::new(pattern).into(),
        "off" => OffRule::new(pattern).into(),
        "after" => AfterRule::new(pattern).into(),
        _ => ToggleRule::new(pattern).into(),
    };
    Ok(ParsedRule::Line(rule))
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    global: bool,
    ignore_case: bool,
}

impl Flags {
    fn parse(command: &'static str, flags: &str, allow_global: bool) -> Result<Self> {
        let mut parsed = Flags::default();
        for flag in flags.chars() {
            match flag {
                'g' if allow_global => parsed.global = true,
                'i' => parsed.ignore_case = true,
                _ => return Err(ParseError::UnknownFlag { command, flag }),
            }
        }
        Ok(parsed)
    }
}

/// A rule string split at its delimiter
#[derive(Debug)]
struct Tokens {
    delimiter: char,
    parts: Vec<String>,
}

impl Tokens {
    /// `rest` starts at the delimiter.
    fn split(rule: &str, rest: &str) -> Result<Self> {
        let Some(delimiter) = rest.chars().next() else {
            return Err(ParseError::TooShort(rule.to_string()));
        };
        if delimiter.is_alphanumeric() || delimiter.is_whitespace() || delimiter == '\\' {
            return Err(ParseError::InvalidDelimiter {
                rule: rule.to_string(),
                delimiter,
            });
        }

        Ok(Self {
            delimiter,
            parts: split_by_delimiter(&rest[delimiter.len_utf8()..], delimiter),
        })
    }

    fn is_literal(&self) -> bool {
        matches!(self.delimiter, '`' | '\'' | '"')
    }

    /// Everything from part `from` on is the flag section.
    fn flags(&self, from: usize) -> String {
        self.parts.get(from..).map(|rest| rest.concat()).unwrap_or_default()
    }

    fn no_flags(&self, command: &'static str, from: usize) -> Result<()> {
        match self.flags(from).chars().next() {
            Some(flag) => Err(ParseError::UnknownFlag { command, flag }),
            None => Ok(()),
        }
    }

    fn pattern(&self, index: usize, flags: Flags) -> Result<Pattern> {
        let options = PatternOptions {
            ignore_case: flags.ignore_case,
            literal: self.is_literal(),
        };
        Ok(Pattern::with_options(&self.parts[index], options)?)
    }

    fn required_pattern(&self, command: &'static str, index: usize, flags: Flags) -> Result<Pattern> {
        if self.parts[index].is_empty() {
            return Err(ParseError::EmptyPattern(command));
        }
        self.pattern(index, flags)
    }

    fn line_range(&self) -> Result<LineRange> {
        Ok(LineRange::parse(&self.parts[0])?)
    }
}

/// Split `input` at every unescaped `delimiter`.
///
/// Recognised escapes are `\<delimiter>`, `\\`, `\n` and `\t`. Any other
/// backslash is kept as is, so regex escapes such as `\d` pass through. The
/// text after the last delimiter is always returned, possibly empty.
pub fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            let escaped = match chars.peek() {
                Some(&next) if next == delimiter => Some(delimiter),
                Some('\\') => Some('\\'),
                Some('n') => Some('\n'),
                Some('t') => Some('\t'),
                _ => None,
            };
            match escaped {
                Some(escaped) => {
                    current.push(escaped);
                    chars.next();
                }
                None => current.push(ch),
            }
        } else if ch == delimiter {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    parts.push(current);
    parts
}
