//! Compiled patterns
//!
//! A `Pattern` wraps a compiled `regex::Regex` together with the source text
//! it was built from and an inversion flag. Matching honours the inversion;
//! replacement always works on the raw regex.

use crate::error::{Result, RuleError};
use regex::{Regex, RegexBuilder};

/// How a pattern string is turned into a regex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// `i` flag
    pub ignore_case: bool,

    /// Quote delimiters: regex metacharacters are escaped
    pub literal: bool,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    inverted: bool,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, PatternOptions::default())
    }

    pub fn with_options(source: &str, options: PatternOptions) -> Result<Self> {
        let source = if options.literal {
            regex::escape(source)
        } else {
            source.to_string()
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|err| RuleError::InvalidPattern {
                pattern: source.clone(),
                source: err,
            })?;

        Ok(Self {
            source,
            regex,
            inverted: false,
        })
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// The regex source, after literal escaping
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// `true` when the regex matches, flipped when the pattern is inverted.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.inverted
    }

    /// Replace up to `limit` matches (`0` replaces all of them).
    pub fn replace(&self, text: &str, replacement: &str, limit: usize) -> String {
        self.regex.replacen(text, limit, replacement).into_owned()
    }

    /// Reject replacement strings that reference capture groups this pattern
    /// does not define.
    ///
    /// Follows the `regex` crate's expansion syntax: `$$` is a literal dollar,
    /// `${name}` is a braced reference, and `$name` takes the longest run of
    /// `[0-9A-Za-z_]`. A `$` with no name after it is literal.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownGroup` naming the first unknown reference.
    pub fn check_replacement(&self, replacement: &str) -> Result<()> {
        let bytes = replacement.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'$' {
                i += 1;
                continue;
            }
            i += 1;

            let name = match bytes.get(i) {
                Some(b'$') => {
                    i += 1;
                    continue;
                }
                Some(b'{') => match replacement[i + 1..].find('}') {
                    Some(len) => {
                        let name = &replacement[i + 1..i + 1 + len];
                        i += len + 2;
                        name
                    }
                    None => continue,
                },
                _ => {
                    let start = i;
                    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                        i += 1;
                    }
                    &replacement[start..i]
                }
            };

            if !name.is_empty() && !self.has_group(name) {
                return Err(RuleError::UnknownGroup {
                    replacement: replacement.to_string(),
                    group: name.to_string(),
                    hint: self.group_hint(name),
                });
            }
        }

        Ok(())
    }

    /// `$1b` names a group called `1b`; point at `${1}b` when group 1 exists.
    fn group_hint(&self, name: &str) -> String {
        let digits = name.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits == name.len() {
            return String::new();
        }

        let (index, rest) = name.split_at(digits);
        if !self.has_group(index) {
            return String::new();
        }
        format!(" (write ${{{index}}}{rest} for group {index} followed by {rest:?})")
    }

    fn has_group(&self, name: &str) -> bool {
        match name.parse::<usize>() {
            Ok(index) => index < self.regex.captures_len(),
            Err(_) => self.regex.capture_names().flatten().any(|n| n == name),
        }
    }
}
