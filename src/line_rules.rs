//! Streaming rules that transform or filter individual lines

use crate::context::LineContext;
use crate::error::Result;
use crate::line_range::LineRange;
use crate::pattern::Pattern;

/// Split rule output on embedded newlines so each piece continues down the
/// pipeline as its own line.
fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(String::from).collect()
}

/// `s/pattern/replacement/[gi]`
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pattern: Pattern,
    replacement: String,
    global: bool,
}

impl SubstitutionRule {
    /// By default only the first match is replaced; `global` replaces all.
    ///
    /// # Errors
    ///
    /// Fails when the replacement references a capture group the pattern
    /// does not define.
    pub fn new(pattern: Pattern, replacement: &str, global: bool) -> Result<Self> {
        pattern.check_replacement(replacement)?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
            global,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn apply(&self, line: &str) -> Vec<String> {
        let limit = if self.global { 0 } else { 1 };
        split_lines(&self.pattern.replace(line, &self.replacement, limit))
    }
}

/// `p/pattern/`: keeps matching lines
#[derive(Debug, Clone)]
pub struct PrintLineRule {
    pattern: Pattern,
}

impl PrintLineRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn apply(&self, line: &str) -> Vec<String> {
        if self.pattern.is_match(line) {
            vec![line.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// `d/pattern/`: drops matching lines
#[derive(Debug, Clone)]
pub struct DeleteLineRule {
    pattern: Pattern,
}

impl DeleteLineRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn apply(&self, line: &str) -> Vec<String> {
        if self.pattern.is_match(line) {
            Vec::new()
        } else {
            vec![line.to_string()]
        }
    }
}

/// `p:range:`
#[derive(Debug, Clone)]
pub struct PrintLineNumRule {
    range: LineRange,
}

impl PrintLineNumRule {
    pub fn new(range: LineRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &LineRange {
        &self.range
    }

    pub fn apply(&self, line: &str, ctx: &LineContext) -> Vec<String> {
        if self.range.contains(ctx.line_num) {
            vec![line.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// `d:range:`
#[derive(Debug, Clone)]
pub struct DeleteLineNumRule {
    range: LineRange,
}

impl DeleteLineNumRule {
    pub fn new(range: LineRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &LineRange {
        &self.range
    }

    pub fn apply(&self, line: &str, ctx: &LineContext) -> Vec<String> {
        if self.range.contains(ctx.line_num) {
            Vec::new()
        } else {
            vec![line.to_string()]
        }
    }
}

/// `s:range:text`: replaces whole lines by number
#[derive(Debug, Clone)]
pub struct SubLineNumRule {
    range: LineRange,
    replacement: String,
}

impl SubLineNumRule {
    pub fn new(range: LineRange, replacement: &str) -> Self {
        Self {
            range,
            replacement: replacement.to_string(),
        }
    }

    pub fn range(&self) -> &LineRange {
        &self.range
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn apply(&self, line: &str, ctx: &LineContext) -> Vec<String> {
        if self.range.contains(ctx.line_num) {
            split_lines(&self.replacement)
        } else {
            vec![line.to_string()]
        }
    }
}
