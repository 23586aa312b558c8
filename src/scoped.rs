//! Scoped blocks: `if/pattern/ { … }` and `between/start/end/ { … }`
//!
//! Each block gates its inner rules on a per-line classification. When every
//! inner rule is a line rule the block is itself a line rule and streams.
//! When the block holds a document rule, the selected lines are gathered into
//! a sub-document, processed, and woven back into place:
//!
//! - unselected lines keep their position untouched,
//! - selected positions take processed lines in order, and stay empty once
//!   the processed lines run out (inner rules that shrink the document),
//! - processed lines left over after the walk are appended at the very end
//!   of the result (inner rules that grow the document).

use crate::context::{LineContext, RuleState};
use crate::error::Result;
use crate::pattern::Pattern;
use crate::rule::{DocumentRule, LineRule, apply_documents, initial_states, run_pipeline};

/// Reassemble a document from its original lines and the processed
/// replacement for the `selected` ones.
pub fn weave(lines: Vec<String>, selected: &[bool], processed: Vec<String>) -> Vec<String> {
    let mut processed = processed.into_iter();
    let mut result = Vec::with_capacity(lines.len());

    for (line, &is_selected) in lines.into_iter().zip(selected) {
        if !is_selected {
            result.push(line);
        } else if let Some(replacement) = processed.next() {
            result.push(replacement);
        }
    }

    result.extend(processed);
    result
}

fn apply_selected(lines: Vec<String>, selected: &[bool], rules: &[DocumentRule]) -> Result<Vec<String>> {
    let subset: Vec<String> = lines
        .iter()
        .zip(selected)
        .filter(|(_, is_selected)| **is_selected)
        .map(|(line, _)| line.clone())
        .collect();

    let processed = apply_documents(rules, subset)?;
    Ok(weave(lines, selected, processed))
}

/// Inner states of a composite, rebuilt if they do not line up with `rules`.
fn inner_states<'s>(state: &'s mut RuleState, rules: &[LineRule]) -> &'s mut [RuleState] {
    if state.inner.len() != rules.len() {
        state.inner = initial_states(rules);
    }
    &mut state.inner
}

/// Start/end range tracking shared by both forms of `between`.
#[derive(Debug, Clone)]
pub struct RangeGate {
    start: Pattern,
    end: Pattern,
    inverted: bool,
}

impl RangeGate {
    pub fn new(start: Pattern, end: Pattern, inverted: bool) -> Self {
        Self { start, end, inverted }
    }

    pub fn start(&self) -> &Pattern {
        &self.start
    }

    pub fn end(&self) -> &Pattern {
        &self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Classify one line and advance `inside`.
    ///
    /// The start line and the end line both count as inside. A line matching
    /// the end pattern closes the range only after it has been classified.
    pub fn classify(&self, line: &str, inside: &mut bool) -> bool {
        if !*inside && self.start.is_match(line) {
            *inside = true;
        }

        let active = *inside != self.inverted;

        if *inside && self.end.is_match(line) {
            *inside = false;
        }

        active
    }
}

/// `if` block holding only line rules
#[derive(Debug, Clone)]
pub struct ConditionalLineRule {
    condition: Pattern,
    rules: Vec<LineRule>,
}

impl ConditionalLineRule {
    /// `condition` carries the `!if` inversion itself.
    pub fn new(condition: Pattern, rules: Vec<LineRule>) -> Self {
        Self { condition, rules }
    }

    pub fn condition(&self) -> &Pattern {
        &self.condition
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// # Errors
    ///
    /// Propagates inner rule errors.
    pub fn apply(&self, line: &str, ctx: &mut LineContext, state: &mut RuleState) -> Result<Vec<String>> {
        if !self.condition.is_match(line) {
            return Ok(vec![line.to_string()]);
        }
        run_pipeline(&self.rules, inner_states(state, &self.rules), line, ctx)
    }
}

/// `if` block holding at least one document rule
#[derive(Debug, Clone)]
pub struct ConditionalDocRule {
    condition: Pattern,
    rules: Vec<DocumentRule>,
}

impl ConditionalDocRule {
    pub fn new(condition: Pattern, rules: Vec<DocumentRule>) -> Self {
        Self { condition, rules }
    }

    pub fn condition(&self) -> &Pattern {
        &self.condition
    }

    pub fn rules(&self) -> &[DocumentRule] {
        &self.rules
    }

    /// # Errors
    ///
    /// Propagates inner rule errors.
    pub fn apply_document(&self, lines: Vec<String>) -> Result<Vec<String>> {
        let selected: Vec<bool> = lines.iter().map(|line| self.condition.is_match(line)).collect();
        apply_selected(lines, &selected, &self.rules)
    }
}

/// `between` block holding only line rules
#[derive(Debug, Clone)]
pub struct BetweenLineRule {
    gate: RangeGate,
    rules: Vec<LineRule>,
}

impl BetweenLineRule {
    pub fn new(gate: RangeGate, rules: Vec<LineRule>) -> Self {
        Self { gate, rules }
    }

    pub fn gate(&self) -> &RangeGate {
        &self.gate
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// `state.latched` tracks whether the range is open.
    ///
    /// # Errors
    ///
    /// Propagates inner rule errors.
    pub fn apply(&self, line: &str, ctx: &mut LineContext, state: &mut RuleState) -> Result<Vec<String>> {
        let active = self.gate.classify(line, &mut state.latched);
        if !active {
            return Ok(vec![line.to_string()]);
        }
        run_pipeline(&self.rules, inner_states(state, &self.rules), line, ctx)
    }
}

/// `between` block holding at least one document rule
#[derive(Debug, Clone)]
pub struct BetweenDocRule {
    gate: RangeGate,
    rules: Vec<DocumentRule>,
}

impl BetweenDocRule {
    pub fn new(gate: RangeGate, rules: Vec<DocumentRule>) -> Self {
        Self { gate, rules }
    }

    pub fn gate(&self) -> &RangeGate {
        &self.gate
    }

    pub fn rules(&self) -> &[DocumentRule] {
        &self.rules
    }

    /// # Errors
    ///
    /// Propagates inner rule errors.
    pub fn apply_document(&self, lines: Vec<String>) -> Result<Vec<String>> {
        let mut inside = false;
        let selected: Vec<bool> = lines
            .iter()
            .map(|line| self.gate.classify(line, &mut inside))
            .collect();
        apply_selected(lines, &selected, &self.rules)
    }
}
