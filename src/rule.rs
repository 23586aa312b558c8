//! Rule tree
//!
//! Every rule is either a `LineRule`, which streams one line at a time, or a
//! `DocumentRule`, which needs the whole (sub-)document. The kind is fixed
//! when the rule is built, so dispatch is a plain `match`.

use crate::context::{LineContext, RuleState};
use crate::control::{AfterRule, OffRule, OnRule, ToggleRule};
use crate::document_rules::{ApplyAllRule, JoinRule, ReverseRule, SortRule};
use crate::error::Result;
use crate::line_rules::{
    DeleteLineNumRule, DeleteLineRule, PrintLineNumRule, PrintLineRule, SubLineNumRule,
    SubstitutionRule,
};
use crate::scoped::{BetweenDocRule, BetweenLineRule, ConditionalDocRule, ConditionalLineRule};

/// A rule transforming one line into zero, one or many lines
#[derive(Debug, Clone)]
pub enum LineRule {
    Substitution(SubstitutionRule),
    Print(PrintLineRule),
    Delete(DeleteLineRule),
    PrintLineNum(PrintLineNumRule),
    DeleteLineNum(DeleteLineNumRule),
    SubLineNum(SubLineNumRule),
    On(OnRule),
    Off(OffRule),
    After(AfterRule),
    Toggle(ToggleRule),
    Conditional(ConditionalLineRule),
    Between(BetweenLineRule),
}

/// A rule transforming a whole ordered sequence of lines
#[derive(Debug, Clone)]
pub enum DocumentRule {
    Sort(SortRule),
    Reverse(ReverseRule),
    Join(JoinRule),
    Conditional(ConditionalDocRule),
    Between(BetweenDocRule),
    ApplyAll(ApplyAllRule),
}

/// A fully resolved rule as produced by the argument parser
#[derive(Debug, Clone)]
pub enum Rule {
    Line(LineRule),
    Document(DocumentRule),
}

impl LineRule {
    /// Apply the rule to a single line.
    ///
    /// An empty result filters the line out of the pipeline. `state` must be
    /// the running state paired with this rule (see `initial_state`).
    ///
    /// # Errors
    ///
    /// Any error aborts the whole run.
    pub fn apply(&self, line: &str, ctx: &mut LineContext, state: &mut RuleState) -> Result<Vec<String>> {
        match self {
            LineRule::Substitution(rule) => Ok(rule.apply(line)),
            LineRule::Print(rule) => Ok(rule.apply(line)),
            LineRule::Delete(rule) => Ok(rule.apply(line)),
            LineRule::PrintLineNum(rule) => Ok(rule.apply(line, ctx)),
            LineRule::DeleteLineNum(rule) => Ok(rule.apply(line, ctx)),
            LineRule::SubLineNum(rule) => Ok(rule.apply(line, ctx)),
            LineRule::On(rule) => Ok(rule.apply(line, ctx)),
            LineRule::Off(rule) => Ok(rule.apply(line, ctx)),
            LineRule::After(rule) => Ok(rule.apply(line, ctx, state)),
            LineRule::Toggle(rule) => Ok(rule.apply(line, ctx)),
            LineRule::Conditional(rule) => rule.apply(line, ctx, state),
            LineRule::Between(rule) => rule.apply(line, ctx, state),
        }
    }

    /// Establish the initial print state before the first line.
    ///
    /// Only control rules act, and only while the flag is still `Default`,
    /// so the first control rule in program order wins.
    pub fn setup(&self, ctx: &mut LineContext) {
        match self {
            LineRule::On(rule) => rule.setup(ctx),
            LineRule::Off(rule) => rule.setup(ctx),
            LineRule::After(rule) => rule.setup(ctx),
            LineRule::Toggle(rule) => rule.setup(ctx),
            _ => {}
        }
    }

    pub fn initial_state(&self) -> RuleState {
        match self {
            LineRule::Conditional(rule) => RuleState::with_inner(initial_states(rule.rules())),
            LineRule::Between(rule) => RuleState::with_inner(initial_states(rule.rules())),
            _ => RuleState::default(),
        }
    }

    /// Whether this rule can change the print flag.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            LineRule::On(_) | LineRule::Off(_) | LineRule::After(_) | LineRule::Toggle(_)
        )
    }
}

impl DocumentRule {
    /// # Errors
    ///
    /// Propagates the first error raised by an inner rule.
    pub fn apply_document(&self, lines: Vec<String>) -> Result<Vec<String>> {
        match self {
            DocumentRule::Sort(rule) => Ok(rule.apply_document(lines)),
            DocumentRule::Reverse(rule) => Ok(rule.apply_document(lines)),
            DocumentRule::Join(rule) => Ok(rule.apply_document(lines)),
            DocumentRule::Conditional(rule) => rule.apply_document(lines),
            DocumentRule::Between(rule) => rule.apply_document(lines),
            DocumentRule::ApplyAll(rule) => rule.apply_document(lines),
        }
    }
}

impl Rule {
    pub fn is_line_rule(&self) -> bool {
        matches!(self, Rule::Line(_))
    }
}

macro_rules! impl_from {
    ($target:ident :: $variant:ident ($source:ty)) => {
        impl From<$source> for $target {
            fn from(rule: $source) -> Self {
                $target::$variant(rule)
            }
        }
    };
}

impl_from!(LineRule::Substitution(SubstitutionRule));
impl_from!(LineRule::Print(PrintLineRule));
impl_from!(LineRule::Delete(DeleteLineRule));
impl_from!(LineRule::PrintLineNum(PrintLineNumRule));
impl_from!(LineRule::DeleteLineNum(DeleteLineNumRule));
impl_from!(LineRule::SubLineNum(SubLineNumRule));
impl_from!(LineRule::On(OnRule));
impl_from!(LineRule::Off(OffRule));
impl_from!(LineRule::After(AfterRule));
impl_from!(LineRule::Toggle(ToggleRule));
impl_from!(LineRule::Conditional(ConditionalLineRule));
impl_from!(LineRule::Between(BetweenLineRule));
impl_from!(DocumentRule::Sort(SortRule));
impl_from!(DocumentRule::Reverse(ReverseRule));
impl_from!(DocumentRule::Join(JoinRule));
impl_from!(DocumentRule::Conditional(ConditionalDocRule));
impl_from!(DocumentRule::Between(BetweenDocRule));
impl_from!(DocumentRule::ApplyAll(ApplyAllRule));
impl_from!(Rule::Line(LineRule));
impl_from!(Rule::Document(DocumentRule));

pub fn initial_states(rules: &[LineRule]) -> Vec<RuleState> {
    rules.iter().map(LineRule::initial_state).collect()
}

/// Feed `line` through `rules` in order.
///
/// Each rule is applied to every line the previous rule produced and the
/// outputs are concatenated. Once a stage produces nothing the line is gone
/// and later rules never see it.
///
/// # Errors
///
/// Stops at the first rule error.
pub fn run_pipeline(
    rules: &[LineRule],
    states: &mut [RuleState],
    line: &str,
    ctx: &mut LineContext,
) -> Result<Vec<String>> {
    let mut current = vec![line.to_string()];

    for (rule, state) in rules.iter().zip(states.iter_mut()) {
        let mut next = Vec::with_capacity(current.len());
        for l in &current {
            next.extend(rule.apply(l, ctx, state)?);
        }
        if next.is_empty() {
            return Ok(Vec::new());
        }
        current = next;
    }

    Ok(current)
}

/// Chain document rules, each one receiving the previous one's output.
///
/// # Errors
///
/// Stops at the first rule error.
pub fn apply_documents(rules: &[DocumentRule], lines: Vec<String>) -> Result<Vec<String>> {
    rules
        .iter()
        .try_fold(lines, |lines, rule| rule.apply_document(lines))
}

/// Convert a mixed rule list into document rules, wrapping each run of
/// consecutive line rules in an `ApplyAllRule`.
pub fn build_document_rules(rules: Vec<Rule>) -> Vec<DocumentRule> {
    let mut document_rules = Vec::new();
    let mut pending: Vec<LineRule> = Vec::new();

    for rule in rules {
        match rule {
            Rule::Line(rule) => pending.push(rule),
            Rule::Document(rule) => {
                if !pending.is_empty() {
                    document_rules.push(ApplyAllRule::new(std::mem::take(&mut pending)).into());
                }
                document_rules.push(rule);
            }
        }
    }

    if !pending.is_empty() {
        document_rules.push(ApplyAllRule::new(pending).into());
    }

    document_rules
}

/// A line rule list paired with its running state, for one document.
#[derive(Debug)]
pub struct Pipeline<'a> {
    rules: &'a [LineRule],
    states: Vec<RuleState>,
}

impl<'a> Pipeline<'a> {
    pub fn new(rules: &'a [LineRule]) -> Self {
        Self {
            rules,
            states: initial_states(rules),
        }
    }

    /// Run every control rule's setup, in program order.
    pub fn setup(&self, ctx: &mut LineContext) {
        for rule in self.rules.iter().filter(|rule| rule.is_control()) {
            rule.setup(ctx);
        }
    }

    /// # Errors
    ///
    /// Stops at the first rule error.
    pub fn process(&mut self, line: &str, ctx: &mut LineContext) -> Result<Vec<String>> {
        run_pipeline(self.rules, &mut self.states, line, ctx)
    }

    /// Like `process`, but drops the output when the print flag ends up
    /// `Off`. The caller sets `ctx.line_num` first.
    ///
    /// # Errors
    ///
    /// Stops at the first rule error.
    pub fn emit(&mut self, line: &str, ctx: &mut LineContext) -> Result<Vec<String>> {
        let output = self.process(line, ctx)?;
        if ctx.is_printing() {
            Ok(output)
        } else {
            Ok(Vec::new())
        }
    }
}
