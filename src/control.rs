//! Print-flag control rules: `on`, `off`, `after`, `toggle`
//!
//! These rules never change line content. They only move
//! `LineContext::printing` between `Default`, `On` and `Off`; whoever drives
//! the pipeline drops lines processed while the flag is `Off`.
//!
//! | Rule   | Setup | On match                     | Matching line printed |
//! |--------|-------|------------------------------|-----------------------|
//! | on     | Off   | On                           | yes                   |
//! | off    | On    | Off                          | no                    |
//! | after  | Off   | On, starting with next line  | no                    |
//! | toggle | Off   | flips On/Off                 | follows the new state |

use crate::context::{LineContext, Printing, RuleState};
use crate::pattern::Pattern;

fn initialize(ctx: &mut LineContext, printing: Printing) {
    if ctx.printing == Printing::Default {
        ctx.printing = printing;
    }
}

/// Starts printing at the first matching line, inclusive.
#[derive(Debug, Clone)]
pub struct OnRule {
    pattern: Pattern,
}

impl OnRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn setup(&self, ctx: &mut LineContext) {
        initialize(ctx, Printing::Off);
    }

    pub fn apply(&self, line: &str, ctx: &mut LineContext) -> Vec<String> {
        if self.pattern.is_match(line) {
            ctx.printing = Printing::On;
        }
        vec![line.to_string()]
    }
}

/// Stops printing at the first matching line, which is itself suppressed.
#[derive(Debug, Clone)]
pub struct OffRule {
    pattern: Pattern,
}

impl OffRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn setup(&self, ctx: &mut LineContext) {
        initialize(ctx, Printing::On);
    }

    pub fn apply(&self, line: &str, ctx: &mut LineContext) -> Vec<String> {
        if self.pattern.is_match(line) {
            ctx.printing = Printing::Off;
        }
        vec![line.to_string()]
    }
}

/// Starts printing on the line after a match.
#[derive(Debug, Clone)]
pub struct AfterRule {
    pattern: Pattern,
}

impl AfterRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn setup(&self, ctx: &mut LineContext) {
        initialize(ctx, Printing::Off);
    }

    /// `state.latched` records that the marker has been seen.
    pub fn apply(&self, line: &str, ctx: &mut LineContext, state: &mut RuleState) -> Vec<String> {
        if state.latched {
            ctx.printing = Printing::On;
        }
        if self.pattern.is_match(line) {
            state.latched = true;
        }
        vec![line.to_string()]
    }
}

/// Flips printing each time a line matches.
#[derive(Debug, Clone)]
pub struct ToggleRule {
    pattern: Pattern,
}

impl ToggleRule {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn setup(&self, ctx: &mut LineContext) {
        initialize(ctx, Printing::Off);
    }

    pub fn apply(&self, line: &str, ctx: &mut LineContext) -> Vec<String> {
        if self.pattern.is_match(line) {
            ctx.printing = match ctx.printing {
                Printing::On => Printing::Off,
                Printing::Off | Printing::Default => Printing::On,
            };
        }
        vec![line.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{LineRule, Pipeline};

    /// Drive lines through a single rule the way the stream loop does.
    fn process_lines(rule: LineRule, lines: &[&str]) -> Vec<String> {
        let rules = vec![rule];
        let mut pipeline = Pipeline::new(&rules);
        let mut ctx = LineContext::new();
        pipeline.setup(&mut ctx);

        let mut result = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            ctx.line_num = index + 1;
            let output = pipeline.process(line, &mut ctx).unwrap();
            if ctx.is_printing() {
                result.extend(output);
            }
        }
        result
    }

    fn pattern(source: &str) -> Pattern {
        Pattern::new(source).unwrap()
    }

    #[test]
    fn test_on_rule_starts_at_match() {
        let result = process_lines(OnRule::new(pattern("start")).into(), &["before", "start", "after"]);
        assert_eq!(result, vec!["start", "after"]);
    }

    #[test]
    fn test_on_rule_no_match() {
        let result = process_lines(OnRule::new(pattern("start")).into(), &["a", "b", "c"]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_off_rule_stops_at_match() {
        let result = process_lines(OffRule::new(pattern("stop")).into(), &["before", "stop", "after"]);
        assert_eq!(result, vec!["before"]);
    }

    #[test]
    fn test_off_rule_no_match() {
        let result = process_lines(OffRule::new(pattern("stop")).into(), &["a", "b", "c"]);
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_after_rule_starts_after_match() {
        let result = process_lines(
            AfterRule::new(pattern("marker")).into(),
            &["before", "marker", "after1", "after2"],
        );
        assert_eq!(result, vec!["after1", "after2"]);
    }

    #[test]
    fn test_after_rule_marker_never_printed() {
        let result = process_lines(AfterRule::new(pattern("marker")).into(), &["before", "marker", "after1"]);
        assert_eq!(result, vec!["after1"]);
    }

    #[test]
    fn test_after_rule_no_match() {
        let result = process_lines(AfterRule::new(pattern("marker")).into(), &["a", "b", "c"]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_toggle_rule_flips_on_match() {
        let result = process_lines(
            ToggleRule::new(pattern("---")).into(),
            &["off", "---", "on1", "on2", "---", "off2", "---", "on3"],
        );
        assert_eq!(result, vec!["---", "on1", "on2", "---", "on3"]);
    }

    #[test]
    fn test_toggle_rule_match_line_itself() {
        let result = process_lines(ToggleRule::new(pattern("---")).into(), &["---", "a", "---", "b"]);
        assert_eq!(result, vec!["---", "a"]);
    }

    #[test]
    fn test_toggle_from_default_turns_on() {
        let rule = ToggleRule::new(pattern("x"));
        let mut ctx = LineContext::new();
        rule.apply("x", &mut ctx);
        assert_eq!(ctx.printing, Printing::On);
    }

    #[test]
    fn test_setup_only_when_default() {
        let mut ctx = LineContext::new();
        OnRule::new(pattern("a")).setup(&mut ctx);
        OffRule::new(pattern("b")).setup(&mut ctx);
        assert_eq!(ctx.printing, Printing::Off);

        let mut ctx = LineContext::new();
        OffRule::new(pattern("b")).setup(&mut ctx);
        AfterRule::new(pattern("c")).setup(&mut ctx);
        ToggleRule::new(pattern("d")).setup(&mut ctx);
        assert_eq!(ctx.printing, Printing::On);
    }

    #[test]
    fn test_on_off_combined() {
        let rules: Vec<LineRule> = vec![
            OnRule::new(pattern("start")).into(),
            OffRule::new(pattern("end")).into(),
        ];
        let mut pipeline = Pipeline::new(&rules);
        let mut ctx = LineContext::new();
        pipeline.setup(&mut ctx);

        let mut result = Vec::new();
        for line in ["before", "start", "middle", "end", "after"] {
            let output = pipeline.process(line, &mut ctx).unwrap();
            if ctx.is_printing() {
                result.extend(output);
            }
        }
        assert_eq!(result, vec!["start", "middle"]);
    }

    #[test]
    fn test_after_state_survives_filtered_lines() {
        let rules: Vec<LineRule> = vec![
            AfterRule::new(pattern("marker")).into(),
            crate::line_rules::DeleteLineRule::new(pattern("marker|skip")).into(),
        ];
        let mut pipeline = Pipeline::new(&rules);
        let mut ctx = LineContext::new();
        pipeline.setup(&mut ctx);

        let mut result = Vec::new();
        for line in ["a", "marker", "skip", "b"] {
            let output = pipeline.process(line, &mut ctx).unwrap();
            if ctx.is_printing() {
                result.extend(output);
            }
        }
        assert_eq!(result, vec!["b"]);
    }
}
