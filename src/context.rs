//! Per-document execution state
//!
//! Rules are immutable once built. Everything that changes while a document
//! is processed lives here, owned by whoever drives the pipeline (the stream
//! loop or an `ApplyAllRule` invocation), and is created fresh per document.

/// Tri-state print flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Printing {
    /// No control rule has expressed a preference; lines are printed
    #[default]
    Default,
    On,
    Off,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineContext {
    /// 1-indexed number of the input line being processed
    pub line_num: usize,
    pub printing: Printing,
}

impl LineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current line survives the print check.
    pub fn is_printing(&self) -> bool {
        self.printing != Printing::Off
    }
}

/// Running state of one line rule, index-aligned with the rule list it
/// belongs to.
///
/// Stateless rules keep the default value. Composite rules carry the states of
/// their own inner rules in `inner`, so the state tree mirrors the rule tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleState {
    /// `after`: the pattern has matched. `between`: inside a range.
    pub latched: bool,
    pub inner: Vec<RuleState>,
}

impl RuleState {
    pub fn with_inner(inner: Vec<RuleState>) -> Self {
        Self {
            latched: false,
            inner,
        }
    }
}
