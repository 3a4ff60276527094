//! Tag decoder: predicted tags → component spans.
//!
//! Boundaries are recovered twice with the same rule, first for statements
//! within each source and then for components within each recovered
//! statement. A new group starts at a token whose marker is `B`, or whose
//! marker is `O` while the previous token was not outside. Everything else
//! joins the group currently open, so an `I` with no preceding `B` is absorbed
//! rather than rejected.
use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::tag::{CompositeTag, DecodedTag, Marker};
use crate::fragment::MISSING_LABEL;

/// One reconstructed component (or background stretch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSpan {
    pub source: String,
    /// 1-based, renumbered per source in encounter order.
    #[serde(rename = "statement_ID")]
    pub statement_id: usize,
    #[serde(serialize_with = "serialize_label")]
    pub component: Option<String>,
    pub text: String,
}

fn serialize_label<S: Serializer>(label: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(label.as_deref().unwrap_or(MISSING_LABEL))
}

/// One token of classifier output.
#[derive(Debug, Clone, Copy)]
pub struct PredictedToken<'a> {
    pub source: &'a str,
    pub word: &'a str,
    pub tag: &'a str,
}

// ── Boundary state machine ───────────────────────────────────────────

/// Whether the previous token was outside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Inside,
    Outside,
}

/// Transition function of the boundary rule.
///
/// Returns the next state and whether `marker` opens a new group.
#[must_use]
pub fn transition(prev: RunState, marker: Marker) -> (RunState, bool) {
    match marker {
        Marker::Beginning => (RunState::Inside, true),
        Marker::Inside => (RunState::Inside, false),
        Marker::Outside => (RunState::Outside, prev != RunState::Outside),
    }
}

/// Numbers groups along an ordered marker sequence.
#[derive(Debug, Clone)]
pub struct BoundaryTracker {
    state: RunState,
    group: usize,
}

impl Default for BoundaryTracker {
    fn default() -> Self {
        // The very first token behaves as if preceded by an inside token.
        Self {
            state: RunState::Inside,
            group: 0,
        }
    }
}

impl BoundaryTracker {
    /// Feed one marker and return its group number.
    pub fn step(&mut self, marker: Marker) -> usize {
        let (state, opens) = transition(self.state, marker);
        self.state = state;
        if opens {
            self.group += 1;
        }
        self.group
    }
}

// ── Span reconstruction ──────────────────────────────────────────────

#[derive(Default)]
struct SourceState {
    statements: BoundaryTracker,
    components: BoundaryTracker,
    statement_group: Option<usize>,
    component_group: usize,
    statement_count: usize,
    /// Index of the span currently being extended.
    open_span: Option<usize>,
}

/// Rebuild component spans from predicted tokens in original order.
///
/// Each `(source, statement, component group)` collapses into one span whose
/// label is the label of its first token (possibly `None`) and whose text is
/// the space-joined words. Never fails.
pub fn decode<'a, I>(tokens: I) -> Vec<ComponentSpan>
where
    I: IntoIterator<Item = PredictedToken<'a>>,
{
    let mut states: HashMap<&'a str, SourceState> = HashMap::new();
    let mut spans: Vec<ComponentSpan> = Vec::new();

    for token in tokens {
        let tag = CompositeTag::parse_lenient(token.tag);
        let state = states.entry(token.source).or_default();
        push_token(state, &mut spans, token, tag);
    }

    spans
}

fn push_token(
    state: &mut SourceState,
    spans: &mut Vec<ComponentSpan>,
    token: PredictedToken<'_>,
    tag: DecodedTag,
) {
    let statement_group = state.statements.step(tag.statement);
    if state.statement_group != Some(statement_group) {
        state.statement_group = Some(statement_group);
        state.statement_count += 1;
        state.components = BoundaryTracker::default();
        state.open_span = None;
    }

    let component_group = state.components.step(tag.component);
    if state.open_span.is_some() && component_group == state.component_group {
        if let Some(span) = state.open_span.and_then(|i| spans.get_mut(i)) {
            span.text.push(' ');
            span.text.push_str(token.word);
        }
        return;
    }

    state.component_group = component_group;
    state.open_span = Some(spans.len());
    spans.push(ComponentSpan {
        source: token.source.to_string(),
        statement_id: state.statement_count,
        component: tag.label,
        text: token.word.to_string(),
    });
}
