//! Declarative flow transition graph.
//!
//! States and labeled edges are built once at startup through
//! [`FlowGraphBuilder`], validated, and then read concurrently without
//! locks. An unmapped event for a reachable state is a configuration error
//! surfaced as [`Error::UnmappedEvent`], never a runtime fallback.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Error;
use crate::flow::{LoginRequest, openid};
use crate::resolver::FlowEvent;

/// Guard predicate attached to a decision state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Guard {
    /// Request carries a non-empty `openid.mode` parameter whose value is
    /// not `associate`.
    OpenIdFastPath,
}

impl Guard {
    #[must_use]
    pub fn evaluate(self, request: &LoginRequest) -> bool {
        match self {
            Self::OpenIdFastPath => openid::is_openid_sso_request(request),
        }
    }
}

#[derive(Clone, Debug)]
enum StateKind {
    Decision {
        guard: Guard,
        on_true: String,
        on_false: String,
    },
    Action {
        transitions: HashMap<FlowEvent, String>,
    },
    Terminal,
}

/// Validated, read-only transition graph for the login flow.
#[derive(Debug)]
pub struct FlowGraph {
    entry: String,
    states: HashMap<String, StateKind>,
}

impl FlowGraph {
    #[must_use]
    pub fn builder() -> FlowGraphBuilder {
        FlowGraphBuilder::default()
    }

    /// Identifier of the flow entry state.
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Whether `state` is terminal (ticket issuance or abort).
    ///
    /// # Errors
    /// Returns [`Error::UnknownState`] when the state does not exist.
    pub fn is_terminal(&self, state: &str) -> Result<bool, Error> {
        match self.lookup(state)? {
            StateKind::Terminal => Ok(true),
            StateKind::Decision { .. } | StateKind::Action { .. } => Ok(false),
        }
    }

    /// Evaluate a decision state's guard against the inbound request.
    ///
    /// # Errors
    /// Returns [`Error::NotADecisionState`] for action or terminal states.
    pub fn decide(&self, state: &str, request: &LoginRequest) -> Result<&str, Error> {
        match self.lookup(state)? {
            StateKind::Decision {
                guard,
                on_true,
                on_false,
            } => {
                let outcome = guard.evaluate(request);
                debug!(state, outcome, "evaluated flow decision");
                Ok(if outcome { on_true } else { on_false })
            }
            StateKind::Action { .. } | StateKind::Terminal => {
                Err(Error::NotADecisionState(state.to_string()))
            }
        }
    }

    /// Follow the labeled edge out of an action state.
    ///
    /// # Errors
    /// Returns [`Error::UnmappedEvent`] when the state has no edge for
    /// `event`; this is an invariant violation, the attempt must abort.
    pub fn next(&self, state: &str, event: FlowEvent) -> Result<&str, Error> {
        match self.lookup(state)? {
            StateKind::Action { transitions } => transitions
                .get(&event)
                .map(String::as_str)
                .ok_or_else(|| Error::UnmappedEvent {
                    state: state.to_string(),
                    event,
                }),
            StateKind::Decision { .. } | StateKind::Terminal => Err(Error::UnmappedEvent {
                state: state.to_string(),
                event,
            }),
        }
    }

    /// Resolve the first non-decision state for an inbound request, starting
    /// at the entry state and evaluating decision guards along the way.
    ///
    /// # Errors
    /// Returns [`Error::DecisionCycle`] when decision states loop.
    pub fn route(&self, request: &LoginRequest) -> Result<&str, Error> {
        let mut state = self.entry.as_str();
        let mut hops = 0usize;
        loop {
            match self.lookup(state)? {
                StateKind::Decision { .. } => {
                    hops += 1;
                    if hops > self.states.len() {
                        return Err(Error::DecisionCycle(state.to_string()));
                    }
                    state = self.decide(state, request)?;
                }
                StateKind::Action { .. } | StateKind::Terminal => return Ok(state),
            }
        }
    }

    fn lookup(&self, state: &str) -> Result<&StateKind, Error> {
        self.states
            .get(state)
            .ok_or_else(|| Error::UnknownState(state.to_string()))
    }
}

/// Builder for [`FlowGraph`]; validation happens in [`FlowGraphBuilder::build`].
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    entry: Option<String>,
    states: Vec<(String, StateKind)>,
}

impl FlowGraphBuilder {
    /// Add a boolean decision state.
    #[must_use]
    pub fn decision(
        mut self,
        id: impl Into<String>,
        guard: Guard,
        on_true: impl Into<String>,
        on_false: impl Into<String>,
    ) -> Self {
        self.states.push((
            id.into(),
            StateKind::Decision {
                guard,
                on_true: on_true.into(),
                on_false: on_false.into(),
            },
        ));
        self
    }

    /// Add an action state. The supplied transitions declare exactly the
    /// events this state can legally emit.
    #[must_use]
    pub fn action(mut self, id: impl Into<String>, transitions: &[(FlowEvent, &str)]) -> Self {
        let transitions = transitions
            .iter()
            .map(|(event, target)| (*event, (*target).to_string()))
            .collect();
        self.states
            .push((id.into(), StateKind::Action { transitions }));
        self
    }

    /// Add a terminal state.
    #[must_use]
    pub fn terminal(mut self, id: impl Into<String>) -> Self {
        self.states.push((id.into(), StateKind::Terminal));
        self
    }

    /// Set the flow entry state.
    #[must_use]
    pub fn entry(mut self, id: impl Into<String>) -> Self {
        self.entry = Some(id.into());
        self
    }

    /// Validate and freeze the graph.
    ///
    /// # Errors
    /// Fails fast on duplicate states, a missing or unknown entry state, or
    /// any edge that targets a state the graph does not hold.
    pub fn build(self) -> Result<FlowGraph, Error> {
        let mut states: HashMap<String, StateKind> = HashMap::with_capacity(self.states.len());
        for (id, kind) in self.states {
            if states.contains_key(&id) {
                return Err(Error::DuplicateState(id));
            }
            states.insert(id, kind);
        }

        let entry = self.entry.ok_or(Error::MissingEntryState)?;
        if !states.contains_key(&entry) {
            return Err(Error::UnknownState(entry));
        }

        for (id, kind) in &states {
            let targets: Vec<&String> = match kind {
                StateKind::Decision {
                    on_true, on_false, ..
                } => vec![on_true, on_false],
                StateKind::Action { transitions } => transitions.values().collect(),
                StateKind::Terminal => Vec::new(),
            };
            for target in targets {
                if !states.contains_key(target) {
                    return Err(Error::UnknownTransitionTarget {
                        from: id.clone(),
                        to: target.clone(),
                    });
                }
            }
        }

        Ok(FlowGraph { entry, states })
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowGraph, Guard};
    use crate::error::Error;
    use crate::flow::LoginRequest;
    use crate::resolver::FlowEvent;

    fn two_state_graph() -> FlowGraph {
        FlowGraph::builder()
            .action("go", &[(FlowEvent::Success, "done")])
            .terminal("done")
            .entry("go")
            .build()
            .unwrap()
    }

    #[test]
    fn next_follows_labeled_edges() {
        let graph = two_state_graph();
        assert_eq!(graph.next("go", FlowEvent::Success).unwrap(), "done");
        assert!(graph.is_terminal("done").unwrap());
        assert!(!graph.is_terminal("go").unwrap());
    }

    #[test]
    fn unmapped_event_is_an_error() {
        let graph = two_state_graph();
        let err = graph.next("go", FlowEvent::Error).unwrap_err();
        assert!(matches!(
            err,
            Error::UnmappedEvent {
                state,
                event: FlowEvent::Error,
            } if state == "go"
        ));
    }

    #[test]
    fn unknown_state_is_an_error() {
        let graph = two_state_graph();
        assert!(matches!(
            graph.next("nowhere", FlowEvent::Success).unwrap_err(),
            Error::UnknownState(state) if state == "nowhere"
        ));
    }

    #[test]
    fn terminal_states_have_no_edges() {
        let graph = two_state_graph();
        assert!(matches!(
            graph.next("done", FlowEvent::Success).unwrap_err(),
            Error::UnmappedEvent { .. }
        ));
    }

    #[test]
    fn build_rejects_duplicate_state() {
        let err = FlowGraph::builder()
            .terminal("done")
            .terminal("done")
            .entry("done")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateState(id) if id == "done"));
    }

    #[test]
    fn build_rejects_missing_entry() {
        let err = FlowGraph::builder().terminal("done").build().unwrap_err();
        assert!(matches!(err, Error::MissingEntryState));
    }

    #[test]
    fn build_rejects_unknown_entry() {
        let err = FlowGraph::builder()
            .terminal("done")
            .entry("elsewhere")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownState(id) if id == "elsewhere"));
    }

    #[test]
    fn build_rejects_dangling_edge() {
        let err = FlowGraph::builder()
            .action("go", &[(FlowEvent::Success, "missing")])
            .entry("go")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownTransitionTarget { from, to } if from == "go" && to == "missing"
        ));
    }

    #[test]
    fn build_rejects_dangling_decision_branch() {
        let err = FlowGraph::builder()
            .decision("pick", Guard::OpenIdFastPath, "yes", "no")
            .terminal("yes")
            .entry("pick")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownTransitionTarget { from, to } if from == "pick" && to == "no"
        ));
    }

    #[test]
    fn decide_rejects_non_decision_states() {
        let graph = two_state_graph();
        let request = LoginRequest::new("svc");
        assert!(matches!(
            graph.decide("go", &request).unwrap_err(),
            Error::NotADecisionState(id) if id == "go"
        ));
    }

    #[test]
    fn route_detects_decision_cycles() {
        let graph = FlowGraph::builder()
            .decision("a", Guard::OpenIdFastPath, "b", "b")
            .decision("b", Guard::OpenIdFastPath, "a", "a")
            .entry("a")
            .build()
            .unwrap();
        let request = LoginRequest::new("svc");
        assert!(matches!(
            graph.route(&request).unwrap_err(),
            Error::DecisionCycle(_)
        ));
    }
}
