//! Error taxonomy for provider registration, selection, and flow validation.
//!
//! Registry and graph errors are configuration errors surfaced at boot; per
//! attempt failures travel inside `AuthenticationResult` and become
//! `FlowEvent::Error` instead of an `Err`.

use thiserror::Error;

use crate::resolver::FlowEvent;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate provider: {0}")]
    DuplicateProvider(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("no applicable provider for service: {0}")]
    NoApplicableProvider(String),
    #[error("duplicate flow state: {0}")]
    DuplicateState(String),
    #[error("unknown flow state: {0}")]
    UnknownState(String),
    #[error("transition from {from} targets unknown state {to}")]
    UnknownTransitionTarget { from: String, to: String },
    #[error("state {state} has no transition for event {event}")]
    UnmappedEvent { state: String, event: FlowEvent },
    #[error("state {0} is not a decision state")]
    NotADecisionState(String),
    #[error("flow has no entry state")]
    MissingEntryState,
    #[error("decision states form a cycle at {0}")]
    DecisionCycle(String),
    #[error("invalid settings document")]
    Json(#[from] serde_json::Error),
}
