//! Login flow transition graph and the OpenID fast-path.
//!
//! Flow Overview:
//! 1) The entry decision inspects raw request parameters; federated OpenID
//!    requests divert straight into SSO ticket issuance.
//! 2) Everyone else lands on credential collection; once credentials pass,
//!    the second-factor action asks the resolver for a flow event.
//! 3) Events map to labeled edges: success issues the ticket, an error
//!    returns to the start state, a warning is shown before issuance, and a
//!    required factor loops through the external challenge collaborator.
//!
//! The graph is built declaratively and validated at startup; the retry
//! budget for aborting an attempt is owned by the external flow engine.

pub mod graph;
pub mod openid;

use std::collections::HashMap;

use crate::error::Error;
use crate::resolver::FlowEvent;

pub use graph::{FlowGraph, FlowGraphBuilder, Guard};

/// Entry decision evaluating the OpenID fast-path guard.
pub const STATE_OPENID_FAST_PATH: &str = "openid-fast-path";
/// Action state issuing an SSO ticket for a federated request.
pub const STATE_OPENID_SSO: &str = "openid-sso";
/// Normal flow start state: credential collection and validation.
pub const STATE_COLLECT_CREDENTIALS: &str = "collect-credentials";
/// Resolver-backed action deciding whether a second factor is due.
pub const STATE_SECOND_FACTOR: &str = "second-factor";
/// External collaborator renders and collects the second factor here.
pub const STATE_FACTOR_CHALLENGE: &str = "factor-challenge";
/// Warning display; proceeds to ticket issuance after acknowledgment.
pub const STATE_SHOW_WARNING: &str = "show-warning";
/// Terminal success state granting the session ticket.
pub const STATE_ISSUE_TICKET: &str = "issue-ticket";
/// Terminal failure state once the external retry budget is exhausted.
pub const STATE_ABORT: &str = "abort";

/// Inbound login request: the requested service plus raw string parameters.
///
/// Parameters are only consulted by decision guards; lookups handle missing
/// keys explicitly instead of assuming presence.
#[derive(Clone, Debug, Default)]
pub struct LoginRequest {
    service: String,
    params: HashMap<String, String>,
}

impl LoginRequest {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Build the standard login flow graph.
///
/// # Errors
/// Validation failures are configuration errors; callers fail fast at boot.
pub fn standard_login_flow() -> Result<FlowGraph, Error> {
    FlowGraph::builder()
        .decision(
            STATE_OPENID_FAST_PATH,
            Guard::OpenIdFastPath,
            STATE_OPENID_SSO,
            STATE_COLLECT_CREDENTIALS,
        )
        .action(
            STATE_COLLECT_CREDENTIALS,
            &[
                (FlowEvent::Success, STATE_SECOND_FACTOR),
                (FlowEvent::Error, STATE_COLLECT_CREDENTIALS),
            ],
        )
        .action(
            STATE_SECOND_FACTOR,
            &[
                (FlowEvent::SecondFactorRequired, STATE_FACTOR_CHALLENGE),
                (FlowEvent::Success, STATE_ISSUE_TICKET),
                (FlowEvent::Error, STATE_COLLECT_CREDENTIALS),
                (FlowEvent::Warn, STATE_SHOW_WARNING),
            ],
        )
        .action(
            STATE_FACTOR_CHALLENGE,
            &[
                (FlowEvent::Success, STATE_SECOND_FACTOR),
                (FlowEvent::Error, STATE_ABORT),
            ],
        )
        .action(
            STATE_OPENID_SSO,
            &[
                (FlowEvent::Success, STATE_ISSUE_TICKET),
                (FlowEvent::Error, STATE_COLLECT_CREDENTIALS),
                (FlowEvent::Warn, STATE_SHOW_WARNING),
            ],
        )
        .action(
            STATE_SHOW_WARNING,
            &[(FlowEvent::Success, STATE_ISSUE_TICKET)],
        )
        .terminal(STATE_ISSUE_TICKET)
        .terminal(STATE_ABORT)
        .entry(STATE_OPENID_FAST_PATH)
        .build()
}
