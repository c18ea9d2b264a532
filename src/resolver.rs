//! Flow event resolution: the core per-attempt decision.
//!
//! Flow Overview:
//! 1) After primary credential validation, the resolver inspects the
//!    authentication record and the provider mandated for the service.
//! 2) It emits exactly one [`FlowEvent`] with fixed precedence
//!    `Error > SecondFactorRequired > Warn > Success`.
//! 3) The external flow engine maps the event to the next flow state.
//!
//! Security boundaries: the precedence order is a correctness invariant.
//! Checking warnings before failures would surface warnings for failed
//! logins; skipping the second-factor check for satisfied `every_attempt`
//! providers would weaken enforcement.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::authentication::AuthenticationResult;
use crate::error::Error;
use crate::provider::{MfaProviderDescriptor, ProviderRegistry, VerificationPolicy};
use crate::selector::{FirstProviderSelector, ProviderSelection, ProviderSelector};
use crate::settings::FlowSettings;

/// Named outcome of one resolver invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowEvent {
    SecondFactorRequired,
    Success,
    Error,
    Warn,
}

impl FlowEvent {
    pub(crate) const ALL: [Self; 4] = [
        Self::SecondFactorRequired,
        Self::Success,
        Self::Error,
        Self::Warn,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SecondFactorRequired => "second_factor_required",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warn => "warn",
        }
    }
}

impl fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a service-level resolution: the event plus the provider
/// selection that produced it, if the service mandates MFA.
#[derive(Clone, Debug)]
pub struct Resolution {
    event: FlowEvent,
    selection: Option<ProviderSelection>,
}

impl Resolution {
    #[must_use]
    pub fn event(&self) -> FlowEvent {
        self.event
    }

    #[must_use]
    pub fn selection(&self) -> Option<&ProviderSelection> {
        self.selection.as_ref()
    }
}

/// Decides the flow event for one login attempt.
pub struct EventResolver {
    registry: Arc<ProviderRegistry>,
    selector: Arc<dyn ProviderSelector>,
    settings: FlowSettings,
}

impl EventResolver {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, settings: FlowSettings) -> Self {
        Self {
            registry,
            selector: Arc::new(FirstProviderSelector),
            settings,
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn ProviderSelector>) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Resolve the event for an attempt against one mandated provider.
    ///
    /// Never fails for expected states; the caller guarantees `provider`
    /// came out of the registry.
    #[must_use]
    pub fn resolve(
        &self,
        auth: &AuthenticationResult,
        provider: &MfaProviderDescriptor,
    ) -> FlowEvent {
        if auth.failure().is_some() {
            return FlowEvent::Error;
        }

        let satisfied =
            auth.attribute_contains(self.settings.context_attribute(), provider.id());
        let skip_challenge = satisfied
            && provider.policy() == VerificationPolicy::OncePerSession
            && !self.settings.force_verification();

        if !skip_challenge {
            debug!(
                attempt_id = %auth.attempt_id(),
                provider = %provider.id(),
                satisfied,
                "second factor required"
            );
            return FlowEvent::SecondFactorRequired;
        }

        // Warn and Success are mutually exclusive for one resolution.
        if auth.has_warnings() {
            FlowEvent::Warn
        } else {
            FlowEvent::Success
        }
    }

    /// Resolve the event for an attempt against the providers configured for
    /// its service. A service with no configured providers resolves without
    /// a factor challenge.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProvider`] when the service policy names a
    /// provider the registry does not hold. This is a misconfiguration and
    /// must abort the attempt, not become a [`FlowEvent::Error`].
    pub fn resolve_service(&self, auth: &AuthenticationResult) -> Result<Resolution, Error> {
        if auth.failure().is_some() {
            info!(
                attempt_id = %auth.attempt_id(),
                service = %auth.service(),
                "primary authentication failed"
            );
            return Ok(Resolution {
                event: FlowEvent::Error,
                selection: None,
            });
        }

        let candidate_ids = self.settings.providers_for(auth.service());
        if candidate_ids.is_empty() {
            let event = if auth.has_warnings() {
                FlowEvent::Warn
            } else {
                FlowEvent::Success
            };
            return Ok(Resolution {
                event,
                selection: None,
            });
        }

        let candidates = candidate_ids
            .iter()
            .map(|id| self.registry.lookup(id).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let selection = self.selector.select(auth.service(), &candidates)?;
        let event = self.resolve(auth, selection.chosen());
        info!(
            attempt_id = %auth.attempt_id(),
            service = %auth.service(),
            provider = %selection.chosen().id(),
            event = %event,
            "resolved login flow event"
        );
        Ok(Resolution {
            event,
            selection: Some(selection),
        })
    }
}
