//! MFA provider descriptors and the boot-time provider registry.
//!
//! The registry is populated once while the process boots (exclusive `&mut`
//! phase), then frozen behind an `Arc` and read concurrently without locks.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Re-verification policy for a configured second factor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPolicy {
    /// Challenge on every login attempt, prior satisfaction notwithstanding.
    EveryAttempt,
    /// Challenge once, then honor the satisfied factor for the session.
    OncePerSession,
}

impl VerificationPolicy {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::EveryAttempt => "every_attempt",
            Self::OncePerSession => "once_per_session",
        }
    }
}

/// A configured second-factor mechanism. Immutable after startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MfaProviderDescriptor {
    id: String,
    label: String,
    policy: VerificationPolicy,
}

impl MfaProviderDescriptor {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        policy: VerificationPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            policy,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn policy(&self) -> VerificationPolicy {
        self.policy
    }
}

/// Process-wide registry of configured MFA providers.
///
/// Append-only during boot, then frozen via [`ProviderRegistry::into_shared`].
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, MfaProviderDescriptor>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider descriptor.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateProvider`] when the identifier is taken.
    pub fn register(&mut self, descriptor: MfaProviderDescriptor) -> Result<(), Error> {
        if self.providers.contains_key(descriptor.id()) {
            return Err(Error::DuplicateProvider(descriptor.id().to_string()));
        }
        debug!(
            provider = %descriptor.id(),
            policy = descriptor.policy().as_str(),
            "registered MFA provider"
        );
        self.providers
            .insert(descriptor.id().to_string(), descriptor);
        Ok(())
    }

    /// Look up a provider by identifier.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProvider`] when absent.
    pub fn lookup(&self, id: &str) -> Result<&MfaProviderDescriptor, Error> {
        self.providers
            .get(id)
            .ok_or_else(|| Error::UnknownProvider(id.to_string()))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Freeze the registry for concurrent read-only use.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
