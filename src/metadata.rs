//! Records which MFA provider satisfied an attempt on the authentication
//! record, under the configured context attribute.

use tracing::debug;

use crate::authentication::AuthenticationResult;
use crate::provider::MfaProviderDescriptor;

/// Appends the satisfied provider to the authentication record so downstream
/// ticket issuance and audit can see which factor was enforced.
#[derive(Clone, Debug)]
pub struct MetadataPopulator {
    context_attribute: String,
}

impl MetadataPopulator {
    #[must_use]
    pub fn new(context_attribute: impl Into<String>) -> Self {
        Self {
            context_attribute: context_attribute.into(),
        }
    }

    #[must_use]
    pub fn context_attribute(&self) -> &str {
        &self.context_attribute
    }

    /// Record `provider` as satisfied. Idempotent: populating the same
    /// provider twice for one attempt is a no-op. Returns whether the entry
    /// was newly recorded.
    pub fn populate(
        &self,
        auth: &mut AuthenticationResult,
        provider: &MfaProviderDescriptor,
    ) -> bool {
        let recorded = auth.record_attribute(&self.context_attribute, provider.id());
        if recorded {
            debug!(
                attempt_id = %auth.attempt_id(),
                provider = %provider.id(),
                attribute = %self.context_attribute,
                "recorded satisfied MFA provider"
            );
        }
        recorded
    }
}
