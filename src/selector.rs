//! Provider selection when more than one factor applies to a service.

use crate::error::Error;
use crate::provider::MfaProviderDescriptor;

/// The single provider chosen for one attempt, plus the candidates it beat.
#[derive(Clone, Debug)]
pub struct ProviderSelection {
    chosen: MfaProviderDescriptor,
    rejected: Vec<String>,
}

impl ProviderSelection {
    #[must_use]
    pub fn chosen(&self) -> &MfaProviderDescriptor {
        &self.chosen
    }

    /// Identifiers of the candidates that were not selected, in their
    /// original order. Kept for diagnostics only.
    #[must_use]
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

pub trait ProviderSelector: Send + Sync {
    /// Pick exactly one provider from a non-empty candidate list.
    ///
    /// # Errors
    /// Returns [`Error::NoApplicableProvider`] when `candidates` is empty.
    fn select(
        &self,
        service: &str,
        candidates: &[MfaProviderDescriptor],
    ) -> Result<ProviderSelection, Error>;
}

/// Deterministic selector: the first candidate in the caller-supplied order
/// wins. The ordering is owned by the service-policy configuration; the
/// selector never reorders, so identical input always yields the same
/// provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstProviderSelector;

impl ProviderSelector for FirstProviderSelector {
    fn select(
        &self,
        service: &str,
        candidates: &[MfaProviderDescriptor],
    ) -> Result<ProviderSelection, Error> {
        let Some((chosen, rest)) = candidates.split_first() else {
            return Err(Error::NoApplicableProvider(service.to_string()));
        };
        Ok(ProviderSelection {
            chosen: chosen.clone(),
            rejected: rest.iter().map(|d| d.id().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FirstProviderSelector, ProviderSelector};
    use crate::error::Error;
    use crate::provider::{MfaProviderDescriptor, VerificationPolicy};

    fn candidates() -> Vec<MfaProviderDescriptor> {
        vec![
            MfaProviderDescriptor::new("mfa-push", "Push", VerificationPolicy::EveryAttempt),
            MfaProviderDescriptor::new("mfa-sms", "SMS", VerificationPolicy::OncePerSession),
            MfaProviderDescriptor::new("mfa-totp", "TOTP", VerificationPolicy::OncePerSession),
        ]
    }

    #[test]
    fn first_candidate_wins() {
        let selector = FirstProviderSelector;
        let selection = selector.select("svc", &candidates()).unwrap();
        assert_eq!(selection.chosen().id(), "mfa-push");
        assert_eq!(selection.rejected(), ["mfa-sms", "mfa-totp"]);
    }

    #[test]
    fn selection_is_reproducible() {
        let selector = FirstProviderSelector;
        for _ in 0..10 {
            let selection = selector.select("svc", &candidates()).unwrap();
            assert_eq!(selection.chosen().id(), "mfa-push");
        }
    }

    #[test]
    fn empty_candidates_fail() {
        let selector = FirstProviderSelector;
        let err = selector.select("svc", &[]).unwrap_err();
        assert!(matches!(err, Error::NoApplicableProvider(service) if service == "svc"));
    }
}
