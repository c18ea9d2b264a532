//! Flow settings loaded at startup.
//!
//! The settings own the per-service provider ordering (the selector never
//! reorders), the context attribute under which satisfied factors are
//! recorded, and the force-re-verification override.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default attribute under which satisfied factors are recorded.
pub const DEFAULT_CONTEXT_ATTRIBUTE: &str = "authn_method";

const ENV_FORCE_VERIFICATION: &str = "PASEJO_MFA_FORCE_VERIFICATION";
const ENV_CONTEXT_ATTRIBUTE: &str = "PASEJO_MFA_CONTEXT_ATTRIBUTE";

/// MFA flow configuration, frozen after startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowSettings {
    #[serde(default = "default_context_attribute")]
    context_attribute: String,
    #[serde(default)]
    force_verification: bool,
    /// Applicable provider identifiers per service, in enforcement order.
    #[serde(default)]
    service_providers: HashMap<String, Vec<String>>,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowSettings {
    #[must_use]
    pub fn new() -> Self {
        Self {
            context_attribute: default_context_attribute(),
            force_verification: false,
            service_providers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_context_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.context_attribute = attribute.into();
        self
    }

    #[must_use]
    pub fn with_force_verification(mut self, force: bool) -> Self {
        self.force_verification = force;
        self
    }

    /// Configure the applicable providers for `service`, in enforcement order.
    #[must_use]
    pub fn with_service_providers(
        mut self,
        service: impl Into<String>,
        providers: Vec<String>,
    ) -> Self {
        self.service_providers.insert(service.into(), providers);
        self
    }

    #[must_use]
    pub fn context_attribute(&self) -> &str {
        &self.context_attribute
    }

    #[must_use]
    pub fn force_verification(&self) -> bool {
        self.force_verification
    }

    /// Provider identifiers configured for `service`; empty when the service
    /// has no MFA requirement.
    #[must_use]
    pub fn providers_for(&self, service: &str) -> &[String] {
        self.service_providers
            .get(service)
            .map_or(&[], Vec::as_slice)
    }

    /// Parse settings from a JSON document.
    ///
    /// # Errors
    /// Returns [`Error::Json`] when the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(document)?)
    }

    /// Apply environment-variable overrides on top of the current settings.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(force) = parse_bool_env(ENV_FORCE_VERIFICATION) {
            self.force_verification = force;
        }
        if let Ok(attribute) = std::env::var(ENV_CONTEXT_ATTRIBUTE) {
            let attribute = attribute.trim();
            if !attribute.is_empty() {
                self.context_attribute = attribute.to_string();
            }
        }
        self
    }
}

fn default_context_attribute() -> String {
    DEFAULT_CONTEXT_ATTRIBUTE.to_string()
}

fn parse_bool_env(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|value| match value.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CONTEXT_ATTRIBUTE, ENV_FORCE_VERIFICATION, FlowSettings, parse_bool_env};

    #[test]
    fn defaults() {
        let settings = FlowSettings::new();
        assert_eq!(settings.context_attribute(), DEFAULT_CONTEXT_ATTRIBUTE);
        assert!(!settings.force_verification());
        assert!(settings.providers_for("https://app.example.org").is_empty());
    }

    #[test]
    fn builder_overrides() {
        let settings = FlowSettings::new()
            .with_context_attribute("mfa_context")
            .with_force_verification(true)
            .with_service_providers(
                "svc",
                vec!["mfa-push".to_string(), "mfa-sms".to_string()],
            );

        assert_eq!(settings.context_attribute(), "mfa_context");
        assert!(settings.force_verification());
        assert_eq!(settings.providers_for("svc"), ["mfa-push", "mfa-sms"]);
    }

    #[test]
    fn json_document_round_trip() {
        let settings = FlowSettings::from_json(
            r#"{
                "context_attribute": "authn_context",
                "force_verification": true,
                "service_providers": { "svc": ["mfa-push"] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.context_attribute(), "authn_context");
        assert!(settings.force_verification());
        assert_eq!(settings.providers_for("svc"), ["mfa-push"]);
    }

    #[test]
    fn json_defaults_apply_to_missing_fields() {
        let settings = FlowSettings::from_json("{}").unwrap();
        assert_eq!(settings.context_attribute(), DEFAULT_CONTEXT_ATTRIBUTE);
        assert!(!settings.force_verification());
    }

    #[test]
    fn malformed_json_fails() {
        assert!(FlowSettings::from_json("not json").is_err());
    }

    #[test]
    fn env_override_accepts_boolean_spellings() {
        temp_env::with_var(ENV_FORCE_VERIFICATION, Some("yes"), || {
            let settings = FlowSettings::new().with_env_overrides();
            assert!(settings.force_verification());
        });
        temp_env::with_var(ENV_FORCE_VERIFICATION, Some("0"), || {
            let settings = FlowSettings::new()
                .with_force_verification(true)
                .with_env_overrides();
            assert!(!settings.force_verification());
        });
        temp_env::with_var(ENV_FORCE_VERIFICATION, Some("maybe"), || {
            let settings = FlowSettings::new().with_env_overrides();
            assert!(!settings.force_verification());
        });
    }

    #[test]
    fn parse_bool_env_ignores_unset_keys() {
        assert_eq!(parse_bool_env("PASEJO_MFA_FORCE_VERIFICATION_NOT_SET"), None);
    }
}
