//! Per-attempt authentication record.
//!
//! Flow Overview:
//! 1) The external credential validator creates one `AuthenticationResult`
//!    per login attempt, carrying the primary outcome.
//! 2) The resolver reads it to pick a flow event; the metadata populator
//!    extends its satisfied-factor set after a successful factor check.
//! 3) The record is discarded at end of request unless the surrounding flow
//!    engine promotes it into a session ticket.
//!
//! Security boundaries: the record is request-scoped and never shared across
//! concurrent attempts; satisfied factors are grouped under a configured
//! context attribute so downstream audit can see which factor was enforced.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

/// Outcome of primary credential validation for one login attempt.
#[derive(Clone, Debug)]
pub struct AuthenticationResult {
    attempt_id: Uuid,
    principal: String,
    service: String,
    attributes: HashMap<String, BTreeSet<String>>,
    failure: Option<String>,
    warnings: Vec<String>,
}

impl AuthenticationResult {
    /// A successful primary authentication for `principal` against `service`.
    #[must_use]
    pub fn new(principal: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            principal: principal.into(),
            service: service.into(),
            attributes: HashMap::new(),
            failure: None,
            warnings: Vec::new(),
        }
    }

    /// A failed primary authentication, carrying the failure reason.
    #[must_use]
    pub fn failed(
        principal: impl Into<String>,
        service: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let mut result = Self::new(principal, service);
        result.failure = Some(reason.into());
        result
    }

    /// Attach a warning condition (e.g. impending credential expiry).
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    #[must_use]
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Values recorded under `attribute`, `None` when the key was never set.
    #[must_use]
    pub fn attribute(&self, attribute: &str) -> Option<&BTreeSet<String>> {
        self.attributes.get(attribute)
    }

    /// Whether `value` is present under `attribute`.
    #[must_use]
    pub fn attribute_contains(&self, attribute: &str, value: &str) -> bool {
        self.attributes
            .get(attribute)
            .is_some_and(|values| values.contains(value))
    }

    /// Record `value` under `attribute`. Returns `false` when it was already
    /// present (set semantics).
    pub(crate) fn record_attribute(&mut self, attribute: &str, value: &str) -> bool {
        self.attributes
            .entry(attribute.to_string())
            .or_default()
            .insert(value.to_string())
    }
}
