//! # Pasejo (Login-Flow MFA Decision Engine)
//!
//! `pasejo` routes one login attempt through zero or more second-factor
//! (MFA) challenges to a terminal outcome. It owns the decision and
//! transition logic only; credential validation, the factor vendor client,
//! ticket storage, and view rendering are external collaborators.
//!
//! ## Flow Overview
//!
//! 1) The inbound request hits the OpenID fast-path decision: a federated
//!    single-sign-on request (non-empty `openid.mode`, not `associate`)
//!    diverts straight into SSO ticket issuance.
//! 2) Otherwise credentials are collected and validated externally, yielding
//!    an [`authentication::AuthenticationResult`].
//! 3) The [`resolver::EventResolver`] consults the provider registry and
//!    selector and emits one [`resolver::FlowEvent`] per attempt, with fixed
//!    precedence `Error > SecondFactorRequired > Warn > Success`.
//! 4) The [`metadata::MetadataPopulator`] records the satisfied factor; the
//!    validated [`flow::FlowGraph`] advances the attempt to the next state.
//!
//! ## Lifecycle
//!
//! The provider registry and the flow graph are built once at startup,
//! validated, and frozen behind `Arc` before request handling begins; every
//! per-attempt value is request-scoped, so concurrent attempts share no
//! mutable state and need no locks.

pub mod authentication;
pub mod error;
pub mod flow;
pub mod metadata;
pub mod provider;
pub mod resolver;
pub mod selector;
pub mod settings;

pub use authentication::AuthenticationResult;
pub use error::Error;
pub use flow::{FlowGraph, LoginRequest, standard_login_flow};
pub use metadata::MetadataPopulator;
pub use provider::{MfaProviderDescriptor, ProviderRegistry, VerificationPolicy};
pub use resolver::{EventResolver, FlowEvent, Resolution};
pub use selector::{FirstProviderSelector, ProviderSelection, ProviderSelector};
pub use settings::FlowSettings;
