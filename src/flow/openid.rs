//! OpenID fast-path guard.
//!
//! A request that is already part of a federated single-sign-on handshake
//! carries an `openid.mode` parameter. Such requests bypass credential
//! collection and divert straight into SSO ticket issuance, except for the
//! `associate` handshake which must take the normal path.

use crate::flow::LoginRequest;

/// Request parameter inspected by the fast-path guard.
pub const OPENID_MODE_PARAM: &str = "openid.mode";

const ASSOCIATE_MODE: &str = "associate";

/// Whether the request qualifies for the OpenID single-sign-on shortcut.
pub(crate) fn is_openid_sso_request(request: &LoginRequest) -> bool {
    match request.param(OPENID_MODE_PARAM) {
        Some(mode) => !mode.is_empty() && mode != ASSOCIATE_MODE,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{OPENID_MODE_PARAM, is_openid_sso_request};
    use crate::flow::LoginRequest;

    #[test]
    fn checkid_setup_takes_the_fast_path() {
        let request = LoginRequest::new("svc").with_param(OPENID_MODE_PARAM, "checkid_setup");
        assert!(is_openid_sso_request(&request));
    }

    #[test]
    fn associate_handshake_takes_the_normal_path() {
        let request = LoginRequest::new("svc").with_param(OPENID_MODE_PARAM, "associate");
        assert!(!is_openid_sso_request(&request));
    }

    #[test]
    fn missing_mode_takes_the_normal_path() {
        let request = LoginRequest::new("svc");
        assert!(!is_openid_sso_request(&request));
    }

    #[test]
    fn empty_mode_takes_the_normal_path() {
        let request = LoginRequest::new("svc").with_param(OPENID_MODE_PARAM, "");
        assert!(!is_openid_sso_request(&request));
    }
}
