/*
 * Responsibility
 * - the request-scoped authentication context and what it holds
 * - transport creates it empty, the gate fills it at most once,
 *   handlers/extractors only read it
 *
 * Notes
 * - The context travels in request extensions; there is no ambient
 *   (thread-local / global) security state.
 */
use std::net::SocketAddr;

use crate::services::identity::Identity;

/// Request-origin metadata attached to an established authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub remote_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

/// An established authentication: who, plus where the request came from.
#[derive(Debug, Clone)]
pub struct Authentication {
    pub identity: Identity,
    pub details: RequestDetails,
}

/// Write-once holder of the request's authentication.
///
/// Empty means "anonymous / unauthenticated"; that is a valid, meaningful state.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    authentication: Option<Authentication>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.authentication.as_ref().map(|a| &a.identity)
    }

    /// Installs `authentication` unless the context is already populated.
    ///
    /// Returns `false` (and leaves the existing value untouched) when populated.
    pub fn install(&mut self, authentication: Authentication) -> bool {
        if self.authentication.is_some() {
            return false;
        }
        self.authentication = Some(authentication);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(subject: &str) -> Authentication {
        Authentication {
            identity: Identity::new(1, subject, vec!["ROLE_CUSTOMER".to_string()]),
            details: RequestDetails::default(),
        }
    }

    #[test]
    fn starts_empty() {
        let ctx = AuthContext::new();

        assert!(!ctx.is_authenticated());
        assert!(ctx.identity().is_none());
    }

    #[test]
    fn install_is_write_once() {
        let mut ctx = AuthContext::new();

        assert!(ctx.install(auth("alice@example.com")));
        assert!(!ctx.install(auth("mallory@example.com")));

        assert_eq!(
            ctx.identity().map(|i| i.subject.as_str()),
            Some("alice@example.com")
        );
    }
}
