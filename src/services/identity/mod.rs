//! Identity resolution: subject (e-mail) -> principal with authorities.
use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;

pub mod postgres;

pub use postgres::PgIdentityResolver;

/// The resolved principal for a token subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub subject: String,
    pub authorities: Vec<String>,
}

impl Identity {
    pub fn new(user_id: i64, subject: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            user_id,
            subject: subject.into(),
            authorities,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no identity for subject")]
    NotFound,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Looks up identities by subject.
///
/// Shared across all requests; implementations must tolerate concurrent calls.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_by_subject(&self, subject: &str) -> Result<Identity, IdentityError>;
}

/// Maps a stored role name to an authority (`customer` -> `ROLE_CUSTOMER`).
pub fn role_authority(role: &str) -> String {
    let role = role.trim().to_ascii_uppercase();
    if role.starts_with("ROLE_") {
        role
    } else {
        format!("ROLE_{role}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_authority_prefixes_once() {
        assert_eq!(role_authority("customer"), "ROLE_CUSTOMER");
        assert_eq!(role_authority(" Admin "), "ROLE_ADMIN");
        assert_eq!(role_authority("ROLE_SELLER"), "ROLE_SELLER");
    }
}
