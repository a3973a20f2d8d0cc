use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::user_repo::{self, UserRow};
use crate::services::identity::{Identity, IdentityError, IdentityResolver, role_authority};

/// Identity lookup against the `users` table.
#[derive(Clone, Debug)]
pub struct PgIdentityResolver {
    db: PgPool,
}

impl PgIdentityResolver {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity::new(row.id, row.email, vec![role_authority(&row.role)])
    }
}

#[async_trait]
impl IdentityResolver for PgIdentityResolver {
    async fn resolve_by_subject(&self, subject: &str) -> Result<Identity, IdentityError> {
        user_repo::find_by_email(&self.db, subject)
            .await?
            .map(Identity::from)
            .ok_or(IdentityError::NotFound)
    }
}
