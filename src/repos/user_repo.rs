/*
 * Responsibility
 * - SQLx reads against the users table (identity lookup only)
 * - DB errors surface as RepoError
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: i64,
    pub email: String,
    pub role: String,
}

pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", email, role
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
