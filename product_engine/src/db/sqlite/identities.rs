use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Identity, NewIdentity},
};

pub async fn identity_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Identity>, SqliteDatabaseError> {
    let identity = sqlx::query_as::<_, Identity>(
        r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1;
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await?;
    Ok(identity)
}

pub async fn identity_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Identity>, SqliteDatabaseError> {
    let identity = sqlx::query_as::<_, Identity>(
        r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(identity)
}

/// Inserts a new identity. Fails with a driver error if the email is already taken.
pub async fn insert_identity(
    identity: NewIdentity,
    conn: &mut SqliteConnection,
) -> Result<Identity, SqliteDatabaseError> {
    let now = Utc::now();
    let record = sqlx::query_as::<_, Identity>(
        r#"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, email, password_hash, created_at, updated_at;
        "#,
    )
    .bind(identity.email)
    .bind(identity.password_hash)
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Identity #{} ({}) has been created", record.id, record.email);
    Ok(record)
}
