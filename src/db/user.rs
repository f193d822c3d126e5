use std::collections::HashMap;

use anyhow::Context;
use secrecy::SecretString;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    auth::compute_password_hash, error::Error, model::User,
    telemetry::spawn_blocking_with_tracing,
};

use super::{PostgresTransaction, error::DatabaseError};

#[derive(sqlx::FromRow)]
struct UserCredential {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

#[tracing::instrument(name = "create user", skip_all, fields(username, email))]
pub async fn create_user(
    pool: &PgPool,
    username: String,
    email: String,
    password: SecretString,
) -> Result<User, Error> {
    let username_taken: bool =
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)"#)
            .bind(&username)
            .fetch_one(pool)
            .await
            .map_err(DatabaseError::DatabaseError)?;
    if username_taken {
        return Err(Error::Conflict("Username already exists"));
    }

    let email_taken: bool =
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
            .bind(&email)
            .fetch_one(pool)
            .await
            .map_err(DatabaseError::DatabaseError)?;
    if email_taken {
        return Err(Error::Conflict("Email already exists"));
    }

    let password_hashed = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("compute password hash")
        .map_err(Error::Other)??;

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (username, email, password)
        VALUES
            ($1, $2, $3)
        RETURNING
            id, username, email, post_count, created_at, updated_at;
    "#,
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hashed)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        // Lost a race against a concurrent registration.
        let error = DatabaseError::DatabaseError(e);
        if error.is_unique_violation() {
            Error::Conflict("Username or email already exists")
        } else {
            Error::Database(error)
        }
    })
}

/// Returns the user together with the stored password hash.
#[tracing::instrument(name = "get user credential", skip_all, fields(username))]
pub async fn get_user_credential_optional(
    pool: &PgPool,
    username: &str,
) -> Result<Option<(User, String)>, Error> {
    let credential = sqlx::query_as::<_, UserCredential>(
        r#"
        SELECT
            id, username, email, post_count, created_at, updated_at, password
        FROM
            users
        WHERE
            username = $1;
    "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(credential.map(|c| (c.user, c.password)))
}

#[tracing::instrument(name = "get user by id", skip(pool))]
pub async fn get_user_by_id_optional(pool: &PgPool, user_id: i64) -> Result<Option<User>, Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT
            id, username, email, post_count, created_at, updated_at
        FROM
            users
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::Database(DatabaseError::DatabaseError(e)))
}

#[tracing::instrument(name = "get users by ids", skip_all, fields(count = user_ids.len()))]
pub async fn get_users_by_ids(
    pool: &PgPool,
    user_ids: &[i64],
) -> Result<HashMap<i64, User>, Error> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT
            id, username, email, post_count, created_at, updated_at
        FROM
            users
        WHERE
            id in (
    "#,
    );
    let mut separated = query_builder.separated(", ");
    for user_id in user_ids {
        separated.push_bind(*user_id);
    }
    separated.push_unseparated(");");

    let users = query_builder
        .build_query_as::<User>()
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::DatabaseError)?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn increment_post_count(tx: &mut PostgresTransaction, user_id: i64) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET
            post_count = post_count + 1,
            updated_at = NOW()
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

pub async fn decrement_post_count(tx: &mut PostgresTransaction, user_id: i64) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET
            post_count = GREATEST(post_count - 1, 0),
            updated_at = NOW()
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}
