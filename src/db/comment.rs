use futures::TryStreamExt;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Error,
    model::{Comment, CommentEntity, CommentStatus},
};

use super::{PostgresTransaction, error::DatabaseError, user::get_users_by_ids};

const COMMENT_COLUMNS: &str = "id, content, user_id, post_id, created_at, updated_at";

/// Inserts the comment and flags its post as commented.
#[tracing::instrument(name = "insert comment", skip(pool, content))]
pub async fn insert_comment(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
    content: &str,
) -> Result<i64, Error> {
    let mut tx = pool.begin().await.map_err(DatabaseError::DatabaseError)?;

    let comment_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments
            (content, user_id, post_id)
        VALUES
            ($1, $2, $3)
        RETURNING id;
    "#,
    )
    .bind(content)
    .bind(user_id)
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    update_comment_status(&mut tx, post_id, CommentStatus::HasComments).await?;

    tx.commit().await.map_err(DatabaseError::DatabaseError)?;

    Ok(comment_id)
}

#[tracing::instrument(name = "get comment entity", skip(pool))]
pub async fn get_comment_entity_optional(
    pool: &PgPool,
    comment_id: i64,
) -> Result<Option<CommentEntity>, Error> {
    let comment = sqlx::query_as::<_, CommentEntity>(&format!(
        "SELECT {} FROM comments WHERE id = $1 AND deleted_at IS NULL;",
        COMMENT_COLUMNS
    ))
    .bind(comment_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(comment)
}

/// Loads a comment with its author.
#[tracing::instrument(name = "get comment by id", skip(pool))]
pub async fn get_comment_by_id(pool: &PgPool, comment_id: i64) -> Result<Comment, Error> {
    let entity = get_comment_entity_optional(pool, comment_id)
        .await?
        .ok_or(Error::NotFound("Comment not found"))?;

    let mut users = get_users_by_ids(pool, &[entity.user_id]).await?;
    let user = users.remove(&entity.user_id);

    Ok(Comment::from_entity(entity, user))
}

/// Live comments of the given posts, oldest first, each with its author.
#[tracing::instrument(name = "get comments by post ids", skip_all, fields(count = post_ids.len()))]
pub async fn get_comments_by_post_ids(
    pool: &PgPool,
    post_ids: &[i64],
) -> Result<Vec<Comment>, Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        r#"
        SELECT
            {}
        FROM
            comments
        WHERE
            deleted_at IS NULL
            AND post_id in (
    "#,
        COMMENT_COLUMNS
    ));
    let mut separated = query_builder.separated(", ");
    for post_id in post_ids {
        separated.push_bind(*post_id);
    }
    separated.push_unseparated(") ORDER BY created_at ASC, id ASC;");

    let mut comment_stream = query_builder.build_query_as::<CommentEntity>().fetch(pool);

    let mut entities = Vec::new();
    while let Some(entity) = comment_stream
        .try_next()
        .await
        .map_err(DatabaseError::DatabaseError)?
    {
        entities.push(entity);
    }
    drop(comment_stream);

    let mut user_ids: Vec<i64> = entities.iter().map(|c| c.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let users = get_users_by_ids(pool, &user_ids).await?;

    Ok(entities
        .into_iter()
        .map(|entity| {
            let user = users.get(&entity.user_id).cloned();
            Comment::from_entity(entity, user)
        })
        .collect())
}

/// Soft-deletes the comment. When it was the last live comment of its post,
/// the post is flagged as uncommented.
#[tracing::instrument(name = "delete comment", skip(pool))]
pub async fn delete_comment(pool: &PgPool, comment_id: i64, post_id: i64) -> Result<(), Error> {
    let mut tx = pool.begin().await.map_err(DatabaseError::DatabaseError)?;

    let deleted = sqlx::query(
        r#"
        UPDATE comments
        SET
            deleted_at = NOW()
        WHERE
            id = $1 AND deleted_at IS NULL;
    "#,
    )
    .bind(comment_id)
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?
    .rows_affected();

    if deleted == 0 {
        return Err(Error::NotFound("Comment not found"));
    }

    let remaining: i64 = sqlx::query_scalar(
        r#"
        SELECT
            COUNT(*)
        FROM
            comments
        WHERE
            post_id = $1 AND deleted_at IS NULL;
    "#,
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    if remaining == 0 {
        update_comment_status(&mut tx, post_id, CommentStatus::NoComments).await?;
    }

    tx.commit().await.map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

pub async fn delete_comments_by_post(
    tx: &mut PostgresTransaction,
    post_id: i64,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE comments
        SET
            deleted_at = NOW()
        WHERE
            post_id = $1 AND deleted_at IS NULL;
    "#,
    )
    .bind(post_id)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

async fn update_comment_status(
    tx: &mut PostgresTransaction,
    post_id: i64,
    status: CommentStatus,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET
            comment_status = $1
        WHERE
            id = $2;
    "#,
    )
    .bind(status.as_str())
    .bind(post_id)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}
