use anyhow::anyhow;
use sqlx::PgPool;

use crate::{
    error::Error,
    model::{Post, PostEntity},
};

use super::{
    comment::{delete_comments_by_post, get_comments_by_post_ids},
    error::DatabaseError,
    user::{decrement_post_count, get_users_by_ids, increment_post_count},
};

const POST_COLUMNS: &str = "id, title, content, user_id, comment_status, created_at, updated_at";

/// Inserts the post and bumps the author's post counter.
#[tracing::instrument(name = "insert post", skip(pool, title, content))]
pub async fn insert_post(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
) -> Result<i64, Error> {
    let mut tx = pool.begin().await.map_err(DatabaseError::DatabaseError)?;

    let post_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO posts
            (title, content, user_id)
        VALUES
            ($1, $2, $3)
        RETURNING id;
    "#,
    )
    .bind(title)
    .bind(content)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    increment_post_count(&mut tx, user_id).await?;

    tx.commit().await.map_err(DatabaseError::DatabaseError)?;

    Ok(post_id)
}

#[tracing::instrument(name = "get post entity", skip(pool))]
pub async fn get_post_entity_optional(
    pool: &PgPool,
    post_id: i64,
) -> Result<Option<PostEntity>, Error> {
    let post = sqlx::query_as::<_, PostEntity>(&format!(
        "SELECT {} FROM posts WHERE id = $1 AND deleted_at IS NULL;",
        POST_COLUMNS
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(post)
}

/// Loads a post with its author, and with its comments when asked to.
#[tracing::instrument(name = "get post by id", skip(pool))]
pub async fn get_post_by_id(
    pool: &PgPool,
    post_id: i64,
    with_comments: bool,
) -> Result<Post, Error> {
    let entity = get_post_entity_optional(pool, post_id)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    let mut posts = hydrate_posts(pool, vec![entity], with_comments).await?;

    posts
        .pop()
        .ok_or_else(|| Error::Other(anyhow!("post {} vanished while loading", post_id)))
}

#[tracing::instrument(name = "get posts with pagination", skip(pool))]
pub async fn get_posts_with_pagination(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Post>, i64), Error> {
    let total: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM posts WHERE deleted_at IS NULL;"#)
            .fetch_one(pool)
            .await
            .map_err(DatabaseError::DatabaseError)?;

    let entities = sqlx::query_as::<_, PostEntity>(&format!(
        r#"
        SELECT
            {}
        FROM
            posts
        WHERE
            deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        OFFSET $2
    "#,
        POST_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    let posts = hydrate_posts(pool, entities, false).await?;

    Ok((posts, total))
}

/// Live posts of a user, oldest first, each with its comments.
#[tracing::instrument(name = "get posts by user", skip(pool))]
pub async fn get_posts_by_user_with_comments(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Post>, Error> {
    let entities = sqlx::query_as::<_, PostEntity>(&format!(
        r#"
        SELECT
            {}
        FROM
            posts
        WHERE
            user_id = $1 AND deleted_at IS NULL
        ORDER BY created_at ASC, id ASC
    "#,
        POST_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    hydrate_posts(pool, entities, true).await
}

/// The live post with the most live comments. Ties go to the oldest id.
#[tracing::instrument(name = "get most commented post", skip(pool))]
pub async fn get_most_commented_post(pool: &PgPool) -> Result<Option<Post>, Error> {
    let entity = sqlx::query_as::<_, PostEntity>(
        r#"
        SELECT
            posts.id, posts.title, posts.content, posts.user_id,
            posts.comment_status, posts.created_at, posts.updated_at
        FROM
            posts
        LEFT JOIN
            comments ON comments.post_id = posts.id AND comments.deleted_at IS NULL
        WHERE
            posts.deleted_at IS NULL
        GROUP BY posts.id
        ORDER BY COUNT(comments.id) DESC, posts.id ASC
        LIMIT 1
    "#,
    )
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    match entity {
        Some(entity) => Ok(hydrate_posts(pool, vec![entity], true).await?.pop()),
        None => Ok(None),
    }
}

/// Applies the given fields; `None` keeps the stored value.
#[tracing::instrument(name = "update post", skip(pool, title, content))]
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET
            title = COALESCE($2, title),
            content = COALESCE($3, content),
            updated_at = NOW()
        WHERE
            id = $1 AND deleted_at IS NULL;
    "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(content)
    .execute(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

/// Soft-deletes the post and its comments in one transaction. A post that is
/// already gone, or not owned by `user_id`, is reported as not found and
/// leaves the author's counter untouched.
#[tracing::instrument(name = "delete post", skip(pool))]
pub async fn delete_post(pool: &PgPool, post_id: i64, user_id: i64) -> Result<(), Error> {
    let mut tx = pool.begin().await.map_err(DatabaseError::DatabaseError)?;

    let deleted = sqlx::query(
        r#"
        UPDATE posts
        SET
            deleted_at = NOW()
        WHERE
            id = $1 AND user_id = $2 AND deleted_at IS NULL;
    "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::DatabaseError)?
    .rows_affected();

    if deleted == 0 {
        return Err(Error::NotFound("Post not found"));
    }

    delete_comments_by_post(&mut tx, post_id).await?;
    decrement_post_count(&mut tx, user_id).await?;

    tx.commit().await.map_err(DatabaseError::DatabaseError)?;

    Ok(())
}

async fn hydrate_posts(
    pool: &PgPool,
    entities: Vec<PostEntity>,
    with_comments: bool,
) -> Result<Vec<Post>, Error> {
    if entities.is_empty() {
        return Ok(Vec::new());
    }

    let mut user_ids: Vec<i64> = entities.iter().map(|p| p.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let users = get_users_by_ids(pool, &user_ids).await?;

    let mut comments = if with_comments {
        let post_ids: Vec<i64> = entities.iter().map(|p| p.id).collect();
        get_comments_by_post_ids(pool, &post_ids).await?
    } else {
        Vec::new()
    };

    entities
        .into_iter()
        .map(|entity| {
            let user = users.get(&entity.user_id).cloned();
            let mut post = Post::from_entity(entity, user).map_err(|e| Error::Other(anyhow!(e)))?;

            let (own, rest): (Vec<_>, Vec<_>) =
                comments.drain(..).partition(|c| c.post_id == post.id);
            post.comments = own;
            comments = rest;

            Ok(post)
        })
        .collect()
}
