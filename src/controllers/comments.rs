use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    db::{
        comment::{
            delete_comment, get_comment_by_id, get_comment_entity_optional,
            get_comments_by_post_ids, insert_comment,
        },
        post::get_post_entity_optional,
    },
    error::Error,
    model::{ApiResponse, Comment, User},
    state::SharedAppState,
};

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(range(min = 1, message = "Post id is required"))]
    pub post_id: i64,
}

#[tracing::instrument(name = "[GET] posts/{id}/comments", skip(app_state))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, Error> {
    get_post_entity_optional(&app_state.pool, post_id)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    let comments = get_comments_by_post_ids(&app_state.pool, &[post_id]).await?;

    Ok(Json(ApiResponse::success(comments)))
}

#[tracing::instrument(name = "[POST] comments", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Extension(user): Extension<Arc<User>>,
    axum::extract::Json(request): axum::extract::Json<CreateCommentRequest>,
) -> Result<Json<ApiResponse<Comment>>, Error> {
    request.validate().map_err(Error::Validation)?;

    get_post_entity_optional(&app_state.pool, request.post_id)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    let comment_id =
        insert_comment(&app_state.pool, user.id, request.post_id, &request.content).await?;
    let comment = get_comment_by_id(&app_state.pool, comment_id).await?;

    Ok(Json(ApiResponse::with_message("Comment created", comment)))
}

#[tracing::instrument(name = "[DELETE] comments/{id}", skip(app_state, user))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Extension(user): Extension<Arc<User>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, Error> {
    let comment = get_comment_entity_optional(&app_state.pool, id)
        .await?
        .ok_or(Error::NotFound("Comment not found"))?;

    if comment.user_id != user.id {
        return Err(Error::Forbidden("No permission to delete this comment"));
    }

    delete_comment(&app_state.pool, comment.id, comment.post_id).await?;

    Ok(Json(ApiResponse::message_only("Comment deleted")))
}
