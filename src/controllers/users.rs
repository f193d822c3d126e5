use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    db::{post::get_posts_by_user_with_comments, user::get_user_by_id_optional},
    error::Error,
    model::{ApiResponse, Post},
    state::SharedAppState,
};

#[tracing::instrument(name = "[GET] users/{id}/posts", skip(app_state))]
pub async fn posts(
    State(app_state): State<SharedAppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Post>>>, Error> {
    get_user_by_id_optional(&app_state.pool, user_id)
        .await?
        .ok_or(Error::NotFound("User not found"))?;

    let posts = get_posts_by_user_with_comments(&app_state.pool, user_id).await?;

    Ok(Json(ApiResponse::success(posts)))
}
