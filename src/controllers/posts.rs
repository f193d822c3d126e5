use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    db::post::{
        delete_post, get_most_commented_post, get_post_by_id, get_post_entity_optional,
        get_posts_with_pagination, insert_post, update_post,
    },
    error::Error,
    middlewares::Viewer,
    model::{ApiResponse, Post, PostPage, User},
    state::SharedAppState,
};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters are parsed leniently: anything unusable falls back to
/// the defaults instead of rejecting the request.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct Pagination {
    page: Option<String>,
    page_size: Option<String>,
}

impl Pagination {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| (1..=MAX_PAGE_SIZE).contains(p))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Saturates instead of overflowing for very large page numbers.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 200, message = "Title length must be at most 200"))]
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    /// Empty strings mean "leave unchanged".
    fn changes(&self) -> (Option<&str>, Option<&str>) {
        let title = self.title.as_deref().filter(|t| !t.is_empty());
        let content = self.content.as_deref().filter(|c| !c.is_empty());
        (title, content)
    }
}

#[tracing::instrument(name = "[GET] posts", skip_all, fields(viewer_id))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    Extension(viewer): Extension<Viewer>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PostPage>>, Error> {
    if let Some(user) = &viewer.0 {
        tracing::Span::current().record("viewer_id", user.id);
    }

    let page = pagination.page();
    let page_size = pagination.page_size();
    let offset = pagination.offset();

    let (posts, total) = get_posts_with_pagination(&app_state.pool, page_size, offset).await?;

    Ok(Json(ApiResponse::success(PostPage::new(
        posts, total, page, page_size,
    ))))
}

#[tracing::instrument(name = "[GET] posts/{id}", skip(app_state))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Post>>, Error> {
    let post = get_post_by_id(&app_state.pool, id, true).await?;

    Ok(Json(ApiResponse::success(post)))
}

#[tracing::instrument(name = "[GET] posts/most-commented", skip_all)]
pub async fn most_commented(
    State(app_state): State<SharedAppState>,
) -> Result<Json<ApiResponse<Post>>, Error> {
    let post = get_most_commented_post(&app_state.pool)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    Ok(Json(ApiResponse::success(post)))
}

#[tracing::instrument(name = "[POST] posts", skip_all)]
pub async fn store(
    State(app_state): State<SharedAppState>,
    Extension(user): Extension<Arc<User>>,
    axum::extract::Json(request): axum::extract::Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let post_id = insert_post(&app_state.pool, user.id, &request.title, &request.content).await?;
    let post = get_post_by_id(&app_state.pool, post_id, false).await?;

    Ok(Json(ApiResponse::with_message("Post created", post)))
}

#[tracing::instrument(name = "[PUT] posts/{id}", skip(app_state, user, request))]
pub async fn update(
    State(app_state): State<SharedAppState>,
    Extension(user): Extension<Arc<User>>,
    Path(id): Path<i64>,
    axum::extract::Json(request): axum::extract::Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let post = get_post_entity_optional(&app_state.pool, id)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    if post.user_id != user.id {
        return Err(Error::Forbidden("No permission to modify this post"));
    }

    let (title, content) = request.changes();
    update_post(&app_state.pool, id, title, content).await?;

    let post = get_post_by_id(&app_state.pool, id, false).await?;

    Ok(Json(ApiResponse::with_message("Post updated", post)))
}

#[tracing::instrument(name = "[DELETE] posts/{id}", skip(app_state, user))]
pub async fn destroy(
    State(app_state): State<SharedAppState>,
    Extension(user): Extension<Arc<User>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, Error> {
    let post = get_post_entity_optional(&app_state.pool, id)
        .await?
        .ok_or(Error::NotFound("Post not found"))?;

    if post.user_id != user.id {
        return Err(Error::Forbidden("No permission to delete this post"));
    }

    delete_post(&app_state.pool, id, user.id).await?;

    Ok(Json(ApiResponse::message_only("Post deleted")))
}
