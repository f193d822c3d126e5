use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use blog_system::model::{ApiResponse, ErrorBody, Post};

use crate::{AppStateTest, insert_fake_comment, insert_fake_post, read_json};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn posts_should_return_user_posts_with_comments() {
    let mut test_state = AppStateTest::new(true).await;
    let author = test_state.create_user().await;
    let other = test_state.create_user().await;
    let pool = &test_state.app_state.pool;

    let first = insert_fake_post(pool, author.id).await;
    let second = insert_fake_post(pool, author.id).await;
    insert_fake_post(pool, other.id).await;
    insert_fake_comment(pool, other.id, first).await;
    insert_fake_comment(pool, author.id, first).await;

    let response = test_state
        .generate_response(get(&format!("/api/v1/users/{}/posts", author.id)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let posts = read_json::<ApiResponse<Vec<Post>>>(response)
        .await
        .data
        .unwrap();
    assert_eq!(
        posts.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert!(posts.iter().all(|p| p.user_id == author.id));
    assert_eq!(posts[0].comments.len(), 2);
    assert!(posts[1].comments.is_empty());

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn posts_should_be_not_found_for_missing_user() {
    let mut test_state = AppStateTest::new(true).await;

    let response = test_state
        .generate_response(get("/api/v1/users/999999/posts"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.message, "User not found");

    test_state.cleanup().await;
}
