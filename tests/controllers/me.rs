use axum::http::StatusCode;
use blog_system::model::{ApiResponse, User};

use crate::{AppStateTest, authorized_request, read_json};

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn profile_should_return_current_user() {
    let mut test_state = AppStateTest::new(true).await;

    let (user, token) = test_state.generate_jwt_with_user().await;

    let request = authorized_request("GET", "/api/v1/profile", &token);
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResponse<User> = read_json(response).await;
    let user_result = body.data.unwrap();
    assert_eq!(user.id, user_result.id);
    assert_eq!(user.username, user_result.username);
    assert_eq!(user.email, user_result.email);

    test_state.cleanup().await;
}
