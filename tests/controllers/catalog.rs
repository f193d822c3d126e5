use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use blog_system::model::{ApiResponse, Book, Employee};

use crate::{AppStateTest, read_json};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn employees_should_require_department() {
    let test_state = AppStateTest::new(false).await;

    let response = test_state
        .generate_response(get("/api/v1/catalog/employees"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_state
        .generate_response(get("/api/v1/catalog/employees?department="))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn employees_should_filter_by_department() {
    let mut test_state = AppStateTest::new(true).await;

    let response = test_state
        .generate_response(get("/api/v1/catalog/employees?department=Engineering"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let employees = read_json::<ApiResponse<Vec<Employee>>>(response)
        .await
        .data
        .unwrap();
    assert_eq!(employees.len(), 4);
    assert!(employees.iter().all(|e| e.department == "Engineering"));

    let response = test_state
        .generate_response(get("/api/v1/catalog/employees?department=Nowhere"))
        .await;
    let employees = read_json::<ApiResponse<Vec<Employee>>>(response)
        .await
        .data
        .unwrap();
    assert!(employees.is_empty());

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn top_paid_should_return_highest_salary() {
    let mut test_state = AppStateTest::new(true).await;

    let response = test_state
        .generate_response(get("/api/v1/catalog/employees/top-paid"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let employee = read_json::<ApiResponse<Employee>>(response)
        .await
        .data
        .unwrap();
    assert_eq!(employee.name, "Zhao Liu");
    assert_eq!(employee.salary, 10000);

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn books_should_filter_by_price() {
    let mut test_state = AppStateTest::new(true).await;

    let response = test_state
        .generate_response(get("/api/v1/catalog/books"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let books = read_json::<ApiResponse<Vec<Book>>>(response)
        .await
        .data
        .unwrap();
    assert_eq!(books.len(), 4);
    assert!(books.iter().all(|b| b.price > 50.0));

    let response = test_state
        .generate_response(get("/api/v1/catalog/books?min_price=100"))
        .await;
    let books = read_json::<ApiResponse<Vec<Book>>>(response)
        .await
        .data
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].price, 128.0);

    test_state.cleanup().await;
}
