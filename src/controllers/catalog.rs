use axum::{
    Json,
    extract::{Query, State},
};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::Validate;

use crate::{
    db::catalog::{get_books_above_price, get_employees_by_department, get_highest_paid_employee},
    error::Error,
    model::{ApiResponse, Book, Employee},
    state::SharedAppState,
};

const DEFAULT_MIN_PRICE: f64 = 50.0;

#[derive(serde::Deserialize, serde::Serialize, Debug, Validate)]
pub struct DepartmentQuery {
    #[validate(length(min = 1, max = 50, message = "Department is required"))]
    department: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Validate)]
pub struct PriceQuery {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(range(min = 0.0))]
    min_price: Option<f64>,
}

#[tracing::instrument(name = "[GET] catalog/employees", skip(app_state))]
pub async fn employees(
    State(app_state): State<SharedAppState>,
    Query(query): Query<DepartmentQuery>,
) -> Result<Json<ApiResponse<Vec<Employee>>>, Error> {
    query.validate().map_err(Error::Validation)?;

    let employees = get_employees_by_department(&app_state.pool, &query.department).await?;

    Ok(Json(ApiResponse::success(employees)))
}

#[tracing::instrument(name = "[GET] catalog/employees/top-paid", skip_all)]
pub async fn top_paid(
    State(app_state): State<SharedAppState>,
) -> Result<Json<ApiResponse<Employee>>, Error> {
    let employee = get_highest_paid_employee(&app_state.pool).await?;

    Ok(Json(ApiResponse::success(employee)))
}

#[tracing::instrument(name = "[GET] catalog/books", skip(app_state))]
pub async fn books(
    State(app_state): State<SharedAppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<ApiResponse<Vec<Book>>>, Error> {
    query.validate().map_err(Error::Validation)?;

    let min_price = query.min_price.unwrap_or(DEFAULT_MIN_PRICE);
    let books = get_books_above_price(&app_state.pool, min_price).await?;

    Ok(Json(ApiResponse::success(books)))
}
