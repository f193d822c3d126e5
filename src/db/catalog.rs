use sqlx::PgPool;

use crate::{
    error::Error,
    model::{Book, Employee},
};

use super::error::DatabaseError;

#[tracing::instrument(name = "get employees by department", skip(pool))]
pub async fn get_employees_by_department(
    pool: &PgPool,
    department: &str,
) -> Result<Vec<Employee>, Error> {
    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT
            id, name, department, salary
        FROM
            employees
        WHERE
            department = $1
        ORDER BY id
    "#,
    )
    .bind(department)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(employees)
}

#[tracing::instrument(name = "get highest paid employee", skip(pool))]
pub async fn get_highest_paid_employee(pool: &PgPool) -> Result<Employee, Error> {
    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT
            id, name, department, salary
        FROM
            employees
        ORDER BY salary DESC, id ASC
        LIMIT 1
    "#,
    )
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    employee.ok_or(Error::Database(DatabaseError::NotFound))
}

/// Prices are stored as `NUMERIC(10, 2)` and read back as `f64`.
#[tracing::instrument(name = "get books above price", skip(pool))]
pub async fn get_books_above_price(pool: &PgPool, min_price: f64) -> Result<Vec<Book>, Error> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT
            id, title, author, price::FLOAT8 AS price
        FROM
            books
        WHERE
            price > $1::NUMERIC
        ORDER BY id
    "#,
    )
    .bind(min_price)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::DatabaseError)?;

    Ok(books)
}
