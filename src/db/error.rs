#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("Database error")]
    DatabaseError(sqlx::Error),
    #[error("Record not found")]
    NotFound,
}

impl DatabaseError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::DatabaseError(error) => error
                .as_database_error()
                .is_some_and(|e| e.is_unique_violation()),
            DatabaseError::NotFound => false,
        }
    }
}
