use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProductApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Product not found: {0}")]
    ProductNotFound(i64),
    #[error("Stock level cannot be negative. Got {0}")]
    InvalidStock(i64),
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The provided credentials are incorrect.")]
    InvalidCredentials,
    #[error("Identity not found")]
    IdentityNotFound,
    #[error("Could not hash or verify password. {0}")]
    PasswordHashError(String),
}
