use std::{collections::BTreeMap, fmt::Display};

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use product_engine::{AuthApiError, ProductApiError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    /// A storage or other internal failure. The message is returned to the client verbatim, so it must never contain
    /// internal details.
    #[error("{0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Product not found")]
    ProductNotFound,
    #[error("The given data was invalid. {0}")]
    ValidationError(ValidationErrors),
    #[error("The provided credentials are incorrect.")]
    InvalidCredentials,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationError(e) => match e {
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationError(errors) => json!({ "error": errors }),
            Self::InvalidCredentials => json!({ "error": [self.to_string()] }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl ServerError {
    /// Converts a product store error into a response error. Storage failures are logged and replaced by `message`, so
    /// that no internal detail reaches the client.
    pub fn from_product_error(e: ProductApiError, message: &str) -> Self {
        match e {
            ProductApiError::ProductNotFound(_) => Self::ProductNotFound,
            ProductApiError::InvalidStock(_) => {
                Self::ValidationError(ValidationErrors::single("stock", "The stock field must be at least 0."))
            },
            ProductApiError::DatabaseError(detail) => {
                error!("💻️ {message}. {detail}");
                Self::BackendError(message.to_string())
            },
        }
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(e: ValidationErrors) -> Self {
        Self::ValidationError(e)
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::InvalidCredentials => Self::InvalidCredentials,
            AuthApiError::IdentityNotFound => Self::AuthenticationError(AuthError::IdentityNotFound),
            AuthApiError::DatabaseError(_) | AuthApiError::PasswordHashError(_) => {
                error!("🔐️ Authentication backend failure. {e}");
                Self::BackendError("Unable to authenticate".to_string())
            },
        }
    }
}

//------------------------------------------------   AuthError   -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("The provided credentials are incorrect.")]
    InvalidCredentials,
    #[error("Authorization token not provided.")]
    MissingToken,
    #[error("Authorization token is not in the correct format. {0}")]
    MalformedToken(String),
    #[error("Authorization token signature is invalid.")]
    InvalidSignature,
    #[error("Authorization token has expired.")]
    Expired,
    #[error("User not found.")]
    IdentityNotFound,
    #[error("Could not issue access token. {0}")]
    CouldNotIssueToken(String),
}

//---------------------------------------------   ValidationErrors   ---------------------------------------------------
/// Field name to failure messages. Serializes as a plain JSON object, with fields in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn single<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add<S1: Into<String>, S2: Into<String>>(&mut self, field: S1, message: S2) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let all = self.0.values().flatten().map(String::as_str).collect::<Vec<_>>().join(" ");
        f.write_str(&all)
    }
}
