//! Product Engine
//!
//! The product engine holds the core logic of the product catalogue service. It knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The public API ([`mod@api`]). [`ProductApi`] manages the product catalogue and [`AuthApi`] verifies login
//!    credentials. Backends need to implement the traits in [`db::traits`] in order to back these APIs.
pub mod db;

pub mod api;
pub mod db_types;
pub mod helpers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    auth_api::AuthApi,
    errors::{AuthApiError, ProductApiError},
    products_api::ProductApi,
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{IdentityManagement, ProductManagement};
