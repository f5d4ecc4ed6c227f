//! The public API of the product engine.
//!
//! Each API type wraps a storage backend that implements one of the traits in [`crate::db::traits`]. Server code should
//! only ever talk to the backend through these types.
pub mod auth_api;
pub mod errors;
pub mod products_api;
