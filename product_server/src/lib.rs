//! # Product API server
//! This crate hosts the HTTP server for the product catalogue. It is responsible for:
//! * Issuing access tokens to users that log in with an email and password.
//! * Checking the access token on every protected route.
//! * Validating product payloads and passing them on to the [`product_engine::ProductApi`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/login`: Exchanges credentials for an access token.
//! * `GET, POST /api/products`: List and create products.
//! * `GET, PUT, DELETE /api/products/{id}`: Read, partially update and delete a product.
//! * `PUT /api/products/{id}/stock`: Set the stock level of a product.
//! * `GET /api/user`: The identity the access token was issued to.
//! * `GET /api/secure-data`: A static message, for checking that a token works.
//!
//! All `/api` routes except login require an `Authorization: Bearer <token>` header.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod validation;
