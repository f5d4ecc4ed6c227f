use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------      Product        ---------------------------------------------------------
/// A product record, as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Product #{} ({}, {} in stock @ {})", self.id, self.name, self.stock, self.price)
    }
}

//--------------------------------------     NewProduct      ---------------------------------------------------------
/// The fields required to create a new product. The id and timestamps are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, description: S2, price: f64, stock: i64) -> Self {
        Self { name: name.into(), description: description.into(), price, stock }
    }
}

//--------------------------------------   ProductUpdate     ---------------------------------------------------------
/// A partial update to a product. Fields that are `None` are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl ProductUpdate {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

}

//--------------------------------------      Identity       ---------------------------------------------------------
/// A login principal. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewIdentity      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    /// An Argon2id PHC string. Use [`crate::helpers::hash_password`] to produce one.
    pub password_hash: String,
}
