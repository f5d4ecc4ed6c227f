use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{identities, new_pool, products, SqliteDatabaseError};
use crate::{
    api::errors::{AuthApiError, ProductApiError},
    db::traits::{IdentityManagement, ProductManagement},
    db_types::{Identity, NewIdentity, NewProduct, Product, ProductUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl ProductManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let product = products::insert_product(product, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let product = products::fetch_product(id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_all_products(&self) -> Result<Vec<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let products = products::fetch_all_products(&mut conn).await?;
        Ok(products)
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let product = products::update_product(id, update, &mut conn).await?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let deleted = products::delete_product(id, &mut conn).await?;
        Ok(deleted)
    }
}

impl IdentityManagement for SqliteDatabase {
    async fn fetch_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let identity = identities::identity_by_email(email, &mut conn).await?;
        Ok(identity)
    }

    async fn fetch_identity(&self, id: i64) -> Result<Option<Identity>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let identity = identities::identity_by_id(id, &mut conn).await?;
        Ok(identity)
    }

    async fn insert_identity(&self, identity: NewIdentity) -> Result<Identity, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let identity = identities::insert_identity(identity, &mut conn).await?;
        Ok(identity)
    }
}
