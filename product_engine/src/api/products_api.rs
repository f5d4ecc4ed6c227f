//! Unifies the API for managing products.

use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::ProductApiError,
    db::traits::ProductManagement,
    db_types::{NewProduct, Product, ProductUpdate},
};

/// `ProductApi` is the product store. It wraps a storage backend and turns missing records into
/// [`ProductApiError::ProductNotFound`] errors, so that callers only need to deal with explicit results.
pub struct ProductApi<B> {
    db: B,
}

impl<B: Debug> Debug for ProductApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProductApi ({:?})", self.db)
    }
}

impl<B> ProductApi<B>
where B: ProductManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Stores a new product and returns the full record, with its assigned id and timestamps.
    pub async fn create_product(&self, product: NewProduct) -> Result<Product, ProductApiError> {
        check_stock(product.stock)?;
        let product = self.db.insert_product(product).await?;
        info!("📦️ Created {product}");
        Ok(product)
    }

    pub async fn product_by_id(&self, id: i64) -> Result<Product, ProductApiError> {
        self.db.fetch_product(id).await?.ok_or(ProductApiError::ProductNotFound(id))
    }

    /// Fetches every product, in id order.
    pub async fn all_products(&self) -> Result<Vec<Product>, ProductApiError> {
        self.db.fetch_all_products().await
    }

    /// Applies a partial update. Only the fields present in `update` are changed.
    pub async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Product, ProductApiError> {
        if let Some(stock) = update.stock {
            check_stock(stock)?;
        }
        let product = self.db.update_product(id, update).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        debug!("📦️ Updated {product}");
        Ok(product)
    }

    pub async fn update_stock(&self, id: i64, stock: i64) -> Result<Product, ProductApiError> {
        check_stock(stock)?;
        let product = self.db.update_stock(id, stock).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        debug!("📦️ Stock for product #{id} set to {stock}");
        Ok(product)
    }

    /// Permanently removes a product. Deleting a product that does not exist (including one that was already
    /// deleted) is an error.
    pub async fn delete_product(&self, id: i64) -> Result<(), ProductApiError> {
        if self.db.delete_product(id).await? {
            info!("📦️ Deleted product #{id}");
            Ok(())
        } else {
            Err(ProductApiError::ProductNotFound(id))
        }
    }
}

fn check_stock(stock: i64) -> Result<(), ProductApiError> {
    if stock < 0 {
        return Err(ProductApiError::InvalidStock(stock));
    }
    Ok(())
}
