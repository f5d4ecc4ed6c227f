use crate::{
    api::errors::ProductApiError,
    db_types::{NewProduct, Product, ProductUpdate},
};

/// The `ProductManagement` trait defines the storage behaviour for product records.
///
/// Implementations only deal with persistence. Input validation and the mapping of "missing" results onto
/// [`ProductApiError::ProductNotFound`] happen in [`crate::ProductApi`].
///
/// Every mutating method must be atomic for a single row. Backends should express each mutation as a single
/// statement (or a transaction) so that concurrent updates to the same product are serialised by the database.
#[allow(async_fn_in_trait)]
pub trait ProductManagement {
    /// Inserts a new product, assigning its id and timestamps, and returns the stored record.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError>;

    /// Fetches the product with the given id. If no such product exists, `None` is returned.
    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError>;

    /// Fetches all products, ordered by id.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, ProductApiError>;

    /// Applies a partial update to the product with the given id, and sets its `updated_at` timestamp. Fields that are
    /// `None` in `update` are left unchanged. If no such product exists, `None` is returned.
    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError>;

    /// Sets the stock level of the product with the given id. If no such product exists, `None` is returned.
    ///
    /// The default implementation delegates to [`update_product`] with a stock-only update.
    async fn update_stock(&self, id: i64, stock: i64) -> Result<Option<Product>, ProductApiError> {
        self.update_product(id, ProductUpdate::default().with_stock(stock)).await
    }

    /// Permanently removes the product with the given id. Returns `true` if a product was deleted, and `false` if no
    /// such product existed.
    async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError>;
}
