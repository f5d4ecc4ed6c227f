use mockall::mock;
use product_engine::{
    db_types::{Identity, NewIdentity, NewProduct, Product, ProductUpdate},
    AuthApiError,
    IdentityManagement,
    ProductApiError,
    ProductManagement,
};

mock! {
    pub ProductManager {}
    impl ProductManagement for ProductManager {
        async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError>;
        async fn fetch_all_products(&self) -> Result<Vec<Product>, ProductApiError>;
        async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError>;
        async fn update_stock(&self, id: i64, stock: i64) -> Result<Option<Product>, ProductApiError>;
        async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError>;
    }
}

mock! {
    pub IdentityManager {}
    impl IdentityManagement for IdentityManager {
        async fn fetch_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AuthApiError>;
        async fn fetch_identity(&self, id: i64) -> Result<Option<Identity>, AuthApiError>;
        async fn insert_identity(&self, identity: NewIdentity) -> Result<Identity, AuthApiError>;
    }
}
