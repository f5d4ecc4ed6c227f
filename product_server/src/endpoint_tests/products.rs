use actix_web::{http::StatusCode, test::TestRequest};
use mockall::predicate::eq;
use product_engine::{
    db_types::{NewProduct, Product, ProductUpdate},
    ProductApiError,
};
use serde_json::{json, Value};

use super::{helpers::*, mocks::*};

const WIDGET_JSON: &str = r#"{"id":42,"name":"Widget","description":"A widget","price":9.99,"stock":10,"created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:00:00Z"}"#;

#[actix_web::test]
async fn list_products() {
    let mut products = MockProductManager::new();
    products.expect_fetch_all_products().returning(|| Ok(vec![widget(1), widget(2)]));
    let (status, body) = send_product_request(TestRequest::get().uri("/api/products"), products).await;
    assert_eq!(status, StatusCode::OK);
    let body: Vec<Product> = serde_json::from_str(&body).unwrap();
    assert_eq!(body.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[actix_web::test]
async fn list_products_storage_failure() {
    let mut products = MockProductManager::new();
    products
        .expect_fetch_all_products()
        .returning(|| Err(ProductApiError::DatabaseError("database is locked".into())));
    let (status, body) = send_product_request(TestRequest::get().uri("/api/products"), products).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Unable to fetch products"}"#);
}

#[actix_web::test]
async fn create_product() {
    let mut products = MockProductManager::new();
    products
        .expect_insert_product()
        .withf(|p| *p == NewProduct::new("Widget", "A widget", 9.99, 10))
        .times(1)
        .returning(|_| Ok(widget(42)));
    let req = TestRequest::post()
        .uri("/api/products")
        .set_json(json!({"name": "Widget", "description": "A widget", "price": 9.99, "stock": 10}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, WIDGET_JSON);
}

#[actix_web::test]
async fn create_invalid_product() {
    // No expectations: the store must not be touched
    let products = MockProductManager::new();
    let req = TestRequest::post().uri("/api/products").set_json(json!({"name": "Widget", "price": "free", "stock": -3}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": {
            "description": ["The description field is required."],
            "price": ["The price field must be a number."],
            "stock": ["The stock field must be at least 0."]
        }})
    );
}

#[actix_web::test]
async fn fetch_product() {
    let mut products = MockProductManager::new();
    products.expect_fetch_product().with(eq(42)).returning(|id| Ok(Some(widget(id))));
    let (status, body) = send_product_request(TestRequest::get().uri("/api/products/42"), products).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, WIDGET_JSON);
}

#[actix_web::test]
async fn fetch_missing_product() {
    let mut products = MockProductManager::new();
    products.expect_fetch_product().with(eq(999_999)).returning(|_| Ok(None));
    let (status, body) = send_product_request(TestRequest::get().uri("/api/products/999999"), products).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}

#[actix_web::test]
async fn non_numeric_id_is_not_found() {
    let products = MockProductManager::new();
    let (status, body) = send_product_request(TestRequest::get().uri("/api/products/widget"), products).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}

#[actix_web::test]
async fn partial_update() {
    let mut products = MockProductManager::new();
    products
        .expect_update_product()
        .withf(|id, update| *id == 42 && *update == ProductUpdate::default().with_price(12.5))
        .times(1)
        .returning(|id, _| Ok(Some(Product { price: 12.5, ..widget(id) })));
    let req = TestRequest::put().uri("/api/products/42").set_json(json!({"price": 12.5}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::OK);
    let product: Product = serde_json::from_str(&body).unwrap();
    assert_eq!(product.price, 12.5);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.stock, 10);
}

#[actix_web::test]
async fn update_missing_product() {
    let mut products = MockProductManager::new();
    products.expect_update_product().returning(|_, _| Ok(None));
    let req = TestRequest::put().uri("/api/products/7").set_json(json!({"name": "Gadget"}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}

#[actix_web::test]
async fn update_with_invalid_field() {
    let products = MockProductManager::new();
    let req = TestRequest::put().uri("/api/products/42").set_json(json!({"name": "x".repeat(300)}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, r#"{"error":{"name":["The name field must not be greater than 255 characters."]}}"#);
}

#[actix_web::test]
async fn update_stock() {
    let mut products = MockProductManager::new();
    products
        .expect_update_stock()
        .with(eq(42), eq(0))
        .times(1)
        .returning(|id, stock| Ok(Some(Product { stock, ..widget(id) })));
    let req = TestRequest::put().uri("/api/products/42/stock").set_json(json!({"stock": 0}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::OK);
    let product: Product = serde_json::from_str(&body).unwrap();
    assert_eq!(product.stock, 0);
}

#[actix_web::test]
async fn negative_stock_is_rejected() {
    let products = MockProductManager::new();
    let req = TestRequest::put().uri("/api/products/42/stock").set_json(json!({"stock": -1}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, r#"{"error":{"stock":["The stock field must be at least 0."]}}"#);
}

#[actix_web::test]
async fn update_stock_storage_failure() {
    let mut products = MockProductManager::new();
    products.expect_update_stock().returning(|_, _| Err(ProductApiError::DatabaseError("disk full".into())));
    let req = TestRequest::put().uri("/api/products/42/stock").set_json(json!({"stock": 5}));
    let (status, body) = send_product_request(req, products).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Unable to update stock"}"#);
}

#[actix_web::test]
async fn delete_product() {
    let mut products = MockProductManager::new();
    products.expect_delete_product().with(eq(42)).times(1).returning(|_| Ok(true));
    let (status, body) = send_product_request(TestRequest::delete().uri("/api/products/42"), products).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn delete_missing_product() {
    let mut products = MockProductManager::new();
    products.expect_delete_product().with(eq(42)).returning(|_| Ok(false));
    let (status, body) = send_product_request(TestRequest::delete().uri("/api/products/42"), products).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}
