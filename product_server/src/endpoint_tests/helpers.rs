use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::debug;
use product_engine::{
    db_types::{Identity, Product},
    AuthApi,
    ProductApi,
};

use super::mocks::{MockIdentityManager, MockProductManager};
use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::{AuthConfig, ServerOptions},
    routes::health,
    server::api_scope,
};

// The secret for issuing tokens in endpoint tests. DO NOT re-use it anywhere.
pub const TEST_SECRET: &str = "0a1b8d1f2c9e4e33b5a7c6d2e8f90417";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET, Duration::hours(1))
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn admin() -> Identity {
    Identity {
        id: 1,
        email: "admin@example.com".into(),
        password_hash: String::default(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn widget(id: i64) -> Product {
    Product {
        id,
        name: "Widget".into(),
        description: "A widget".into(),
        price: 9.99,
        stock: 10,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// A valid `Authorization` header value for the admin identity.
pub fn bearer() -> String {
    let token = TokenIssuer::new(&get_auth_config()).issue_token(&admin()).unwrap();
    format!("Bearer {token}")
}

/// A token for the admin identity that expired a minute ago.
pub fn expired_bearer() -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims { sub: "1".into(), email: "admin@example.com".into(), iat: now - 3600, exp: now - 60 };
    let token = TokenIssuer::new(&get_auth_config()).sign_claims(&claims).unwrap();
    format!("Bearer {token}")
}

/// Runs a single request through the full app (health route and the `/api` scope) backed by the given mocks, and
/// returns the response status and body.
pub async fn send_request(
    req: TestRequest,
    products: MockProductManager,
    identities: MockIdentityManager,
) -> (StatusCode, String) {
    let _ = env_logger::try_init();
    let app = App::new()
        .app_data(web::Data::new(ProductApi::new(products)))
        .app_data(web::Data::new(AuthApi::new(identities)))
        .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
        .app_data(web::Data::new(ServerOptions::default()))
        .service(health)
        .service(api_scope::<MockProductManager, MockIdentityManager>());
    let app = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Sends an authorised request that is not expected to reach the identity store.
pub async fn send_product_request(req: TestRequest, products: MockProductManager) -> (StatusCode, String) {
    send_request(req.insert_header(("Authorization", bearer())), products, MockIdentityManager::new()).await
}
