use std::time::Duration;

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
    Scope,
};
use log::*;
use product_engine::{AuthApi, IdentityManagement, ProductApi, ProductManagement, SqliteDatabase};

use crate::{
    auth::TokenIssuer,
    config::{SeedConfig, ServerConfig, ServerOptions},
    errors::ServerError,
    routes::{
        health,
        CreateProductRoute,
        CurrentUserRoute,
        DeleteProductRoute,
        LoginRoute,
        ProductByIdRoute,
        ProductsRoute,
        SecureDataRoute,
        UpdateProductRoute,
        UpdateStockRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if let Some(seed) = &config.seed {
        seed_identity(&db, seed).await?;
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(ServerError::from)
}

/// Provisions the configured identity. Existing identities are left untouched.
pub async fn seed_identity(db: &SqliteDatabase, seed: &SeedConfig) -> Result<(), ServerError> {
    let api = AuthApi::new(db.clone());
    let identity = api
        .provision_identity(&seed.email, seed.password.reveal())
        .await
        .map_err(|e| ServerError::InitializeError(format!("Could not provision identity {}. {e}", seed.email)))?;
    info!("🚀️ Identity #{} ({}) is ready to log in", identity.id, identity.email);
    Ok(())
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let product_api = ProductApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pas::access_log"))
            .app_data(web::Data::new(product_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(options))
            .service(health)
            .service(api_scope::<SqliteDatabase, SqliteDatabase>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// All the `/api` routes. Route handlers find their backends in the app data, so `P` and `I` must match the types the
/// `ProductApi` and `AuthApi` were created with.
pub fn api_scope<P, I>() -> Scope
where
    P: ProductManagement + 'static,
    I: IdentityManagement + 'static,
{
    web::scope("/api")
        .app_data(json_config())
        .app_data(path_config())
        .service(LoginRoute::<I>::new())
        .service(CurrentUserRoute::<I>::new())
        .service(SecureDataRoute::new())
        .service(ProductsRoute::<P>::new())
        .service(CreateProductRoute::<P>::new())
        .service(ProductByIdRoute::<P>::new())
        .service(UpdateProductRoute::<P>::new())
        .service(DeleteProductRoute::<P>::new())
        .service(UpdateStockRoute::<P>::new())
}

/// Unreadable JSON bodies are reported as 400 errors in the usual `{"error": ...}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!("💻️ Could not read request body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

/// The only path parameter is a product id, and an id that cannot be parsed cannot match a product.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!("💻️ Invalid path parameter in {}. {err}", req.path());
        ServerError::ProductNotFound.into()
    })
}
