//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Database access is async, and password hashing is pushed onto the
//! blocking thread pool by [`AuthApi`], so none of the handlers here block.
//!
//! Every product route, as well as `/user` and `/secure-data`, is wrapped in the
//! [`BearerAuthMiddlewareFactory`](crate::middleware::BearerAuthMiddlewareFactory), so handlers only ever run for
//! requests that carry a valid access token.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use product_engine::{AuthApi, AuthApiError, IdentityManagement, ProductApi, ProductManagement};
use serde_json::Value;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::ServerOptions,
    data_objects::{JsonMessage, LoginRequest, LoginResponse},
    errors::{AuthError, ServerError},
    helpers::get_remote_ip,
    validation::{validate_new_product, validate_product_update, validate_stock_update},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires auth) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::BearerAuthMiddlewareFactory::new());
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires auth)  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::BearerAuthMiddlewareFactory::new());
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl IdentityManagement);
/// Route handler for the login endpoint
///
/// Users supply their email and password in a JSON body:
/// ```json
/// { "email": "admin@example.com", "password": "password123" }
/// ```
///
/// If the credentials match a stored identity, the server issues a JWT access token, returned as `{"token": "..."}`.
/// The token is valid for a fixed period (see `PAS_JWT_TTL`) and will NOT refresh.
///
/// Bad credentials, including missing or non-string fields, result in a 422 response with the body
/// `{"error": ["The provided credentials are incorrect."]}`.
pub async fn login<B>(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    B: IdentityManagement,
{
    trace!("💻️ Received login request");
    let Some((email, password)) = body.credentials() else {
        debug!("💻️ Login request is missing the email or password, or they are not strings");
        return Err(ServerError::InvalidCredentials);
    };
    let identity = api.verify_credentials(email, password).await.map_err(|e| {
        if matches!(e, AuthApiError::InvalidCredentials) {
            let ip = get_remote_ip(&req, *options.get_ref()).map(|ip| ip.to_string());
            info!("💻️ Failed login for {email} from {}", ip.as_deref().unwrap_or("unknown address"));
        }
        ServerError::from(e)
    })?;
    let token = signer.issue_token(&identity)?;
    debug!("💻️ Issued access token for identity #{}", identity.id);
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

//----------------------------------------------   User  ----------------------------------------------------
route!(current_user => Get "/user" impl IdentityManagement where requires auth);
/// Returns the identity the access token was issued to. Unlike the other protected routes, this one also checks that
/// the identity still exists.
pub async fn current_user<B: IdentityManagement>(
    claims: JwtClaims,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET user for {}", claims.sub);
    let id = claims.identity_id().ok_or(AuthError::IdentityNotFound)?;
    let identity = api.identity_by_id(id).await?;
    Ok(HttpResponse::Ok().json(identity))
}

route!(secure_data => Get "/secure-data" requires auth);
pub async fn secure_data(claims: JwtClaims) -> impl Responder {
    trace!("💻️ GET secure-data for {}", claims.sub);
    HttpResponse::Ok().json(JsonMessage::new("This route is protected by JWT"))
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(products => Get "/products" impl ProductManagement where requires auth);
pub async fn products<B: ProductManagement>(api: web::Data<ProductApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.all_products().await.map_err(|e| ServerError::from_product_error(e, "Unable to fetch products"))?;
    Ok(HttpResponse::Ok().json(products))
}

route!(create_product => Post "/products" impl ProductManagement where requires auth);
pub async fn create_product<B: ProductManagement>(
    body: web::Json<Value>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST product");
    let product = validate_new_product(&body)?;
    let product =
        api.create_product(product).await.map_err(|e| ServerError::from_product_error(e, "Unable to create product"))?;
    Ok(HttpResponse::Created().json(product))
}

route!(product_by_id => Get "/products/{id}" impl ProductManagement where requires auth);
pub async fn product_by_id<B: ProductManagement>(
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET product #{id}");
    let product = api.product_by_id(id).await.map_err(|e| ServerError::from_product_error(e, "Unable to fetch product"))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product => Put "/products/{id}" impl ProductManagement where requires auth);
pub async fn update_product<B: ProductManagement>(
    path: web::Path<i64>,
    body: web::Json<Value>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ PUT product #{id}");
    let update = validate_product_update(&body)?;
    let product =
        api.update_product(id, update).await.map_err(|e| ServerError::from_product_error(e, "Unable to update product"))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl ProductManagement where requires auth);
pub async fn delete_product<B: ProductManagement>(
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ DELETE product #{id}");
    api.delete_product(id).await.map_err(|e| ServerError::from_product_error(e, "Unable to delete product"))?;
    Ok(HttpResponse::NoContent().finish())
}

route!(update_stock => Put "/products/{id}/stock" impl ProductManagement where requires auth);
pub async fn update_stock<B: ProductManagement>(
    path: web::Path<i64>,
    body: web::Json<Value>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ PUT stock for product #{id}");
    let stock = validate_stock_update(&body)?;
    let product =
        api.update_stock(id, stock).await.map_err(|e| ServerError::from_product_error(e, "Unable to update stock"))?;
    Ok(HttpResponse::Ok().json(product))
}
