//! Bearer token middleware for the product server.
//! This middleware can be placed on any route or service.
//!
//! It reads the `Authorization: Bearer <token>` header and validates the token with the [`TokenIssuer`] held in the
//! app data. If the token is valid, the [`JwtClaims`] are inserted into the request extensions and the request is
//! allowed to continue. Otherwise, a 401 Unauthorized response is returned and the wrapped service is never called.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{bearer_token, JwtClaims, TokenIssuer},
    errors::{AuthError, ServerError},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct BearerAuthMiddlewareFactory;

impl BearerAuthMiddlewareFactory {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BearerAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BearerAuthMiddlewareService { service: Rc::new(service) })
    }
}

pub struct BearerAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match authorize(&req) {
                Ok(claims) => {
                    trace!("🔐️ Request to {} authorised for identity {}", req.path(), claims.sub);
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ Request to {} was not authorised. {e}", req.path());
                    Ok(req.error_response(e).map_into_right_body())
                },
            }
        })
    }
}

fn authorize(req: &ServiceRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req.app_data::<web::Data<TokenIssuer>>().ok_or_else(|| {
        error!("🔐️ No TokenIssuer has been registered in the app data. Protected routes cannot be served.");
        ServerError::InitializeError("Token issuer is not configured".to_string())
    })?;
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let header = header.to_str().map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    let token = bearer_token(header)?;
    let claims = issuer.validate_token(token)?;
    Ok(claims)
}
