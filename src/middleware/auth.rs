use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;
use crate::utils::AppError;

/// Validates the bearer JWT and inserts the verified Claims into the
/// request extensions for handlers to pick up via `web::ReqData`.
pub struct AuthMiddleware;

/// Same validation, plus the caller must carry the "admin" role claim.
pub struct AdminAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            require_admin: false,
        }))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            require_admin: true,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    require_admin: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_bearer(&req) {
            Ok(token) => token,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        let claims = match auth_service::verify_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                log::warn!("🔒 Rejected token on {}: {}", req.path(), e);
                return Box::pin(async move { Err(e.into()) });
            }
        };

        if self.require_admin && !claims.roles.iter().any(|r| r == "admin") {
            let err = AppError::Forbidden("Administrator access required".to_string());
            return Box::pin(async move { Err(err.into()) });
        }

        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

fn extract_bearer(req: &ServiceRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let header_str = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid token format".to_string()))?;

    header_str
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}
