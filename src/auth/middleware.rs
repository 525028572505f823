use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

// Paths served without a token.
fn is_public(path: &str) -> bool {
    path == "/health" || path.starts_with("/auth/login") || path.starts_with("/auth/register")
}

/// Token gate for everything except the public paths.
///
/// Verified claims are stored in the request extensions, where the
/// `AuthenticatedUser` extractor picks them up.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService { service }))
    }
}

pub struct BearerAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
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
        if is_public(req.path()) {
            return Box::pin(self.service.call(req));
        }

        // Missing header, malformed header and rejected token all fall through
        // to the same uniform 401.
        let verified = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| {
                req.app_data::<web::Data<TokenService>>()
                    .and_then(|tokens| tokens.verify(token).ok())
            });

        match verified {
            Some(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            None => {
                let err = AppError::invalid_credentials();
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public("/health"));
        assert!(is_public("/auth/login"));
        assert!(is_public("/auth/register"));

        assert!(!is_public("/"));
        assert!(!is_public("/tasks"));
        assert!(!is_public("/tasks/42"));
        assert!(!is_public("/healthcheck"));
    }
}
