use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::error::AppError;
use crate::middleware::auth::Claims;

/// The admin whose token `AuthMiddleware` accepted for this request.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub email: String,
}

impl FromRequest for AuthenticatedAdmin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let admin = req
            .extensions()
            .get::<Claims>()
            .map(|claims| AuthenticatedAdmin {
                email: claims.sub.clone(),
            })
            .ok_or(AppError::Unauthorized);
        ready(admin)
    }
}
