use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Session;
use crate::error::AppError;

/// Extracts the session placed in request extensions by `AuthMiddleware`.
///
/// A route outside the middleware, or a request the middleware let through
/// as public, has no session and is rejected with 401.
impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().copied() {
            Some(session) => ready(Ok(session)),
            None => ready(Err(AppError::Unauthorized("Unauthorized".into()).into())),
        }
    }
}
