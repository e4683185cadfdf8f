pub mod auth;
pub mod health;
pub mod profile;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

/// Mounts the `/auth` and `/profile` scopes. Expected under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::refresh),
        )
        .service(
            web::scope("/profile")
                .service(profile::get_profile)
                .service(profile::update_profile),
        );
}

/// Answers malformed JSON bodies with the same 400 shape as validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let errors = serde_json::json!({ "body": err.to_string() });
        AppError::InvalidInput {
            message: "Invalid input data".into(),
            errors: Some(errors),
        }
        .into()
    })
}
