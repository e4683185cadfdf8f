use crate::{
    auth::Session, error::AppError, models::UpdateProfileRequest, services, state::AppState,
};
use actix_web::{get, patch, web, HttpResponse, Responder};
use serde_json::json;

/// Returns the caller's user record and role profile as `{ "user": ... }`.
#[get("")]
pub async fn get_profile(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let user = services::read_profile(state.store.as_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

/// Partially updates the caller's core fields and role profile.
///
/// ## Responses:
/// - `200 OK`: `{ "message": "Profile updated successfully" }`
/// - `400 Bad Request`: a field failed validation, or a scout profile would
///   be created without `shopName`. Nothing is written in either case.
/// - `401 Unauthorized`: no valid session.
/// - `404 Not Found`: the session's user no longer exists.
#[patch("")]
pub async fn update_profile(
    state: web::Data<AppState>,
    session: Session,
    update: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    services::update_profile(state.store.as_ref(), &session, update.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Profile updated successfully" })))
}
