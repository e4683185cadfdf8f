use crate::{
    auth::{LoginRequest, RegisterRequest, RegisterResponse, Session, TokenResponse},
    error::AppError,
    services,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account with the profile matching its role. No session is
/// issued; the client signs in afterwards.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = services::register(
        state.store.as_ref(),
        &state.hasher,
        register_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: "User created successfully".into(),
        user,
    }))
}

/// Login user
///
/// Authenticates a user and returns a session token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = services::sign_in(
        state.store.as_ref(),
        &state.hasher,
        &state.sessions,
        login_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Reissue the caller's session token with a fresh expiry.
#[post("/refresh")]
pub async fn refresh(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let token = services::refresh(&state.sessions, &session)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
