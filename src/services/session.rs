use validator::Validate;

use crate::auth::{AuthResponse, LoginRequest, PasswordHasher, Session, SessionIssuer};
use crate::error::AppError;
use crate::models::PublicUser;
use crate::store::CredentialStore;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verifies the credentials and issues a session carrying the stored role.
///
/// An unknown email and a wrong password fail identically, and both pay for
/// one bcrypt verification.
pub async fn sign_in(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    issuer: &SessionIssuer,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let request = LoginRequest {
        email: request.email.trim().to_string(),
        ..request
    };
    request.validate()?;

    let user = match store.find_by_email(&request.email).await? {
        Some(user) if hasher.verify(&request.password, &user.password_hash) => user,
        found => {
            if found.is_none() {
                hasher.verify_nothing(&request.password);
            }
            log::warn!("failed sign-in attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let token = issuer.issue(&Session::from(&user))?;
    log::info!("user {} signed in", user.id);
    Ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
}

/// Reissues a token for a live session.
///
/// The new token copies subject and role from the presented one; the store
/// is not consulted, so the role stays what it was at sign-in.
pub fn refresh(issuer: &SessionIssuer, session: &Session) -> Result<String, AppError> {
    issuer.issue(session)
}
