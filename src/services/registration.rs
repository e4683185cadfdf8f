use crate::auth::{PasswordHasher, RegisterRequest};
use crate::error::AppError;
use crate::models::PublicUser;
use crate::store::CredentialStore;

/// Creates an account and its role profile.
///
/// The email lookup only spares a bcrypt round for the common duplicate; the
/// store's own uniqueness check still decides a race.
pub async fn register(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    request: RegisterRequest,
) -> Result<PublicUser, AppError> {
    let request = request.normalized();
    request.check()?;

    if store.find_by_email(&request.email).await?.is_some() {
        log::info!("registration refused, email already in use");
        return Err(AppError::conflict());
    }

    let password_hash = hasher.hash(&request.password)?;
    let account = request.into_new_account(password_hash)?;
    let user = store.create_account(account).await?;

    log::info!("registered user {} as {:?}", user.id, user.role);
    Ok(PublicUser::from(&user))
}
