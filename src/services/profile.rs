use validator::Validate;

use crate::auth::Session;
use crate::error::AppError;
use crate::models::{Profile, ProfileUpdate, ProfileView, UpdateProfileRequest};
use crate::store::CredentialStore;

/// Loads the caller's user record with the profile matching its role.
pub async fn read_profile(
    store: &dyn CredentialStore,
    session: &Session,
) -> Result<ProfileView, AppError> {
    let account = store
        .find_account(session.subject)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(ProfileView::from(account))
}

/// Applies a partial update to the caller's core fields and role profile.
///
/// The profile written is chosen by the session role. A payload for the
/// other role is dropped. An empty request touches nothing.
pub async fn update_profile(
    store: &dyn CredentialStore,
    session: &Session,
    request: UpdateProfileRequest,
) -> Result<(), AppError> {
    let request = request.normalized();
    request.validate()?;

    let (changes, profile) = request.into_parts(session.role);

    // A scout profile cannot be created without a shop name. Refuse before
    // writing the core fields so a rejected request changes nothing.
    if let Some(ProfileUpdate::Scout(update)) = &profile {
        if update.shop_name.is_none() {
            let account = store
                .find_account(session.subject)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".into()))?;
            if !matches!(account.profile, Some(Profile::Scout(_))) {
                update.create(session.subject)?;
            }
        }
    }

    if !changes.is_empty() {
        store.update_user(session.subject, changes).await?;
    }
    if let Some(profile) = profile {
        store.upsert_profile(session.subject, profile).await?;
    }

    log::info!("profile of user {} updated", session.subject);
    Ok(())
}
