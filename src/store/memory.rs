use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CredentialStore;
use crate::error::AppError;
use crate::models::{
    Account, NewAccount, Profile, ProfileUpdate, Role, ScoutProfile, TalentProfile, User,
    UserChanges,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Unique index on `users.email`.
    emails: HashMap<String, Uuid>,
    talent_profiles: HashMap<Uuid, TalentProfile>,
    scout_profiles: HashMap<Uuid, ScoutProfile>,
}

/// In-process store used when no database is configured, and by the tests.
///
/// Every write takes the single write lock, so the uniqueness check and the
/// inserts of `create_account` happen as one step.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tables: RwLock<Tables>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Rewrites a stored role in place, leaving profiles untouched.
    ///
    /// The service never changes a role; this exists to simulate an
    /// out-of-band edit when testing session staleness.
    pub async fn overwrite_role(&self, user_id: Uuid, role: Role) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.role = role;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_account(&self, account: NewAccount) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&account.email) {
            return Err(AppError::conflict());
        }

        let user = account.to_user();
        tables.emails.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        match account.profile.into_profile(user.id) {
            Profile::Talent(profile) => {
                tables.talent_profiles.insert(user.id, profile);
            }
            Profile::Scout(profile) => {
                tables.scout_profiles.insert(user.id, profile);
            }
        }
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_account(&self, user_id: Uuid) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        let Some(user) = tables.users.get(&user_id).cloned() else {
            return Ok(None);
        };
        let profile = match user.role {
            Role::Talent => tables
                .talent_profiles
                .get(&user_id)
                .cloned()
                .map(Profile::Talent),
            Role::Scout => tables
                .scout_profiles
                .get(&user_id)
                .cloned()
                .map(Profile::Scout),
        };
        Ok(Some(Account { user, profile }))
    }

    async fn update_user(&self, user_id: Uuid, changes: UserChanges) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        changes.apply_to(user);
        Ok(())
    }

    async fn upsert_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<(), AppError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::NotFound("User not found".into()));
        }

        match update {
            ProfileUpdate::Talent(update) => match tables.talent_profiles.get_mut(&user_id) {
                Some(profile) => update.apply_to(profile),
                None => {
                    tables
                        .talent_profiles
                        .insert(user_id, update.create(user_id));
                }
            },
            ProfileUpdate::Scout(update) => match tables.scout_profiles.get_mut(&user_id) {
                Some(profile) => update.apply_to(profile),
                None => {
                    let profile = update.create(user_id)?;
                    tables.scout_profiles.insert(user_id, profile);
                }
            },
        }
        Ok(())
    }
}
