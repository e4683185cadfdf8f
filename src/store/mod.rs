//! Persistence of users and their role profiles.
//!
//! `CredentialStore` is the only shared mutable resource in the service. Email
//! uniqueness is enforced here, at the store level, so that two racing
//! registrations cannot both succeed.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Account, NewAccount, ProfileUpdate, User, UserChanges};

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts the user and its profile as one atomic unit.
    ///
    /// Fails with `AppError::Conflict` if the email is taken, in which case
    /// nothing is written.
    async fn create_account(&self, account: NewAccount) -> Result<User, AppError>;

    /// Looks a user up by exact email. The result includes the password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Loads a user with the profile matching its role.
    async fn find_account(&self, user_id: Uuid) -> Result<Option<Account>, AppError>;

    /// Applies the present fields of `changes`. `NotFound` if the user is gone.
    async fn update_user(&self, user_id: Uuid, changes: UserChanges) -> Result<(), AppError>;

    /// Creates the profile if absent, otherwise updates its present fields.
    async fn upsert_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<(), AppError>;
}
