use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::profile::NewProfile;

/// Which side of the marketplace an account is on.
/// Corresponds to the `user_role` SQL enum. Fixed at registration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Barbers, cosmetologists and tattoo artists looking for work.
    Talent,
    /// Shops looking for talent.
    Scout,
}

/// A stored user, including the password hash.
///
/// The hash is skipped on serialization; responses should still go through
/// `PublicUser` or `ProfileView`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields of a user that may be shown to anyone holding its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// A validated registration, ready to persist.
///
/// There is no separate role field: the role is whatever the profile variant
/// says, so a user and its profile cannot disagree.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub profile: NewProfile,
}

impl NewAccount {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Builds the user row for this account with a fresh id.
    pub fn to_user(&self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: self.email.clone(),
            name: self.name.clone(),
            password_hash: self.password_hash.clone(),
            phone: self.phone.clone(),
            role: self.role(),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of core user fields. `None` leaves a field untouched.
///
/// `phone` is doubly optional: `Some(None)` clears the stored number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub avatar_url: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.avatar_url.is_none()
    }

    /// Applies the present fields to `user`, bumping `updated_at`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        if let Some(avatar_url) = &self.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        user.updated_at = Utc::now();
    }
}
