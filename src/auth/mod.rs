pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::models::{NewAccount, NewProfile, Occupation, PublicUser, Role};
use crate::validation::{non_blank, normalize_phone, validate_password_strength, validate_phone};

// Re-export necessary items
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, Session, SessionIssuer};

/// Represents the payload for a sign-in request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Checked against the stored hash only; the strength policy is not
    /// re-applied so accounts made under an older policy can still sign in.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new account registration.
///
/// Talent accounts may send `occupations` and `bio`; scout accounts must
/// send `shopName` and may send `shopAddress` and `website`. Fields belonging
/// to the other role are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// 8 to 128 characters with at least one letter and one digit.
    #[validate(length(min = 8, max = 128), custom = "validate_password_strength")]
    pub password: String,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    pub role: Role,
    pub occupations: Option<Vec<Occupation>>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub shop_name: Option<String>,
    #[validate(length(max = 250))]
    pub shop_address: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

impl RegisterRequest {
    /// Trims text fields and turns blank optional fields into `None`.
    /// The email keeps its case.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: non_blank(self.phone),
            bio: non_blank(self.bio),
            shop_name: non_blank(self.shop_name),
            shop_address: non_blank(self.shop_address),
            website: non_blank(self.website),
            ..self
        }
    }

    /// Field validation plus the role-conditional rules.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.role == Role::Scout && self.shop_name.is_none() {
            let mut error = ValidationError::new("required");
            error.message = Some("Shop name is required for scouts".into());
            errors.add("shopName", error);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds the account to persist. The role picks the profile variant.
    pub fn into_new_account(self, password_hash: String) -> Result<NewAccount, AppError> {
        let profile = match self.role {
            Role::Talent => NewProfile::Talent {
                occupations: self.occupations.unwrap_or_default().into_iter().collect(),
                bio: self.bio,
            },
            Role::Scout => NewProfile::Scout {
                shop_name: self
                    .shop_name
                    .ok_or_else(|| AppError::invalid_input("Shop name is required for scouts"))?,
                default_address: self.shop_address,
                website: self.website,
            },
        };

        Ok(NewAccount {
            email: self.email,
            name: self.name,
            password_hash,
            phone: self.phone.as_deref().and_then(normalize_phone),
            profile,
        })
    }
}

/// Response after a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Response after a successful sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The session token, sent back as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: PublicUser,
}

/// Response of a token refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
