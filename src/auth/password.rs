use std::sync::OnceLock;

use crate::error::AppError;
use bcrypt::{hash, verify};

/// Work factor used unless configured otherwise.
pub const DEFAULT_COST: u32 = 12;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

const DUMMY_PASSWORD: &str = "listify-dummy-password-0";

/// One-way salted bcrypt hashing of user passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash at the same cost, verified against when there is no stored hash.
    dummy_hash: OnceLock<String>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: OnceLock::new(),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.cost)?)
    }

    /// Checks `password` against a stored hash. A malformed hash never matches.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Runs a full verification that can never match, so a lookup miss costs
    /// as much as a wrong password.
    pub fn verify_nothing(&self, password: &str) -> bool {
        // The outcome is discarded: even the dummy password never matches.
        let _ = self.verify(password, self.dummy_hash());
        false
    }

    #[cfg(test)]
    pub(crate) fn dummy_hash_built(&self) -> bool {
        self.dummy_hash.get().is_some()
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash.get_or_init(|| match hash(DUMMY_PASSWORD, self.cost) {
            Ok(hashed) => hashed,
            Err(e) => {
                log::error!("dummy password hash could not be built: {}", e);
                String::new()
            }
        })
    }
}
