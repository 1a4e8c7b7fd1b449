//! Admin configuration document
//!
//! A single document in the `admin` table holding the argon2 hash of the
//! shared dashboard password.

use serde::{Deserialize, Serialize};

/// Admin login configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub password_hash: String,
}

impl AdminConfig {
    /// Verify a password against the stored hash using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = AdminConfig::hash_password("rahasia-dapur").unwrap();
        let config = AdminConfig {
            password_hash: hash,
        };

        assert!(config.verify_password("rahasia-dapur").unwrap());
        assert!(!config.verify_password("wrong-password").unwrap());
    }
}
