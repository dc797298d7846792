//! services/publisher/src/adapters/secrets.rs
//!
//! Argon2 implementation of the `SecretVerifier` port. Sealed secrets are PHC
//! strings carrying their own salt and parameters.

use argon2::Argon2;
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use blog_core::ports::{PortError, PortResult, SecretVerifier};
use tracing::{error, warn};

#[derive(Default)]
pub struct Argon2Secrets {
    argon2: Argon2<'static>,
}

impl Argon2Secrets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretVerifier for Argon2Secrets {
    fn seal(&self, secret: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Failed to hash secret: {:?}", e);
                PortError::Unexpected("Failed to hash secret".to_string())
            })
    }

    fn verify(&self, secret: &str, sealed: &str) -> bool {
        match PasswordHash::new(sealed) {
            Ok(parsed) => self.argon2.verify_password(secret.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                warn!("Stored secret is not a valid PHC string: {:?}", e);
                false
            }
        }
    }
}
