//! Password hashing for stored user credentials.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Hashes `password` with Argon2id and a random salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn hash_is_a_verifiable_phc_string() {
        let hash = hash_password("use the force").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"use the force", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"its a trap", &parsed)
                .is_err()
        );
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }
}
