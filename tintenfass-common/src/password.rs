use crate::model::user::Password;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHashError(argon2::password_hash::Error);

/// Hashes a raw password into a self-describing PHC string with a fresh
/// random salt. The raw password is consumed here and nowhere stored.
pub fn hash(password: &Password) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.get().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordHashError)
}

/// Verifies a raw password against a stored PHC string. A mismatch is
/// `Ok(false)`; `Err` means the stored hash itself is unusable.
pub fn verify(password: &Password, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(PasswordHashError)?;

    match Argon2::default().verify_password(password.get().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{hash, verify};
    use crate::model::user::Password;

    #[test]
    fn correct_password_verifies() {
        let password = Password::new("correct horse battery staple".into());
        let stored = hash(&password).unwrap();

        assert!(verify(&password, &stored).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let stored = hash(&Password::new("right".into())).unwrap();

        assert!(!verify(&Password::new("wrong".into()), &stored).unwrap());
    }

    #[test]
    fn hashes_are_salted_per_call() {
        let password = Password::new("same".into());

        assert_ne!(hash(&password).unwrap(), hash(&password).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify(&Password::new("x".into()), "not-a-phc-string").is_err());
    }
}
