/// Password hashing with Argon2id
///
/// Hashes are stored in PHC string format; algorithm parameters travel
/// inside the hash, so verification needs no configuration and parameters
/// can be raised later without invalidating existing hashes.
///
/// # Example
///
/// ```
/// use projecthub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery staple")?;
/// assert!(verify_password("correct horse battery staple", &hash)?);
/// assert!(!verify_password("tr0ub4dor", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing the password failed
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored hash could not be parsed or compared
    #[error("stored password hash is unusable: {0}")]
    BadStoredHash(String),
}

/// Hashes a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password; errors are reserved for
/// unusable stored hashes. The comparison itself is constant-time inside
/// Argon2.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::BadStoredHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::BadStoredHash(e.to_string())),
    }
}

/// Minimum requirements for a new password
///
/// At least 8 characters, with an uppercase letter, a lowercase letter, and
/// a digit. Returns the first unmet requirement as the error message shown
/// to the user.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let checks: [(&str, bool); 4] = [
        (
            "Password must be at least 8 characters long",
            password.len() >= 8,
        ),
        (
            "Password must contain at least one uppercase letter",
            password.chars().any(char::is_uppercase),
        ),
        (
            "Password must contain at least one lowercase letter",
            password.chars().any(char::is_lowercase),
        ),
        (
            "Password must contain at least one digit",
            password.chars().any(char::is_numeric),
        ),
    ];

    match checks.iter().find(|(_, ok)| !ok) {
        Some((message, _)) => Err((*message).to_string()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = hash_password("some password").expect("hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let a = hash_password("duplicate").expect("hash should succeed");
        let b = hash_password("duplicate").expect("hash should succeed");
        assert_ne!(a, b, "salts must differ");
    }

    #[test]
    fn test_verify_roundtrip() {
        for password in ["simple", "with spaces", "şifre-密码", "!@#$%^&*()"] {
            let hash = hash_password(password).expect("hash should succeed");
            assert!(verify_password(password, &hash).expect("verify should succeed"));
            assert!(!verify_password("something else", &hash).expect("verify should succeed"));
        }
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("password", "not-a-phc-string"),
            Err(PasswordError::BadStoredHash(_))
        ));
    }

    #[test]
    fn test_strength_accepts_good_passwords() {
        assert!(validate_password_strength("Projecthub1").is_ok());
        assert!(validate_password_strength("aB3aB3aB3").is_ok());
    }

    #[test]
    fn test_strength_reports_first_failure() {
        assert_eq!(
            validate_password_strength("aB1").unwrap_err(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            validate_password_strength("lowercase1").unwrap_err(),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            validate_password_strength("UPPERCASE1").unwrap_err(),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            validate_password_strength("NoDigitsHere").unwrap_err(),
            "Password must contain at least one digit"
        );
    }
}
