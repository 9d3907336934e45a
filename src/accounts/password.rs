use crate::error::AppError;
use argon2::Argon2;
use rand::Rng;
use subtle::ConstantTimeEq;

/// Random 32-byte salt
pub fn generate_salt() -> [u8; 32] {
    rand::thread_rng().gen()
}

/// Argon2id hash of `password` under `salt`
pub fn hash_password(password: &str, salt: &[u8]) -> Result<[u8; 32], AppError> {
    let argon2 = Argon2::default();
    let mut hash = [0u8; 32];

    argon2
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &[u8], salt: &[u8]) -> Result<bool, AppError> {
    let computed_hash = hash_password(password, salt)?;
    Ok(computed_hash.as_slice().ct_eq(stored_hash).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify() {
        let password = "correct horse battery staple";
        let salt = generate_salt();

        let hash = hash_password(password, &salt).unwrap();
        assert!(verify_password(password, &hash, &salt).unwrap());
        assert!(!verify_password("wrong_password", &hash, &salt).unwrap());
    }

    #[test]
    fn truncated_hash_never_verifies() {
        let salt = generate_salt();
        let hash = hash_password("secret", &salt).unwrap();
        assert!(!verify_password("secret", &hash[..16], &salt).unwrap());
        assert!(!verify_password("secret", &[], &salt).unwrap());
    }

    #[test]
    fn salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
