use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::error::DomainError;

// Verified against when the account does not exist so both paths cost the same.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

pub(crate) fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(password_hash.to_string())
}

pub(crate) fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    argon2()?
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .map_err(|err| match err {
            PasswordHashError::Password => DomainError::InvalidCredentials,
            _ => DomainError::Unexpected(err.to_string()),
        })
}

/// Burns one verification for a login whose account was not found.
pub(crate) fn verify_dummy_password(raw_password: &str) -> Result<(), DomainError> {
    match verify_password(raw_password, DUMMY_PASSWORD_HASH) {
        Ok(()) | Err(DomainError::InvalidCredentials) => Ok(()),
        Err(err) => Err(err),
    }
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_dummy_password, verify_password};
    use crate::domain::error::DomainError;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct-password").expect("hash must be created");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-password", &hash).is_ok());

        let err = verify_password("wrong-password", &hash).expect_err("must not verify");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[test]
    fn garbage_hash_is_unexpected() {
        let err = verify_password("whatever", "not-a-hash").expect_err("must fail");
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[test]
    fn dummy_verification_swallows_mismatch() {
        assert!(verify_dummy_password("anything").is_ok());
    }
}
