use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) exp: i64,
}

/// Issues and checks HS256 session tokens.
pub(crate) struct JwtService {
    secret: String,
    ttl_seconds: i64,
}

impl JwtService {
    pub(crate) const DEFAULT_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        JwtService {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    pub(crate) fn generate_token(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        self.encode_with_exp(
            user_id,
            username,
            (Utc::now() + Duration::seconds(self.ttl_seconds)).timestamp(),
        )
    }

    fn encode_with_exp(&self, user_id: i64, username: &str, exp: i64) -> Result<String, JwtError> {
        let claims = Claims {
            user_id,
            username: username.into(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{JwtError, JwtService};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_round_trips_claims() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt.generate_token(7, "ann0042").expect("token must encode");
        let claims = jwt.verify_token(&token).expect("token must verify");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "ann0042");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("another-secret-another-secret-xx", 3600);
        let token = issuer.generate_token(7, "ann0042").expect("token must encode");
        let err = JwtService::new(SECRET, 3600)
            .verify_token(&token)
            .expect_err("foreign signature must fail");
        assert!(matches!(err, JwtError::Decode(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new(SECRET, 3600);
        let exp = (Utc::now() - Duration::hours(1)).timestamp();
        let token = jwt
            .encode_with_exp(7, "ann0042", exp)
            .expect("token must encode");
        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn non_positive_ttl_falls_back_to_default() {
        let jwt = JwtService::new(SECRET, 0);
        assert_eq!(jwt.ttl_seconds, JwtService::DEFAULT_TTL_SECONDS);
    }
}
