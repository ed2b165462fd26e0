use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity issued by the authentication layer. `role` is one of
/// `buyer`, `worker` or `admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(ServiceError::Jwt)?;

        let current_time = Utc::now().timestamp() as usize;

        if token_data.claims.exp < current_time {
            return Err(ServiceError::Unauthenticated("Token has expired".into()));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(secret: &str, subject: Uuid, role: &str, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            role: role.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[test]
    fn test_token_yields_subject_and_role() {
        let subject = Uuid::new_v4();
        let token = mint("secret", subject, "worker", Duration::minutes(5));

        let claims = JwtConfig::new("secret").verify_token(&token).unwrap();

        assert_eq!(claims.sub, subject);
        assert_eq!(claims.role, "worker");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = mint("secret", Uuid::new_v4(), "buyer", Duration::minutes(5));

        let result = JwtConfig::new("another-secret").verify_token(&token);

        assert!(matches!(result, Err(ServiceError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = mint("secret", Uuid::new_v4(), "buyer", Duration::minutes(-10));

        assert!(JwtConfig::new("secret").verify_token(&token).is_err());
    }
}
