//! Access/refresh token issuance and validation.
//!
//! The access token authorizes individual requests; the refresh token is
//! long-lived and persisted (single active value) on the student record.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn sign_access_token(
    student_id: Uuid,
    username: &str,
    secret: &str,
    ttl_mins: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: student_id,
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_mins)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("access token signing failed: {e}")))
}

pub fn sign_refresh_token(
    student_id: Uuid,
    secret: &str,
    ttl_days: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = RefreshClaims {
        sub: student_id,
        iat: now.timestamp(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("refresh token signing failed: {e}")))
}

/// Mints both tokens for a freshly authenticated student.
pub fn issue_pair(student_id: Uuid, username: &str, config: &Config) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: sign_access_token(
            student_id,
            username,
            &config.access_token_secret,
            config.access_token_ttl_mins,
        )?,
        refresh_token: sign_refresh_token(
            student_id,
            &config.refresh_token_secret,
            config.refresh_token_ttl_days,
        )?,
    })
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0; // no clock skew tolerance

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Auth("access token expired".to_string())
        }
        _ => AppError::Auth("invalid access token".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_access_token_roundtrip() {
        let id = Uuid::new_v4();
        let token = sign_access_token(id, "apatel", SECRET, 15).unwrap();
        let claims = verify_access_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "apatel");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let token = sign_access_token(Uuid::new_v4(), "apatel", SECRET, -5).unwrap();
        let err = verify_access_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Auth(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_access_token(Uuid::new_v4(), "apatel", SECRET, 15).unwrap();
        let err = verify_access_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_refresh_token_is_not_a_valid_access_token() {
        let id = Uuid::new_v4();
        let refresh = sign_refresh_token(id, SECRET, 10).unwrap();
        // Missing the `username` claim, so access validation must fail.
        assert!(verify_access_token(&refresh, SECRET).is_err());
    }
}
