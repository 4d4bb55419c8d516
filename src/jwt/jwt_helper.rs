// src/jwt/jwt_helper.rs
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Result as JwtResult, DecodingKey, EncodingKey, Header, Validation,
};

use crate::jwt::claims::{Claims, RefreshClaims};
use crate::models::user::{User, UserRole};

pub const ACCESS_TOKEN_MINUTES: i64 = 30;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

// HMAC-SHA256 key pair derived from the configured secret. Managed as Rocket
// state so every handler signs and verifies against the same secret.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &[u8]) -> Self {
        AuthKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

fn role_name(role: &UserRole) -> &'static str {
    match role {
        UserRole::Admin => "ADMIN",
        UserRole::Staff => "STAFF",
    }
}

pub fn create_access_token(keys: &AuthKeys, user: &User) -> JwtResult<String> {
    let claims = Claims {
        sub: user.id.clone(),
        role: role_name(&user.role).to_string(),
        salon_id: user.salon_id.clone(),
        exp: (Utc::now() + Duration::minutes(ACCESS_TOKEN_MINUTES)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &keys.encoding)
}

// Returns the token together with its expiry instant so the caller can record
// it in the refresh-token store.
pub fn create_refresh_token(keys: &AuthKeys, user_id: &str) -> JwtResult<(String, DateTime<Utc>)> {
    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_DAYS);
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        token_type: "refresh".to_string(),
        exp: expires_at.timestamp() as usize,
    };
    let token = encode(&Header::default(), &claims, &keys.encoding)?;
    Ok((token, expires_at))
}

pub fn verify_access_token(keys: &AuthKeys, token: &str) -> Option<Claims> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .ok()
}

pub fn verify_refresh_token(keys: &AuthKeys, token: &str) -> Option<RefreshClaims> {
    let claims = decode::<RefreshClaims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .ok()?;
    if claims.token_type != "refresh" {
        return None;
    }
    Some(claims)
}
