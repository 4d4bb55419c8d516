// src/jwt/claims.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,            // user id
    pub role: String,
    #[serde(rename = "salonId")]
    pub salon_id: String,
    pub exp: usize,             // expiry, unix seconds
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: String,     // always "refresh"
    pub exp: usize,
}
