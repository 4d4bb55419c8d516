// services/idempotency.rs

use serde::Serialize;
use sha2::{Digest, Sha256};

// Content hash for idempotency records: SHA-256 over the JSON encoding of
// endpoint + tenant + body. The same client key replayed with a different
// request produces a different hash and is rejected as key reuse.
pub fn request_hash<B: Serialize>(endpoint: &str, tenant: &str, body: &B) -> String {
    #[derive(Serialize)]
    struct HashInput<'a, B> {
        endpoint: &'a str,
        tenant: &'a str,
        body: &'a B,
    }

    let encoded = serde_json::to_vec(&HashInput {
        endpoint,
        tenant,
        body,
    })
    .unwrap_or_default();
    hex::encode(Sha256::digest(&encoded))
}
