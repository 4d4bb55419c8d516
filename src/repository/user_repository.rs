// repository/user_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::user::{StoredUser, User};
use crate::repository::store::{BookingStore, RefreshTokenRecord};

pub struct UserRepository {
    store: Arc<BookingStore>,
}

impl UserRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        UserRepository {
            store: Arc::clone(store),
        }
    }

    pub fn find_by_id(&self, user_id: &str) -> Option<User> {
        self.store
            .lock()
            .users
            .get(user_id)
            .map(|stored| stored.user.clone())
    }

    pub fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        self.store
            .lock()
            .users
            .values()
            .find(|stored| stored.user.email == email)
            .cloned()
    }

    // Refresh tokens are issued at login and revoked at logout; the record
    // carries its own expiry independent of the token's exp claim.
    pub fn store_refresh_token(&self, token: &str, user_id: &str, expires_at: DateTime<Utc>) {
        self.store.lock().refresh_tokens.insert(
            token.to_string(),
            RefreshTokenRecord {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
    }

    pub fn lookup_refresh_token(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.store.lock().refresh_tokens.get(token).cloned()
    }

    pub fn revoke_refresh_token(&self, token: &str) {
        self.store.lock().refresh_tokens.remove(token);
    }
}
