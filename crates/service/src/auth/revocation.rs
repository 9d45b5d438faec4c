use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use super::errors::AuthError;

/// Server-side denylist of logged-out tokens, keyed by `jti`.
///
/// Tokens themselves stay stateless; the gate consults this store after
/// signature/expiry validation so a revoked token dies before its natural
/// expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;
    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError>;
}

pub struct SeaOrmRevocationStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl RevocationStore for SeaOrmRevocationStore {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        models::revoked_token::revoke(&self.db, jti, expires_at.into())
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        models::revoked_token::is_revoked(&self.db, jti)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}

/// In-memory denylist for tests
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockRevocationStore {
        revoked: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl RevocationStore for MockRevocationStore {
        async fn revoke(&self, jti: &str, _expires_at: DateTime<Utc>) -> Result<(), AuthError> {
            self.revoked.lock().unwrap().insert(jti.to_string());
            Ok(())
        }

        async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
            Ok(self.revoked.lock().unwrap().contains(jti))
        }
    }
}
