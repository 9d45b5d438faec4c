use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::revocation::RevocationStore;
use super::token::TokenService;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: TokenService,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService, cfg: AuthConfig) -> Self {
        Self { repo, tokens, cfg }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService, service::AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use models::user::Role;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret", 3600), AuthConfig::default());
    /// let input = RegisterInput { username: "alice".into(), password: "Secret123".into(), role: Role::Customer };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::Validation("username required".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_username(&input.username).await? {
            debug!("user exists: {}", existing.username);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(input.username.trim(), input.role).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, username = %user.username, role = ?user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService, service::AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use models::user::Role;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, TokenService::new("secret", 3600), AuthConfig::default());
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "bob".into(), password: "Passw0rd".into(), role: Role::Customer }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "bob".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "bob");
    /// assert!(svc.tokens().validate(&session.token));
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_username(&input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed =
            PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(&user.username, user.role)?;
        info!(user_id = %user.id, username = %user.username, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Invalidate a session token by putting its `jti` on the denylist.
    ///
    /// The token must still be valid (signature + expiry); revoking an already
    /// dead token is pointless and reported as `Unauthorized`.
    #[instrument(skip(self, token, revocations))]
    pub async fn logout(
        &self,
        token: &str,
        revocations: &dyn RevocationStore,
    ) -> Result<AuthUser, AuthError> {
        let claims = self.tokens.decode(token).map_err(|_| AuthError::Unauthorized)?;
        let user = self
            .repo
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::NotFound)?;

        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .unwrap_or_else(Utc::now);
        revocations.revoke(&claims.jti, expires_at).await?;
        info!(username = %user.username, jti = %claims.jti, "token_revoked");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, RegisterInput};
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::auth::revocation::mock::MockRevocationStore;
    use models::user::Role;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            TokenService::new("test-secret", 3600),
            AuthConfig::default(),
        )
    }

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            password: "S3curePass!".into(),
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc();
        svc.register(register_input("alice")).await.unwrap();

        let err = svc
            .login(LoginInput { username: "alice".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let svc = svc();
        let err = svc
            .login(LoginInput { username: "ghost".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = svc();
        svc.register(register_input("bob")).await.unwrap();
        let err = svc.register(register_input("bob")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let svc = svc();
        let err = svc
            .register(RegisterInput {
                username: "carol".into(),
                password: "short".into(),
                role: Role::Customer,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let svc = svc();
        let revocations = MockRevocationStore::default();
        svc.register(register_input("dave")).await.unwrap();
        let session = svc
            .login(LoginInput { username: "dave".into(), password: "S3curePass!".into() })
            .await
            .unwrap();

        let claims = svc.tokens().decode(&session.token).unwrap();
        assert!(!revocations.is_revoked(&claims.jti).await.unwrap());

        svc.logout(&session.token, &revocations).await.unwrap();
        assert!(revocations.is_revoked(&claims.jti).await.unwrap());
        // Signature/expiry validation alone still passes; the gate layers the
        // denylist check on top.
        assert!(svc.tokens().validate(&session.token));
    }

    #[tokio::test]
    async fn logout_with_garbage_token_is_unauthorized() {
        let svc = svc();
        let revocations = MockRevocationStore::default();
        let err = svc.logout("not-a-token", &revocations).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }
}
