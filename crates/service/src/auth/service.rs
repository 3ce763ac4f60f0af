use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{AuthContext, AuthSession, ChangePasswordInput, LoginInput};
use super::password::{check_password_policy, CredentialHasher};
use super::token::TokenService;
use crate::errors::ServiceError;
use crate::user::{User, UserRepository};

/// Auth business service independent of web framework
pub struct AuthService<U: UserRepository + ?Sized> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
    min_password_length: usize,
    /// Verified against when there is no stored hash, so a failed login costs the same either way.
    dummy_hash: String,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    pub fn new(users: Arc<U>, hasher: Arc<dyn CredentialHasher>, tokens: Arc<TokenService>, min_password_length: usize) -> Self {
        let dummy_hash = hasher.hash("unused-login-placeholder").unwrap_or_default();
        Self { users, hasher, tokens, min_password_length, dummy_hash }
    }

    pub fn tokens(&self) -> &TokenService { &self.tokens }

    /// Authenticate by username and password and issue a token.
    ///
    /// Unknown users, missing credentials and wrong passwords all fail with
    /// the same `Unauthorized` error.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use configs::AuthConfig;
    /// use service::auth::{AuthService, Argon2Hashing, LoginInput, TokenService};
    /// use service::role::mock::MockRoleRepository;
    /// use service::user::{NewUser, UserService};
    /// use service::user::repository::mock::MockUserRepository;
    /// let users = Arc::new(MockUserRepository::default());
    /// let hasher = Arc::new(Argon2Hashing::default());
    /// let cfg = AuthConfig { jwt_secret: "secret".into(), ..AuthConfig::default() };
    /// let accounts = UserService::new(users.clone(), Arc::new(MockRoleRepository::default()), hasher.clone(), 8);
    /// let auth = AuthService::new(users, hasher, Arc::new(TokenService::new(&cfg)), 8);
    /// let new_user = NewUser {
    ///     username: "jane".into(), email: "jane@example.com".into(), password: "Passw0rd!".into(),
    ///     first_name: "Jane".into(), last_name: "Doe".into(), role_id: 3,
    /// };
    /// tokio_test::block_on(accounts.add(new_user)).unwrap();
    /// let session = tokio_test::block_on(auth.login(LoginInput { username: "jane".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.user.username, "jane");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let Some(user) = self.users.find_by_username(&input.username).await? else {
            self.hasher.verify(&input.password, &self.dummy_hash);
            warn!(reason = "unknown_user", "login_failed");
            return Err(ServiceError::invalid_credentials());
        };
        let Some(hash) = self.users.password_hash(user.id).await? else {
            self.hasher.verify(&input.password, &self.dummy_hash);
            warn!(user_id = user.id, reason = "no_credentials", "login_failed");
            return Err(ServiceError::invalid_credentials());
        };
        if !self.hasher.verify(&input.password, &hash) {
            warn!(user_id = user.id, reason = "bad_password", "login_failed");
            return Err(ServiceError::invalid_credentials());
        }

        let issued = self.tokens.issue(user.id, user.role)?;
        info!(user_id = user.id, role = %user.role, token_id = %issued.token_id, "user_logged_in");
        Ok(AuthSession { user, token: issued.token, expires_at: issued.expires_at })
    }

    /// Validate a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<AuthContext, ServiceError> {
        self.tokens.validate(token)
    }

    /// The user behind a validated token.
    pub async fn me(&self, ctx: &AuthContext) -> Result<User, ServiceError> {
        self.users.find_by_id(ctx.user_id).await?.ok_or_else(|| ServiceError::not_found("user", ctx.user_id))
    }

    /// Replace the caller's password after checking the current one.
    #[instrument(skip(self, input), fields(user_id = ctx.user_id))]
    pub async fn change_password(&self, ctx: &AuthContext, input: ChangePasswordInput) -> Result<(), ServiceError> {
        let current = self.users.password_hash(ctx.user_id).await?.ok_or_else(ServiceError::invalid_credentials)?;
        if !self.hasher.verify(&input.current_password, &current) {
            warn!(reason = "bad_password", "password_change_failed");
            return Err(ServiceError::invalid_credentials());
        }
        check_password_policy(&input.new_password, self.min_password_length)?;
        let hash = self.hasher.hash(&input.new_password)?;
        self.users.set_password_hash(ctx.user_id, hash, self.hasher.algorithm()).await?;
        info!("password_changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::auth::password::{fast_hasher, Argon2Hashing};
    use crate::role::mock::MockRoleRepository;
    use crate::role::Role;
    use crate::user::repository::mock::MockUserRepository;
    use crate::user::{NewUser, UserService};
    use configs::AuthConfig;

    struct Fixture {
        auth: AuthService<MockUserRepository>,
        users: UserService<MockUserRepository, MockRoleRepository>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockUserRepository::default());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(fast_hasher());
        let tokens = Arc::new(TokenService::new(&AuthConfig { jwt_secret: "test-secret".into(), ..AuthConfig::default() }));
        Fixture {
            auth: AuthService::new(repo.clone(), hasher.clone(), tokens, 8),
            users: UserService::new(repo, Arc::new(MockRoleRepository::default()), hasher, 8),
        }
    }

    async fn seed(f: &Fixture, username: &str, role_id: i32) -> User {
        f.users
            .add(NewUser {
                username: username.into(),
                email: format!("{username}@example.com"),
                password: "Passw0rd!".into(),
                first_name: "Test".into(),
                last_name: "User".into(),
                role_id,
            })
            .await
            .unwrap()
    }

    fn login(username: &str, password: &str) -> LoginInput {
        LoginInput { username: username.into(), password: password.into() }
    }

    #[tokio::test]
    async fn login_issues_token_for_role() {
        let f = fixture();
        let u = seed(&f, "manager", 2).await;
        let session = f.auth.login(login("manager", "Passw0rd!")).await.unwrap();
        assert_eq!(session.user, u);
        assert!(session.expires_at > Utc::now());

        let ctx = f.auth.authenticate(&session.token).unwrap();
        assert_eq!(ctx, AuthContext { user_id: u.id, role: Role::Manager });
        assert_eq!(f.auth.me(&ctx).await.unwrap(), u);
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let f = fixture();
        seed(&f, "jane", 3).await;
        let unknown = f.auth.login(login("nobody", "Passw0rd!")).await.unwrap_err();
        let wrong = f.auth.login(login("jane", "wrong-password")).await.unwrap_err();
        assert!(matches!(unknown, ServiceError::Unauthorized(_)));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.code(), wrong.code());
    }

    struct CountingHasher {
        inner: Argon2Hashing,
        verifies: AtomicUsize,
    }

    impl CredentialHasher for CountingHasher {
        fn algorithm(&self) -> &'static str { self.inner.algorithm() }
        fn hash(&self, password: &str) -> Result<String, ServiceError> { self.inner.hash(password) }
        fn verify(&self, password: &str, hash: &str) -> bool {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(password, hash)
        }
    }

    #[tokio::test]
    async fn unknown_user_still_pays_for_a_hash_check() {
        let repo = Arc::new(MockUserRepository::default());
        let hasher = Arc::new(CountingHasher { inner: fast_hasher(), verifies: AtomicUsize::new(0) });
        let tokens = Arc::new(TokenService::new(&AuthConfig { jwt_secret: "test-secret".into(), ..AuthConfig::default() }));
        let auth = AuthService::new(repo, hasher.clone(), tokens, 8);

        let err = auth.login(login("nobody", "Passw0rd!")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(hasher.verifies.load(Ordering::SeqCst), 1);
        assert!(auth.dummy_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let f = fixture();
        let u = seed(&f, "jane", 3).await;
        let ctx = AuthContext { user_id: u.id, role: u.role };

        let err = f
            .auth
            .change_password(&ctx, ChangePasswordInput { current_password: "nope".into(), new_password: "NewPassw0rd".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = f
            .auth
            .change_password(&ctx, ChangePasswordInput { current_password: "Passw0rd!".into(), new_password: "short".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        f.auth
            .change_password(&ctx, ChangePasswordInput { current_password: "Passw0rd!".into(), new_password: "NewPassw0rd".into() })
            .await
            .unwrap();
        assert!(f.auth.login(login("jane", "Passw0rd!")).await.is_err());
        assert!(f.auth.login(login("jane", "NewPassw0rd")).await.is_ok());
    }

    #[tokio::test]
    async fn me_for_deleted_user_is_not_found() {
        let f = fixture();
        let u = seed(&f, "jane", 3).await;
        let session = f.auth.login(login("jane", "Passw0rd!")).await.unwrap();
        f.users.remove(u.id).await.unwrap();
        let ctx = f.auth.authenticate(&session.token).unwrap();
        assert!(matches!(f.auth.me(&ctx).await, Err(ServiceError::NotFound(_))));
    }
}
