/// Authentication service - accounts, JWT and password handling
use crate::config::BootstrapSettings;
use crate::error::{Result, ServerError};
use ballotbox_core::{CreateUser, Identity, LedgerError, LedgerStore, User, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub token_type: TokenType,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Account to be created, with the password still in plaintext
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub login: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl AuthService {
    pub fn new(secret: String, access_expiration_hours: u64, refresh_expiration_days: u64) -> Self {
        Self {
            secret,
            access_token_expiration: Duration::hours(access_expiration_hours as i64),
            refresh_token_expiration: Duration::days(refresh_expiration_days as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Use a different bcrypt work factor
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Register a regular user
    pub async fn register(
        &self,
        store: &dyn LedgerStore,
        login: &str,
        password: &str,
        email: &str,
    ) -> Result<User> {
        self.create_account(
            store,
            NewAccount {
                login: login.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                is_admin: false,
            },
        )
        .await
    }

    /// Validate and store a new account
    ///
    /// The login is checked before hashing so a taken name fails fast; the
    /// store's unique constraints still decide concurrent registrations.
    pub async fn create_account(&self, store: &dyn LedgerStore, account: NewAccount) -> Result<User> {
        let login = account.login.trim();
        let email = account.email.trim();

        if login.is_empty() {
            return Err(LedgerError::validation("login is required").into());
        }
        if email.is_empty() {
            return Err(LedgerError::validation("email is required").into());
        }
        if account.password.is_empty() {
            return Err(LedgerError::validation("password is required").into());
        }

        if store.find_credentials(login).await?.is_some() {
            return Err(LedgerError::DuplicateLogin(login.to_string()).into());
        }

        let password_hash = self.hash_password(&account.password)?;
        let user = store
            .create_user(CreateUser {
                login: login.to_string(),
                email: email.to_string(),
                password_hash,
                is_admin: account.is_admin,
            })
            .await?;

        tracing::info!(user_id = user.id, login = %user.login, is_admin = user.is_admin, "User registered");
        Ok(user)
    }

    /// Check a login/password pair
    ///
    /// Unknown logins and wrong passwords fail identically.
    pub async fn authenticate(
        &self,
        store: &dyn LedgerStore,
        login: &str,
        password: &str,
    ) -> Result<User> {
        let Some(credentials) = store.find_credentials(login.trim()).await? else {
            tracing::debug!(login, "Login failed: unknown user");
            return Err(LedgerError::Auth.into());
        };

        if !self.verify_password(password, &credentials.password_hash)? {
            tracing::debug!(login, "Login failed: wrong password");
            return Err(LedgerError::Auth.into());
        }

        Ok(credentials.user)
    }

    /// Create the configured admin account if no users exist yet
    ///
    /// Returns the new account, or `None` when nothing was created.
    pub async fn ensure_bootstrap_admin(
        &self,
        store: &dyn LedgerStore,
        settings: &BootstrapSettings,
    ) -> Result<Option<User>> {
        let Some(password) = &settings.admin_password else {
            return Ok(None);
        };

        if store.count_users().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create_account(
                store,
                NewAccount {
                    login: settings.admin_login.clone(),
                    email: settings.admin_email.clone(),
                    password: password.clone(),
                    is_admin: true,
                },
            )
            .await?;

        tracing::warn!(login = %admin.login, "Created bootstrap admin account");
        Ok(Some(admin))
    }

    /// Create an access token carrying the user's admin flag
    pub fn create_access_token(&self, user: &User) -> Result<String> {
        self.create_token(
            user.id,
            user.is_admin,
            TokenType::Access,
            self.access_token_expiration,
        )
    }

    /// Create a refresh token
    pub fn create_refresh_token(&self, user_id: UserId) -> Result<String> {
        self.create_token(user_id, false, TokenType::Refresh, self.refresh_token_expiration)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify that a token is an access token
    pub fn verify_access_token(&self, token: &str) -> Result<Identity> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(Identity::new(claims.sub, claims.admin))
    }

    /// Verify that a token is a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(claims.sub)
    }

    fn create_token(
        &self,
        user_id: UserId,
        admin: bool,
        token_type: TokenType,
        expiration: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + expiration;

        let claims = Claims {
            sub: user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
            admin,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }
}
