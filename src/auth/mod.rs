//! Accounts, login sessions and the session cookie.
//!
//! Identity is never ambient: handlers resolve a [`SessionUser`] from the
//! request cookie and pass it to whatever needs it.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::{
    self,
    models::{NewUser, Role, User},
    DbPool,
};
use crate::error::{Error, Result};
use crate::utils::validation::{validate_email, validate_full_name, validate_password};

pub const SESSION_COOKIE: &str = "session";

/// The signed-in user behind a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            role: user.role(),
            id: user.id,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

/// Registration form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Login form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Hex SHA-256 of salt and password
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_user(full_name: String, email: String, password: &str, role: Role) -> NewUser {
    let password_salt = new_salt();
    NewUser {
        password_hash: hash_password(&password_salt, password),
        password_salt,
        full_name,
        email,
        role,
    }
}

/// Create a regular account
pub async fn register(pool: &DbPool, registration: &Registration) -> Result<User> {
    let full_name = validate_full_name(&registration.full_name)?;
    let email = validate_email(&registration.email)?;
    validate_password(&registration.password, &registration.confirm_password)?;

    let user = db::users::create_user(
        pool,
        &new_user(full_name, email, &registration.password, Role::User),
    )
    .await?;

    info!("Registered user {} (id: {})", user.email, user.id);
    Ok(user)
}

/// Check credentials and open a session. Returns the user and the session token.
pub async fn login(
    pool: &DbPool,
    credentials: &Credentials,
    ttl: Duration,
) -> Result<(SessionUser, String)> {
    let rejected = || Error::Unauthorized("Invalid email or password".to_string());

    let user = db::users::get_user_by_email(pool, credentials.email.trim())
        .await?
        .ok_or_else(rejected)?;

    if hash_password(&user.password_salt, &credentials.password) != user.password_hash {
        debug!("Password mismatch for user id {}", user.id);
        return Err(rejected());
    }

    let token = Uuid::new_v4().to_string();
    db::sessions::create_session(pool, &token, user.id, ttl).await?;

    info!("User {} logged in", user.id);
    Ok((SessionUser::from(user), token))
}

/// End a session
pub async fn logout(pool: &DbPool, token: &str) -> Result<()> {
    db::sessions::delete_session(pool, token).await
}

/// Resolve a session token to its user; expired or unknown tokens give `None`
pub async fn resolve_session(pool: &DbPool, token: &str) -> Result<Option<SessionUser>> {
    let user = db::sessions::get_session_user(pool, token).await?;
    Ok(user.map(SessionUser::from))
}

/// The user behind the request's session cookie, if any
pub async fn current_user(pool: &DbPool, cookies: &Cookies) -> Result<Option<SessionUser>> {
    match cookies.get(SESSION_COOKIE) {
        Some(cookie) => resolve_session(pool, cookie.value()).await,
        None => Ok(None),
    }
}

/// Admin gate for pages and API routes
pub fn require_admin(user: Option<SessionUser>) -> Result<SessionUser> {
    match user {
        Some(user) if user.is_admin() => Ok(user),
        Some(user) => {
            warn!("User {} attempted an admin action", user.id);
            Err(Error::Unauthorized("Admin access required".to_string()))
        }
        None => Err(Error::Unauthorized("Please log in".to_string())),
    }
}

pub fn set_session_cookie(cookies: &Cookies, token: String, secure: bool) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Session token carried by the request, if any
pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Create or refresh the bootstrap admin account from configuration
pub async fn ensure_admin(pool: &DbPool, config: &AuthConfig) -> Result<Option<User>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        debug!("ADMIN_EMAIL / ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(None);
    };

    let email = validate_email(email)?;
    validate_password(password, password)?;

    let user = db::users::upsert_user(
        pool,
        &new_user("Administrator".to_string(), email, password, Role::Admin),
    )
    .await?;

    info!("Admin account ready: {}", user.email);
    Ok(Some(user))
}
