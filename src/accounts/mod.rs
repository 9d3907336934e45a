//! Registration, login and session handling.
pub mod password;

use crate::error::AppError;
use crate::forms::{LoginForm, RegisterForm};
use crate::model::{NewUser, Session, User};
use crate::store::MarketStore;
use crate::validation::validate_registration;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

pub const INVALID_CREDENTIALS: &str = "Invalid username and/or password.";

/// Returned after a successful login or registration.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub session_token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

impl LoginResponse {
    fn new(user: &User, session: Session) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            session_token: session.token,
            expires_at: session.expires_at,
        }
    }
}

/// Hashing is CPU-bound, keep it off the async workers.
async fn off_thread<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

async fn start_session(
    store: &dyn MarketStore,
    user_id: i64,
    expiry_hours: i64,
) -> Result<Session, AppError> {
    let now = Utc::now();
    store
        .create_session(Session {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: now + Duration::hours(expiry_hours),
            created_at: now,
        })
        .await
}

/// Creates the account and logs it in.
pub async fn register(
    store: &dyn MarketStore,
    form: RegisterForm,
    expiry_hours: i64,
) -> Result<LoginResponse, AppError> {
    let registration = validate_registration(&form)?;
    info!("{:<12} --> Register user: {}", "Command", registration.username);

    if store
        .get_user_by_username(&registration.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken.".to_string()));
    }

    let salt = password::generate_salt().to_vec();
    let hash = {
        let (plain, salt) = (registration.password, salt.clone());
        off_thread(move || password::hash_password(&plain, &salt)).await?
    };

    let user = store
        .create_user(NewUser {
            username: registration.username,
            email: registration.email,
            password_hash: hash.to_vec(),
            password_salt: salt,
        })
        .await?;
    let session = start_session(store, user.id, expiry_hours).await?;
    Ok(LoginResponse::new(&user, session))
}

pub async fn login(
    store: &dyn MarketStore,
    form: LoginForm,
    expiry_hours: i64,
) -> Result<LoginResponse, AppError> {
    let username = form.username.trim();
    info!("{:<12} --> Login attempt: {}", "Command", username);

    let user = store
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.to_string()))?;

    let (plain, hash, salt) = (
        form.password,
        user.password_hash.clone(),
        user.password_salt.clone(),
    );
    let valid = off_thread(move || password::verify_password(&plain, &hash, &salt)).await?;
    if !valid {
        warn!("{:<12} --> Wrong password for: {}", "Command", user.username);
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let session = start_session(store, user.id, expiry_hours).await?;
    Ok(LoginResponse::new(&user, session))
}

pub async fn logout(store: &dyn MarketStore, token: &str) -> Result<(), AppError> {
    store.delete_session(token).await
}

/// User owning the unexpired session `token`.
pub async fn authenticate(store: &dyn MarketStore, token: &str) -> Result<User, AppError> {
    let session = store
        .get_session(token)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid or expired session".to_string()))?;
    store
        .get_user(session.user_id)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid or expired session".to_string()))
}
