//! Per-request authentication context.
//!
//! Handlers take the caller explicitly as `CurrentUser` (login required) or
//! `MaybeUser` (anonymous allowed). Both resolve the `Authorization: Bearer`
//! session token against the store.
use crate::accounts;
use crate::error::AppError;
use crate::model::User;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Raw session token from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid Authorization header".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AppError::Auth("Invalid Authorization format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, AppError> {
        bearer_token(parts)?
            .map(|token| SessionToken(token.to_string()))
            .ok_or_else(|| AppError::Auth("Missing Authorization header".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;
        let user = accounts::authenticate(state.store.as_ref(), &token).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    /// A stale or malformed token reads as anonymous.
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = match bearer_token(parts) {
            Ok(Some(token)) => token.to_string(),
            Ok(None) | Err(_) => return Ok(MaybeUser(None)),
        };
        match accounts::authenticate(state.store.as_ref(), &token).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Auth(_)) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}
