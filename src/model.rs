use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// User model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Vec<u8>,
    #[serde(skip_serializing, default)]
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

// Category model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
}

// Listing model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub image_url: Option<String>,
    pub active: bool,
    pub winner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// Bid model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// Session model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
}

/// Validated input for a new listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub owner_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub listing_id: i64,
    pub user_id: i64,
    pub text: String,
}
