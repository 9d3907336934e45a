//! Raw form bodies as posted by the browser.
//!
//! Fields stay as strings here; `crate::validation` turns them into typed
//! values before anything touches the store.
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingForm {
    pub category: String,
    pub title: String,
    pub description: String,
    pub starting_bid: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BidForm {
    pub bid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub listing_id: i64,
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistForm {
    pub listing_id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: first_page() }
    }
}
