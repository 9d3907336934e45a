//! Storage seam for the marketplace.
//!
//! `PgStore` is the production backend, `InMemoryStore` backs tests and local
//! runs without a database. Operations that read and then write (bid
//! placement, closing, watchlist toggling) are atomic in both.
pub mod in_memory;
pub mod postgres;
mod queries;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{Bid, Category, Comment, Listing, NewComment, NewListing, NewUser, Session, User};
use crate::money::Money;
use async_trait::async_trait;
use std::sync::Arc;

pub type SharedStore = Arc<dyn MarketStore>;

/// Which listings a listing query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    /// Every open listing.
    Active,
    /// Open listings in one category.
    Category(i64),
    /// Everything a user has listed, open or closed.
    Owner(i64),
    /// Everything on a user's watchlist, open or closed.
    Watchlist(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const ALL: Page = Page {
        offset: 0,
        limit: i64::MAX,
    };

    /// 1-based page number. Page 0 is treated as page 1.
    pub fn number(page: u32, per_page: u32) -> Self {
        let per_page = i64::from(per_page.max(1));
        Page {
            offset: i64::from(page.saturating_sub(1)) * per_page,
            limit: per_page,
        }
    }
}

#[async_trait]
pub trait MarketStore: Send + Sync {
    // region:    --- Accounts
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn create_session(&self, session: Session) -> Result<Session, AppError>;
    /// Unexpired session for `token`.
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError>;
    async fn delete_session(&self, token: &str) -> Result<(), AppError>;
    /// Returns how many sessions were removed.
    async fn delete_expired_sessions(&self) -> Result<u64, AppError>;
    // endregion: --- Accounts

    // region:    --- Categories
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError>;
    // endregion: --- Categories

    // region:    --- Listings
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError>;
    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError>;
    /// Newest first.
    async fn list_listings(
        &self,
        filter: ListingFilter,
        page: Page,
    ) -> Result<Vec<Listing>, AppError>;
    /// Deactivates the listing and records the highest bidder as winner.
    /// Fails with `Forbidden` unless `owner_id` owns it; a closed listing is
    /// returned unchanged.
    async fn close_listing(&self, listing_id: i64, owner_id: i64) -> Result<Listing, AppError>;
    // endregion: --- Listings

    // region:    --- Bids
    /// Evaluates and records a bid atomically with respect to other bids on
    /// the same listing.
    async fn place_bid(&self, listing_id: i64, user_id: i64, amount: Money)
        -> Result<Bid, AppError>;
    async fn highest_bid(&self, listing_id: i64) -> Result<Option<Bid>, AppError>;
    /// Highest amounts first.
    async fn top_bids(&self, listing_id: i64, limit: i64) -> Result<Vec<Bid>, AppError>;
    // endregion: --- Bids

    // region:    --- Watchlist
    /// Flips membership and returns whether the listing is now watched.
    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError>;
    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError>;
    // endregion: --- Watchlist

    // region:    --- Comments
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError>;
    /// Oldest first.
    async fn comments_for_listing(&self, listing_id: i64) -> Result<Vec<Comment>, AppError>;
    // endregion: --- Comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(Page::number(1, 10), Page { offset: 0, limit: 10 });
        assert_eq!(Page::number(3, 10), Page { offset: 20, limit: 10 });
        assert_eq!(Page::number(0, 10), Page { offset: 0, limit: 10 });
        assert_eq!(Page::number(2, 0), Page { offset: 1, limit: 1 });
    }
}
