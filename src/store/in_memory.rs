use super::*;
use crate::bidding;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::{Mutex, MutexGuard};

/// Fake in-process store.
///
/// One mutex guards everything, so every operation is serialized.
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, User>,
    sessions: HashMap<String, Session>,
    categories: BTreeMap<i64, Category>,
    listings: BTreeMap<i64, Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    // (user_id, listing_id)
    watchlist: BTreeSet<(i64, i64)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn listing(&self, listing_id: i64) -> Result<&Listing, AppError> {
        self.listings
            .get(&listing_id)
            .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", listing_id)))
    }

    fn highest_bid(&self, listing_id: i64) -> Option<&Bid> {
        let bids: Vec<Bid> = self
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect();
        let id = bidding::highest_bid(&bids)?.id;
        self.bids.iter().find(|b| b.id == id)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Store pre-seeded with the given category titles, ids starting at 1.
    pub fn with_categories<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = State::default();
        for title in titles {
            let id = state.next_id();
            state.categories.insert(
                id,
                Category {
                    id,
                    title: title.into(),
                },
            );
        }
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn new_shared() -> SharedStore {
        Arc::new(Self::new())
    }

    async fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().await
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.lock().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already taken.".to_string()));
        }
        let id = state.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            password_salt: user.password_salt,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self.lock().await.users.get(&user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_session(&self, session: Session) -> Result<Session, AppError> {
        self.lock()
            .await
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        let now = Utc::now();
        Ok(self
            .lock()
            .await
            .sessions
            .get(token)
            .filter(|s| s.expires_at > now)
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        self.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut state = self.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at > now);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> =
            self.lock().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.lock().await.categories.get(&category_id).cloned())
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        let mut state = self.lock().await;
        if !state.categories.contains_key(&listing.category_id) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                listing.category_id
            )));
        }
        let id = state.next_id();
        let listing = Listing {
            id,
            owner_id: listing.owner_id,
            category_id: listing.category_id,
            title: listing.title,
            description: listing.description,
            starting_bid: listing.starting_bid,
            image_url: listing.image_url,
            active: true,
            winner_id: None,
            created_at: Utc::now(),
        };
        state.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(self.lock().await.listings.get(&listing_id).cloned())
    }

    async fn list_listings(
        &self,
        filter: ListingFilter,
        page: Page,
    ) -> Result<Vec<Listing>, AppError> {
        let state = self.lock().await;
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(state
            .listings
            .values()
            .rev()
            .filter(|l| match filter {
                ListingFilter::Active => l.active,
                ListingFilter::Category(category_id) => l.active && l.category_id == category_id,
                ListingFilter::Owner(user_id) => l.owner_id == user_id,
                ListingFilter::Watchlist(user_id) => state.watchlist.contains(&(user_id, l.id)),
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn close_listing(&self, listing_id: i64, owner_id: i64) -> Result<Listing, AppError> {
        let mut state = self.lock().await;
        let listing = state.listing(listing_id)?;
        if listing.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Only the owner can close this listing.".to_string(),
            ));
        }
        if !listing.active {
            return Ok(listing.clone());
        }
        let winner_id = state.highest_bid(listing_id).map(|b| b.user_id);
        let listing = state
            .listings
            .get_mut(&listing_id)
            .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", listing_id)))?;
        listing.active = false;
        listing.winner_id = winner_id;
        Ok(listing.clone())
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        user_id: i64,
        amount: Money,
    ) -> Result<Bid, AppError> {
        let mut state = self.lock().await;
        let listing = state.listing(listing_id)?;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        let highest = state.highest_bid(listing_id).map(|b| b.amount);
        bidding::evaluate_bid(listing, highest, amount)?;

        let bid = Bid {
            id: state.next_id(),
            listing_id,
            user_id,
            amount,
            created_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(bid)
    }

    async fn highest_bid(&self, listing_id: i64) -> Result<Option<Bid>, AppError> {
        Ok(self.lock().await.highest_bid(listing_id).cloned())
    }

    async fn top_bids(&self, listing_id: i64, limit: i64) -> Result<Vec<Bid>, AppError> {
        let mut bids: Vec<Bid> = self
            .lock()
            .await
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.id.cmp(&b.id)));
        bids.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(bids)
    }

    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        let mut state = self.lock().await;
        state.listing(listing_id)?;
        if state.watchlist.remove(&(user_id, listing_id)) {
            Ok(false)
        } else {
            state.watchlist.insert((user_id, listing_id));
            Ok(true)
        }
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        Ok(self
            .lock()
            .await
            .watchlist
            .contains(&(user_id, listing_id)))
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut state = self.lock().await;
        state.listing(comment.listing_id)?;
        let comment = Comment {
            id: state.next_id(),
            listing_id: comment.listing_id,
            user_id: comment.user_id,
            text: comment.text,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn comments_for_listing(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .lock()
            .await
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }
}
