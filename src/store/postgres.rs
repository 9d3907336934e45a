// region:    --- Imports
use super::queries;
use super::*;
use crate::bidding;
use crate::database::DatabaseManager;
use chrono::Utc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Store
/// PostgreSQL-backed store.
pub struct PgStore {
    db: Arc<DatabaseManager>,
}

impl PgStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

fn listing_not_found(listing_id: i64) -> AppError {
    AppError::NotFound(format!("Listing {} not found", listing_id))
}

fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

fn missing_user_on_foreign_key(err: sqlx::Error, user_id: i64) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::NotFound(format!("User {} not found", user_id))
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl MarketStore for PgStore {
    // region:    --- Accounts
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        info!("{:<12} --> Insert user: {}", "Store", user.username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.password_salt)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| conflict_on_unique(e, "Username already taken."))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_session(&self, session: Session) -> Result<Session, AppError> {
        Ok(sqlx::query_as::<_, Session>(queries::INSERT_SESSION)
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.expires_at)
            .bind(session.created_at)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        Ok(sqlx::query_as::<_, Session>(queries::GET_SESSION)
            .bind(token)
            .bind(Utc::now())
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<u64, AppError> {
        let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
            .bind(Utc::now())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
    // endregion: --- Accounts

    // region:    --- Categories
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn get_category(&self, category_id: i64) -> Result<Option<Category>, AppError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?)
    }
    // endregion: --- Categories

    // region:    --- Listings
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        info!(
            "{:<12} --> Insert listing: {} owner: {}",
            "Store", listing.title, listing.owner_id
        );
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(listing.owner_id)
            .bind(listing.category_id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.starting_bid)
            .bind(&listing.image_url)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Option<Listing>, AppError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn list_listings(
        &self,
        filter: ListingFilter,
        page: Page,
    ) -> Result<Vec<Listing>, AppError> {
        let query = match filter {
            ListingFilter::Active => sqlx::query_as::<_, Listing>(queries::LIST_ACTIVE_LISTINGS),
            ListingFilter::Category(category_id) => {
                sqlx::query_as::<_, Listing>(queries::LIST_CATEGORY_LISTINGS).bind(category_id)
            }
            ListingFilter::Owner(user_id) => {
                sqlx::query_as::<_, Listing>(queries::LIST_OWNER_LISTINGS).bind(user_id)
            }
            ListingFilter::Watchlist(user_id) => {
                sqlx::query_as::<_, Listing>(queries::LIST_WATCHLIST_LISTINGS).bind(user_id)
            }
        };
        Ok(query
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn close_listing(&self, listing_id: i64, owner_id: i64) -> Result<Listing, AppError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING_FOR_UPDATE)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| listing_not_found(listing_id))?;

                    if listing.owner_id != owner_id {
                        return Err(AppError::Forbidden(
                            "Only the owner can close this listing.".to_string(),
                        ));
                    }
                    if !listing.active {
                        debug!("{:<12} --> Listing {} already closed", "Store", listing_id);
                        return Ok(listing);
                    }

                    let winner_id = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .map(|bid| bid.user_id);

                    let closed = sqlx::query_as::<_, Listing>(queries::CLOSE_LISTING)
                        .bind(listing_id)
                        .bind(winner_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<Listing, AppError>(closed)
                })
            })
            .await
    }
    // endregion: --- Listings

    // region:    --- Bids
    async fn place_bid(
        &self,
        listing_id: i64,
        user_id: i64,
        amount: Money,
    ) -> Result<Bid, AppError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    // the row lock serializes concurrent bids on this listing
                    let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING_FOR_UPDATE)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| listing_not_found(listing_id))?;

                    let highest: Option<Money> =
                        sqlx::query_scalar(queries::GET_HIGHEST_BID_AMOUNT)
                            .bind(listing_id)
                            .fetch_one(&mut **tx)
                            .await?;

                    bidding::evaluate_bid(&listing, highest, amount)?;

                    // the listing row is locked, so a foreign key failure is the bidder
                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(user_id)
                        .bind(amount)
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(|e| missing_user_on_foreign_key(e, user_id))?;
                    Ok::<Bid, AppError>(bid)
                })
            })
            .await
    }

    async fn highest_bid(&self, listing_id: i64) -> Result<Option<Bid>, AppError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn top_bids(&self, listing_id: i64, limit: i64) -> Result<Vec<Bid>, AppError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_TOP_BIDS)
            .bind(listing_id)
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?)
    }
    // endregion: --- Bids

    // region:    --- Watchlist
    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Listing>(queries::GET_LISTING_FOR_UPDATE)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| listing_not_found(listing_id))?;

                    let removed = sqlx::query(queries::DELETE_WATCH)
                        .bind(user_id)
                        .bind(listing_id)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();
                    if removed > 0 {
                        return Ok(false);
                    }

                    sqlx::query(queries::INSERT_WATCH)
                        .bind(user_id)
                        .bind(listing_id)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<bool, AppError>(true)
                })
            })
            .await
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?)
    }
    // endregion: --- Watchlist

    // region:    --- Comments
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AppError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                        .bind(comment.listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| listing_not_found(comment.listing_id))?;

                    let created = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
                        .bind(comment.listing_id)
                        .bind(comment.user_id)
                        .bind(&comment.text)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<Comment, AppError>(created)
                })
            })
            .await
    }

    async fn comments_for_listing(&self, listing_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }
    // endregion: --- Comments
}

// endregion: --- Postgres Store
