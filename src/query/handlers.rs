// region:    --- Imports
use super::pages::*;
use crate::bidding::minimum_acceptable_bid;
use crate::error::AppError;
use crate::model::{Listing, User};
use crate::store::{ListingFilter, MarketStore, Page};
use tracing::info;

// endregion: --- Imports

/// Bids shown on a listing page
pub const TOP_BIDS_SHOWN: i64 = 3;

// region:    --- Query Handlers

async fn summarize(
    store: &dyn MarketStore,
    listings: Vec<Listing>,
) -> Result<Vec<ListingSummary>, AppError> {
    let mut summaries = Vec::with_capacity(listings.len());
    for listing in listings {
        let current_price = store
            .highest_bid(listing.id)
            .await?
            .map(|bid| bid.amount)
            .unwrap_or(listing.starting_bid);
        summaries.push(ListingSummary {
            listing,
            current_price,
        });
    }
    Ok(summaries)
}

/// Active listings, newest first
pub async fn get_index_page(
    store: &dyn MarketStore,
    page: u32,
    per_page: u32,
) -> Result<IndexPage, AppError> {
    let page = page.max(1);
    info!("{:<12} --> Active listings page: {}", "Query", page);
    let mut window = Page::number(page, per_page);
    // one extra row tells us whether a next page exists
    window.limit += 1;

    let mut listings = store.list_listings(ListingFilter::Active, window).await?;
    let has_next = listings.len() as i64 > window.limit - 1;
    listings.truncate((window.limit - 1) as usize);

    Ok(IndexPage {
        listings: summarize(store, listings).await?,
        page,
        has_next,
    })
}

/// Full listing view for `viewer` (anonymous when `None`)
pub async fn get_listing_page(
    store: &dyn MarketStore,
    listing_id: i64,
    viewer: Option<&User>,
) -> Result<ListingPage, AppError> {
    info!("{:<12} --> Listing id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", listing_id)))?;

    let category = store.get_category(listing.category_id).await?;
    let highest_bid = store.highest_bid(listing_id).await?;
    let bids = store.top_bids(listing_id, TOP_BIDS_SHOWN).await?;
    let comments = store.comments_for_listing(listing_id).await?;
    let watching = match viewer {
        Some(user) => store.is_watching(user.id, listing_id).await?,
        None => false,
    };
    let minimum_bid =
        minimum_acceptable_bid(listing.starting_bid, highest_bid.as_ref().map(|b| b.amount));
    let is_owner = viewer.map_or(false, |user| user.id == listing.owner_id);

    Ok(ListingPage {
        listing,
        category,
        highest_bid,
        minimum_bid,
        bids,
        comments,
        watching,
        is_owner,
        message: None,
    })
}

pub async fn get_categories_page(store: &dyn MarketStore) -> Result<CategoriesPage, AppError> {
    info!("{:<12} --> All categories", "Query");
    Ok(CategoriesPage {
        categories: store.list_categories().await?,
    })
}

/// Active listings in one category
pub async fn get_category_page(
    store: &dyn MarketStore,
    category_id: i64,
) -> Result<CategoryPage, AppError> {
    info!("{:<12} --> Category id: {}", "Query", category_id);
    let category = store
        .get_category(category_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", category_id)))?;
    let listings = store
        .list_listings(ListingFilter::Category(category_id), Page::ALL)
        .await?;
    Ok(CategoryPage {
        category,
        listings: summarize(store, listings).await?,
    })
}

/// Everything `user_id` has listed
pub async fn get_owner_listings(
    store: &dyn MarketStore,
    user_id: i64,
) -> Result<ListingsPage, AppError> {
    info!("{:<12} --> Listings owned by: {}", "Query", user_id);
    let listings = store
        .list_listings(ListingFilter::Owner(user_id), Page::ALL)
        .await?;
    Ok(ListingsPage {
        listings: summarize(store, listings).await?,
    })
}

/// Everything on `user_id`'s watchlist
pub async fn get_watchlist(
    store: &dyn MarketStore,
    user_id: i64,
) -> Result<ListingsPage, AppError> {
    info!("{:<12} --> Watchlist of: {}", "Query", user_id);
    let listings = store
        .list_listings(ListingFilter::Watchlist(user_id), Page::ALL)
        .await?;
    Ok(ListingsPage {
        listings: summarize(store, listings).await?,
    })
}

pub async fn get_add_listing_page(store: &dyn MarketStore) -> Result<AddListingPage, AppError> {
    Ok(AddListingPage {
        categories: store.list_categories().await?,
    })
}

// endregion: --- Query Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewListing, NewUser};
    use crate::money::Money;
    use crate::store::InMemoryStore;

    async fn store_with_listings(count: usize) -> (InMemoryStore, User) {
        let store = InMemoryStore::with_categories(["Toys"]);
        let user = store
            .create_user(NewUser {
                username: "seller".into(),
                email: String::new(),
                password_hash: vec![],
                password_salt: vec![],
            })
            .await
            .unwrap();
        for i in 0..count {
            store
                .create_listing(NewListing {
                    owner_id: user.id,
                    category_id: 1,
                    title: format!("Item {}", i),
                    description: "desc".into(),
                    starting_bid: Money::from_cents(500),
                    image_url: None,
                })
                .await
                .unwrap();
        }
        (store, user)
    }

    #[tokio::test]
    async fn index_pages_through_active_listings() {
        let (store, _) = store_with_listings(5).await;

        let first = get_index_page(&store, 1, 2).await.unwrap();
        assert_eq!(first.listings.len(), 2);
        assert!(first.has_next);
        assert_eq!(first.listings[0].listing.title, "Item 4");

        let last = get_index_page(&store, 3, 2).await.unwrap();
        assert_eq!(last.listings.len(), 1);
        assert!(!last.has_next);
    }

    #[tokio::test]
    async fn listing_page_reports_minimum_and_watch_state() {
        let (store, seller) = store_with_listings(1).await;
        let listing_id = store
            .list_listings(ListingFilter::Active, Page::ALL)
            .await
            .unwrap()[0]
            .id;

        let page = get_listing_page(&store, listing_id, Some(&seller)).await.unwrap();
        assert_eq!(page.minimum_bid, Some(Money::from_cents(500)));
        assert!(page.is_owner);
        assert!(!page.watching);

        store
            .place_bid(listing_id, seller.id, Money::from_cents(700))
            .await
            .unwrap();
        store.toggle_watchlist(seller.id, listing_id).await.unwrap();

        let page = get_listing_page(&store, listing_id, Some(&seller)).await.unwrap();
        assert_eq!(page.minimum_bid, Some(Money::from_cents(701)));
        assert!(page.watching);
        assert_eq!(page.bids.len(), 1);

        let anonymous = get_listing_page(&store, listing_id, None).await.unwrap();
        assert!(!anonymous.is_owner);
        assert!(!anonymous.watching);
    }

    #[tokio::test]
    async fn missing_listing_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            get_listing_page(&store, 1, None).await,
            Err(AppError::NotFound(_))
        ));
    }
}
