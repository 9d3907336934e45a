//! Listing lifecycle commands: create, close, watchlist toggle, comments.
use crate::error::AppError;
use crate::forms::{CommentForm, ListingForm};
use crate::model::{Comment, Listing, NewComment, NewListing};
use crate::store::MarketStore;
use crate::validation::{validate_comment, validate_listing, ValidationError};
use tracing::info;

pub async fn create_listing(
    store: &dyn MarketStore,
    owner_id: i64,
    form: &ListingForm,
) -> Result<Listing, AppError> {
    let draft = validate_listing(form)?;
    if store.get_category(draft.category_id).await?.is_none() {
        return Err(ValidationError::UnknownCategory(draft.category_id.to_string()).into());
    }

    let listing = store
        .create_listing(NewListing {
            owner_id,
            category_id: draft.category_id,
            title: draft.title,
            description: draft.description,
            starting_bid: draft.starting_bid,
            image_url: draft.image_url,
        })
        .await?;
    info!(
        "{:<12} --> Listing {} created by user {}",
        "Command", listing.id, owner_id
    );
    Ok(listing)
}

/// Owner-only, one-way.
pub async fn close_listing(
    store: &dyn MarketStore,
    listing_id: i64,
    user_id: i64,
) -> Result<Listing, AppError> {
    let listing = store.close_listing(listing_id, user_id).await?;
    info!(
        "{:<12} --> Listing {} closed, winner: {:?}",
        "Command", listing.id, listing.winner_id
    );
    Ok(listing)
}

/// Returns whether the listing is watched after the toggle.
pub async fn toggle_watchlist(
    store: &dyn MarketStore,
    user_id: i64,
    listing_id: i64,
) -> Result<bool, AppError> {
    let watching = store.toggle_watchlist(user_id, listing_id).await?;
    info!(
        "{:<12} --> User {} watchlist {} listing {}",
        "Command",
        user_id,
        if watching { "added" } else { "removed" },
        listing_id
    );
    Ok(watching)
}

pub async fn add_comment(
    store: &dyn MarketStore,
    user_id: i64,
    form: &CommentForm,
) -> Result<Comment, AppError> {
    let text = validate_comment(form)?;
    store
        .add_comment(NewComment {
            listing_id: form.listing_id,
            user_id,
            text,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, ListingFilter, Page};

    fn form(category: &str) -> ListingForm {
        ListingForm {
            category: category.into(),
            title: "Guitar".into(),
            description: "Acoustic, new strings".into(),
            starting_bid: "120".into(),
            image_url: Some("".into()),
        }
    }

    #[tokio::test]
    async fn creates_listing_in_known_category() {
        let store = InMemoryStore::with_categories(["Music"]);
        let listing = create_listing(&store, 7, &form("1")).await.unwrap();
        assert!(listing.active);
        assert_eq!(listing.owner_id, 7);
        assert_eq!(listing.image_url, None);
        assert_eq!(
            store
                .list_listings(ListingFilter::Category(1), Page::ALL)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn unknown_category_is_a_validation_error() {
        let store = InMemoryStore::with_categories(["Music"]);
        let err = create_listing(&store, 7, &form("42")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::UnknownCategory(_))
        ));
    }

    #[tokio::test]
    async fn comment_count_never_decreases() {
        let store = InMemoryStore::with_categories(["Music"]);
        let listing = create_listing(&store, 7, &form("1")).await.unwrap();
        close_listing(&store, listing.id, 7).await.unwrap();

        let mut previous = 0;
        for text in ["is it signed?", "", "yes"] {
            let _ = add_comment(
                &store,
                8,
                &CommentForm {
                    listing_id: listing.id,
                    comment: text.into(),
                },
            )
            .await;
            let count = store.comments_for_listing(listing.id).await.unwrap().len();
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 2);
    }

    #[tokio::test]
    async fn comment_on_missing_listing_is_not_found() {
        let store = InMemoryStore::new();
        let err = add_comment(
            &store,
            1,
            &CommentForm {
                listing_id: 404,
                comment: "hello".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
