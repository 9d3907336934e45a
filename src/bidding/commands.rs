//! Bid commands
// region:    --- Imports
use crate::error::AppError;
use crate::forms::BidForm;
use crate::model::Bid;
use crate::money::Money;
use crate::store::MarketStore;
use crate::validation::validate_amount;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// Place a bid on a listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bid_amount: Money,
}

impl PlaceBidCommand {
    pub fn from_form(listing_id: i64, bidder_id: i64, form: &BidForm) -> Result<Self, AppError> {
        Ok(Self {
            listing_id,
            bidder_id,
            bid_amount: validate_amount("Bid", &form.bid)?,
        })
    }
}

/// Records the bid if it beats the current highest bid.
/// A rejected bid leaves the listing untouched.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn MarketStore,
) -> Result<Bid, AppError> {
    info!("{:<12} --> Place bid: {:?}", "Command", cmd);

    match store
        .place_bid(cmd.listing_id, cmd.bidder_id, cmd.bid_amount)
        .await
    {
        Ok(bid) => {
            info!(
                "{:<12} --> Bid {} accepted on listing {}: {}",
                "Command", bid.id, bid.listing_id, bid.amount
            );
            Ok(bid)
        }
        Err(AppError::BidRejected(rejection)) => {
            warn!(
                "{:<12} --> Bid rejected on listing {}: {}",
                "Command", cmd.listing_id, rejection
            );
            Err(AppError::BidRejected(rejection))
        }
        Err(e) => Err(e),
    }
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::BidRejection;
    use crate::model::{NewListing, NewUser};
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn scenario_starting_bid_then_increment() {
        let store = InMemoryStore::with_categories(["Home"]);
        let owner = store
            .create_user(NewUser {
                username: "seller".into(),
                email: String::new(),
                password_hash: vec![],
                password_salt: vec![],
            })
            .await
            .unwrap();
        let bidder = store
            .create_user(NewUser {
                username: "buyer".into(),
                email: String::new(),
                password_hash: vec![],
                password_salt: vec![],
            })
            .await
            .unwrap();
        let listing = store
            .create_listing(NewListing {
                owner_id: owner.id,
                category_id: 1,
                title: "Chair".into(),
                description: "Oak chair".into(),
                starting_bid: "10.00".parse().unwrap(),
                image_url: None,
            })
            .await
            .unwrap();

        let bid = |amount: &str| {
            PlaceBidCommand::from_form(
                listing.id,
                bidder.id,
                &BidForm {
                    bid: amount.to_string(),
                },
            )
            .unwrap()
        };

        let err = handle_place_bid(bid("9.99"), &store).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::BidRejected(BidRejection::TooLow { .. })
        ));
        handle_place_bid(bid("10.00"), &store).await.unwrap();
        handle_place_bid(bid("15.00"), &store).await.unwrap();
        assert!(handle_place_bid(bid("15.00"), &store).await.is_err());
        let accepted = handle_place_bid(bid("15.01"), &store).await.unwrap();

        let highest = store.highest_bid(listing.id).await.unwrap().unwrap();
        assert_eq!(highest, accepted);
    }

    #[test]
    fn malformed_amount_is_a_validation_error() {
        let err = PlaceBidCommand::from_form(
            1,
            1,
            &BidForm {
                bid: "ten".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
