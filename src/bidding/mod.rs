//! Bid evaluation.
//!
//! The highest bid is always derived from the stored bids, never stored on the
//! listing itself.
pub mod commands;

use crate::model::{Bid, Listing};
use crate::money::Money;
use thiserror::Error;

/// Amount a new bid must exceed the current highest bid by.
pub const MINIMUM_INCREMENT: Money = Money::from_cents(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BidRejection {
    #[error("Bid of {amount} is too low, the minimum acceptable bid is {minimum}.")]
    TooLow { amount: Money, minimum: Money },

    #[error("This listing is closed and no longer accepts bids.")]
    ListingClosed,

    #[error("No bid can exceed the current highest bid of {highest}.")]
    NoHigherBid { highest: Money },
}

/// Highest bid by amount. Ties go to the earliest bid.
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().reduce(|best, bid| {
        if bid.amount > best.amount
            || (bid.amount == best.amount && bid.created_at < best.created_at)
        {
            bid
        } else {
            best
        }
    })
}

/// Lowest amount the next bid may have. `None` once the highest bid sits at
/// the top of the `Money` range.
pub fn minimum_acceptable_bid(starting_bid: Money, highest: Option<Money>) -> Option<Money> {
    match highest {
        Some(highest) => highest
            .checked_add(MINIMUM_INCREMENT)
            .map(|next| next.max(starting_bid)),
        None => Some(starting_bid),
    }
}

pub fn evaluate_bid(
    listing: &Listing,
    highest: Option<Money>,
    amount: Money,
) -> Result<(), BidRejection> {
    if !listing.active {
        return Err(BidRejection::ListingClosed);
    }
    let Some(minimum) = minimum_acceptable_bid(listing.starting_bid, highest) else {
        return Err(BidRejection::NoHigherBid {
            highest: highest.unwrap_or(listing.starting_bid),
        });
    };
    if amount < minimum {
        return Err(BidRejection::TooLow { amount, minimum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn listing(starting_bid: i64) -> Listing {
        Listing {
            id: 1,
            owner_id: 1,
            category_id: 1,
            title: "Lamp".into(),
            description: "Brass desk lamp".into(),
            starting_bid: Money::from_cents(starting_bid),
            image_url: None,
            active: true,
            winner_id: None,
            created_at: Utc::now(),
        }
    }

    fn bid(id: i64, user_id: i64, cents: i64, age_secs: i64) -> Bid {
        Bid {
            id,
            listing_id: 1,
            user_id,
            amount: Money::from_cents(cents),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[test]
    fn first_bid_may_equal_starting_bid() {
        let listing = listing(1000);
        assert_eq!(
            evaluate_bid(&listing, None, Money::from_cents(999)),
            Err(BidRejection::TooLow {
                amount: Money::from_cents(999),
                minimum: Money::from_cents(1000),
            })
        );
        assert_eq!(evaluate_bid(&listing, None, Money::from_cents(1000)), Ok(()));
    }

    #[test]
    fn later_bids_must_beat_highest_by_a_cent() {
        let listing = listing(1000);
        let highest = Some(Money::from_cents(1500));
        assert!(evaluate_bid(&listing, highest, Money::from_cents(1500)).is_err());
        assert_eq!(evaluate_bid(&listing, highest, Money::from_cents(1501)), Ok(()));
    }

    #[test]
    fn minimum_never_drops_below_starting_bid() {
        assert_eq!(
            minimum_acceptable_bid(Money::from_cents(1000), Some(Money::from_cents(200))),
            Some(Money::from_cents(1000))
        );
        assert_eq!(
            minimum_acceptable_bid(Money::from_cents(1000), Some(Money::from_cents(1200))),
            Some(Money::from_cents(1201))
        );
    }

    #[test]
    fn equal_bid_rejected_at_top_of_range() {
        let listing = listing(0);
        let top = Money::from_cents(i64::MAX);
        assert_eq!(minimum_acceptable_bid(listing.starting_bid, Some(top)), None);
        assert_eq!(
            evaluate_bid(&listing, Some(top), top),
            Err(BidRejection::NoHigherBid { highest: top })
        );
    }

    #[test]
    fn closed_listing_rejects_any_bid() {
        let mut listing = listing(0);
        listing.active = false;
        assert_eq!(
            evaluate_bid(&listing, None, Money::from_cents(1_000_000)),
            Err(BidRejection::ListingClosed)
        );
    }

    #[test]
    fn highest_bid_picks_max_amount_then_earliest() {
        assert!(highest_bid(&[]).is_none());

        let bids = vec![bid(1, 1, 1000, 30), bid(2, 2, 1500, 20), bid(3, 3, 1500, 10)];
        assert_eq!(highest_bid(&bids).map(|b| b.id), Some(2));
    }
}
