//! Page contexts returned by the read side. Each one carries what a template
//! for that page needs.
use crate::model::{Bid, Category, Comment, Listing};
use crate::money::Money;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    #[serde(flatten)]
    pub listing: Listing,
    /// Highest bid, or the starting bid while there are none.
    pub current_price: Money,
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub listings: Vec<ListingSummary>,
    pub page: u32,
    pub has_next: bool,
}

#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub listing: Listing,
    pub category: Option<Category>,
    pub highest_bid: Option<Bid>,
    /// `None` when no further bid is possible.
    pub minimum_bid: Option<Money>,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub watching: bool,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesPage {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub listings: Vec<ListingSummary>,
}

#[derive(Debug, Serialize)]
pub struct ListingsPage {
    pub listings: Vec<ListingSummary>,
}

#[derive(Debug, Serialize)]
pub struct AddListingPage {
    pub categories: Vec<Category>,
}

/// Login and register forms.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
