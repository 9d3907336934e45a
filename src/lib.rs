pub mod accounts;
pub mod bidding;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod listings;
pub mod model;
pub mod money;
pub mod query;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod validation;
