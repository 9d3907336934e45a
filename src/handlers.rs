// region:    --- Imports
use crate::accounts::{self, LoginResponse};
use crate::bidding::commands::{handle_place_bid as command_place_bid, PlaceBidCommand};
use crate::context::{CurrentUser, MaybeUser, SessionToken};
use crate::error::AppError;
use crate::forms::{
    BidForm, CommentForm, ListingForm, LoginForm, PageQuery, RegisterForm, WatchlistForm,
};
use crate::listings;
use crate::query::handlers as query;
use crate::query::pages::{
    AddListingPage, CategoriesPage, CategoryPage, FormPage, IndexPage, ListingPage, ListingsPage,
};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

fn listing_url(listing_id: i64) -> String {
    format!("/{}", listing_id)
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// region:    --- Account Handlers

pub async fn handle_login_form() -> Json<FormPage> {
    Json(FormPage {
        form: "login",
        message: None,
    })
}

pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("{:<12} --> Login: {}", "Handler", form.username);
    let response = accounts::login(
        state.store.as_ref(),
        form,
        state.config.session_expiry_hours,
    )
    .await?;
    Ok(Json(response))
}

pub async fn handle_register_form() -> Json<FormPage> {
    Json(FormPage {
        form: "register",
        message: None,
    })
}

pub async fn handle_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    info!("{:<12} --> Register: {}", "Handler", form.username);
    let response = accounts::register(
        state.store.as_ref(),
        form,
        state.config.session_expiry_hours,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn handle_logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> Logout", "Handler");
    accounts::logout(state.store.as_ref(), &token).await?;
    Ok(Redirect::to("/"))
}

// endregion: --- Account Handlers

// region:    --- Command Handlers

pub async fn handle_add_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ListingForm>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> Add listing by: {}", "Handler", user.username);
    listings::create_listing(state.store.as_ref(), user.id, &form).await?;
    Ok(Redirect::to("/"))
}

/// Accepted bids answer with the refreshed listing page. Rejected bids answer
/// 422 with the same page plus the reason.
pub async fn handle_bid(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BidForm>,
) -> Result<Response, AppError> {
    info!(
        "{:<12} --> Bid on listing {} by: {}",
        "Handler", listing_id, user.username
    );
    let cmd = PlaceBidCommand::from_form(listing_id, user.id, &form)?;

    let (status, message) = match command_place_bid(cmd, state.store.as_ref()).await {
        Ok(_) => (StatusCode::OK, None),
        Err(AppError::BidRejected(rejection)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Some(rejection.to_string()))
        }
        Err(e) => return Err(e),
    };

    let mut page = query::get_listing_page(state.store.as_ref(), listing_id, Some(&user)).await?;
    page.message = message;
    Ok((status, Json(page)).into_response())
}

pub async fn handle_toggle_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<WatchlistForm>,
) -> Result<Redirect, AppError> {
    listings::toggle_watchlist(state.store.as_ref(), user.id, form.listing_id).await?;
    Ok(Redirect::to(&listing_url(form.listing_id)))
}

pub async fn handle_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    info!(
        "{:<12} --> Comment on listing {} by: {}",
        "Handler", form.listing_id, user.username
    );
    listings::add_comment(state.store.as_ref(), user.id, &form).await?;
    Ok(Redirect::to(&listing_url(form.listing_id)))
}

pub async fn handle_close_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Redirect, AppError> {
    info!(
        "{:<12} --> Close listing {} by: {}",
        "Handler", listing_id, user.username
    );
    listings::close_listing(state.store.as_ref(), listing_id, user.id).await?;
    Ok(Redirect::to(&listing_url(listing_id)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

pub async fn handle_index(
    State(state): State<AppState>,
    page: Option<Query<PageQuery>>,
) -> Result<Json<IndexPage>, AppError> {
    let page = page.map(|Query(q)| q).unwrap_or_default();
    let index =
        query::get_index_page(state.store.as_ref(), page.page, state.config.listings_per_page)
            .await?;
    Ok(Json(index))
}

pub async fn handle_view_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<ListingPage>, AppError> {
    let page = query::get_listing_page(state.store.as_ref(), listing_id, viewer.as_ref()).await?;
    Ok(Json(page))
}

pub async fn handle_add_listing_form(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<AddListingPage>, AppError> {
    Ok(Json(query::get_add_listing_page(state.store.as_ref()).await?))
}

pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesPage>, AppError> {
    Ok(Json(query::get_categories_page(state.store.as_ref()).await?))
}

pub async fn handle_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<CategoryPage>, AppError> {
    Ok(Json(
        query::get_category_page(state.store.as_ref(), category_id).await?,
    ))
}

pub async fn handle_my_listings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListingsPage>, AppError> {
    Ok(Json(
        query::get_owner_listings(state.store.as_ref(), user.id).await?,
    ))
}

pub async fn handle_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListingsPage>, AppError> {
    Ok(Json(query::get_watchlist(state.store.as_ref(), user.id).await?))
}

// endregion: --- Query Handlers
