//! Promotion catalog endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;
use resort_core::Promotion;
use resort_db::Listing;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/promotions", get(list_promotions))
}

/// GET /api/promotions
///
/// Returned in catalog order, expired and inactive entries included.
pub async fn list_promotions(
    State(state): State<AppState>,
) -> (StatusCode, Json<Listing<Promotion>>) {
    let listing = state.catalog().promotions().await;
    let status = if listing.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(listing))
}
