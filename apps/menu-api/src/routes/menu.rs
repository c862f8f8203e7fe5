//! Menu endpoints: items, categories and the priced menu.
//!
//! Reads go through [`resort_db::Catalog`], so a database failure still
//! answers with the `{data, error}` body the customer site renders. The
//! status code is 500 in that case.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use resort_core::menu::search_items;
use resort_core::validation::validate_search_query;
use resort_core::{resolve_price, Category, MenuItem, PriceResolution};
use resort_db::Listing;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/menu/items", get(list_items))
        .route("/api/menu/categories", get(list_categories))
        .route("/api/menu/priced", get(list_priced))
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Free-text search over names, descriptions and tags
    pub q: Option<String>,
    /// Category id filter
    pub category: Option<String>,
}

/// An item together with its price at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub item: MenuItem,
    pub pricing: PriceResolution,
}

type ListingResponse<T> = (StatusCode, Json<Listing<T>>);

fn respond<T>(listing: Listing<T>) -> ListingResponse<T> {
    let status = if listing.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(listing))
}

/// Loads items for the query, applying the category filter in SQL and the
/// search in memory.
async fn query_items(state: &AppState, query: &MenuQuery) -> ApiResult<Listing<MenuItem>> {
    let search = query
        .q
        .as_deref()
        .map(validate_search_query)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let catalog = state.catalog();
    let listing = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => catalog.menu_items_in(category).await,
        _ => catalog.menu_items().await,
    };

    match (listing.is_ok(), search) {
        (true, Some(q)) if !q.is_empty() => {
            let hits = search_items(&listing.data, &q);
            debug!(query = %q, hits = hits.len(), "Menu search");
            Ok(Listing::ok(hits))
        }
        _ => Ok(listing),
    }
}

/// GET /api/menu/items?q=&category=
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<ListingResponse<MenuItem>> {
    Ok(respond(query_items(&state, &query).await?))
}

/// GET /api/menu/categories
pub async fn list_categories(State(state): State<AppState>) -> ListingResponse<Category> {
    respond(state.catalog().categories().await)
}

/// GET /api/menu/priced?q=&category=
///
/// Every returned item carries its promotion resolution for "now".
pub async fn list_priced(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<ListingResponse<PricedItem>> {
    let items = query_items(&state, &query).await?;
    if let Some(message) = items.error {
        return Ok(respond(Listing::failed(message)));
    }

    let promotions = state.catalog().promotions().await;
    if let Some(message) = promotions.error {
        return Ok(respond(Listing::failed(message)));
    }

    let now = Utc::now();
    let priced = items
        .data
        .into_iter()
        .map(|item| {
            let pricing = resolve_price(&item, &promotions.data, now);
            if !pricing.unresolved_promotion_ids.is_empty() {
                debug!(
                    item_id = %item.id,
                    missing = ?pricing.unresolved_promotion_ids,
                    "Item references unknown promotions"
                );
            }
            PricedItem { item, pricing }
        })
        .collect();

    Ok(respond(Listing::ok(priced)))
}
