//! Order endpoints: create, fetch, staff board and status changes.
//!
//! ```text
//! POST /api/orders              NewOrder ──► Order::build ──► repo.create ──► 201 Order
//! GET  /api/orders?limit=       newest first (staff board)
//! GET  /api/orders/{id}         Order with lines, 404 if absent
//! PUT  /api/orders/{id}/status  {status?, paymentStatus?} ──► 200 Order / 409
//! ```
//!
//! Lines are priced from the current menu and converted into the configured
//! order currency. Promotions are display-only and are not applied here.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use resort_core::{NewOrder, Order, OrderStatus, PaymentStatus};
use resort_db::Transition;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(update_status))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Body of a status change. At least one field must be present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

async fn load_order(state: &AppState, id: &str) -> ApiResult<Order> {
    state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Order not found: {id}")))
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let request = json_body(payload)?;

    let menu = state.db.menu_items().list().await?;
    let order = Order::build(request, &menu, state.pricing, Utc::now())?;
    state.db.orders().create(&order).await?;

    info!(
        order_id = %order.id,
        lines = order.items.len(),
        currency = %order.currency,
        total = order.total.minor(),
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders?limit=
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    Ok(Json(state.db.orders().list_recent(limit).await?))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(load_order(&state, &id).await?))
}

/// PUT /api/orders/{id}/status
///
/// Both transitions are checked before either is written. The writes are
/// guarded by the statuses read here, so a request racing another one gets
/// 409 instead of moving the order backwards.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let update = json_body(payload)?;
    if update.status.is_none() && update.payment_status.is_none() {
        return Err(ApiError::bad_request(
            "Provide status and/or paymentStatus",
        ));
    }

    let order = load_order(&state, &id).await?;

    let status = update
        .status
        .map(|to| order.status.transition(to))
        .transpose()?
        .map(|to| Transition::new(order.status, to))
        .filter(|change| !change.is_noop());
    let payment_status = update
        .payment_status
        .map(|to| order.payment_status.transition(to))
        .transpose()?
        .map(|to| Transition::new(order.payment_status, to))
        .filter(|change| !change.is_noop());

    if status.is_some() || payment_status.is_some() {
        state
            .db
            .orders()
            .change_status(&id, status, payment_status)
            .await?;
    }
    if let Some(change) = status {
        info!(order_id = %id, from = %change.from, to = %change.to, "Order status changed");
    }
    if let Some(change) = payment_status {
        info!(order_id = %id, to = %change.to, "Payment status changed");
    }

    Ok(Json(load_order(&state, &id).await?))
}
