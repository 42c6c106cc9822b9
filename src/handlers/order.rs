use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::{
        order_store::OrderStore,
        restaurant_store::RestaurantStore,
    },
    error::{AppError, Result},
    handlers::{AppState, ensure_restaurant_access},
    models::{
        order::{NewOrderRequest, Order, UpdateOrderStatusRequest},
        user::Role,
    },
    services::auth_service::AuthUser,
};

/// Place an order from the caller's cart, customers only
pub async fn place_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<NewOrderRequest>,
) -> Result<impl IntoResponse> {
    if auth.role != Role::Customer {
        return Err(AppError::Forbidden("only customers can place orders".into()));
    }

    let order = OrderStore::new(state.pool.clone())
        .place_order(auth.id, &request)
        .await?;

    tracing::info!(order_id = order.id, total = order.total_amount, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Order history of the calling customer
pub async fn my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderStore::new(state.pool.clone())
        .list_for_user(auth.id)
        .await?;
    Ok((StatusCode::OK, Json(orders)))
}

/// Incoming orders of the calling owner's restaurant
pub async fn restaurant_orders(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    auth.require_restaurant()?;

    let restaurant = RestaurantStore::new(state.pool.clone())
        .get_restaurant_by_owner(auth.id)
        .await?
        .ok_or(AppError::NotFound("restaurant"))?;

    let orders = OrderStore::new(state.pool.clone())
        .list_for_restaurant(restaurant.id)
        .await?;
    Ok((StatusCode::OK, Json(orders)))
}

pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let store = OrderStore::new(state.pool.clone());
    let order = store.get_order(id).await?;
    ensure_order_access(&state, &auth, &order).await?;

    let details = store.get_order_details(id).await?;
    Ok((StatusCode::OK, Json(details)))
}

/// Move an order along its status lifecycle, restaurant side
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse> {
    let store = OrderStore::new(state.pool.clone());
    let order = store.get_order(id).await?;
    ensure_restaurant_access(&state, &auth, order.restaurant_id).await?;

    let details = store.update_status(id, request.status).await?;
    Ok((StatusCode::OK, Json(details)))
}

/// Re-place a past order at current menu prices
pub async fn reorder(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let store = OrderStore::new(state.pool.clone());
    let order = store.get_order(id).await?;
    if order.user_id != auth.id {
        return Err(AppError::Forbidden("not your order".into()));
    }

    let details = store.reorder(auth.id, id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// The customer who placed it, the restaurant managing it, or an admin
pub(crate) async fn ensure_order_access(
    state: &AppState,
    auth: &AuthUser,
    order: &Order,
) -> Result<()> {
    if auth.role == Role::Admin || order.user_id == auth.id {
        return Ok(());
    }
    if auth.role == Role::Restaurant {
        let store = RestaurantStore::new(state.pool.clone());
        if store.is_owner(auth.id, order.restaurant_id).await? {
            return Ok(());
        }
    }
    Err(AppError::Forbidden("no access to this order".into()))
}
