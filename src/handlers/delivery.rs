use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::{delivery_store::DeliveryStore, order_store::OrderStore, user_store::UserStore},
    error::{AppError, Result},
    handlers::{AppState, ensure_restaurant_access, order::ensure_order_access},
    models::delivery::{NewDeliveryRequest, UpdateDeliveryStatusRequest},
    services::auth_service::AuthUser,
};

/// Assign a delivery person to an order, restaurant side
pub async fn create_delivery(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<NewDeliveryRequest>,
) -> Result<impl IntoResponse> {
    let order = OrderStore::new(state.pool.clone()).get_order(order_id).await?;
    ensure_restaurant_access(&state, &auth, order.restaurant_id).await?;

    // The personnel reference must be an active user
    UserStore::new(state.pool.clone())
        .get_user_by_id(request.personnel_id)
        .await?;

    let delivery = DeliveryStore::new(state.pool.clone())
        .create_delivery(order_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

/// The delivery attached to an order
pub async fn get_delivery(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let order = OrderStore::new(state.pool.clone()).get_order(order_id).await?;
    ensure_order_access(&state, &auth, &order).await?;

    let delivery = DeliveryStore::new(state.pool.clone())
        .get_delivery_for_order(order_id)
        .await?
        .ok_or(AppError::NotFound("delivery"))?;
    Ok((StatusCode::OK, Json(delivery)))
}

pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDeliveryStatusRequest>,
) -> Result<impl IntoResponse> {
    let store = DeliveryStore::new(state.pool.clone());
    let delivery = store.get_delivery_by_id(id).await?;

    let order = OrderStore::new(state.pool.clone())
        .get_order(delivery.order_id)
        .await?;
    ensure_restaurant_access(&state, &auth, order.restaurant_id).await?;

    let delivery = store.update_status(id, request.status).await?;
    Ok((StatusCode::OK, Json(delivery)))
}
