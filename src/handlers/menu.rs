use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::{menu_store::MenuStore, restaurant_store::RestaurantStore},
    error::{AppError, Result},
    handlers::{AppState, ensure_restaurant_access},
    models::menu::{NewMenuItemRequest, UpdateMenuItemRequest},
    services::auth_service::AuthUser,
};

/// The active menu of a restaurant
pub async fn list_menu(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse> {
    // 404 for unknown restaurants rather than an empty list
    RestaurantStore::new(state.pool.clone())
        .get_restaurant_by_id(restaurant_id)
        .await?;

    let items = MenuStore::new(state.pool.clone())
        .list_for_restaurant(restaurant_id)
        .await?;
    Ok((StatusCode::OK, Json(items)))
}

/// Add a menu entry, admin or the restaurant's owner
pub async fn create_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(request): Json<NewMenuItemRequest>,
) -> Result<impl IntoResponse> {
    ensure_restaurant_access(&state, &auth, restaurant_id).await?;

    if request.item_name.trim().is_empty() {
        return Err(AppError::BadRequest("item name is required".into()));
    }

    let item = MenuStore::new(state.pool.clone())
        .create_item(restaurant_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse> {
    let store = MenuStore::new(state.pool.clone());
    let item = store.get_item_by_id(id).await?;
    ensure_restaurant_access(&state, &auth, item.restaurant_id).await?;

    if request.item_name.trim().is_empty() {
        return Err(AppError::BadRequest("item name is required".into()));
    }

    let item = store.update_item(id, &request).await?;
    Ok((StatusCode::OK, Json(item)))
}

/// Soft-delete a menu entry, past order items keep their snapshot
pub async fn delete_menu_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let store = MenuStore::new(state.pool.clone());
    let item = store.get_item_by_id(id).await?;
    ensure_restaurant_access(&state, &auth, item.restaurant_id).await?;

    store.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
