use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::{restaurant_store::RestaurantStore, user_store::UserStore},
    error::{AppError, Result},
    handlers::{AppState, ensure_restaurant_access},
    models::{
        restaurant::{NewRestaurantRequest, RestaurantFilter, UpdateRestaurantRequest},
        user::Role,
    },
    services::auth_service::AuthUser,
};

/// Browse restaurants, optionally filtered by cuisine or search term
pub async fn list_restaurants(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<RestaurantFilter>,
) -> Result<impl IntoResponse> {
    let restaurants = RestaurantStore::new(state.pool.clone())
        .list_restaurants(&filter)
        .await?;
    Ok((StatusCode::OK, Json(restaurants)))
}

/// Distinct cuisines for the browse filter dropdown
pub async fn list_cuisines(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let cuisines = RestaurantStore::new(state.pool.clone())
        .list_cuisines()
        .await?;
    Ok((StatusCode::OK, Json(cuisines)))
}

/// The restaurant managed by the calling restaurant user
pub async fn my_restaurant(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    auth.require_restaurant()?;

    let restaurant = RestaurantStore::new(state.pool.clone())
        .get_restaurant_by_owner(auth.id)
        .await?
        .ok_or(AppError::NotFound("restaurant"))?;
    Ok((StatusCode::OK, Json(restaurant)))
}

pub async fn get_restaurant(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let restaurant = RestaurantStore::new(state.pool.clone())
        .get_restaurant_by_id(id)
        .await?;
    Ok((StatusCode::OK, Json(restaurant)))
}

/// Create a restaurant, admin only, optionally binding an owner
pub async fn create_restaurant(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<NewRestaurantRequest>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("restaurant name is required".into()));
    }
    if let Some(owner_id) = request.owner_id {
        let owner = UserStore::new(state.pool.clone())
            .get_user_by_id(owner_id)
            .await?;
        if owner.role != Role::Restaurant {
            return Err(AppError::BadRequest(
                "owner must be a restaurant-role user".into(),
            ));
        }
    }

    let restaurant = RestaurantStore::new(state.pool.clone())
        .create_restaurant(&request)
        .await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Update restaurant profile, admin or the bound owner
pub async fn update_restaurant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRestaurantRequest>,
) -> Result<impl IntoResponse> {
    ensure_restaurant_access(&state, &auth, id).await?;

    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("restaurant name is required".into()));
    }

    let restaurant = RestaurantStore::new(state.pool.clone())
        .update_restaurant(id, &request)
        .await?;
    Ok((StatusCode::OK, Json(restaurant)))
}

/// Soft-delete a restaurant, admin only
pub async fn delete_restaurant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    RestaurantStore::new(state.pool.clone())
        .delete_restaurant(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
