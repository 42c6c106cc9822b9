use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    db::{DbPool, restaurant_store::RestaurantStore},
    error::{AppError, Result},
    models::user::Role,
    services::auth_service::AuthUser,
};

pub mod analytics;
pub mod auth;
pub mod delivery;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod settings;
pub mod user;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route(
            "/api/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/api/users/{id}/password", put(user::set_user_password))
        .route("/api/me/password", put(user::change_own_password))
        .route(
            "/api/settings",
            get(settings::list_settings).put(settings::upsert_setting),
        )
        .route(
            "/api/restaurants",
            get(restaurant::list_restaurants).post(restaurant::create_restaurant),
        )
        .route("/api/restaurants/cuisines", get(restaurant::list_cuisines))
        .route("/api/restaurants/mine", get(restaurant::my_restaurant))
        .route(
            "/api/restaurants/{id}",
            get(restaurant::get_restaurant)
                .put(restaurant::update_restaurant)
                .delete(restaurant::delete_restaurant),
        )
        .route(
            "/api/restaurants/{id}/menu",
            get(menu::list_menu).post(menu::create_menu_item),
        )
        .route(
            "/api/menu/{id}",
            put(menu::update_menu_item).delete(menu::delete_menu_item),
        )
        .route("/api/orders", post(order::place_order))
        .route("/api/orders/mine", get(order::my_orders))
        .route("/api/orders/restaurant", get(order::restaurant_orders))
        .route("/api/orders/{id}", get(order::get_order))
        .route("/api/orders/{id}/status", put(order::update_status))
        .route("/api/orders/{id}/reorder", post(order::reorder))
        .route(
            "/api/orders/{id}/delivery",
            get(delivery::get_delivery).post(delivery::create_delivery),
        )
        .route("/api/deliveries/{id}/status", put(delivery::update_status))
        .route("/api/analytics/overview", get(analytics::admin_overview))
        .route(
            "/api/analytics/restaurant",
            get(analytics::restaurant_analytics),
        )
        .route("/api/reports/orders.csv", get(analytics::export_orders_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "Food ordering server is running."
}

/// Admins may manage any restaurant, restaurant users only their own
pub(crate) async fn ensure_restaurant_access(
    state: &AppState,
    auth: &AuthUser,
    restaurant_id: i64,
) -> Result<()> {
    if auth.role == Role::Admin {
        return Ok(());
    }
    if auth.role == Role::Restaurant {
        let store = RestaurantStore::new(state.pool.clone());
        if store.is_owner(auth.id, restaurant_id).await? {
            return Ok(());
        }
    }
    Err(AppError::Forbidden(
        "not the manager of this restaurant".into(),
    ))
}
