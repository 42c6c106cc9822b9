use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::{db::DbPool, error::Result, models::order::OrderStatus};

/// A name/count pair from a GROUP BY query
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NameCount {
    pub name: String,
    pub value: i64,
}

/// Menu item sales with revenue
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ItemRevenue {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentOrderRow {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub customer_name: String,
}

/// Orders and revenue bucketed by day of week, Monday first
#[derive(Debug, Clone, Serialize)]
pub struct DayStats {
    pub day: &'static str,
    pub order_count: i64,
    pub revenue: f64,
}

/// Aggregate queries behind the admin overview and the restaurant
/// analytics dashboard
pub struct AnalyticsStore {
    pool: DbPool,
}

impl AnalyticsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn total_users(&self) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active = 1 AND deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    pub async fn total_restaurants(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM restaurants WHERE is_active = 1 AND deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    pub async fn total_orders(&self, restaurant_id: Option<i64>) -> Result<i64> {
        let count: (i64,) = match restaurant_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM orders WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL",
                )
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM orders WHERE is_active = 1 AND deleted_at IS NULL",
                )
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count.0)
    }

    pub async fn total_revenue(&self, restaurant_id: Option<i64>) -> Result<f64> {
        let revenue: (f64,) = match restaurant_id {
            Some(id) => {
                sqlx::query_as(
                    r#"
                    SELECT COALESCE(SUM(total_amount), 0.0)
                    FROM orders
                    WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
                    "#,
                )
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT COALESCE(SUM(total_amount), 0.0) FROM orders WHERE is_active = 1 AND deleted_at IS NULL",
                )
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(revenue.0)
    }

    pub async fn average_order_value(&self, restaurant_id: i64) -> Result<f64> {
        let avg: (f64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(AVG(total_amount), 0.0)
            FROM orders
            WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
            "#,
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(avg.0)
    }

    /// Top ten menu items by quantity sold
    pub async fn top_selling_items(&self, restaurant_id: i64) -> Result<Vec<NameCount>> {
        let rows = sqlx::query_as::<_, NameCount>(
            r#"
            SELECT m.item_name AS name, SUM(oi.quantity) AS value
            FROM order_items oi
            JOIN menu_items m ON oi.menu_item_id = m.id
            JOIN orders o ON oi.order_id = o.id
            WHERE o.restaurant_id = ? AND o.is_active = 1 AND o.deleted_at IS NULL
              AND oi.is_active = 1 AND oi.deleted_at IS NULL
              AND m.is_active = 1 AND m.deleted_at IS NULL
            GROUP BY m.item_name
            ORDER BY value DESC
            LIMIT 10
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Top fifteen menu items by revenue
    pub async fn top_items_with_revenue(&self, restaurant_id: i64) -> Result<Vec<ItemRevenue>> {
        let rows = sqlx::query_as::<_, ItemRevenue>(
            r#"
            SELECT m.item_name AS name, SUM(oi.quantity) AS quantity, SUM(oi.subtotal) AS revenue
            FROM order_items oi
            JOIN menu_items m ON oi.menu_item_id = m.id
            JOIN orders o ON oi.order_id = o.id
            WHERE o.restaurant_id = ? AND o.is_active = 1 AND o.deleted_at IS NULL
              AND oi.is_active = 1 AND oi.deleted_at IS NULL
              AND m.is_active = 1 AND m.deleted_at IS NULL
            GROUP BY m.item_name
            ORDER BY revenue DESC
            LIMIT 15
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn status_distribution(&self, restaurant_id: i64) -> Result<Vec<NameCount>> {
        let rows = sqlx::query_as::<_, NameCount>(
            r#"
            SELECT status AS name, COUNT(*) AS value
            FROM orders
            WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
            GROUP BY status
            ORDER BY value DESC
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Ten most recent orders with customer names
    pub async fn recent_orders(&self, restaurant_id: i64) -> Result<Vec<RecentOrderRow>> {
        let rows = sqlx::query_as::<_, RecentOrderRow>(
            r#"
            SELECT o.id, o.order_date, o.total_amount, o.status,
                   u.first_name || ' ' || u.last_name AS customer_name
            FROM orders o
            JOIN users u ON o.user_id = u.id
            WHERE o.restaurant_id = ? AND o.is_active = 1 AND o.deleted_at IS NULL
            ORDER BY o.order_date DESC
            LIMIT 10
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Orders and revenue grouped by day of week
    pub async fn orders_by_day(&self, restaurant_id: i64) -> Result<Vec<DayStats>> {
        // strftime('%w') yields 0 (Sunday) through 6 (Saturday)
        let rows: Vec<(String, i64, f64)> = sqlx::query_as(
            r#"
            SELECT strftime('%w', order_date) AS dow,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM orders
            WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
            GROUP BY dow
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        const WEEK: [(&str, &str); 7] = [
            ("1", "Monday"),
            ("2", "Tuesday"),
            ("3", "Wednesday"),
            ("4", "Thursday"),
            ("5", "Friday"),
            ("6", "Saturday"),
            ("0", "Sunday"),
        ];

        let stats = WEEK
            .iter()
            .filter_map(|(dow, day)| {
                rows.iter()
                    .find(|(d, _, _)| d == dow)
                    .map(|(_, order_count, revenue)| DayStats {
                        day,
                        order_count: *order_count,
                        revenue: *revenue,
                    })
            })
            .collect();

        Ok(stats)
    }
}
