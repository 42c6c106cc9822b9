use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::{
        menu::MenuItem,
        order::{
            CartItem, NewOrderRequest, Order, OrderDetails, OrderExportRow, OrderHeader,
            OrderItemLine, OrderStatus,
        },
    },
};

/// Which orders a CSV export covers
pub enum ExportScope {
    All,
    User(i64),
    Restaurant(i64),
}

const ORDER_HEADER_SQL: &str = r#"
    SELECT o.id, o.user_id, o.restaurant_id,
           r.name AS restaurant_name,
           u.first_name || ' ' || u.last_name AS customer_name,
           o.total_amount, o.status, o.order_date
    FROM orders o
    JOIN restaurants r ON o.restaurant_id = r.id
    JOIN users u ON o.user_id = u.id
"#;

/// Order store for database operations
///
/// Joins deliberately skip the soft-delete filter on the referenced
/// user and restaurant: past orders must keep resolving after either
/// side is deleted.
pub struct OrderStore {
    pool: DbPool,
}

impl OrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Place an order for a customer
    ///
    /// Every cart item must reference an active menu entry of the given
    /// restaurant. Subtotals snapshot the current menu price; the order
    /// total is their sum. Nothing is written unless the whole cart
    /// validates, the inserts run in one transaction.
    pub async fn place_order(&self, user_id: i64, request: &NewOrderRequest) -> Result<OrderDetails> {
        if request.items.is_empty() {
            return Err(AppError::BadRequest("cart is empty".into()));
        }
        if request.items.iter().any(|item| item.quantity < 1) {
            return Err(AppError::BadRequest(
                "item quantities must be at least 1".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let restaurant: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM restaurants WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(request.restaurant_id)
        .fetch_optional(&mut *tx)
        .await?;
        if restaurant.is_none() {
            return Err(AppError::NotFound("restaurant"));
        }

        // Price the cart from the current menu
        let mut priced: Vec<(i64, i64, f64)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let menu_item = sqlx::query_as::<_, MenuItem>(
                r#"
                SELECT * FROM menu_items
                WHERE id = ? AND restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
                "#,
            )
            .bind(item.menu_item_id)
            .bind(request.restaurant_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "menu item {} is not available at this restaurant",
                    item.menu_item_id
                ))
            })?;

            let subtotal = round_cents(menu_item.price * item.quantity as f64);
            priced.push((item.menu_item_id, item.quantity, subtotal));
        }

        let total_amount = round_cents(priced.iter().map(|(_, _, s)| s).sum());

        let result = sqlx::query(
            r#"
            INSERT INTO orders (user_id, restaurant_id, total_amount, status, order_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(request.restaurant_id)
        .bind(total_amount)
        .bind(OrderStatus::Pending)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        let order_id = result.last_insert_rowid();

        for (menu_item_id, quantity, subtotal) in &priced {
            sqlx::query(
                "INSERT INTO order_items (order_id, menu_item_id, quantity, subtotal) VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(menu_item_id)
            .bind(quantity)
            .bind(subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_order_details(order_id).await
    }

    /// Re-place a past order at current menu prices
    ///
    /// Menu entries removed since the original order are skipped; the
    /// reorder fails if none of them are still available.
    pub async fn reorder(&self, user_id: i64, order_id: i64) -> Result<OrderDetails> {
        let order = self.get_order(order_id).await?;

        let items: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT oi.menu_item_id, oi.quantity
            FROM order_items oi
            JOIN menu_items m ON oi.menu_item_id = m.id
            WHERE oi.order_id = ? AND oi.is_active = 1 AND oi.deleted_at IS NULL
              AND m.is_active = 1 AND m.deleted_at IS NULL
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        if items.is_empty() {
            return Err(AppError::BadRequest(
                "no items from this order are still available".into(),
            ));
        }

        let request = NewOrderRequest {
            restaurant_id: order.restaurant_id,
            items: items
                .into_iter()
                .map(|(menu_item_id, quantity)| CartItem {
                    menu_item_id,
                    quantity,
                })
                .collect(),
        };

        self.place_order(user_id, &request).await
    }

    /// Get the raw order row, for ownership checks
    pub async fn get_order(&self, id: i64) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("order"))?;

        Ok(order)
    }

    /// Get an order with restaurant, customer and line items attached
    pub async fn get_order_details(&self, id: i64) -> Result<OrderDetails> {
        let sql = format!(
            "{ORDER_HEADER_SQL} WHERE o.id = ? AND o.is_active = 1 AND o.deleted_at IS NULL"
        );
        let header = sqlx::query_as::<_, OrderHeader>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("order"))?;

        let items = self.get_order_items(id).await?;
        Ok(header.with_items(items))
    }

    /// Order history of a customer, newest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>> {
        let sql = format!(
            "{ORDER_HEADER_SQL} WHERE o.user_id = ? AND o.is_active = 1 AND o.deleted_at IS NULL ORDER BY o.order_date DESC"
        );
        let headers = sqlx::query_as::<_, OrderHeader>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        self.attach_items(headers).await
    }

    /// Incoming orders of a restaurant, newest first
    pub async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<OrderDetails>> {
        let sql = format!(
            "{ORDER_HEADER_SQL} WHERE o.restaurant_id = ? AND o.is_active = 1 AND o.deleted_at IS NULL ORDER BY o.order_date DESC"
        );
        let headers = sqlx::query_as::<_, OrderHeader>(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;

        self.attach_items(headers).await
    }

    /// All orders, for the admin export
    pub async fn export_rows(&self, scope: ExportScope) -> Result<Vec<OrderExportRow>> {
        let base = r#"
            SELECT o.id, o.order_date, r.name AS restaurant_name, o.status, o.total_amount
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            WHERE o.is_active = 1 AND o.deleted_at IS NULL
        "#;

        let rows = match scope {
            ExportScope::All => {
                let sql = format!("{base} ORDER BY o.order_date DESC");
                sqlx::query_as::<_, OrderExportRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            ExportScope::User(user_id) => {
                let sql = format!("{base} AND o.user_id = ? ORDER BY o.order_date DESC");
                sqlx::query_as::<_, OrderExportRow>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            ExportScope::Restaurant(restaurant_id) => {
                let sql = format!("{base} AND o.restaurant_id = ? ORDER BY o.order_date DESC");
                sqlx::query_as::<_, OrderExportRow>(&sql)
                    .bind(restaurant_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Move an order along the status lifecycle
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<OrderDetails> {
        let order = self.get_order(id).await?;

        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(order.id)
            .execute(&self.pool)
            .await?;

        self.get_order_details(id).await
    }

    async fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItemLine>> {
        let items = sqlx::query_as::<_, OrderItemLine>(
            r#"
            SELECT oi.id, oi.menu_item_id, m.item_name, oi.quantity, oi.subtotal
            FROM order_items oi
            JOIN menu_items m ON oi.menu_item_id = m.id
            WHERE oi.order_id = ? AND oi.is_active = 1 AND oi.deleted_at IS NULL
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn attach_items(&self, headers: Vec<OrderHeader>) -> Result<Vec<OrderDetails>> {
        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let items = self.get_order_items(header.id).await?;
            orders.push(header.with_items(items));
        }
        Ok(orders)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
