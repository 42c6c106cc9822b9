use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Order lifecycle, stored as lowercase text in the `status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Shipped,
    Delivered,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Database order model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A line item joined with its menu entry name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItemLine {
    pub id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub subtotal: f64,
}

/// Order joined with restaurant, customer and line items
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemLine>,
}

/// Header row of an order before the line items are attached
#[derive(Debug, Clone, FromRow)]
pub struct OrderHeader {
    pub id: i64,
    pub user_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

impl OrderHeader {
    pub fn with_items(self, items: Vec<OrderItemLine>) -> OrderDetails {
        OrderDetails {
            id: self.id,
            user_id: self.user_id,
            restaurant_id: self.restaurant_id,
            restaurant_name: self.restaurant_name,
            customer_name: self.customer_name,
            total_amount: self.total_amount,
            status: self.status,
            order_date: self.order_date,
            items,
        }
    }
}

/// One cart position in an order request
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub menu_item_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewOrderRequest {
    pub restaurant_id: i64,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Flat row for the CSV order export
#[derive(Debug, Clone, FromRow)]
pub struct OrderExportRow {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub restaurant_name: String,
    pub status: OrderStatus,
    pub total_amount: f64,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}
