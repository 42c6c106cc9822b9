use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database restaurant model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: Option<String>,
    pub contact: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct NewRestaurantRequest {
    pub name: String,
    pub cuisine: Option<String>,
    pub contact: Option<String>,
    pub location: Option<String>,
    /// Restaurant-role user to bind through `restaurant_owners`
    pub owner_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: String,
    pub cuisine: Option<String>,
    pub contact: Option<String>,
    pub location: Option<String>,
}

/// Browse filters for the restaurant list
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantFilter {
    pub cuisine: Option<String>,
    pub search: Option<String>,
}
