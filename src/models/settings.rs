use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One per-user preference flag
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSetting {
    pub id: i64,
    pub user_id: i64,
    pub setting_name: String,
    pub setting_value: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    pub setting_name: String,
    pub setting_value: bool,
}

/// Defaults seeded at registration time
pub const DEFAULT_SETTINGS: &[(&str, bool)] = &[
    ("Notifications", true),
    ("DarkMode", false),
    ("AutoSaveAddress", true),
    ("SavePaymentInfo", false),
];
