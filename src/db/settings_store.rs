use chrono::Utc;

use crate::{
    db::DbPool,
    error::Result,
    models::settings::{DEFAULT_SETTINGS, UserSetting},
};

/// Per-user settings store
pub struct SettingsStore {
    pool: DbPool,
}

impl SettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Seed the default preference flags for a fresh account
    pub async fn seed_defaults(&self, user_id: i64) -> Result<()> {
        let now = Utc::now();
        for (name, value) in DEFAULT_SETTINGS {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO user_settings (user_id, setting_name, setting_value, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(name)
            .bind(value)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<UserSetting>> {
        let settings = sqlx::query_as::<_, UserSetting>(
            "SELECT * FROM user_settings WHERE user_id = ? ORDER BY setting_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Insert or update a single preference flag
    pub async fn upsert(&self, user_id: i64, name: &str, value: bool) -> Result<UserSetting> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, setting_name, setting_value, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, setting_name) DO UPDATE SET setting_value = excluded.setting_value
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let setting = sqlx::query_as::<_, UserSetting>(
            "SELECT * FROM user_settings WHERE user_id = ? AND setting_name = ?",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}
