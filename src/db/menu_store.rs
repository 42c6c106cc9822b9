use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::menu::{MenuItem, NewMenuItemRequest, UpdateMenuItemRequest},
};

/// Menu store for database operations
pub struct MenuStore {
    pool: DbPool,
}

impl MenuStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List the active menu of a restaurant
    pub async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT * FROM menu_items
            WHERE restaurant_id = ? AND is_active = 1 AND deleted_at IS NULL
            ORDER BY item_name
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get an active menu entry by ID
    pub async fn get_item_by_id(&self, id: i64) -> Result<MenuItem> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT * FROM menu_items WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("menu item"))?;

        Ok(item)
    }

    /// Add a menu entry to a restaurant
    pub async fn create_item(
        &self,
        restaurant_id: i64,
        request: &NewMenuItemRequest,
    ) -> Result<MenuItem> {
        if request.price <= 0.0 {
            return Err(AppError::BadRequest("price must be positive".into()));
        }

        let result = sqlx::query(
            "INSERT INTO menu_items (restaurant_id, item_name, description, price, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(&request.item_name)
        .bind(&request.description)
        .bind(request.price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_item_by_id(result.last_insert_rowid()).await
    }

    /// Update a menu entry
    ///
    /// Past order items keep their `subtotal` snapshot, so a price edit
    /// never rewrites order history.
    pub async fn update_item(&self, id: i64, request: &UpdateMenuItemRequest) -> Result<MenuItem> {
        if request.price <= 0.0 {
            return Err(AppError::BadRequest("price must be positive".into()));
        }

        let item = self.get_item_by_id(id).await?;

        sqlx::query(
            "UPDATE menu_items SET item_name = ?, description = ?, price = ? WHERE id = ?",
        )
        .bind(&request.item_name)
        .bind(&request.description)
        .bind(request.price)
        .bind(item.id)
        .execute(&self.pool)
        .await?;

        self.get_item_by_id(id).await
    }

    /// Soft-delete a menu entry
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        let item = self.get_item_by_id(id).await?;

        sqlx::query("UPDATE menu_items SET is_active = 0, deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(item.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
