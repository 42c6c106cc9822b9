use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::delivery::{Delivery, DeliveryStatus, NewDeliveryRequest},
};

/// Delivery store for database operations
pub struct DeliveryStore {
    pool: DbPool,
}

impl DeliveryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Assign a delivery person to an order
    ///
    /// The unique index on active order deliveries rejects a second
    /// assignment at the database.
    pub async fn create_delivery(
        &self,
        order_id: i64,
        request: &NewDeliveryRequest,
    ) -> Result<Delivery> {
        let result = sqlx::query(
            "INSERT INTO deliveries (order_id, personnel_id, status, estimated_time) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(request.personnel_id)
        .bind(DeliveryStatus::Pending)
        .bind(request.estimated_time)
        .execute(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("order already has a delivery assigned".into())
            }
            _ => AppError::Database(err),
        })?;

        self.get_delivery_by_id(result.last_insert_rowid()).await
    }

    pub async fn get_delivery_by_id(&self, id: i64) -> Result<Delivery> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("delivery"))?;

        Ok(delivery)
    }

    /// The delivery attached to an order, if any
    pub async fn get_delivery_for_order(&self, order_id: i64) -> Result<Option<Delivery>> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE order_id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(delivery)
    }

    pub async fn update_status(&self, id: i64, status: DeliveryStatus) -> Result<Delivery> {
        let delivery = self.get_delivery_by_id(id).await?;

        sqlx::query("UPDATE deliveries SET status = ? WHERE id = ?")
            .bind(status)
            .bind(delivery.id)
            .execute(&self.pool)
            .await?;

        self.get_delivery_by_id(id).await
    }

    /// Soft-delete a delivery
    pub async fn delete_delivery(&self, id: i64) -> Result<()> {
        let delivery = self.get_delivery_by_id(id).await?;

        sqlx::query("UPDATE deliveries SET is_active = 0, deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(delivery.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
