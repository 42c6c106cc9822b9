use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::restaurant::{
        NewRestaurantRequest, Restaurant, RestaurantFilter, UpdateRestaurantRequest,
    },
};

/// Restaurant store for database operations
pub struct RestaurantStore {
    pool: DbPool,
}

impl RestaurantStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List active restaurants, optionally filtered by cuisine or a
    /// name/cuisine search term
    pub async fn list_restaurants(&self, filter: &RestaurantFilter) -> Result<Vec<Restaurant>> {
        let restaurants = if let Some(cuisine) = &filter.cuisine {
            sqlx::query_as::<_, Restaurant>(
                r#"
                SELECT * FROM restaurants
                WHERE cuisine = ? AND is_active = 1 AND deleted_at IS NULL
                ORDER BY name
                "#,
            )
            .bind(cuisine)
            .fetch_all(&self.pool)
            .await?
        } else if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            sqlx::query_as::<_, Restaurant>(
                r#"
                SELECT * FROM restaurants
                WHERE (name LIKE ? OR cuisine LIKE ?) AND is_active = 1 AND deleted_at IS NULL
                ORDER BY name
                "#,
            )
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Restaurant>(
                "SELECT * FROM restaurants WHERE is_active = 1 AND deleted_at IS NULL ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(restaurants)
    }

    /// Distinct cuisines of active restaurants, for the browse filter
    pub async fn list_cuisines(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT cuisine FROM restaurants
            WHERE cuisine IS NOT NULL AND cuisine != ''
              AND is_active = 1 AND deleted_at IS NULL
            ORDER BY cuisine
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Get an active restaurant by ID
    pub async fn get_restaurant_by_id(&self, id: i64) -> Result<Restaurant> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            "SELECT * FROM restaurants WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("restaurant"))?;

        Ok(restaurant)
    }

    /// Resolve the restaurant a user manages through `restaurant_owners`
    pub async fn get_restaurant_by_owner(&self, user_id: i64) -> Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT r.* FROM restaurants r
            JOIN restaurant_owners ro ON r.id = ro.restaurant_id
            WHERE ro.user_id = ? AND r.is_active = 1 AND r.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    /// Create a restaurant, optionally binding an owner user
    pub async fn create_restaurant(&self, request: &NewRestaurantRequest) -> Result<Restaurant> {
        let result = sqlx::query(
            "INSERT INTO restaurants (name, cuisine, contact, location, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.cuisine)
        .bind(&request.contact)
        .bind(&request.location)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        if let Some(owner_id) = request.owner_id {
            self.bind_owner(owner_id, id).await?;
        }

        self.get_restaurant_by_id(id).await
    }

    /// Associate a restaurant-role user with a restaurant
    pub async fn bind_owner(&self, user_id: i64, restaurant_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO restaurant_owners (user_id, restaurant_id) VALUES (?, ?)",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether a user manages the given restaurant
    pub async fn is_owner(&self, user_id: i64, restaurant_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM restaurant_owners WHERE user_id = ? AND restaurant_id = ?",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Update restaurant profile fields
    pub async fn update_restaurant(
        &self,
        id: i64,
        request: &UpdateRestaurantRequest,
    ) -> Result<Restaurant> {
        let restaurant = self.get_restaurant_by_id(id).await?;

        sqlx::query(
            "UPDATE restaurants SET name = ?, cuisine = ?, contact = ?, location = ? WHERE id = ?",
        )
        .bind(&request.name)
        .bind(&request.cuisine)
        .bind(&request.contact)
        .bind(&request.location)
        .bind(restaurant.id)
        .execute(&self.pool)
        .await?;

        self.get_restaurant_by_id(id).await
    }

    /// Soft-delete a restaurant
    pub async fn delete_restaurant(&self, id: i64) -> Result<()> {
        let restaurant = self.get_restaurant_by_id(id).await?;

        sqlx::query("UPDATE restaurants SET is_active = 0, deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(restaurant.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
