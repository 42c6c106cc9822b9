use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::user::{NewUserRequest, UpdateUserRequest, User},
};

/// User store for database operations
///
/// Reads only ever surface active rows. Deletion flips the soft-delete
/// pair so historical orders keep their customer reference.
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a list of all active users
    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE is_active = 1 AND deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Get an active user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("user"))?;

        Ok(user)
    }

    /// Look up an active user by email, for login and duplicate checks
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user with an already-hashed password
    ///
    /// The unique index on active emails rejects a duplicate at the
    /// database, which also holds under concurrent registrations.
    pub async fn create_user(&self, request: &NewUserRequest, password_hash: &str) -> Result<User> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(password_hash)
        .bind(request.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(email_conflict)?;

        self.get_user_by_id(result.last_insert_rowid()).await
    }

    /// Update name, email and role of an existing user
    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> Result<User> {
        let user = self.get_user_by_id(id).await?;

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(request.role)
        .bind(Utc::now())
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(email_conflict)?;

        self.get_user_by_id(id).await
    }

    /// Replace a user's password hash
    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let user = self.get_user_by_id(id).await?;

        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Soft-delete a user
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let user = self.get_user_by_id(id).await?;

        sqlx::query("UPDATE users SET is_active = 0, deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// Violations of the active-email unique index surface as a conflict
fn email_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("a user with this email already exists".into())
        }
        _ => AppError::Database(err),
    }
}
