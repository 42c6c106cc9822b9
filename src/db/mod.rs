use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};

use crate::models::{settings::DEFAULT_SETTINGS, user::Role};

pub mod analytics_store;
pub mod delivery_store;
pub mod menu_store;
pub mod order_store;
pub mod restaurant_store;
pub mod settings_store;
pub mod user_store;

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str, max_pool_size: u32) -> Result<DbPool> {
    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_pool_size)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
///
/// Every table carries the soft-delete pair `is_active`/`deleted_at`.
/// Rows are never removed; reads filter on `is_active = 1 AND deleted_at
/// IS NULL` so historical orders keep resolving.
pub async fn setup_database(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'customer',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Uniqueness holds among active rows only: a soft-deleted account
    // keeps its address and the email can register again
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_active_email ON users (email) WHERE is_active = 1;",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            cuisine TEXT,
            contact TEXT,
            location TEXT,
            created_at TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurant_owners (
            user_id INTEGER NOT NULL,
            restaurant_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, restaurant_id),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (restaurant_id) REFERENCES restaurants (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menu_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant_id INTEGER NOT NULL,
            item_name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            created_at TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT,
            FOREIGN KEY (restaurant_id) REFERENCES restaurants (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            restaurant_id INTEGER NOT NULL,
            total_amount REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            order_date TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (restaurant_id) REFERENCES restaurants (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL,
            menu_item_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            subtotal REAL NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT,
            FOREIGN KEY (order_id) REFERENCES orders (id),
            FOREIGN KEY (menu_item_id) REFERENCES menu_items (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deliveries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL,
            personnel_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            estimated_time TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            deleted_at TEXT,
            FOREIGN KEY (order_id) REFERENCES orders (id),
            FOREIGN KEY (personnel_id) REFERENCES users (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One active delivery per order
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_deliveries_active_order ON deliveries (order_id) WHERE is_active = 1;",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            setting_name TEXT NOT NULL,
            setting_value INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, setting_name),
            FOREIGN KEY (user_id) REFERENCES users (id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Populate an empty database with the sample users, restaurants, menus
/// and order history the desktop app shipped with
pub async fn seed_sample_data(pool: &DbPool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let hash = bcrypt::hash("Password123!", bcrypt::DEFAULT_COST)?;

    let users = [
        ("John", "Doe", "john@example.com", Role::Customer),
        ("Jane", "Smith", "jane@example.com", Role::Customer),
        ("Admin", "User", "admin@example.com", Role::Admin),
        ("Rest", "Owner", "restaurant@example.com", Role::Restaurant),
        ("Delivery", "Person", "delivery@example.com", Role::Customer),
    ];
    for (first_name, last_name, email, role) in users {
        sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(&hash)
        .bind(role)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    }

    for user_id in 1..=users.len() as i64 {
        for (name, value) in DEFAULT_SETTINGS {
            sqlx::query(
                "INSERT INTO user_settings (user_id, setting_name, setting_value, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(name)
            .bind(value)
            .bind(now)
            .execute(pool)
            .await?;
        }
    }

    let restaurants = [
        ("Pizza Palace", "Italian", "555-1234", "123 Main St"),
        ("Burger Haven", "American", "555-5678", "456 Oak Ave"),
        ("Sweet Treats", "Desserts", "555-9012", "789 Maple Dr"),
        ("Sushi Spot", "Japanese", "555-3456", "321 Pine Rd"),
        ("Taco Town", "Mexican", "555-7890", "654 Elm St"),
    ];
    for (name, cuisine, contact, location) in restaurants {
        sqlx::query(
            "INSERT INTO restaurants (name, cuisine, contact, location, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(cuisine)
        .bind(contact)
        .bind(location)
        .bind(now)
        .execute(pool)
        .await?;
    }

    // The sample restaurant account manages Pizza Palace
    sqlx::query("INSERT INTO restaurant_owners (user_id, restaurant_id) VALUES (4, 1)")
        .execute(pool)
        .await?;

    let menu_items: [(i64, &str, &str, f64); 15] = [
        (1, "Margherita Pizza", "Classic cheese and tomato pizza", 12.99),
        (1, "Pepperoni Pizza", "Pizza with pepperoni toppings", 14.99),
        (1, "Vegetarian Pizza", "Pizza with assorted vegetables", 13.99),
        (2, "Classic Cheeseburger", "Beef patty with cheese", 9.99),
        (2, "Bacon Burger", "Burger with bacon and cheese", 11.99),
        (2, "Veggie Burger", "Plant-based patty with vegetables", 10.99),
        (3, "Chocolate Cake", "Rich chocolate cake with frosting", 5.99),
        (3, "Ice Cream Sundae", "Vanilla ice cream with toppings", 4.99),
        (3, "Apple Pie", "Homemade apple pie with cinnamon", 6.99),
        (4, "California Roll", "Crab, avocado and cucumber roll", 8.99),
        (4, "Salmon Nigiri", "Fresh salmon over rice", 7.99),
        (4, "Tempura Roll", "Shrimp tempura and vegetables", 9.99),
        (5, "Beef Taco", "Seasoned beef in a corn tortilla", 3.99),
        (5, "Chicken Quesadilla", "Grilled chicken and cheese in a flour tortilla", 7.99),
        (5, "Veggie Burrito", "Bean and rice burrito with vegetables", 6.99),
    ];
    for (restaurant_id, item_name, description, price) in menu_items {
        sqlx::query(
            "INSERT INTO menu_items (restaurant_id, item_name, description, price, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(item_name)
        .bind(description)
        .bind(price)
        .bind(now)
        .execute(pool)
        .await?;
    }

    // Order history for John Doe: two delivered orders and one in progress
    let orders: [(i64, i64, f64, &str, chrono::DateTime<Utc>); 3] = [
        (1, 1, 27.98, "delivered", now - Duration::days(2)),
        (1, 2, 21.98, "delivered", now - Duration::days(1)),
        (1, 3, 17.97, "preparing", now),
    ];
    for (user_id, restaurant_id, total_amount, status, order_date) in orders {
        sqlx::query(
            "INSERT INTO orders (user_id, restaurant_id, total_amount, status, order_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .bind(total_amount)
        .bind(status)
        .bind(order_date)
        .execute(pool)
        .await?;
    }

    let order_items: [(i64, i64, i64, f64); 7] = [
        (1, 1, 1, 12.99),
        (1, 2, 1, 14.99),
        (2, 4, 1, 9.99),
        (2, 5, 1, 11.99),
        (3, 7, 1, 5.99),
        (3, 8, 1, 4.99),
        (3, 9, 1, 6.99),
    ];
    for (order_id, menu_item_id, quantity, subtotal) in order_items {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, quantity, subtotal) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(subtotal)
        .execute(pool)
        .await?;
    }

    let deliveries: [(i64, i64, &str, chrono::DateTime<Utc>); 3] = [
        (1, 5, "delivered", now - Duration::days(2) + Duration::hours(1)),
        (2, 5, "delivered", now - Duration::days(1) + Duration::hours(1)),
        (3, 5, "pending", now + Duration::hours(1)),
    ];
    for (order_id, personnel_id, status, estimated_time) in deliveries {
        sqlx::query(
            "INSERT INTO deliveries (order_id, personnel_id, status, estimated_time) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(personnel_id)
        .bind(status)
        .bind(estimated_time)
        .execute(pool)
        .await?;
    }

    tracing::info!("sample data seeded");
    Ok(())
}
