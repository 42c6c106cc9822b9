use sqlx::sqlite::SqlitePoolOptions;

use crate::db::{
    DbPool, analytics_store::AnalyticsStore, delivery_store::DeliveryStore, menu_store::MenuStore,
    order_store::{ExportScope, OrderStore}, restaurant_store::RestaurantStore,
    seed_sample_data, settings_store::SettingsStore, setup_database, user_store::UserStore,
};
use crate::error::AppError;
use crate::models::delivery::{DeliveryStatus, NewDeliveryRequest};
use crate::models::menu::{MenuItem, NewMenuItemRequest, UpdateMenuItemRequest};
use crate::models::order::{CartItem, NewOrderRequest, OrderStatus};
use crate::models::restaurant::{NewRestaurantRequest, Restaurant, RestaurantFilter};
use crate::models::user::{NewUserRequest, Role, UpdateUserRequest, User};

// A single connection keeps every query on the same in-memory database
async fn setup_test_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    setup_database(&pool).await.expect("failed to set up schema");
    pool
}

async fn create_test_user(pool: &DbPool, email: &str, role: Role) -> User {
    let request = NewUserRequest {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password: "Password123!".to_string(),
        role,
    };
    UserStore::new(pool.clone())
        .create_user(&request, "fake-hash")
        .await
        .expect("failed to create user")
}

async fn create_test_restaurant(pool: &DbPool, name: &str, cuisine: &str) -> Restaurant {
    let request = NewRestaurantRequest {
        name: name.to_string(),
        cuisine: Some(cuisine.to_string()),
        contact: Some("555-0100".to_string()),
        location: Some("Main Street 1".to_string()),
        owner_id: None,
    };
    RestaurantStore::new(pool.clone())
        .create_restaurant(&request)
        .await
        .expect("failed to create restaurant")
}

async fn create_test_menu_item(
    pool: &DbPool,
    restaurant_id: i64,
    name: &str,
    price: f64,
) -> MenuItem {
    let request = NewMenuItemRequest {
        item_name: name.to_string(),
        description: None,
        price,
    };
    MenuStore::new(pool.clone())
        .create_item(restaurant_id, &request)
        .await
        .expect("failed to create menu item")
}

mod user_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "anna@example.com", Role::Customer).await;

        let store = UserStore::new(pool.clone());
        let fetched = store.get_user_by_id(user.id).await.expect("user not found");
        assert_eq!(fetched.email, "anna@example.com");
        assert_eq!(fetched.role, Role::Customer);
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_active_email_rejected() {
        let pool = setup_test_pool().await;
        create_test_user(&pool, "dup@example.com", Role::Customer).await;

        let request = NewUserRequest {
            first_name: "Other".to_string(),
            last_name: "User".to_string(),
            email: "dup@example.com".to_string(),
            password: "Password123!".to_string(),
            role: Role::Customer,
        };
        let result = UserStore::new(pool.clone())
            .create_user(&request, "fake-hash")
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_is_invisible() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "gone@example.com", Role::Customer).await;

        let store = UserStore::new(pool.clone());
        store.delete_user(user.id).await.expect("delete failed");

        assert!(matches!(
            store.get_user_by_id(user.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store
            .get_user_by_email("gone@example.com")
            .await
            .expect("lookup failed")
            .is_none());
        assert!(store.get_all_users().await.expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn test_reregister_after_soft_delete() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "back@example.com", Role::Customer).await;

        let store = UserStore::new(pool.clone());
        store.delete_user(user.id).await.expect("delete failed");

        // The email is free again once the old account is soft-deleted
        let fresh = create_test_user(&pool, "back@example.com", Role::Customer).await;
        assert_ne!(fresh.id, user.id);
        assert!(fresh.is_active);
    }

    #[tokio::test]
    async fn test_update_user_checks_email_conflict() {
        let pool = setup_test_pool().await;
        create_test_user(&pool, "taken@example.com", Role::Customer).await;
        let user = create_test_user(&pool, "mover@example.com", Role::Customer).await;

        let store = UserStore::new(pool.clone());
        let request = UpdateUserRequest {
            first_name: "Moved".to_string(),
            last_name: "User".to_string(),
            email: "taken@example.com".to_string(),
            role: Role::Customer,
        };
        assert!(matches!(
            store.update_user(user.id, &request).await,
            Err(AppError::Conflict(_))
        ));

        // Keeping the own email is not a conflict
        let request = UpdateUserRequest {
            first_name: "Moved".to_string(),
            last_name: "User".to_string(),
            email: "mover@example.com".to_string(),
            role: Role::Restaurant,
        };
        let updated = store
            .update_user(user.id, &request)
            .await
            .expect("update failed");
        assert_eq!(updated.first_name, "Moved");
        assert_eq!(updated.role, Role::Restaurant);
    }
}

mod restaurant_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_owner_binding_and_lookup() {
        let pool = setup_test_pool().await;
        let owner = create_test_user(&pool, "owner@example.com", Role::Restaurant).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;

        let store = RestaurantStore::new(pool.clone());
        store
            .bind_owner(owner.id, restaurant.id)
            .await
            .expect("bind failed");

        assert!(store
            .is_owner(owner.id, restaurant.id)
            .await
            .expect("check failed"));
        let mine = store
            .get_restaurant_by_owner(owner.id)
            .await
            .expect("lookup failed")
            .expect("no restaurant bound");
        assert_eq!(mine.id, restaurant.id);

        let stranger = create_test_user(&pool, "other@example.com", Role::Restaurant).await;
        assert!(!store
            .is_owner(stranger.id, restaurant.id)
            .await
            .expect("check failed"));
    }

    #[tokio::test]
    async fn test_cuisine_filter_and_search() {
        let pool = setup_test_pool().await;
        create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        create_test_restaurant(&pool, "Sushi Spot", "Japanese").await;
        create_test_restaurant(&pool, "Pizza Corner", "Italian").await;

        let store = RestaurantStore::new(pool.clone());

        let italian = store
            .list_restaurants(&RestaurantFilter {
                cuisine: Some("Italian".to_string()),
                search: None,
            })
            .await
            .expect("list failed");
        assert_eq!(italian.len(), 2);

        let found = store
            .list_restaurants(&RestaurantFilter {
                cuisine: None,
                search: Some("sushi".to_string()),
            })
            .await
            .expect("search failed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Sushi Spot");

        let cuisines = store.list_cuisines().await.expect("cuisines failed");
        assert_eq!(cuisines, vec!["Italian".to_string(), "Japanese".to_string()]);
    }

    #[tokio::test]
    async fn test_soft_deleted_restaurant_hidden_from_browse() {
        let pool = setup_test_pool().await;
        let restaurant = create_test_restaurant(&pool, "Closing Down", "Fusion").await;

        let store = RestaurantStore::new(pool.clone());
        store
            .delete_restaurant(restaurant.id)
            .await
            .expect("delete failed");

        let all = store
            .list_restaurants(&RestaurantFilter::default())
            .await
            .expect("list failed");
        assert!(all.is_empty());
        assert!(matches!(
            store.get_restaurant_by_id(restaurant.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}

mod menu_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_menu_crud() {
        let pool = setup_test_pool().await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let item = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = MenuStore::new(pool.clone());
        let updated = store
            .update_item(
                item.id,
                &UpdateMenuItemRequest {
                    item_name: "Carbonara".to_string(),
                    description: Some("With guanciale".to_string()),
                    price: 13.00,
                },
            )
            .await
            .expect("update failed");
        assert_eq!(updated.price, 13.00);

        store.delete_item(item.id).await.expect("delete failed");
        let menu = store
            .list_for_restaurant(restaurant.id)
            .await
            .expect("list failed");
        assert!(menu.is_empty());
    }

    #[tokio::test]
    async fn test_nonpositive_price_rejected() {
        let pool = setup_test_pool().await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;

        let result = MenuStore::new(pool.clone())
            .create_item(
                restaurant.id,
                &NewMenuItemRequest {
                    item_name: "Free Lunch".to_string(),
                    description: None,
                    price: 0.0,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}

mod order_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_place_order_totals() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;
        let salad = create_test_menu_item(&pool, restaurant.id, "Side Salad", 4.25).await;

        let order = OrderStore::new(pool.clone())
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![
                        CartItem {
                            menu_item_id: pasta.id,
                            quantity: 2,
                        },
                        CartItem {
                            menu_item_id: salad.id,
                            quantity: 1,
                        },
                    ],
                },
            )
            .await
            .expect("order failed");

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 29.25);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.restaurant_name, "Pasta Place");
        let pasta_line = order
            .items
            .iter()
            .find(|line| line.menu_item_id == pasta.id)
            .expect("pasta line missing");
        assert_eq!(pasta_line.quantity, 2);
        assert_eq!(pasta_line.subtotal, 25.00);
    }

    #[tokio::test]
    async fn test_empty_cart_and_zero_quantity_rejected() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = OrderStore::new(pool.clone());

        let empty = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![],
                },
            )
            .await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));

        let zero = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 0,
                    }],
                },
            )
            .await;
        assert!(matches!(zero, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_cart_item_from_other_restaurant_rejected() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let pasta_place = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let sushi_spot = create_test_restaurant(&pool, "Sushi Spot", "Japanese").await;
        create_test_menu_item(&pool, pasta_place.id, "Carbonara", 12.50).await;
        let roll = create_test_menu_item(&pool, sushi_spot.id, "California Roll", 8.00).await;

        let result = OrderStore::new(pool.clone())
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: pasta_place.id,
                    items: vec![CartItem {
                        menu_item_id: roll.id,
                        quantity: 1,
                    }],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        // Nothing was written
        let orders = OrderStore::new(pool.clone())
            .list_for_user(customer.id)
            .await
            .expect("list failed");
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_subtotal_snapshot_survives_price_change() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = OrderStore::new(pool.clone());
        let order = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .expect("order failed");

        MenuStore::new(pool.clone())
            .update_item(
                pasta.id,
                &UpdateMenuItemRequest {
                    item_name: "Carbonara".to_string(),
                    description: None,
                    price: 20.00,
                },
            )
            .await
            .expect("price change failed");

        let details = store.get_order_details(order.id).await.expect("details failed");
        assert_eq!(details.items[0].subtotal, 12.50);
        assert_eq!(details.total_amount, 12.50);
    }

    #[tokio::test]
    async fn test_reorder_prices_from_current_menu() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = OrderStore::new(pool.clone());
        let original = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 2,
                    }],
                },
            )
            .await
            .expect("order failed");

        MenuStore::new(pool.clone())
            .update_item(
                pasta.id,
                &UpdateMenuItemRequest {
                    item_name: "Carbonara".to_string(),
                    description: None,
                    price: 15.00,
                },
            )
            .await
            .expect("price change failed");

        let repeat = store
            .reorder(customer.id, original.id)
            .await
            .expect("reorder failed");
        assert_ne!(repeat.id, original.id);
        assert_eq!(repeat.total_amount, 30.00);
        assert_eq!(repeat.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_reorder_fails_when_all_items_removed() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = OrderStore::new(pool.clone());
        let original = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .expect("order failed");

        MenuStore::new(pool.clone())
            .delete_item(pasta.id)
            .await
            .expect("delete failed");

        assert!(matches!(
            store.reorder(customer.id, original.id).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_status_update_and_listings() {
        let pool = setup_test_pool().await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        let store = OrderStore::new(pool.clone());
        let order = store
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .expect("order failed");

        let updated = store
            .update_status(order.id, OrderStatus::Preparing)
            .await
            .expect("status update failed");
        assert_eq!(updated.status, OrderStatus::Preparing);

        let mine = store.list_for_user(customer.id).await.expect("list failed");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].items.len(), 1);

        let incoming = store
            .list_for_restaurant(restaurant.id)
            .await
            .expect("list failed");
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].customer_name, "Test User");
    }

    #[tokio::test]
    async fn test_export_scopes() {
        let pool = setup_test_pool().await;
        let anna = create_test_user(&pool, "anna@example.com", Role::Customer).await;
        let ben = create_test_user(&pool, "ben@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let other = create_test_restaurant(&pool, "Sushi Spot", "Japanese").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;
        let roll = create_test_menu_item(&pool, other.id, "California Roll", 8.00).await;

        let store = OrderStore::new(pool.clone());
        for (user_id, restaurant_id, menu_item_id) in [
            (anna.id, restaurant.id, pasta.id),
            (ben.id, restaurant.id, pasta.id),
            (ben.id, other.id, roll.id),
        ] {
            store
                .place_order(
                    user_id,
                    &NewOrderRequest {
                        restaurant_id,
                        items: vec![CartItem {
                            menu_item_id,
                            quantity: 1,
                        }],
                    },
                )
                .await
                .expect("order failed");
        }

        let all = store.export_rows(ExportScope::All).await.expect("export failed");
        assert_eq!(all.len(), 3);

        let bens = store
            .export_rows(ExportScope::User(ben.id))
            .await
            .expect("export failed");
        assert_eq!(bens.len(), 2);

        let sushi = store
            .export_rows(ExportScope::Restaurant(other.id))
            .await
            .expect("export failed");
        assert_eq!(sushi.len(), 1);
        assert_eq!(sushi[0].restaurant_name, "Sushi Spot");
    }
}

mod delivery_store_tests {
    use super::*;

    async fn place_test_order(pool: &DbPool) -> i64 {
        let customer = create_test_user(pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(pool, restaurant.id, "Carbonara", 12.50).await;

        OrderStore::new(pool.clone())
            .place_order(
                customer.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .expect("order failed")
            .id
    }

    #[tokio::test]
    async fn test_create_and_update_delivery() {
        let pool = setup_test_pool().await;
        let order_id = place_test_order(&pool).await;
        let courier = create_test_user(&pool, "courier@example.com", Role::Customer).await;

        let store = DeliveryStore::new(pool.clone());
        let delivery = store
            .create_delivery(
                order_id,
                &NewDeliveryRequest {
                    personnel_id: courier.id,
                    estimated_time: None,
                },
            )
            .await
            .expect("create failed");
        assert_eq!(delivery.status, DeliveryStatus::Pending);
        assert_eq!(delivery.order_id, order_id);

        let delivered = store
            .update_status(delivery.id, DeliveryStatus::Delivered)
            .await
            .expect("update failed");
        assert_eq!(delivered.status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn test_delivery_reassigned_after_soft_delete() {
        let pool = setup_test_pool().await;
        let order_id = place_test_order(&pool).await;
        let courier = create_test_user(&pool, "courier@example.com", Role::Customer).await;

        let store = DeliveryStore::new(pool.clone());
        let first = store
            .create_delivery(
                order_id,
                &NewDeliveryRequest {
                    personnel_id: courier.id,
                    estimated_time: None,
                },
            )
            .await
            .expect("create failed");
        store
            .delete_delivery(first.id)
            .await
            .expect("delete failed");

        // With the first assignment soft-deleted the order is free again
        let second = store
            .create_delivery(
                order_id,
                &NewDeliveryRequest {
                    personnel_id: courier.id,
                    estimated_time: None,
                },
            )
            .await
            .expect("reassignment failed");
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_second_delivery_for_order_rejected() {
        let pool = setup_test_pool().await;
        let order_id = place_test_order(&pool).await;
        let courier = create_test_user(&pool, "courier@example.com", Role::Customer).await;

        let store = DeliveryStore::new(pool.clone());
        store
            .create_delivery(
                order_id,
                &NewDeliveryRequest {
                    personnel_id: courier.id,
                    estimated_time: None,
                },
            )
            .await
            .expect("create failed");

        let second = store
            .create_delivery(
                order_id,
                &NewDeliveryRequest {
                    personnel_id: courier.id,
                    estimated_time: None,
                },
            )
            .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }
}

mod settings_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_seeded_once() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "anna@example.com", Role::Customer).await;

        let store = SettingsStore::new(pool.clone());
        store.seed_defaults(user.id).await.expect("seed failed");
        store.seed_defaults(user.id).await.expect("seed failed");

        let settings = store.list_for_user(user.id).await.expect("list failed");
        assert_eq!(settings.len(), 4);
        let notifications = settings
            .iter()
            .find(|s| s.setting_name == "Notifications")
            .expect("Notifications missing");
        assert!(notifications.setting_value);
        let dark_mode = settings
            .iter()
            .find(|s| s.setting_name == "DarkMode")
            .expect("DarkMode missing");
        assert!(!dark_mode.setting_value);
    }

    #[tokio::test]
    async fn test_upsert_flips_existing_flag() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "anna@example.com", Role::Customer).await;

        let store = SettingsStore::new(pool.clone());
        store.seed_defaults(user.id).await.expect("seed failed");

        let flipped = store
            .upsert(user.id, "DarkMode", true)
            .await
            .expect("upsert failed");
        assert!(flipped.setting_value);

        let settings = store.list_for_user(user.id).await.expect("list failed");
        assert_eq!(settings.len(), 4);
    }
}

mod handler_access_tests {
    use super::*;
    use std::sync::Arc;

    use axum::extract::{Json, State};

    use crate::config::Config;
    use crate::handlers::{AppState, order};
    use crate::services::auth_service::AuthUser;

    fn test_state(pool: DbPool) -> AppState {
        AppState {
            pool,
            config: Arc::new(Config {
                port: 0,
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                token_expiry_hours: 1,
                max_pool_size: 1,
            }),
        }
    }

    fn cart(restaurant_id: i64, menu_item_id: i64) -> NewOrderRequest {
        NewOrderRequest {
            restaurant_id,
            items: vec![CartItem {
                menu_item_id,
                quantity: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_only_customers_place_orders() {
        let pool = setup_test_pool().await;
        let admin = create_test_user(&pool, "admin@example.com", Role::Admin).await;
        let owner = create_test_user(&pool, "owner@example.com", Role::Restaurant).await;
        let customer = create_test_user(&pool, "eater@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 12.50).await;

        for (id, role) in [(admin.id, Role::Admin), (owner.id, Role::Restaurant)] {
            let result = order::place_order(
                AuthUser { id, role },
                State(test_state(pool.clone())),
                Json(cart(restaurant.id, pasta.id)),
            )
            .await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }

        let placed = order::place_order(
            AuthUser {
                id: customer.id,
                role: Role::Customer,
            },
            State(test_state(pool.clone())),
            Json(cart(restaurant.id, pasta.id)),
        )
        .await;
        assert!(placed.is_ok());
    }
}

mod seed_tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_seed_includes_settings() {
        let pool = setup_test_pool().await;
        seed_sample_data(&pool).await.expect("seed failed");

        let users = UserStore::new(pool.clone())
            .get_all_users()
            .await
            .expect("list failed");
        assert_eq!(users.len(), 5);

        let store = SettingsStore::new(pool.clone());
        for user in &users {
            let settings = store
                .list_for_user(user.id)
                .await
                .expect("settings failed");
            assert_eq!(settings.len(), 4);
        }

        // Seeding again on a populated database is a no-op
        seed_sample_data(&pool).await.expect("seed failed");
        let settings = store.list_for_user(1).await.expect("settings failed");
        assert_eq!(settings.len(), 4);
    }
}

mod analytics_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_restaurant_aggregates() {
        let pool = setup_test_pool().await;
        let anna = create_test_user(&pool, "anna@example.com", Role::Customer).await;
        let ben = create_test_user(&pool, "ben@example.com", Role::Customer).await;
        let restaurant = create_test_restaurant(&pool, "Pasta Place", "Italian").await;
        let pasta = create_test_menu_item(&pool, restaurant.id, "Carbonara", 10.00).await;
        let salad = create_test_menu_item(&pool, restaurant.id, "Side Salad", 5.00).await;

        let orders = OrderStore::new(pool.clone());
        orders
            .place_order(
                anna.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![
                        CartItem {
                            menu_item_id: pasta.id,
                            quantity: 2,
                        },
                        CartItem {
                            menu_item_id: salad.id,
                            quantity: 1,
                        },
                    ],
                },
            )
            .await
            .expect("order failed");
        let second = orders
            .place_order(
                ben.id,
                &NewOrderRequest {
                    restaurant_id: restaurant.id,
                    items: vec![CartItem {
                        menu_item_id: pasta.id,
                        quantity: 1,
                    }],
                },
            )
            .await
            .expect("order failed");
        orders
            .update_status(second.id, OrderStatus::Delivered)
            .await
            .expect("status failed");

        let store = AnalyticsStore::new(pool.clone());
        assert_eq!(store.total_orders(Some(restaurant.id)).await.expect("count failed"), 2);
        assert_eq!(
            store.total_revenue(Some(restaurant.id)).await.expect("revenue failed"),
            35.00
        );
        assert_eq!(
            store
                .average_order_value(restaurant.id)
                .await
                .expect("avg failed"),
            17.50
        );

        let top = store
            .top_selling_items(restaurant.id)
            .await
            .expect("top items failed");
        assert_eq!(top[0].name, "Carbonara");
        assert_eq!(top[0].value, 3);

        let statuses = store
            .status_distribution(restaurant.id)
            .await
            .expect("statuses failed");
        assert_eq!(statuses.len(), 2);

        let recent = store
            .recent_orders(restaurant.id)
            .await
            .expect("recent failed");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].customer_name, "Test User");

        let by_day = store
            .orders_by_day(restaurant.id)
            .await
            .expect("by day failed");
        let total_counted: i64 = by_day.iter().map(|d| d.order_count).sum();
        assert_eq!(total_counted, 2);
    }

    #[tokio::test]
    async fn test_platform_totals_skip_soft_deleted() {
        let pool = setup_test_pool().await;
        let user = create_test_user(&pool, "anna@example.com", Role::Customer).await;
        create_test_user(&pool, "ben@example.com", Role::Customer).await;
        create_test_restaurant(&pool, "Pasta Place", "Italian").await;

        UserStore::new(pool.clone())
            .delete_user(user.id)
            .await
            .expect("delete failed");

        let store = AnalyticsStore::new(pool.clone());
        assert_eq!(store.total_users().await.expect("count failed"), 1);
        assert_eq!(store.total_restaurants().await.expect("count failed"), 1);
        assert_eq!(store.total_orders(None).await.expect("count failed"), 0);
        assert_eq!(store.total_revenue(None).await.expect("revenue failed"), 0.0);
    }
}
