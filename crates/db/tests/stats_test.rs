//! Integration tests for the stats repository.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tamira_core::invoice::LineItemInput;
use tamira_db::migration::{Migrator, MigratorTrait};
use tamira_db::repositories::{CreateRepairInput, CustomerInput};
use tamira_db::{CustomerRepository, RepairRepository, StatsRepository, UserRepository};

/// Fresh in-memory database with migrations applied.
async fn setup_db() -> DatabaseConnection {
    let db = tamira_db::connect_with_pool("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn seed_user(db: &DatabaseConnection, username: &str) -> i64 {
    UserRepository::new(db.clone())
        .create(
            username,
            &format!("{username}@example.com"),
            "$argon2id$test_hash",
            None,
        )
        .await
        .expect("Failed to create user")
        .id
}

async fn seed_customer(db: &DatabaseConnection, user_id: i64, name: &str) -> i64 {
    CustomerRepository::new(db.clone())
        .create(
            CustomerInput {
                name: name.to_string(),
                ..Default::default()
            },
            user_id,
        )
        .await
        .expect("Failed to create customer")
        .id
}

async fn seed_repair(
    db: &DatabaseConnection,
    user_id: i64,
    customer_id: i64,
    status: &str,
    unit_price: Decimal,
) {
    RepairRepository::new(db.clone())
        .create(
            CreateRepairInput {
                customer_id,
                car_model: None,
                car_year: None,
                license_plate: None,
                repair_date: "2026-08-20".to_string(),
                description: None,
                tax_rate: Decimal::ZERO,
                status: Some(status.to_string()),
                notes: None,
                items: vec![LineItemInput {
                    description: "Work".to_string(),
                    quantity: Decimal::ONE,
                    unit_price,
                }],
            },
            user_id,
        )
        .await
        .expect("Failed to create repair");
}

#[tokio::test]
async fn test_overview_empty_user() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let repo = StatsRepository::new(db.clone());

    let overview = repo.overview(user_id).await.expect("Failed to load stats");

    assert_eq!(overview.total_customers, 0);
    assert_eq!(overview.total_repairs, 0);
    assert_eq!(overview.completed_repairs, 0);
    assert_eq!(overview.total_revenue, Decimal::ZERO);
}

#[tokio::test]
async fn test_overview_counts_and_revenue() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    seed_customer(&db, user_id, "Elif Demir").await;

    // Two completed, one pending; revenue counts completed only
    seed_repair(&db, user_id, customer_id, "completed", dec!(450)).await;
    seed_repair(&db, user_id, customer_id, "completed", dec!(1000)).await;
    seed_repair(&db, user_id, customer_id, "pending", dec!(9999)).await;

    let overview = StatsRepository::new(db.clone())
        .overview(user_id)
        .await
        .expect("Failed to load stats");

    assert_eq!(overview.total_customers, 2);
    assert_eq!(overview.total_repairs, 3);
    assert_eq!(overview.completed_repairs, 2);
    assert_eq!(overview.total_revenue, dec!(1450));
}

#[tokio::test]
async fn test_overview_scoped_to_user() {
    let db = setup_db().await;
    let mehmet = seed_user(&db, "mehmet").await;
    let ayse = seed_user(&db, "ayse").await;

    let theirs = seed_customer(&db, ayse, "Elif Demir").await;
    seed_repair(&db, ayse, theirs, "completed", dec!(5000)).await;

    let overview = StatsRepository::new(db.clone())
        .overview(mehmet)
        .await
        .expect("Failed to load stats");

    assert_eq!(overview.total_customers, 0);
    assert_eq!(overview.total_repairs, 0);
    assert_eq!(overview.total_revenue, Decimal::ZERO);
}
