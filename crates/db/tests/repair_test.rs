//! Integration tests for the repair repository.
//!
//! Totals are derived values: every create and every items/tax update
//! must leave subtotal, tax amount, grand total, and per-line totals
//! consistent with each other.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tamira_core::invoice::LineItemInput;
use tamira_db::entities::repair_items;
use tamira_db::migration::{Migrator, MigratorTrait};
use tamira_db::repositories::{
    CreateRepairInput, CustomerInput, RepairError, UpdateRepairInput,
};
use tamira_db::{CustomerRepository, RepairRepository, UserRepository};

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

fn item(description: &str, quantity: Decimal, unit_price: Decimal) -> LineItemInput {
    LineItemInput {
        description: description.to_string(),
        quantity,
        unit_price,
    }
}

fn repair_input(customer_id: i64, date: &str, items: Vec<LineItemInput>) -> CreateRepairInput {
    CreateRepairInput {
        customer_id,
        car_model: Some("Ford Transit".to_string()),
        car_year: Some(2019),
        license_plate: Some("34 ABC 123".to_string()),
        repair_date: date.to_string(),
        description: Some("Brake overhaul".to_string()),
        tax_rate: dec!(18),
        status: None,
        notes: None,
        items,
    }
}

#[tokio::test]
async fn test_repair_create_computes_totals() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(
            repair_input(
                customer_id,
                "2026-08-20",
                vec![
                    item("Brake pad replacement", dec!(1), dec!(850)),
                    item("Brake fluid", dec!(2), dec!(150)),
                    item("Labor", dec!(1), dec!(200)),
                ],
            ),
            user_id,
        )
        .await
        .expect("Failed to create repair");

    // 850 + 2*150 + 200 = 1350, 18% tax on top
    assert_eq!(created.repair.subtotal, dec!(1350));
    assert_eq!(created.repair.tax_amount, dec!(243));
    assert_eq!(created.repair.grand_total, dec!(1593));
    assert_eq!(created.repair.status, "pending");
    assert_eq!(created.customer_name, "Ahmet Yilmaz");

    // Per-line totals stored alongside
    assert_eq!(created.items.len(), 3);
    assert_eq!(created.items[0].total_price, dec!(850));
    assert_eq!(created.items[1].total_price, dec!(300));
    assert_eq!(created.items[2].total_price, dec!(200));
}

#[tokio::test]
async fn test_repair_create_without_items_is_zeroed() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(repair_input(customer_id, "2026-08-20", vec![]), user_id)
        .await
        .expect("Failed to create repair");

    assert_eq!(created.repair.subtotal, Decimal::ZERO);
    assert_eq!(created.repair.tax_amount, Decimal::ZERO);
    assert_eq!(created.repair.grand_total, Decimal::ZERO);
    assert!(created.items.is_empty());
}

#[tokio::test]
async fn test_repair_create_rejects_unowned_customer() {
    let db = setup_db().await;
    let mehmet = seed_user(&db, "mehmet").await;
    let ayse = seed_user(&db, "ayse").await;
    let customer_id = seed_customer(&db, mehmet, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let result = repo
        .create(repair_input(customer_id, "2026-08-20", vec![]), ayse)
        .await;

    assert!(matches!(result, Err(RepairError::CustomerNotFound(id)) if id == customer_id));
}

#[tokio::test]
async fn test_repair_create_rejects_malformed_date() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let result = repo
        .create(repair_input(customer_id, "20-08-2026", vec![]), user_id)
        .await;

    assert!(matches!(result, Err(RepairError::InvalidRepairDate(_))));
}

#[tokio::test]
async fn test_repair_update_tax_rate_recomputes_totals() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(
            repair_input(
                customer_id,
                "2026-08-20",
                vec![item("Oil change", dec!(1), dec!(450))],
            ),
            user_id,
        )
        .await
        .expect("Failed to create repair");
    assert_eq!(created.repair.grand_total, dec!(531));

    // Tax change alone replays the stored items through the calculator
    let updated = repo
        .update(
            created.repair.id,
            user_id,
            UpdateRepairInput {
                tax_rate: Some(Decimal::ZERO),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update repair");

    assert_eq!(updated.repair.subtotal, dec!(450));
    assert_eq!(updated.repair.tax_amount, Decimal::ZERO);
    assert_eq!(updated.repair.grand_total, dec!(450));
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].description, "Oil change");
}

#[tokio::test]
async fn test_repair_update_replaces_item_set() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(
            repair_input(
                customer_id,
                "2026-08-20",
                vec![
                    item("Clutch kit", dec!(1), dec!(3200)),
                    item("Labor", dec!(4), dec!(250)),
                ],
            ),
            user_id,
        )
        .await
        .expect("Failed to create repair");

    let updated = repo
        .update(
            created.repair.id,
            user_id,
            UpdateRepairInput {
                items: Some(vec![item("Diagnostic inspection", dec!(1), dec!(300))]),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update repair");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.repair.subtotal, dec!(300));
    assert_eq!(updated.repair.tax_amount, dec!(54));
    assert_eq!(updated.repair.grand_total, dec!(354));

    // Old rows are gone, not orphaned
    let stored = repair_items::Entity::find()
        .filter(repair_items::Column::RepairId.eq(created.repair.id))
        .count(&db)
        .await
        .expect("Failed to count items");
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn test_repair_update_scalars_keep_totals() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(
            repair_input(
                customer_id,
                "2026-08-20",
                vec![item("Oil change", dec!(1), dec!(450))],
            ),
            user_id,
        )
        .await
        .expect("Failed to create repair");

    let updated = repo
        .update(
            created.repair.id,
            user_id,
            UpdateRepairInput {
                status: Some("completed".to_string()),
                // Clearing a nullable column
                car_model: Some(None),
                notes: Some(Some("picked up".to_string())),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update repair");

    assert_eq!(updated.repair.status, "completed");
    assert!(updated.repair.car_model.is_none());
    assert_eq!(updated.repair.notes.as_deref(), Some("picked up"));
    // Money untouched
    assert_eq!(updated.repair.grand_total, created.repair.grand_total);
    assert_eq!(updated.items.len(), 1);
}

#[tokio::test]
async fn test_repair_update_empty_is_rejected() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(repair_input(customer_id, "2026-08-20", vec![]), user_id)
        .await
        .expect("Failed to create repair");

    let result = repo
        .update(created.repair.id, user_id, UpdateRepairInput::default())
        .await;

    assert!(matches!(result, Err(RepairError::EmptyUpdate)));
}

#[tokio::test]
async fn test_repair_update_not_found_for_other_owner() {
    let db = setup_db().await;
    let mehmet = seed_user(&db, "mehmet").await;
    let ayse = seed_user(&db, "ayse").await;
    let customer_id = seed_customer(&db, mehmet, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(repair_input(customer_id, "2026-08-20", vec![]), mehmet)
        .await
        .expect("Failed to create repair");

    let result = repo
        .update(
            created.repair.id,
            ayse,
            UpdateRepairInput {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(RepairError::NotFound(_))));
}

#[tokio::test]
async fn test_repair_delete_cascades_items() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let created = repo
        .create(
            repair_input(
                customer_id,
                "2026-08-20",
                vec![
                    item("Brake pad replacement", dec!(1), dec!(850)),
                    item("Labor", dec!(1), dec!(200)),
                ],
            ),
            user_id,
        )
        .await
        .expect("Failed to create repair");

    let deleted = repo
        .delete(created.repair.id, user_id)
        .await
        .expect("Failed to delete repair");
    assert!(deleted);

    let remaining = repair_items::Entity::find()
        .filter(repair_items::Column::RepairId.eq(created.repair.id))
        .count(&db)
        .await
        .expect("Failed to count items");
    assert_eq!(remaining, 0);

    // Already gone
    let deleted_again = repo
        .delete(created.repair.id, user_id)
        .await
        .expect("Query should succeed");
    assert!(!deleted_again);
}

#[tokio::test]
async fn test_repair_list_scoped_and_ordered() {
    let db = setup_db().await;
    let mehmet = seed_user(&db, "mehmet").await;
    let ayse = seed_user(&db, "ayse").await;
    let mine = seed_customer(&db, mehmet, "Ahmet Yilmaz").await;
    let theirs = seed_customer(&db, ayse, "Elif Demir").await;
    let repo = RepairRepository::new(db.clone());

    repo.create(repair_input(mine, "2026-08-10", vec![]), mehmet)
        .await
        .expect("Failed to create repair");
    repo.create(repair_input(mine, "2026-08-20", vec![]), mehmet)
        .await
        .expect("Failed to create repair");
    repo.create(repair_input(theirs, "2026-08-15", vec![]), ayse)
        .await
        .expect("Failed to create repair");

    let repairs = repo
        .list_for_user(mehmet)
        .await
        .expect("Failed to list repairs");

    assert_eq!(repairs.len(), 2);
    // Most recent repair date first
    assert_eq!(repairs[0].repair.repair_date, "2026-08-20");
    assert_eq!(repairs[1].repair.repair_date, "2026-08-10");
    assert_eq!(repairs[0].customer_name, "Ahmet Yilmaz");
}

#[tokio::test]
async fn test_repair_search_matches_customer_and_car() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let ahmet = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let elif = seed_customer(&db, user_id, "Elif Demir").await;
    let repo = RepairRepository::new(db.clone());

    repo.create(repair_input(ahmet, "2026-08-20", vec![]), user_id)
        .await
        .expect("Failed to create repair");

    let mut clio = repair_input(elif, "2026-08-21", vec![]);
    clio.car_model = Some("Renault Clio".to_string());
    clio.license_plate = Some("06 DEF 456".to_string());
    repo.create(clio, user_id).await.expect("Failed to create repair");

    // By customer name
    let by_name = repo
        .search(user_id, "Ahmet")
        .await
        .expect("Failed to search repairs");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].customer_name, "Ahmet Yilmaz");

    // By car model
    let by_model = repo
        .search(user_id, "Clio")
        .await
        .expect("Failed to search repairs");
    assert_eq!(by_model.len(), 1);

    // By license plate
    let by_plate = repo
        .search(user_id, "DEF")
        .await
        .expect("Failed to search repairs");
    assert_eq!(by_plate.len(), 1);
}

#[tokio::test]
async fn test_list_records_filters_by_status() {
    let db = setup_db().await;
    let user_id = seed_user(&db, "mehmet").await;
    let customer_id = seed_customer(&db, user_id, "Ahmet Yilmaz").await;
    let repo = RepairRepository::new(db.clone());

    let mut done = repair_input(
        customer_id,
        "2026-08-20",
        vec![item("Oil change", dec!(1), dec!(450))],
    );
    done.status = Some("completed".to_string());
    repo.create(done, user_id).await.expect("Failed to create repair");

    repo.create(repair_input(customer_id, "2026-08-21", vec![]), user_id)
        .await
        .expect("Failed to create repair");

    let all = repo
        .list_records_for_user(user_id, None)
        .await
        .expect("Failed to load records");
    assert_eq!(all.len(), 2);

    let completed = repo
        .list_records_for_user(user_id, Some("completed"))
        .await
        .expect("Failed to load records");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, "completed");
    assert_eq!(completed[0].grand_total, Some(dec!(531)));
    assert_eq!(completed[0].customer_name, "Ahmet Yilmaz");
}
