//! Database seeder for Tamira development and testing.
//!
//! Seeds a demo user with sample customers and repairs for local
//! development. Repairs are created through the repair repository, so
//! seeded totals take the same calculator path the API uses.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Local};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

use tamira_core::auth::hash_password;
use tamira_core::invoice::LineItemInput;
use tamira_db::repositories::{CreateRepairInput, CustomerInput};
use tamira_db::{CustomerRepository, RepairRepository, UserRepository};

/// Demo account username.
const DEMO_USERNAME: &str = "demo";
/// Demo account password.
const DEMO_PASSWORD: &str = "demo123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tamira_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user...");
    let user_id = seed_demo_user(&db).await;

    println!("Seeding customers...");
    let customer_ids = seed_customers(&db, user_id).await;

    println!("Seeding repairs...");
    seed_repairs(&db, user_id, &customer_ids).await;

    println!("Seeding complete!");
    println!("Login with {DEMO_USERNAME} / {DEMO_PASSWORD}");
}

/// Seeds the demo user, returning its id.
async fn seed_demo_user(db: &DatabaseConnection) -> i64 {
    let user_repo = UserRepository::new(db.clone());

    if let Ok(Some(existing)) = user_repo.find_by_username(DEMO_USERNAME).await {
        println!("  Demo user already exists, skipping...");
        return existing.id;
    }

    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");
    let user = user_repo
        .create(
            DEMO_USERNAME,
            "demo@tamira.local",
            &password_hash,
            Some("Demo User"),
        )
        .await
        .expect("Failed to insert demo user");

    println!("  Created demo user: {DEMO_USERNAME}");
    user.id
}

/// Seeds sample customers for the demo user, returning their ids.
async fn seed_customers(db: &DatabaseConnection, user_id: i64) -> Vec<i64> {
    let customer_repo = CustomerRepository::new(db.clone());

    let existing = customer_repo
        .list_for_user(user_id)
        .await
        .expect("Failed to list customers");
    if !existing.is_empty() {
        println!("  Customers already exist, skipping...");
        return existing.into_iter().map(|c| c.id).collect();
    }

    let samples = [
        (
            "Ahmet Yilmaz",
            Some("ahmet@yilmazlojistik.com"),
            Some("+90 532 111 2233"),
            Some("Yilmaz Lojistik"),
        ),
        (
            "Elif Demir",
            Some("elif.demir@example.com"),
            Some("+90 533 444 5566"),
            None,
        ),
        (
            "Mehmet Kaya",
            Some("mehmet.kaya@example.com"),
            Some("+90 542 777 8899"),
            Some("Kaya Insaat"),
        ),
        (
            "Zeynep Arslan",
            None,
            Some("+90 555 123 4567"),
            None,
        ),
        (
            "Can Ozturk",
            Some("can@ozturktaksi.com"),
            Some("+90 536 987 6543"),
            Some("Ozturk Taksi"),
        ),
    ];

    let mut ids = Vec::with_capacity(samples.len());
    for (name, email, phone, company) in samples {
        let input = CustomerInput {
            name: name.to_string(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            company: company.map(String::from),
            ..Default::default()
        };

        match customer_repo.create(input, user_id).await {
            Ok(customer) => ids.push(customer.id),
            Err(e) => eprintln!("Failed to insert customer {name}: {e}"),
        }
    }

    println!("  Inserted {} customers", ids.len());
    ids
}

/// Seeds sample repairs with line items across the last few weeks.
async fn seed_repairs(db: &DatabaseConnection, user_id: i64, customer_ids: &[i64]) {
    let repair_repo = RepairRepository::new(db.clone());

    let existing = repair_repo
        .list_for_user(user_id)
        .await
        .expect("Failed to list repairs");
    if !existing.is_empty() {
        println!("  Repairs already exist, skipping...");
        return;
    }

    let today = Local::now().date_naive();
    let samples = [
        (
            0,
            "Ford Transit",
            2019,
            "34 ABC 123",
            2,
            "completed",
            "18",
            vec![
                ("Brake pad replacement", "1", "850"),
                ("Brake fluid", "2", "150"),
                ("Labor", "1", "200"),
            ],
        ),
        (
            1,
            "Renault Clio",
            2021,
            "06 DEF 456",
            5,
            "completed",
            "18",
            vec![("Oil change", "1", "450"), ("Oil filter", "1", "120")],
        ),
        (
            2,
            "Fiat Doblo",
            2017,
            "35 GHI 789",
            9,
            "completed",
            "18",
            vec![
                ("Clutch kit", "1", "3200"),
                ("Flywheel resurfacing", "1", "600"),
                ("Labor", "4", "250"),
            ],
        ),
        (
            3,
            "Toyota Corolla",
            2022,
            "16 JKL 321",
            1,
            "in_progress",
            "18",
            vec![("Timing belt kit", "1", "1400"), ("Coolant", "3", "90")],
        ),
        (
            4,
            "Volkswagen Passat",
            2018,
            "07 MNO 654",
            0,
            "pending",
            "18",
            vec![("Diagnostic inspection", "1", "300")],
        ),
    ];

    let mut inserted = 0;
    for (customer_idx, car_model, car_year, plate, days_ago, status, tax_rate, items) in samples {
        let Some(&customer_id) = customer_ids.get(customer_idx) else {
            continue;
        };

        let repair_date = (today - Duration::days(days_ago)).format("%Y-%m-%d").to_string();
        let items = items
            .into_iter()
            .map(|(description, quantity, unit_price)| LineItemInput {
                description: description.to_string(),
                quantity: decimal(quantity),
                unit_price: decimal(unit_price),
            })
            .collect();

        let input = CreateRepairInput {
            customer_id,
            car_model: Some(car_model.to_string()),
            car_year: Some(car_year),
            license_plate: Some(plate.to_string()),
            repair_date,
            description: None,
            tax_rate: decimal(tax_rate),
            status: Some(status.to_string()),
            notes: None,
            items,
        };

        match repair_repo.create(input, user_id).await {
            Ok(repair) => {
                println!(
                    "  {} {} -> grand total {}",
                    repair.repair.repair_date, car_model, repair.repair.grand_total
                );
                inserted += 1;
            }
            Err(e) => eprintln!("Failed to insert repair for {car_model}: {e}"),
        }
    }

    println!("  Inserted {inserted} repairs");
}

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).expect("seed literals are valid decimals")
}
