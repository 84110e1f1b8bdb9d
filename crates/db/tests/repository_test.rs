//! Integration tests for repositories.
//!
//! These need a running Postgres; they skip themselves when `DATABASE_URL`
//! is unset so the suite stays green on machines without a database.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use finboard_db::entities::{financial_data, kpi_data, periods, products, users};
use finboard_db::migration::{Migrator, MigratorTrait};
use finboard_db::repositories::FinancialMetrics;
use finboard_db::{
    FinancialRepository, KpiRepository, PeriodRepository, ProductRepository, UserRepository, seed,
};

async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let db = finboard_db::connect(&url, 5)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Migration failed");
    seed::apply(&db).await.expect("Seed failed");
    Some(db)
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let Some(db) = test_db().await else { return };

    // Applying the seed again must not duplicate rows keyed by natural key
    // or grow the fact tables.
    let products_before = products::Entity::find().count(&db).await.unwrap();
    let periods_before = periods::Entity::find().count(&db).await.unwrap();
    let users_before = users::Entity::find().count(&db).await.unwrap();
    let financial_before = financial_data::Entity::find().count(&db).await.unwrap();
    let kpi_before = kpi_data::Entity::find().count(&db).await.unwrap();

    seed::apply(&db).await.expect("Re-seed failed");

    assert_eq!(
        products::Entity::find().count(&db).await.unwrap(),
        products_before
    );
    assert_eq!(
        periods::Entity::find().count(&db).await.unwrap(),
        periods_before
    );
    assert_eq!(users::Entity::find().count(&db).await.unwrap(), users_before);
    assert_eq!(
        financial_data::Entity::find().count(&db).await.unwrap(),
        financial_before
    );
    assert_eq!(kpi_data::Entity::find().count(&db).await.unwrap(), kpi_before);
}

#[tokio::test]
async fn test_period_upsert_updates_type_on_conflict() {
    let Some(db) = test_db().await else { return };

    let repo = PeriodRepository::new(db.clone());
    let date = NaiveDate::from_ymd_opt(2031, 10, 31).unwrap();

    let first = repo.upsert(date, "Monthly", None).await.unwrap();
    assert_eq!(first.fiscal_year, "2031-32");

    let second = repo.upsert(date, "Quarterly", None).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.period_type, "Quarterly");
}

#[tokio::test]
async fn test_financial_insert_and_list_round_trip() {
    let Some(db) = test_db().await else { return };

    let repo = FinancialRepository::new(db.clone());
    let date = NaiveDate::from_ymd_opt(2031, 11, 30).unwrap();
    let metrics = FinancialMetrics {
        sales_volume: Some(dec!(111.50)),
        turnover_eur: Some(dec!(250000.00)),
        net_profit: Some(dec!(57500.00)),
        net_margin: Some(dec!(0.2300)),
        ..Default::default()
    };

    let record = repo
        .insert_for(date, "Plumpy*Sup", metrics)
        .await
        .expect("Insert failed");
    assert_eq!(record.sales_volume, Some(dec!(111.50)));

    let rows = repo.list(50).await.unwrap();
    let found = rows
        .iter()
        .find(|r| r.period_date == date && r.product_name == "Plumpy*Sup")
        .expect("Inserted row should be listed");
    assert_eq!(found.sales_volume, Some(dec!(111.50)));
    assert_eq!(found.net_margin, Some(dec!(0.2300)));
    assert_eq!(found.fiscal_year, "2031-32");
}

#[tokio::test]
async fn test_unknown_product_is_a_validation_failure() {
    let Some(db) = test_db().await else { return };

    let repo = FinancialRepository::new(db.clone());
    let date = NaiveDate::from_ymd_opt(2031, 12, 31).unwrap();

    let err = repo
        .insert_for(date, "No Such Product", FinancialMetrics::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        finboard_db::repositories::FinancialError::UnknownProduct(_)
    ));
}

#[tokio::test]
async fn test_seeded_users_are_queryable_without_hashes() {
    let Some(db) = test_db().await else { return };

    let repo = UserRepository::new(db.clone());

    assert!(repo.email_exists("admin@hilinafoods.com").await.unwrap());
    let admin = repo
        .find_active_by_email("admin@hilinafoods.com")
        .await
        .unwrap()
        .expect("Seeded admin should exist");
    assert_eq!(admin.role, "admin");

    let users = repo.list().await.unwrap();
    assert!(users.len() >= 2);
    let summary = serde_json::to_value(&users).unwrap();
    assert!(!summary.to_string().contains("$2a$10$"));
}

#[tokio::test]
async fn test_duplicate_user_create_reports_unique_violation() {
    let Some(db) = test_db().await else { return };

    let repo = UserRepository::new(db.clone());
    let email = format!(
        "dup-{}@hilinafoods.com",
        chrono::Utc::now().timestamp_micros()
    );

    repo.create(&email, "hash", "Dup User", "viewer")
        .await
        .expect("First insert should succeed");

    // The second insert hits the unique index on email; callers rely on
    // being able to classify this as a conflict rather than a server error.
    let err = repo
        .create(&email, "hash", "Dup User", "viewer")
        .await
        .expect_err("Second insert should violate the unique index");
    assert!(matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn test_kpi_insert_and_fetch_for_period() {
    let Some(db) = test_db().await else { return };

    let period = PeriodRepository::new(db.clone())
        .upsert(
            NaiveDate::from_ymd_opt(2032, 1, 31).unwrap(),
            "Monthly",
            None,
        )
        .await
        .unwrap();

    let kpi_repo = KpiRepository::new(db.clone());
    kpi_repo
        .insert(
            period.id,
            "Capacity Utilization",
            Some(dec!(90)),
            Some(dec!(61)),
            Some("%".to_string()),
        )
        .await
        .unwrap();

    let rows = kpi_repo.for_period(period.id).await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.kpi_name == "Capacity Utilization")
        .expect("Inserted KPI should be fetched for its period");
    assert_eq!(row.target_value, Some(dec!(90.00)));
    assert_eq!(row.actual_value, Some(dec!(61.00)));
}

#[tokio::test]
async fn test_kpi_list_orders_by_date_then_name() {
    let Some(db) = test_db().await else { return };

    let kpi_repo = KpiRepository::new(db.clone());
    let rows = kpi_repo.list(50).await.unwrap();
    assert!(!rows.is_empty());

    for pair in rows.windows(2) {
        assert!(pair[0].period_date >= pair[1].period_date);
        if pair[0].period_date == pair[1].period_date {
            assert!(pair[0].kpi_name <= pair[1].kpi_name);
        }
    }
}

#[tokio::test]
async fn test_products_seeded_with_categories() {
    let Some(db) = test_db().await else { return };

    let repo = ProductRepository::new(db.clone());
    let product = repo
        .find_by_name("Plumpy*Nut")
        .await
        .unwrap()
        .expect("Seeded product should exist");
    assert_eq!(product.category.as_deref(), Some("RUTF"));
}
