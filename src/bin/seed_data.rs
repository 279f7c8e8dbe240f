//! Seed data script - a small demo catalogue
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates, when missing:
//! - the standard payment methods
//! - a "Tarpaulin Printing" service with size and finish options and their prices
//! - a supplier and two materials

use anyhow::Context;
use clap::Parser;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use backoffice_api::{
    config, db,
    dto::{StagedOption, StagedPricing, StagedService, SupplierInput},
    entities::{inventory, inventory::UnitOfMeasurement, payment_method, service},
    services::catalog::{create_service_in, upsert_category, upsert_supplier},
};

const PAYMENT_METHODS: [&str; 4] = ["Cash", "GCash", "Bank Transfer", "Credit Card"];
const DEMO_SERVICE: &str = "Tarpaulin Printing";

#[derive(Parser, Debug)]
#[command(name = "seed-data", about = "Populate the database with a demo catalogue")]
struct Cli {
    /// Database URL; defaults to the configured one
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Skip applying pending migrations
    #[arg(long, default_value_t = false)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let url = cli
        .database_url
        .unwrap_or_else(|| cfg.database_url().to_string());
    info!("Connecting to database: {}", url);
    let pool = db::establish_connection(&url)
        .await
        .context("failed to connect to database")?;
    if !cli.no_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed running migrations")?;
    }

    let txn = pool.begin().await?;
    seed_payment_methods(&txn).await?;
    info!("  Payment methods: {}", PAYMENT_METHODS.join(", "));
    if seed_demo_service(&txn).await? {
        info!("  Created service {}", DEMO_SERVICE);
    }
    let materials = seed_materials(&txn).await?;
    info!("  Created {} materials", materials);
    txn.commit().await?;

    info!("=== Seed Data Complete ===");
    Ok(())
}

async fn seed_payment_methods<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    payment_method::Entity::insert_many(PAYMENT_METHODS.iter().map(|name| {
        payment_method::ActiveModel {
            method_name: Set(name.to_string()),
            ..Default::default()
        }
    }))
    .on_conflict(
        OnConflict::column(payment_method::Column::MethodName)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

fn pricing(description: &str, price: rust_decimal::Decimal) -> StagedPricing {
    StagedPricing {
        description: description.to_string(),
        price,
    }
}

async fn seed_demo_service<C: ConnectionTrait>(db: &C) -> anyhow::Result<bool> {
    let existing = service::Entity::find()
        .filter(service::Column::Name.eq(DEMO_SERVICE))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let staged = StagedService {
        name: DEMO_SERVICE.to_string(),
        customization_options: vec![
            StagedOption {
                name: "Size".to_string(),
                pricing_options: vec![
                    pricing("2x3 ft", dec!(180.00)),
                    pricing("3x5 ft", dec!(350.00)),
                ],
            },
            StagedOption {
                name: "Finish".to_string(),
                pricing_options: vec![pricing("Eyelets", dec!(40.00))],
            },
        ],
    };
    create_service_in(db, &staged).await?;
    Ok(true)
}

async fn seed_materials<C: ConnectionTrait>(db: &C) -> anyhow::Result<usize> {
    let supplier = upsert_supplier(
        db,
        &SupplierInput {
            supplier_name: "Ink Depot".to_string(),
            contact_person: Some("Rosa Lim".to_string()),
            phone_number: Some("09171234567".to_string()),
            email: Some("sales@inkdepot.com".to_string()),
            address: None,
            additional_info: None,
        },
    )
    .await?;

    let materials = [
        ("Tarpaulin Roll 4ft", "Vinyl", 12, 5, UnitOfMeasurement::Rolls),
        ("Eco-Solvent Ink Cyan", "Ink", 3, 4, UnitOfMeasurement::Liters),
    ];
    let mut created = 0;
    for (name, category, stock_level, reorder_threshold, unit) in materials {
        let exists = inventory::Entity::find()
            .filter(inventory::Column::Name.eq(name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        let category_id = upsert_category(db, category).await?;
        inventory::ActiveModel {
            name: Set(name.to_string()),
            category_id: Set(Some(category_id)),
            stock_level: Set(stock_level),
            reorder_threshold: Set(reorder_threshold),
            supplier_id: Set(Some(supplier.id)),
            unit_of_measurement: Set(unit),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}
