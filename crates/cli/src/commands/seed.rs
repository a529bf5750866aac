//! Seed command for local development.
//!
//! Inserts a demo admin, a demo shopper, and a handful of catalog products.
//! Idempotent: re-running updates nothing thanks to `ON CONFLICT DO NOTHING`
//! on the stable usernames and product names.

use rust_decimal::Decimal;
use sqlx::PgPool;

use orchard_commerce::config::CommerceConfig;
use orchard_commerce::db::create_pool;
use orchard_core::{ProductId, UserId};

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("configuration error: {0}")]
    Config(#[from] orchard_commerce::config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const DEMO_PRODUCTS: &[(&str, i64, i32)] = &[
    ("Dragon Well Green Tea", 1000, 50),
    ("Jasmine Pearls", 1250, 30),
    ("Aged Pu-erh Cake", 8800, 8),
    ("Porcelain Gaiwan", 3600, 20),
];

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns `SeedError` if configuration, connection, or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let config = CommerceConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.max_connections).await?;

    seed_users(&pool).await?;
    seed_products(&pool).await?;

    tracing::info!("Seed complete!");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), SeedError> {
    for (username, role) in [("admin", "admin"), ("demo", "user")] {
        sqlx::query(
            "INSERT INTO users (id, username, role)
             VALUES ($1, $2, $3::user_role)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(UserId::generate())
        .bind(username)
        .bind(role)
        .execute(pool)
        .await?;
    }
    tracing::info!("Seeded demo users");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), SeedError> {
    for (name, cents, stock) in DEMO_PRODUCTS {
        let inserted = sqlx::query(
            "INSERT INTO products (id, name, price, stock)
             SELECT $1, $2, $3, $4
             WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)",
        )
        .bind(ProductId::generate())
        .bind(name)
        .bind(Decimal::new(*cents, 2))
        .bind(stock)
        .execute(pool)
        .await?;

        if inserted.rows_affected() == 1 {
            tracing::info!(product = name, "Seeded product");
        }
    }
    Ok(())
}
