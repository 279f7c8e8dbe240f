//! Create a superuser, or promote an existing account.
//!
//! Run with: cargo run --bin create-superuser -- --username admin --email admin@shop.test

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use backoffice_api::{
    auth::{AuthConfig, AuthService},
    config, db,
};

#[derive(Parser, Debug)]
#[command(name = "create-superuser", about = "Create or promote a superuser account")]
struct Cli {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    /// Falls back to the SUPERUSER_PASSWORD environment variable
    #[arg(long, env = "SUPERUSER_PASSWORD")]
    password: String,
    /// Apply pending migrations first
    #[arg(long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    if cli.password.len() < 8 {
        anyhow::bail!("password must be at least 8 characters");
    }

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    if cli.migrate || cfg.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed running migrations")?;
    }

    let auth = AuthService::new(AuthConfig::from(&cfg), Arc::new(pool));
    let account = auth
        .ensure_superuser(&cli.username, &cli.email, &cli.password)
        .await
        .context("failed to save superuser")?;

    info!(user_id = account.id, username = %account.username, "Superuser ready");
    Ok(())
}
