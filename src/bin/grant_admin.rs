//! Seed or toggle an admin grant for an identity-provider user id.
//!
//! Operational tool for bootstrapping the first admin, or revoking one,
//! without touching the database by hand.

use anyhow::Result;
use clap::Parser;

use academy_api::{config::ConfigLoader, db, repositories::AdminGrantRepository, telemetry};
use migration::{Migrator, MigratorTrait};

#[derive(Debug, Parser)]
#[command(name = "grant-admin", about = "Manage the admin allow-list")]
struct Cli {
    /// Identity-provider user id the grant applies to
    user_id: String,

    /// Deactivate the grant instead of activating it
    #[arg(long)]
    deactivate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new().load()?;
    telemetry::init_tracing(&config)?;

    let db = db::init_pool(&config).await?;
    Migrator::up(&db, None).await?;

    let active = !cli.deactivate;
    let grant = AdminGrantRepository::new(&db)
        .upsert_grant(&cli.user_id, active)
        .await?;

    println!(
        "Admin grant for {} is now {}",
        grant.user_id,
        if grant.is_active { "active" } else { "inactive" }
    );

    Ok(())
}
