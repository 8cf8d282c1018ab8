//! Seeder entry-point: wait for PostgreSQL, seed one user, print the table.

use std::io;

use color_eyre::eyre::WrapErr;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use seeder::config::{DatabaseSettings, SeedSettings};
use seeder::domain::{DependencyReadyConnector, run_seed};
use seeder::inbound::console::write_summary;
use seeder::outbound::persistence::PgConnector;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database = DatabaseSettings::from_env()?;
    let params = database.connection_params()?;
    let policy = database.retry_policy()?;
    let candidate = SeedSettings::from_env()?.candidate()?;

    let connector = PgConnector::new(&params)?;
    let connector = DependencyReadyConnector::new(connector, policy);
    let summary = run_seed(&connector, &candidate)?;

    let mut stdout = io::stdout().lock();
    write_summary(&mut stdout, &summary).wrap_err("failed to write user listing")?;
    Ok(())
}
