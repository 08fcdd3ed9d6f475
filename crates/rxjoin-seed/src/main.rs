//! rxjoin dataset seeder.
//!
//! Wipes the database and fills it with synthetic patients, drugs,
//! prescriptions and interactions, all inside one transaction. Two named
//! drugs are guaranteed to exist, to interact with severity `Grave`, and to
//! be prescribed to a configurable share of patients.

mod generate;
mod names;
mod pipeline;

use anyhow::Context as _;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use rxjoin_store_sqlite::{PoolConfig, SqliteStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::pipeline::SeedPlan;

#[derive(Parser)]
#[command(author, version, about = "Populate the rxjoin database with synthetic data")]
struct Cli {
  /// Database to seed. Created if missing; existing data is dropped.
  #[arg(long, env = "RXJOIN_DATABASE_URL", default_value = "sqlite://rxjoin.db")]
  database_url: String,

  /// Seed for the random generator. Omit for a fresh dataset each run.
  #[arg(long, env = "RXJOIN_SEED")]
  seed: Option<u64>,

  #[command(flatten)]
  plan: SeedPlan,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  cli.plan.validate().context("invalid seed parameters")?;

  tracing::info!(
    database_url = %cli.database_url,
    patients = cli.plan.patients,
    drugs = cli.plan.drugs,
    interactions = cli.plan.interactions,
    seed = ?cli.seed,
    "seeding started"
  );

  let store = SqliteStore::open(&cli.database_url, &PoolConfig::default())
    .await
    .with_context(|| format!("failed to open store at {}", cli.database_url))?;

  let mut rng = match cli.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };

  let result = pipeline::run(&store, &cli.plan, &mut rng).await;
  store.close().await;

  let summary = result.context("seeding failed")?;
  tracing::info!(
    drugs = summary.drugs,
    patients = summary.patients,
    associations = summary.associations,
    interactions = summary.interactions,
    "seeding finished"
  );
  Ok(())
}
