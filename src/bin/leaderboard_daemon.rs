//! A daemon that periodically rebuilds the leaderboards.
//!
//! Leaderboards are materialized snapshots; this binary is what keeps them
//! fresh. It rebuilds every stat category's top 50 once on startup and then
//! on a fixed interval (daily by default), until it receives a SIGINT.

use anyhow::Context;
use clap::Parser;
use fives_api::services::LeaderboardService;
use fives_api::{database, runtime};
use tokio::time::{self, Duration};

#[derive(Debug, Parser)]
struct Args
{
	#[command(flatten)]
	config: runtime::Config,

	/// How many seconds to wait between rebuilds.
	#[arg(long, env = "LEADERBOARD_INTERVAL", default_value_t = 60 * 60 * 24)]
	interval: u64,

	/// Rebuild once and exit.
	#[arg(long)]
	once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("WARNING: failed to load `.env` file: {error}");
	}

	runtime::logging::init();

	let args = Args::parse();
	let pool = database::create_pool(&args.config)
		.await
		.context("failed to establish database connection")?;

	let service = LeaderboardService::new(pool);

	if args.once {
		service
			.rebuild_all()
			.await
			.context("failed to rebuild leaderboards")?;

		return Ok(());
	}

	let mut interval = time::interval(Duration::from_secs(args.interval));

	loop {
		tokio::select! {
			_ = interval.tick() => {
				// keep going on failure; the next tick gets another shot
				if let Err(error) = service.rebuild_all().await {
					tracing::error!(%error, "failed to rebuild leaderboards");
				}
			}
			result = tokio::signal::ctrl_c() => {
				result.context("failed to listen for SIGINT")?;
				tracing::info!("shutting down");

				break;
			}
		}
	}

	Ok(())
}
