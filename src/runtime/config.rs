//! This module contains the [`Config`] struct - a set of configuration options
//! that will be read from the environment on startup.
//!
//! See the `.env.example` file in the root of the repository for all the
//! relevant variables and example values.

use url::Url;

/// The service's runtime configuration.
#[derive(Debug, Clone, clap::Parser)]
pub struct Config
{
	/// Database connection URL.
	#[arg(long, env = "DATABASE_URL")]
	pub database_url: Url,

	/// The minimum number of database pool connections to keep open.
	#[arg(long, env = "DATABASE_MIN_CONNECTIONS", default_value_t = 1)]
	pub min_connections: u32,

	/// The maximum number of database pool connections to open.
	///
	/// Defaults to twice the available parallelism.
	#[arg(long, env = "DATABASE_MAX_CONNECTIONS")]
	pub max_connections: Option<std::num::NonZero<u32>>,
}
