//! Logging setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Initializes [`tracing_subscriber`] with an env-filter.
///
/// Filtering is controlled via the `RUST_LOG` environment variable; audit
/// events are emitted under the `fives_api::audit_log` target.
pub fn init()
{
	tracing_subscriber::fmt()
		.compact()
		.with_env_filter(EnvFilter::from_default_env())
		.init();
}
