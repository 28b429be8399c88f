//! A service for awarding and fetching badges.
//!
//! Badges are derived purely from a user's cumulative stats and a
//! [`BadgeCatalog`]. Evaluation is idempotent: running it twice against the
//! same stats awards nothing new, and a level can only ever go up.

use std::fmt;
use std::sync::Arc;

use sqlx::{MySql, Pool, Transaction};

use crate::services::users::{PlayerStats, UserID};

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
pub use models::{
	Badge,
	EvaluateUserRequest,
	EvaluateUserResponse,
	FetchBadgesRequest,
	FetchBadgesResponse,
};

mod catalog;
pub use catalog::{BadgeCatalog, BadgeSpec, InvalidCatalog};

/// A service for awarding and fetching badges.
#[derive(Clone)]
pub struct BadgeService
{
	database: Pool<MySql>,
	catalog: Arc<BadgeCatalog>,
}

impl fmt::Debug for BadgeService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("BadgeService").finish_non_exhaustive()
	}
}

impl BadgeService
{
	/// Create a new [`BadgeService`].
	pub fn new(database: Pool<MySql>, catalog: Arc<BadgeCatalog>) -> Self
	{
		Self { database, catalog }
	}

	/// Fetches a user's badges, in the order they were first earned.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_badges(&self, req: FetchBadgesRequest) -> Result<FetchBadgesResponse>
	{
		let badges = sqlx::query_as::<_, Badge>(
			r"
			SELECT
			  badge,
			  description,
			  level,
			  earned_on
			FROM
			  Badges
			WHERE
			  user_id = ?
			ORDER BY
			  earned_on ASC,
			  badge ASC
			",
		)
		.bind(req.user_id)
		.fetch_all(&self.database)
		.await?;

		Ok(FetchBadgesResponse { badges })
	}

	/// Re-evaluates a user's badges against their current stats.
	///
	/// Game summaries do this automatically; this operation exists for
	/// backfills after a catalog change.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn evaluate_user(&self, req: EvaluateUserRequest) -> Result<EvaluateUserResponse>
	{
		let mut txn = self.database.begin().await?;

		let awarded_badges = evaluate(&mut txn, &self.catalog, req.user_id)
			.await?
			.ok_or(Error::UserDoesNotExist { user_id: req.user_id })?;

		txn.commit().await?;

		Ok(EvaluateUserResponse { awarded_badges })
	}
}

/// Evaluates a user's badges as part of an ongoing transaction.
///
/// Returns the amount of badges that were newly earned or upgraded, or `None`
/// if the user does not exist. Level upgrades keep the original `earned_on`.
pub(crate) async fn evaluate(
	txn: &mut Transaction<'_, MySql>,
	catalog: &BadgeCatalog,
	user_id: UserID,
) -> sqlx::Result<Option<u64>>
{
	let Some(stats) = sqlx::query_as::<_, PlayerStats>(
		r"
		SELECT
		  matches,
		  wins,
		  mvps,
		  goals,
		  assists,
		  interceptions,
		  clean_sheets
		FROM
		  Users
		WHERE
		  id = ?
		",
	)
	.bind(user_id)
	.fetch_optional(txn.as_mut())
	.await?
	else {
		return Ok(None);
	};

	let mut awarded = 0;

	for (spec, level) in catalog.earned_badges(&stats) {
		// `rows_affected` is 1 for a fresh insert, 2 for a level change, and
		// 0 when the row already had this level.
		let query_result = sqlx::query(
			r"
			INSERT INTO
			  Badges (user_id, badge, description, level)
			VALUES
			  (?, ?, ?, ?)
			ON DUPLICATE KEY UPDATE
			  level = GREATEST(level, VALUES(level))
			",
		)
		.bind(user_id)
		.bind(&spec.name)
		.bind(&spec.description)
		.bind(level)
		.execute(txn.as_mut())
		.await?;

		if query_result.rows_affected() > 0 {
			awarded += 1;

			tracing::debug!(%user_id, badge = %spec.name, level, "awarded badge");
		}
	}

	Ok(Some(awarded))
}
