//! A service for building and fetching leaderboards.
//!
//! Leaderboards are materialized snapshots, not live queries. A rebuild
//! replaces a stat's snapshot wholesale from the current `Users` stats; reads
//! only ever touch the snapshot tables, so they stay cheap no matter how many
//! users exist. The daemon binary rebuilds every board on a fixed interval.

use std::fmt;

use sqlx::{FromRow, MySql, Pool};
use tap::TryConv;

use crate::services::users::{StatKey, UserID};

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
pub use models::{FetchLeaderboardRequest, FetchLeaderboardResponse, LeaderboardEntry};

/// How many entries each leaderboard holds.
pub const LEADERBOARD_SIZE: u64 = 50;

/// A service for building and fetching leaderboards.
#[derive(Clone)]
pub struct LeaderboardService
{
	database: Pool<MySql>,
}

impl fmt::Debug for LeaderboardService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("LeaderboardService").finish_non_exhaustive()
	}
}

/// A row of the ranking query, before ranks are assigned.
#[derive(Debug, FromRow)]
struct RankedRow
{
	user_id: UserID,
	value: u32,
	matches: u32,
}

impl LeaderboardService
{
	/// Create a new [`LeaderboardService`].
	pub fn new(database: Pool<MySql>) -> Self
	{
		Self { database }
	}

	/// Rebuilds the leaderboard for a single stat category.
	///
	/// Returns the amount of entries in the new snapshot. Ordering is fully
	/// deterministic: value descending, then fewer games played, then lower
	/// user ID, so rebuilding against unchanged stats yields an identical
	/// board.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn rebuild(&self, stat: StatKey) -> Result<u64>
	{
		let mut txn = self.database.begin().await?;

		// `stat` is a closed enum, so interpolating its column name is safe.
		let rows = sqlx::query_as::<_, RankedRow>(&format!(
			r"
			SELECT
			  id user_id,
			  {stat} value,
			  matches
			FROM
			  Users
			WHERE
			  {stat} > 0
			ORDER BY
			  {stat} DESC,
			  matches ASC,
			  id ASC
			LIMIT
			  ?
			",
			stat = stat.column(),
		))
		.bind(LEADERBOARD_SIZE)
		.fetch_all(txn.as_mut())
		.await?;

		sqlx::query(
			r"
			DELETE FROM
			  Leaderboards
			WHERE
			  stat = ?
			",
		)
		.bind(stat)
		.execute(txn.as_mut())
		.await?;

		for (idx, row) in rows.iter().enumerate() {
			let rank = (idx + 1).try_conv::<u8>().expect("leaderboards hold at most 50 entries");

			sqlx::query(
				r"
				INSERT INTO
				  Leaderboards (stat, `rank`, user_id, value, matches)
				VALUES
				  (?, ?, ?, ?, ?)
				",
			)
			.bind(stat)
			.bind(rank)
			.bind(row.user_id)
			.bind(row.value)
			.bind(row.matches)
			.execute(txn.as_mut())
			.await?;
		}

		txn.commit().await?;

		let entries = rows.len() as u64;

		tracing::debug!(%stat, entries, "rebuilt leaderboard");

		Ok(entries)
	}

	/// Rebuilds the leaderboards for every stat category.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn rebuild_all(&self) -> Result<()>
	{
		for stat in StatKey::ALL {
			self.rebuild(stat).await?;
		}

		Ok(())
	}

	/// Fetches the current snapshot of a stat category's leaderboard.
	///
	/// A stat that has never been rebuilt yields an empty board.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_leaderboard(
		&self,
		req: FetchLeaderboardRequest,
	) -> Result<FetchLeaderboardResponse>
	{
		let entries = sqlx::query_as::<_, LeaderboardEntry>(
			r"
			SELECT
			  l.`rank`,
			  l.user_id player_id,
			  u.name player_name,
			  l.value,
			  l.matches
			FROM
			  Leaderboards l
			  JOIN Users u ON u.id = l.user_id
			WHERE
			  l.stat = ?
			ORDER BY
			  l.`rank` ASC
			",
		)
		.bind(req.stat)
		.fetch_all(&self.database)
		.await?;

		Ok(FetchLeaderboardResponse { stat: req.stat, entries })
	}
}
