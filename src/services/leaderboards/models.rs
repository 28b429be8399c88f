//! Types for modeling leaderboards.

use serde::Serialize;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, Row};

use crate::services::users::{PlayerInfo, StatKey};

/// A single row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry
{
	/// The entry's rank (1-based).
	pub rank: u8,

	/// The ranked player.
	pub player: PlayerInfo,

	/// The player's value in the leaderboard's stat category.
	pub value: u32,

	/// How many games the player has played.
	///
	/// Ties on `value` are broken in favor of fewer games.
	pub matches: u32,
}

impl FromRow<'_, MySqlRow> for LeaderboardEntry
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			rank: row.try_get("rank")?,
			player: PlayerInfo::from_row(row)?,
			value: row.try_get("value")?,
			matches: row.try_get("matches")?,
		})
	}
}

/// Request payload for fetching a leaderboard.
#[derive(Debug, Clone, Copy)]
pub struct FetchLeaderboardRequest
{
	/// The stat category whose leaderboard you want to fetch.
	pub stat: StatKey,
}

/// Response payload for fetching a leaderboard.
#[derive(Debug, Serialize)]
pub struct FetchLeaderboardResponse
{
	/// The stat category this leaderboard ranks.
	pub stat: StatKey,

	/// The entries, best first.
	pub entries: Vec<LeaderboardEntry>,
}
