//! Types for modeling game summaries.

use serde::{Deserialize, Serialize};

use crate::services::reservations::ReservationID;
use crate::services::users::UserID;

/// A single player's performance in a finished game.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlayerOutcome
{
	/// The player this outcome belongs to.
	pub user_id: UserID,

	/// Whether the player actually played.
	pub played: bool,

	/// Whether the player's team won.
	pub won: bool,

	/// Goals scored.
	pub goals: u32,

	/// Assists given.
	pub assists: u32,

	/// Interceptions made.
	pub interceptions: u32,

	/// Whether the player's team did not concede.
	pub clean_sheet: bool,
}

/// A player who committed to the game but did not show up.
#[derive(Debug, Clone, Deserialize)]
pub struct Absence
{
	/// The absent player.
	pub user_id: UserID,

	/// The reason to record for the suspension.
	pub reason: String,

	/// For how many days the player should be suspended.
	pub suspension_days: u16,
}

/// Request payload for submitting a game summary.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitSummaryRequest
{
	/// The finished reservation this summary is for.
	pub reservation_id: ReservationID,

	/// The player voted MVP (if any).
	pub mvp: Option<UserID>,

	/// The per-player outcomes.
	pub outcomes: Vec<PlayerOutcome>,

	/// The players who did not show up.
	pub absences: Vec<Absence>,

	/// The admin submitting the summary.
	pub admin_id: UserID,
}

/// Response payload for submitting a game summary.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SubmitSummaryResponse
{
	/// How many players had their stats updated.
	pub updated_players: u64,

	/// How many badges were newly earned or upgraded as a result.
	pub awarded_badges: u64,
}
