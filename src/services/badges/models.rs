//! Types for modeling badges.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::services::users::UserID;

/// A badge a user has earned.
///
/// Badges are keyed by `(user, name)`; earning a higher tier of the same
/// badge raises `level` in place rather than adding a second row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Badge
{
	/// The badge's name.
	#[sqlx(rename = "badge")]
	pub name: String,

	/// A human-readable description.
	pub description: String,

	/// The highest tier reached so far (1-based).
	pub level: u8,

	/// When the badge was first earned.
	///
	/// Level upgrades do not touch this.
	pub earned_on: DateTime<Utc>,
}

/// Request payload for fetching a user's badges.
#[derive(Debug)]
pub struct FetchBadgesRequest
{
	/// The ID of the user whose badges you want to fetch.
	pub user_id: UserID,
}

/// Response payload for fetching a user's badges.
#[derive(Debug, Serialize)]
pub struct FetchBadgesResponse
{
	/// The badges, in the order they were first earned.
	pub badges: Vec<Badge>,
}

/// Request payload for re-evaluating a user's badges.
#[derive(Debug, Clone, Copy)]
pub struct EvaluateUserRequest
{
	/// The user whose stats to evaluate.
	pub user_id: UserID,
}

/// Response payload for re-evaluating a user's badges.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvaluateUserResponse
{
	/// How many badges were newly earned or upgraded.
	pub awarded_badges: u64,
}
