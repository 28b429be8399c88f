//! Types for modeling users and their cumulative stats.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::{database, FromRow, MySql, Row};
use thiserror::Error;

crate::macros::make_id! {
	/// An ID uniquely identifying a user.
	UserID as u64
}

/// A user of the platform.
#[derive(Debug, Serialize)]
pub struct User
{
	/// The user's ID.
	pub id: UserID,

	/// The user's display name.
	pub name: String,

	/// The user's email address.
	pub email: String,

	/// The user's role.
	pub role: Role,

	/// When the user's current suspension expires (if any).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suspended_until: Option<DateTime<Utc>>,

	/// Why the user was suspended.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suspension_reason: Option<String>,

	/// The user's cumulative stats.
	pub stats: PlayerStats,

	/// When this user signed up.
	pub created_on: DateTime<Utc>,
}

impl User
{
	/// Whether the user is suspended at `now`.
	///
	/// Suspensions are never actively lifted; they simply expire by
	/// comparison, so this is re-evaluated on every roster-mutating call.
	pub fn is_suspended(&self, now: DateTime<Utc>) -> bool
	{
		self.suspended_until.is_some_and(|until| until > now)
	}
}

impl FromRow<'_, MySqlRow> for User
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			id: row.try_get("id")?,
			name: row.try_get("name")?,
			email: row.try_get("email")?,
			role: row.try_get("role")?,
			suspended_until: row.try_get("suspended_until")?,
			suspension_reason: row.try_get("suspension_reason")?,
			stats: PlayerStats::from_row(row)?,
			created_on: row.try_get("created_on")?,
		})
	}
}

/// A minimal representation of a user, for embedding into other responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PlayerInfo
{
	/// The user's ID.
	#[sqlx(rename = "player_id")]
	pub id: UserID,

	/// The user's display name.
	#[sqlx(rename = "player_name")]
	pub name: String,
}

/// User roles.
///
/// Authorization happens upstream; the services only use this for audit
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Role
{
	Player,
	Admin,
}

impl Role
{
	/// Stringified version that is also expected when parsing a string into a
	/// [`Role`].
	pub const fn as_str(&self) -> &'static str
	{
		match self {
			Role::Player => "player",
			Role::Admin => "admin",
		}
	}
}

/// An error for parsing roles.
#[derive(Debug, Error)]
#[error("`{0}` is not a valid role")]
pub struct InvalidRole(String);

impl FromStr for Role
{
	type Err = InvalidRole;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		match value {
			"player" => Ok(Self::Player),
			"admin" => Ok(Self::Admin),
			invalid => Err(InvalidRole(invalid.to_owned())),
		}
	}
}

impl sqlx::Type<MySql> for Role
{
	fn type_info() -> <MySql as sqlx::Database>::TypeInfo
	{
		<str as sqlx::Type<MySql>>::type_info()
	}

	fn compatible(ty: &<MySql as sqlx::Database>::TypeInfo) -> bool
	{
		<str as sqlx::Type<MySql>>::compatible(ty)
	}
}

impl<'q> sqlx::Encode<'q, MySql> for Role
{
	fn encode_by_ref(
		&self,
		buf: &mut <MySql as database::HasArguments<'q>>::ArgumentBuffer,
	) -> sqlx::encode::IsNull
	{
		<&'q str as sqlx::Encode<'q, MySql>>::encode_by_ref(&self.as_str(), buf)
	}
}

impl<'q> sqlx::Decode<'q, MySql> for Role
{
	fn decode(
		value: <MySql as database::HasValueRef<'q>>::ValueRef,
	) -> Result<Self, sqlx::error::BoxDynError>
	{
		Ok(<&'q str as sqlx::Decode<'q, MySql>>::decode(value)
			.map(|value| value.parse::<Self>())??)
	}
}

/// The stat categories tracked per player.
///
/// This is a closed set; each variant maps to a dedicated column on the
/// `Users` table, so a malformed stat key cannot silently no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum StatKey
{
	Matches,
	Wins,
	Mvps,
	Goals,
	Assists,
	Interceptions,
	CleanSheets,
}

impl StatKey
{
	/// Every stat category, in leaderboard display order.
	pub const ALL: [Self; 7] = [
		Self::Matches,
		Self::Wins,
		Self::Mvps,
		Self::Goals,
		Self::Assists,
		Self::Interceptions,
		Self::CleanSheets,
	];

	/// The `Users` column holding this stat.
	///
	/// Also the stringified version expected when parsing a [`StatKey`].
	pub const fn column(&self) -> &'static str
	{
		match self {
			StatKey::Matches => "matches",
			StatKey::Wins => "wins",
			StatKey::Mvps => "mvps",
			StatKey::Goals => "goals",
			StatKey::Assists => "assists",
			StatKey::Interceptions => "interceptions",
			StatKey::CleanSheets => "clean_sheets",
		}
	}
}

impl std::fmt::Display for StatKey
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
	{
		f.write_str(self.column())
	}
}

/// An error for parsing stat keys.
#[derive(Debug, Error)]
#[error("`{0}` is not a valid stat key")]
pub struct InvalidStatKey(String);

impl FromStr for StatKey
{
	type Err = InvalidStatKey;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		match value {
			"matches" => Ok(Self::Matches),
			"wins" => Ok(Self::Wins),
			"mvps" => Ok(Self::Mvps),
			"goals" => Ok(Self::Goals),
			"assists" => Ok(Self::Assists),
			"interceptions" => Ok(Self::Interceptions),
			"clean_sheets" => Ok(Self::CleanSheets),
			invalid => Err(InvalidStatKey(invalid.to_owned())),
		}
	}
}

impl sqlx::Type<MySql> for StatKey
{
	fn type_info() -> <MySql as sqlx::Database>::TypeInfo
	{
		<str as sqlx::Type<MySql>>::type_info()
	}
}

impl<'q> sqlx::Encode<'q, MySql> for StatKey
{
	fn encode_by_ref(
		&self,
		buf: &mut <MySql as database::HasArguments<'q>>::ArgumentBuffer,
	) -> sqlx::encode::IsNull
	{
		<&'q str as sqlx::Encode<'q, MySql>>::encode_by_ref(&self.column(), buf)
	}
}

impl<'q> sqlx::Decode<'q, MySql> for StatKey
{
	fn decode(
		value: <MySql as database::HasValueRef<'q>>::ValueRef,
	) -> Result<Self, sqlx::error::BoxDynError>
	{
		Ok(<&'q str as sqlx::Decode<'q, MySql>>::decode(value)
			.map(|value| value.parse::<Self>())??)
	}
}

/// A player's cumulative stats, accrued from finalized game summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats
{
	/// Games played.
	pub matches: u32,

	/// Games won.
	pub wins: u32,

	/// Times voted MVP.
	pub mvps: u32,

	/// Goals scored.
	pub goals: u32,

	/// Assists given.
	pub assists: u32,

	/// Interceptions made.
	pub interceptions: u32,

	/// Games finished without conceding.
	pub clean_sheets: u32,
}

impl PlayerStats
{
	/// The value of a single stat category.
	pub const fn get(&self, key: StatKey) -> u32
	{
		match key {
			StatKey::Matches => self.matches,
			StatKey::Wins => self.wins,
			StatKey::Mvps => self.mvps,
			StatKey::Goals => self.goals,
			StatKey::Assists => self.assists,
			StatKey::Interceptions => self.interceptions,
			StatKey::CleanSheets => self.clean_sheets,
		}
	}
}

impl FromRow<'_, MySqlRow> for PlayerStats
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			matches: row.try_get("matches")?,
			wins: row.try_get("wins")?,
			mvps: row.try_get("mvps")?,
			goals: row.try_get("goals")?,
			assists: row.try_get("assists")?,
			interceptions: row.try_get("interceptions")?,
			clean_sheets: row.try_get("clean_sheets")?,
		})
	}
}

/// Request payload for registering a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest
{
	/// The user's display name.
	pub name: String,

	/// The user's email address.
	pub email: String,

	/// The user's role.
	pub role: Role,
}

/// Response payload for registering a new user.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RegisterUserResponse
{
	/// The new user's ID.
	pub user_id: UserID,
}

/// Request payload for fetching a user.
#[derive(Debug)]
pub struct FetchUserRequest
{
	/// The ID of the user you want to fetch.
	pub user_id: UserID,
}

/// Request payload for fetching many users.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct FetchUsersRequest
{
	/// The maximum amount of users to return.
	pub limit: Option<u64>,

	/// How many users to skip.
	pub offset: Option<u64>,
}

/// Response payload for fetching many users.
#[derive(Debug, Serialize)]
pub struct FetchUsersResponse
{
	/// The users.
	pub users: Vec<User>,
}

/// Request payload for suspending a user.
#[derive(Debug, Clone, Deserialize)]
pub struct SuspendUserRequest
{
	/// The user to suspend.
	pub user_id: UserID,

	/// For how many days the user should be suspended.
	pub days: u16,

	/// The reason for the suspension.
	pub reason: String,

	/// The admin issuing the suspension.
	pub admin_id: UserID,
}

/// Response payload for suspending a user.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SuspendUserResponse
{
	/// When the suspension expires.
	pub suspended_until: DateTime<Utc>,
}
