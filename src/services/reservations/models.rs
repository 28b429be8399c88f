//! Types for modeling reservations and their rosters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::{database, FromRow, MySql, Row};
use thiserror::Error;

use crate::services::pitches::{PitchID, PitchInfo};
use crate::services::users::{PlayerInfo, UserID};

crate::macros::make_id! {
	/// An ID uniquely identifying a reservation.
	ReservationID as u64
}

/// A reservation of a pitch, including its roster.
///
/// Both roster sequences are insertion-ordered (first-come-first-served);
/// members are only ever removed outright, never reordered.
#[derive(Debug, Serialize)]
pub struct Reservation
{
	/// The reservation's ID.
	pub id: ReservationID,

	/// The pitch this reservation is for.
	pub pitch: PitchInfo,

	/// When the game starts.
	pub starts_on: DateTime<Utc>,

	/// When the game ends.
	pub ends_on: DateTime<Utc>,

	/// The price of the slot, in minor currency units.
	pub price: u32,

	/// The maximum amount of joined players.
	pub max_players: u8,

	/// The joined players, in join order.
	pub players: Vec<PlayerInfo>,

	/// The waitlisted players, in join order.
	pub wait_list: Vec<PlayerInfo>,

	/// When this reservation was created.
	pub created_on: DateTime<Utc>,
}

impl FromRow<'_, MySqlRow> for Reservation
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			id: row.try_get("id")?,
			pitch: PitchInfo::from_row(row)?,
			starts_on: row.try_get("starts_on")?,
			ends_on: row.try_get("ends_on")?,
			price: row.try_get("price")?,
			max_players: row.try_get("max_players")?,
			players: Vec::new(),
			wait_list: Vec::new(),
			created_on: row.try_get("created_on")?,
		})
	}
}

/// A single roster membership row.
#[derive(Debug)]
pub(super) struct RosterRow
{
	/// The reservation this row belongs to.
	pub reservation_id: ReservationID,

	/// The member.
	pub player: PlayerInfo,

	/// Which of the two roster sets the member is in.
	pub status: RosterStatus,
}

impl FromRow<'_, MySqlRow> for RosterRow
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			reservation_id: row.try_get("reservation_id")?,
			player: PlayerInfo::from_row(row)?,
			status: row.try_get("status")?,
		})
	}
}

/// The two (disjoint) roster sets of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum RosterStatus
{
	Joined,
	Waitlisted,
}

impl RosterStatus
{
	/// Stringified version that is also expected when parsing a string into a
	/// [`RosterStatus`].
	pub const fn as_str(&self) -> &'static str
	{
		match self {
			RosterStatus::Joined => "joined",
			RosterStatus::Waitlisted => "waitlisted",
		}
	}
}

/// An error for parsing roster statuses.
#[derive(Debug, Error)]
#[error("`{0}` is not a valid roster status")]
pub struct InvalidRosterStatus(String);

impl FromStr for RosterStatus
{
	type Err = InvalidRosterStatus;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		match value {
			"joined" => Ok(Self::Joined),
			"waitlisted" => Ok(Self::Waitlisted),
			invalid => Err(InvalidRosterStatus(invalid.to_owned())),
		}
	}
}

impl sqlx::Type<MySql> for RosterStatus
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

impl<'q> sqlx::Encode<'q, MySql> for RosterStatus
{
	fn encode_by_ref(
		&self,
		buf: &mut <MySql as database::HasArguments<'q>>::ArgumentBuffer,
	) -> sqlx::encode::IsNull
	{
		<&'q str as sqlx::Encode<'q, MySql>>::encode_by_ref(&self.as_str(), buf)
	}
}

impl<'q> sqlx::Decode<'q, MySql> for RosterStatus
{
	fn decode(
		value: <MySql as database::HasValueRef<'q>>::ValueRef,
	) -> Result<Self, sqlx::error::BoxDynError>
	{
		Ok(<&'q str as sqlx::Decode<'q, MySql>>::decode(value)
			.map(|value| value.parse::<Self>())??)
	}
}

/// Request payload for creating a new reservation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CreateReservationRequest
{
	/// The pitch to reserve.
	pub pitch_id: PitchID,

	/// When the game starts.
	pub starts_on: DateTime<Utc>,

	/// When the game ends.
	pub ends_on: DateTime<Utc>,

	/// The price of the slot, in minor currency units.
	pub price: u32,

	/// The maximum amount of joined players.
	pub max_players: u8,

	/// The admin creating the reservation.
	pub admin_id: UserID,
}

/// Response payload for creating a new reservation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreateReservationResponse
{
	/// The new reservation's ID.
	pub reservation_id: ReservationID,
}

/// Request payload for joining a reservation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JoinReservationRequest
{
	/// The reservation to join.
	pub reservation_id: ReservationID,

	/// The joining user.
	pub user_id: UserID,
}

/// Response payload for joining a reservation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JoinReservationResponse
{
	/// Which roster set the user ended up in.
	///
	/// [`RosterStatus::Waitlisted`] means the joined set was full.
	pub placement: RosterStatus,
}

/// Request payload for leaving a reservation's joined set.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LeaveReservationRequest
{
	/// The reservation to leave.
	pub reservation_id: ReservationID,

	/// The leaving user.
	pub user_id: UserID,
}

/// Request payload for leaving a reservation's waitlist.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LeaveWaitlistRequest
{
	/// The reservation whose waitlist to leave.
	pub reservation_id: ReservationID,

	/// The leaving user.
	pub user_id: UserID,
}

/// Request payload for kicking a player off a roster.
#[derive(Debug, Clone, Deserialize)]
pub struct KickPlayerRequest
{
	/// The reservation to kick the player from.
	pub reservation_id: ReservationID,

	/// The player to kick.
	pub user_id: UserID,

	/// The reason for the kick.
	pub reason: String,

	/// For how many days the player should be suspended.
	pub suspension_days: u16,

	/// The admin issuing the kick.
	pub admin_id: UserID,
}

/// Response payload for kicking a player off a roster.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KickPlayerResponse
{
	/// When the accompanying suspension expires.
	pub suspended_until: DateTime<Utc>,
}

/// Request payload for deleting a reservation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeleteReservationRequest
{
	/// The reservation to delete.
	pub reservation_id: ReservationID,

	/// The admin deleting the reservation.
	pub admin_id: UserID,
}

/// Request payload for fetching a reservation.
#[derive(Debug)]
pub struct FetchReservationRequest
{
	/// The ID of the reservation you want to fetch.
	pub reservation_id: ReservationID,
}

/// Request payload for fetching many reservations.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct FetchReservationsRequest
{
	/// Only return reservations on this pitch.
	pub pitch_id: Option<PitchID>,

	/// The maximum amount of reservations to return.
	pub limit: Option<u64>,

	/// How many reservations to skip.
	pub offset: Option<u64>,
}

/// Response payload for fetching many reservations.
#[derive(Debug, Serialize)]
pub struct FetchReservationsResponse
{
	/// The reservations, ordered by kick-off.
	pub reservations: Vec<Reservation>,
}
