//! Types for modeling pitches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, Row};

use crate::services::users::UserID;

crate::macros::make_id! {
	/// An ID uniquely identifying a pitch.
	PitchID as u16
}

crate::bitflags::bitflags! {
	/// The services available at a pitch.
	pub PitchFlags as u16 {
		/// The pitch has floodlights and can be played after dark.
		LIGHTING = { 1 << 0, "lighting" };

		/// The pitch is covered / indoor.
		INDOOR = { 1 << 1, "indoor" };

		/// Showers are available on site.
		SHOWERS = { 1 << 2, "showers" };

		/// Parking is available on site.
		PARKING = { 1 << 3, "parking" };

		/// Bibs and balls can be rented on site.
		EQUIPMENT_RENTAL = { 1 << 4, "equipment_rental" };
	}
}

/// A bookable pitch.
///
/// Pitches are immutable once created; the only mutation is deletion, which
/// force-cancels every future reservation on them.
#[derive(Debug, Clone, Serialize)]
pub struct Pitch
{
	/// The pitch's ID.
	pub id: PitchID,

	/// The pitch's name.
	pub name: String,

	/// The capacity format (e.g. 5 for five-a-side).
	pub players_per_side: u8,

	/// The services available at this pitch.
	pub flags: PitchFlags,

	/// When this pitch was registered.
	pub created_on: DateTime<Utc>,
}

impl FromRow<'_, MySqlRow> for Pitch
{
	fn from_row(row: &MySqlRow) -> sqlx::Result<Self>
	{
		Ok(Self {
			id: row.try_get("id")?,
			name: row.try_get("name")?,
			players_per_side: row.try_get("players_per_side")?,
			flags: row.try_get("flags")?,
			created_on: row.try_get("created_on")?,
		})
	}
}

/// A minimal representation of a pitch, for embedding into other responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PitchInfo
{
	/// The pitch's ID.
	#[sqlx(rename = "pitch_id")]
	pub id: PitchID,

	/// The pitch's name.
	#[sqlx(rename = "pitch_name")]
	pub name: String,
}

/// Request payload for registering a new pitch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePitchRequest
{
	/// The pitch's name.
	pub name: String,

	/// The capacity format (e.g. 5 for five-a-side).
	pub players_per_side: u8,

	/// The services available at this pitch.
	pub flags: PitchFlags,

	/// The admin registering the pitch.
	pub admin_id: UserID,
}

/// Response payload for registering a new pitch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreatePitchResponse
{
	/// The new pitch's ID.
	pub pitch_id: PitchID,
}

/// Request payload for fetching a pitch.
#[derive(Debug)]
pub struct FetchPitchRequest
{
	/// The ID of the pitch you want to fetch.
	pub pitch_id: PitchID,
}

/// Request payload for fetching many pitches.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct FetchPitchesRequest
{
	/// The maximum amount of pitches to return.
	pub limit: Option<u64>,

	/// How many pitches to skip.
	pub offset: Option<u64>,
}

/// Response payload for fetching many pitches.
#[derive(Debug, Serialize)]
pub struct FetchPitchesResponse
{
	/// The pitches.
	pub pitches: Vec<Pitch>,
}

/// Request payload for deleting a pitch.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeletePitchRequest
{
	/// The pitch to delete.
	pub pitch_id: PitchID,

	/// The admin deleting the pitch.
	pub admin_id: UserID,
}

/// Response payload for deleting a pitch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeletePitchResponse
{
	/// How many future reservations were force-cancelled along with the
	/// pitch.
	pub cancelled_reservations: u64,
}
