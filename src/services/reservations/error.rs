//! The errors that can occur when interacting with this service.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ReservationID;
use crate::services::pitches::PitchID;
use crate::services::users::UserID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the reservation service.
#[derive(Debug, Error)]
pub enum Error
{
	/// A reservation was submitted for a pitch that could not be found.
	#[error("pitch does not exist")]
	PitchDoesNotExist
	{
		/// The pitch's ID.
		pitch_id: PitchID,
	},

	/// A request dedicated to a specific reservation was made, but the
	/// reservation could not be found.
	#[error("reservation does not exist")]
	ReservationDoesNotExist
	{
		/// The reservation's ID.
		reservation_id: ReservationID,
	},

	/// A roster operation referenced a user that could not be found.
	#[error("user does not exist")]
	UserDoesNotExist
	{
		/// The user's ID.
		user_id: UserID,
	},

	/// A reservation must end after it starts.
	#[error("reservation must end after it starts")]
	InvalidWindow,

	/// Reservations are capped at 2 hours.
	#[error("reservations cannot be longer than 2 hours")]
	DurationTooLong,

	/// Reservations must be created at least 5 days before kick-off.
	#[error("reservations must be created at least 5 days in advance")]
	InsufficientNotice,

	/// A roster must have room for at least one player.
	#[error("reservation must allow at least one player")]
	InvalidMaxPlayers,

	/// The requested window overlaps another reservation on the same pitch.
	#[error("pitch is already booked during this window")]
	OverlappingReservation,

	/// Suspended users cannot mutate rosters.
	#[error("user is suspended")]
	UserSuspended
	{
		/// When the suspension expires.
		until: DateTime<Utc>,
	},

	/// A user can appear at most once per roster, joined or waitlisted.
	#[error("user is already on this roster")]
	AlreadyInRoster,

	/// The targeted user is not a joined member of the reservation.
	#[error("user has not joined this reservation")]
	NotJoined,

	/// The targeted user is not on the reservation's waitlist.
	#[error("user is not on the waitlist")]
	NotWaitlisted,

	/// The user is already committed to an overlapping reservation.
	#[error("user has already joined an overlapping reservation")]
	OverlappingCommitment
	{
		/// The conflicting reservation.
		reservation_id: ReservationID,
	},

	/// Joining opens 3 days before kick-off.
	#[error("the join window for this reservation is not open yet")]
	JoinWindowNotOpen
	{
		/// When joining becomes possible.
		opens_on: DateTime<Utc>,
	},

	/// The action is only possible before kick-off.
	#[error("reservation has already started")]
	ReservationStarted,

	/// Leaving closes 6 hours before kick-off.
	#[error("too close to kick-off to leave")]
	TooLateToLeave
	{
		/// The last instant at which leaving was possible.
		cutoff: DateTime<Utc>,
	},

	/// Something went wrong communicating with the database.
	#[error("something went wrong")]
	Database(#[from] sqlx::Error),
}
