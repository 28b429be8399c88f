//! The errors that can occur when interacting with this service.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::services::reservations::ReservationID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the summary service.
#[derive(Debug, Error)]
pub enum Error
{
	/// A summary was submitted for a reservation that could not be found.
	///
	/// Reservations are deleted when their summary is finalized, so this is
	/// also what a double submission runs into.
	#[error("reservation does not exist")]
	ReservationDoesNotExist
	{
		/// The reservation's ID.
		reservation_id: ReservationID,
	},

	/// Summaries can only be submitted once the game is over.
	#[error("game has not ended yet")]
	GameNotOver
	{
		/// When the game ends.
		ends_on: DateTime<Utc>,
	},

	/// Something went wrong communicating with the database.
	#[error("something went wrong")]
	Database(#[from] sqlx::Error),
}
