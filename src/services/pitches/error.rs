//! The errors that can occur when interacting with this service.

use thiserror::Error;

use super::PitchID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the pitch service.
#[derive(Debug, Error)]
pub enum Error
{
	/// Anything below five players per side is not a format we book.
	#[error("pitches must support at least 5 players per side")]
	InvalidPlayersPerSide
	{
		/// The submitted capacity format.
		value: u8,
	},

	/// Pitch names are unique.
	#[error("a pitch with this name already exists")]
	NameAlreadyTaken,

	/// A request dedicated to a specific pitch was made, but the pitch could
	/// not be found.
	#[error("pitch does not exist")]
	PitchDoesNotExist
	{
		/// The pitch's ID.
		pitch_id: PitchID,
	},

	/// The pitch has finished games whose summaries have not been submitted
	/// yet. Deleting it would silently erase the stats those summaries owe
	/// their players.
	#[error("pitch has finished games awaiting summaries")]
	UnsummarizedGames
	{
		/// The pitch's ID.
		pitch_id: PitchID,
	},

	/// Something went wrong communicating with the database.
	#[error("something went wrong")]
	Database(#[from] sqlx::Error),
}
