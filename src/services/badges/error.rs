//! The errors that can occur when interacting with this service.

use thiserror::Error;

use crate::services::users::UserID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the badge service.
#[derive(Debug, Error)]
pub enum Error
{
	/// A badge evaluation referenced a user that could not be found.
	#[error("user does not exist")]
	UserDoesNotExist
	{
		/// The user's ID.
		user_id: UserID,
	},

	/// Something went wrong communicating with the database.
	#[error("something went wrong")]
	Database(#[from] sqlx::Error),
}
