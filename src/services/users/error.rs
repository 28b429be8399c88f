//! The errors that can occur when interacting with this service.

use thiserror::Error;

use super::UserID;

/// Type alias with a default `Err` type of [`Error`].
///
/// [`Error`]: enum@Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The errors that can occur when interacting with the user service.
#[derive(Debug, Error)]
pub enum Error
{
	/// A request dedicated to a specific user was made, but the user could
	/// not be found.
	#[error("user does not exist")]
	UserDoesNotExist
	{
		/// The user's ID.
		user_id: UserID,
	},

	/// Every email address can only ever belong to one account.
	#[error("email address is already registered")]
	EmailAlreadyRegistered,

	/// Something went wrong communicating with the database.
	#[error("something went wrong")]
	Database(#[from] sqlx::Error),
}
