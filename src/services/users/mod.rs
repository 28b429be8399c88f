//! A service for managing users.
//!
//! This also owns the *suspension gate*: a user with `suspended_until` in the
//! future is barred from roster-mutating actions. The gate is a pure
//! comparison re-evaluated on every call; nothing ever "lifts" a suspension.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use sqlx::{MySql, Pool, Transaction};
use tap::Conv;

use crate::database::SqlErrorExt;
use crate::notifications::{Dispatcher, Notification, NotificationKind};

mod queries;

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
pub use models::{
	FetchUserRequest,
	FetchUsersRequest,
	FetchUsersResponse,
	PlayerInfo,
	PlayerStats,
	RegisterUserRequest,
	RegisterUserResponse,
	Role,
	StatKey,
	SuspendUserRequest,
	SuspendUserResponse,
	User,
	UserID,
};

/// A service for managing users.
#[derive(Clone)]
pub struct UserService
{
	database: Pool<MySql>,
	dispatcher: Dispatcher,
}

impl fmt::Debug for UserService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("UserService").finish_non_exhaustive()
	}
}

impl UserService
{
	/// Create a new [`UserService`].
	pub fn new(database: Pool<MySql>, dispatcher: Dispatcher) -> Self
	{
		Self { database, dispatcher }
	}

	/// Registers a new user.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn register_user(&self, req: RegisterUserRequest) -> Result<RegisterUserResponse>
	{
		let user_id = sqlx::query(
			r"
			INSERT INTO
			  Users (name, email, role)
			VALUES
			  (?, ?, ?)
			",
		)
		.bind(&req.name)
		.bind(&req.email)
		.bind(req.role)
		.execute(&self.database)
		.await
		.map_err(|error| match error.is_duplicate_entry() {
			true => Error::EmailAlreadyRegistered,
			false => Error::Database(error),
		})?
		.last_insert_id()
		.conv::<UserID>();

		tracing::info!(target: "fives_api::audit_log", %user_id, "registered new user");

		Ok(RegisterUserResponse { user_id })
	}

	/// Fetches a single user.
	///
	/// This will return `Ok(None)` if the user was not found, but everything
	/// else went fine.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_user(&self, req: FetchUserRequest) -> Result<Option<User>>
	{
		let user = sqlx::query_as::<_, User>(&format!(
			r"
			{}
			WHERE
			  u.id = ?
			LIMIT
			  1
			",
			queries::SELECT,
		))
		.bind(req.user_id)
		.fetch_optional(&self.database)
		.await?;

		Ok(user)
	}

	/// Fetches potentially many users.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_users(&self, req: FetchUsersRequest) -> Result<FetchUsersResponse>
	{
		let users = sqlx::query_as::<_, User>(&format!(
			r"
			{}
			ORDER BY
			  u.id ASC
			LIMIT
			  ? OFFSET ?
			",
			queries::SELECT,
		))
		.bind(req.limit.unwrap_or(100))
		.bind(req.offset.unwrap_or(0))
		.fetch_all(&self.database)
		.await?;

		Ok(FetchUsersResponse { users })
	}

	/// Suspends a user for a given amount of days.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn suspend_user(&self, req: SuspendUserRequest) -> Result<SuspendUserResponse>
	{
		let mut txn = self.database.begin().await?;
		let now = Utc::now();

		let suspended_until = suspend_in_txn(&mut txn, req.user_id, req.days, &req.reason, now)
			.await?
			.ok_or(Error::UserDoesNotExist { user_id: req.user_id })?;

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			user_id = %req.user_id,
			admin_id = %req.admin_id,
			%suspended_until,
			reason = %req.reason,
			"suspended user",
		};

		self.dispatcher.dispatch(Notification {
			user_id: req.user_id,
			kind: NotificationKind::PlayerSuspended {
				until: suspended_until,
				reason: req.reason,
			},
		});

		Ok(SuspendUserResponse { suspended_until })
	}
}

/// Applies a suspension to a user as part of an ongoing transaction.
///
/// Returns `None` if the user does not exist. Used by the reservation service
/// (kicks) and the summary service (absentees) so that the suspension commits
/// or rolls back together with the rest of their work.
pub(crate) async fn suspend_in_txn(
	txn: &mut Transaction<'_, MySql>,
	user_id: UserID,
	days: u16,
	reason: &str,
	now: DateTime<Utc>,
) -> sqlx::Result<Option<DateTime<Utc>>>
{
	let suspended_until = now + Duration::hours(24 * i64::from(days));

	let query_result = sqlx::query(
		r"
		UPDATE
		  Users
		SET
		  suspended_until = ?,
		  suspension_reason = ?
		WHERE
		  id = ?
		",
	)
	.bind(suspended_until)
	.bind(reason)
	.bind(user_id)
	.execute(txn.as_mut())
	.await?;

	match query_result.rows_affected() {
		0 => Ok(None),
		_ => Ok(Some(suspended_until)),
	}
}
