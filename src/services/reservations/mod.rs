//! A service for managing reservations and their rosters.
//!
//! Every roster-mutating operation runs in its own transaction and starts by
//! locking the reservation row (`SELECT ... FOR UPDATE`). Competing calls for
//! the same reservation serialize on that lock, so a capacity or conflict
//! check can never be invalidated between check and act; operations on
//! different reservations do not contend at all.

use std::fmt;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::{FromRow, MySql, Pool, Transaction};
use tap::Conv;

use crate::notifications::{Dispatcher, Notification, NotificationKind};
use crate::services::pitches::PitchID;
use crate::services::users;
use crate::services::users::UserID;
use crate::time::{policy, TimeWindow};

mod queries;

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
use models::RosterRow;
pub use models::{
	CreateReservationRequest,
	CreateReservationResponse,
	DeleteReservationRequest,
	FetchReservationRequest,
	FetchReservationsRequest,
	FetchReservationsResponse,
	JoinReservationRequest,
	JoinReservationResponse,
	KickPlayerRequest,
	KickPlayerResponse,
	LeaveReservationRequest,
	LeaveWaitlistRequest,
	Reservation,
	ReservationID,
	RosterStatus,
};

/// A service for managing reservations and their rosters.
#[derive(Clone)]
pub struct ReservationService
{
	database: Pool<MySql>,
	dispatcher: Dispatcher,
}

impl fmt::Debug for ReservationService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("ReservationService").finish_non_exhaustive()
	}
}

impl ReservationService
{
	/// Create a new [`ReservationService`].
	pub fn new(database: Pool<MySql>, dispatcher: Dispatcher) -> Self
	{
		Self { database, dispatcher }
	}

	/// Creates a new reservation.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn create_reservation(
		&self,
		req: CreateReservationRequest,
	) -> Result<CreateReservationResponse>
	{
		let window = TimeWindow::new(req.starts_on, req.ends_on);
		let now = Utc::now();

		if !window.is_ordered() {
			return Err(Error::InvalidWindow);
		}

		if window.duration() > policy::max_duration() {
			return Err(Error::DurationTooLong);
		}

		if req.starts_on - now < policy::creation_notice() {
			return Err(Error::InsufficientNotice);
		}

		if req.max_players == 0 {
			return Err(Error::InvalidMaxPlayers);
		}

		let mut txn = self.database.begin().await?;

		// Locking the pitch row serializes concurrent creations on the same
		// pitch, keeping the overlap check below atomic with the insert.
		sqlx::query_scalar::<_, PitchID>(
			r"
			SELECT
			  id
			FROM
			  Pitches
			WHERE
			  id = ?
			FOR UPDATE
			",
		)
		.bind(req.pitch_id)
		.fetch_optional(txn.as_mut())
		.await?
		.ok_or(Error::PitchDoesNotExist { pitch_id: req.pitch_id })?;

		if pitch_is_booked(&mut txn, req.pitch_id, window).await? {
			return Err(Error::OverlappingReservation);
		}

		let reservation_id = sqlx::query(
			r"
			INSERT INTO
			  Reservations (pitch_id, starts_on, ends_on, price, max_players)
			VALUES
			  (?, ?, ?, ?, ?)
			",
		)
		.bind(req.pitch_id)
		.bind(req.starts_on)
		.bind(req.ends_on)
		.bind(req.price)
		.bind(req.max_players)
		.execute(txn.as_mut())
		.await?
		.last_insert_id()
		.conv::<ReservationID>();

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			%reservation_id,
			pitch_id = %req.pitch_id,
			starts_on = %req.starts_on,
			admin_id = %req.admin_id,
			"created reservation",
		};

		Ok(CreateReservationResponse { reservation_id })
	}

	/// Joins a reservation.
	///
	/// If the joined set is full, the user is appended to the waitlist
	/// instead; the response says which of the two happened.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn join(&self, req: JoinReservationRequest) -> Result<JoinReservationResponse>
	{
		let mut txn = self.database.begin().await?;
		let reservation = lock_reservation(&mut txn, req.reservation_id).await?;
		let now = Utc::now();

		if reservation.starts_on <= now {
			return Err(Error::ReservationStarted);
		}

		if reservation.starts_on - now > policy::join_window() {
			return Err(Error::JoinWindowNotOpen {
				opens_on: reservation.starts_on - policy::join_window(),
			});
		}

		ensure_not_suspended(&mut txn, req.user_id, now).await?;

		if roster_status(&mut txn, req.reservation_id, req.user_id)
			.await?
			.is_some()
		{
			return Err(Error::AlreadyInRoster);
		}

		let window = reservation.window();

		if let Some(conflicting) =
			overlapping_commitment(&mut txn, req.user_id, window, req.reservation_id).await?
		{
			return Err(Error::OverlappingCommitment { reservation_id: conflicting });
		}

		let joined = joined_count(&mut txn, req.reservation_id).await?;
		let placement = if joined < u64::from(reservation.max_players) {
			RosterStatus::Joined
		} else {
			RosterStatus::Waitlisted
		};

		sqlx::query(
			r"
			INSERT INTO
			  ReservationPlayers (reservation_id, user_id, status)
			VALUES
			  (?, ?, ?)
			",
		)
		.bind(req.reservation_id)
		.bind(req.user_id)
		.bind(placement)
		.execute(txn.as_mut())
		.await?;

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			reservation_id = %req.reservation_id,
			user_id = %req.user_id,
			?placement,
			"user joined reservation",
		};

		Ok(JoinReservationResponse { placement })
	}

	/// Leaves a reservation's joined set.
	///
	/// If that frees up a slot and the waitlist is non-empty, every
	/// waitlisted user is notified. Nobody is promoted automatically; a
	/// waitlisted user has to re-join explicitly.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn leave(&self, req: LeaveReservationRequest) -> Result<()>
	{
		let mut txn = self.database.begin().await?;
		let reservation = lock_reservation(&mut txn, req.reservation_id).await?;
		let now = Utc::now();

		match roster_status(&mut txn, req.reservation_id, req.user_id).await? {
			Some(RosterStatus::Joined) => {}
			Some(RosterStatus::Waitlisted) | None => return Err(Error::NotJoined),
		}

		let cutoff = reservation.starts_on - policy::leave_cutoff();

		if now > cutoff {
			return Err(Error::TooLateToLeave { cutoff });
		}

		if !remove_member(&mut txn, req.reservation_id, req.user_id).await? {
			return Err(Error::NotJoined);
		}

		let waitlisted =
			roster_user_ids(&mut txn, req.reservation_id, RosterStatus::Waitlisted).await?;

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			reservation_id = %req.reservation_id,
			user_id = %req.user_id,
			"user left reservation",
		};

		self.notify_waitlist(&reservation, &waitlisted);

		Ok(())
	}

	/// Leaves a reservation's waitlist.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn leave_waitlist(&self, req: LeaveWaitlistRequest) -> Result<()>
	{
		let mut txn = self.database.begin().await?;

		lock_reservation(&mut txn, req.reservation_id).await?;

		match roster_status(&mut txn, req.reservation_id, req.user_id).await? {
			Some(RosterStatus::Waitlisted) => {}
			Some(RosterStatus::Joined) | None => return Err(Error::NotWaitlisted),
		}

		if !remove_member(&mut txn, req.reservation_id, req.user_id).await? {
			return Err(Error::NotWaitlisted);
		}

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			reservation_id = %req.reservation_id,
			user_id = %req.user_id,
			"user left waitlist",
		};

		Ok(())
	}

	/// Kicks a player off a reservation's roster and suspends them.
	///
	/// The freed slot triggers the same waitlist notifications as a regular
	/// leave.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn kick(&self, req: KickPlayerRequest) -> Result<KickPlayerResponse>
	{
		let mut txn = self.database.begin().await?;
		let reservation = lock_reservation(&mut txn, req.reservation_id).await?;
		let now = Utc::now();

		if reservation.starts_on <= now {
			return Err(Error::ReservationStarted);
		}

		match roster_status(&mut txn, req.reservation_id, req.user_id).await? {
			Some(RosterStatus::Joined) => {}
			Some(RosterStatus::Waitlisted) | None => return Err(Error::NotJoined),
		}

		if !remove_member(&mut txn, req.reservation_id, req.user_id).await? {
			return Err(Error::NotJoined);
		}

		let suspended_until =
			users::suspend_in_txn(&mut txn, req.user_id, req.suspension_days, &req.reason, now)
				.await?
				.ok_or(Error::UserDoesNotExist { user_id: req.user_id })?;

		let waitlisted =
			roster_user_ids(&mut txn, req.reservation_id, RosterStatus::Waitlisted).await?;

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			reservation_id = %req.reservation_id,
			user_id = %req.user_id,
			admin_id = %req.admin_id,
			reason = %req.reason,
			%suspended_until,
			"kicked player",
		};

		self.dispatcher.dispatch(Notification {
			user_id: req.user_id,
			kind: NotificationKind::PlayerKicked {
				reservation_id: req.reservation_id,
				reason: req.reason,
				suspended_until,
			},
		});

		self.notify_waitlist(&reservation, &waitlisted);

		Ok(KickPlayerResponse { suspended_until })
	}

	/// Deletes a reservation.
	///
	/// Every joined player is notified that their booking is cancelled.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn delete_reservation(&self, req: DeleteReservationRequest) -> Result<()>
	{
		let mut txn = self.database.begin().await?;
		let reservation = lock_reservation(&mut txn, req.reservation_id).await?;

		if reservation.starts_on <= Utc::now() {
			return Err(Error::ReservationStarted);
		}

		let joined = roster_user_ids(&mut txn, req.reservation_id, RosterStatus::Joined).await?;

		sqlx::query(
			r"
			DELETE FROM
			  Reservations
			WHERE
			  id = ?
			",
		)
		.bind(req.reservation_id)
		.execute(txn.as_mut())
		.await?;

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			reservation_id = %req.reservation_id,
			admin_id = %req.admin_id,
			"deleted reservation",
		};

		for user_id in joined {
			self.dispatcher.dispatch(Notification {
				user_id,
				kind: NotificationKind::ReservationCancelled {
					reservation_id: req.reservation_id,
					starts_on: reservation.starts_on,
				},
			});
		}

		Ok(())
	}

	/// Fetches a single reservation, including its roster.
	///
	/// This will return `Ok(None)` if the reservation was not found, but
	/// everything else went fine.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_reservation(
		&self,
		req: FetchReservationRequest,
	) -> Result<Option<Reservation>>
	{
		let Some(mut reservation) = sqlx::query_as::<_, Reservation>(&format!(
			r"
			{}
			WHERE
			  r.id = ?
			LIMIT
			  1
			",
			queries::SELECT,
		))
		.bind(req.reservation_id)
		.fetch_optional(&self.database)
		.await?
		else {
			return Ok(None);
		};

		let roster = sqlx::query_as::<_, RosterRow>(&format!(
			r"
			{}
			WHERE
			  rp.reservation_id = ?
			ORDER BY
			  rp.id ASC
			",
			queries::SELECT_ROSTER,
		))
		.bind(req.reservation_id)
		.fetch_all(&self.database)
		.await?;

		for row in roster {
			match row.status {
				RosterStatus::Joined => reservation.players.push(row.player),
				RosterStatus::Waitlisted => reservation.wait_list.push(row.player),
			}
		}

		Ok(Some(reservation))
	}

	/// Fetches potentially many reservations, including their rosters.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_reservations(
		&self,
		req: FetchReservationsRequest,
	) -> Result<FetchReservationsResponse>
	{
		let mut reservations = sqlx::query_as::<_, Reservation>(&format!(
			r"
			{}
			WHERE
			  r.pitch_id = COALESCE(?, r.pitch_id)
			ORDER BY
			  r.starts_on ASC
			LIMIT
			  ? OFFSET ?
			",
			queries::SELECT,
		))
		.bind(req.pitch_id)
		.bind(req.limit.unwrap_or(100))
		.bind(req.offset.unwrap_or(0))
		.fetch_all(&self.database)
		.await?;

		if reservations.is_empty() {
			return Ok(FetchReservationsResponse { reservations });
		}

		let placeholders = reservations.iter().map(|_| "?").join(", ");
		let roster_query = format!(
			r"
			{}
			WHERE
			  rp.reservation_id IN ({placeholders})
			ORDER BY
			  rp.id ASC
			",
			queries::SELECT_ROSTER,
		);
		let mut query = sqlx::query_as::<_, RosterRow>(&roster_query);

		for reservation in &reservations {
			query = query.bind(reservation.id);
		}

		let mut rosters = query
			.fetch_all(&self.database)
			.await?
			.into_iter()
			.map(|row| (row.reservation_id, row))
			.into_group_map();

		for reservation in &mut reservations {
			for row in rosters.remove(&reservation.id).unwrap_or_default() {
				match row.status {
					RosterStatus::Joined => reservation.players.push(row.player),
					RosterStatus::Waitlisted => reservation.wait_list.push(row.player),
				}
			}
		}

		Ok(FetchReservationsResponse { reservations })
	}

	/// Tells every waitlisted user that a slot has opened up.
	fn notify_waitlist(&self, reservation: &LockedReservation, waitlisted: &[UserID])
	{
		for &user_id in waitlisted {
			self.dispatcher.dispatch(Notification {
				user_id,
				kind: NotificationKind::WaitlistSlotAvailable {
					reservation_id: reservation.id,
					starts_on: reservation.starts_on,
				},
			});
		}
	}
}

/// The part of a reservation row needed by roster mutations.
#[derive(Debug, FromRow)]
struct LockedReservation
{
	id: ReservationID,
	starts_on: DateTime<Utc>,
	ends_on: DateTime<Utc>,
	max_players: u8,
}

impl LockedReservation
{
	/// The reservation's time window.
	fn window(&self) -> TimeWindow
	{
		TimeWindow::new(self.starts_on, self.ends_on)
	}
}

/// Locks the reservation row for the remainder of the transaction.
async fn lock_reservation(
	txn: &mut Transaction<'_, MySql>,
	reservation_id: ReservationID,
) -> Result<LockedReservation>
{
	sqlx::query_as::<_, LockedReservation>(
		r"
		SELECT
		  id,
		  starts_on,
		  ends_on,
		  max_players
		FROM
		  Reservations
		WHERE
		  id = ?
		FOR UPDATE
		",
	)
	.bind(reservation_id)
	.fetch_optional(txn.as_mut())
	.await?
	.ok_or(Error::ReservationDoesNotExist { reservation_id })
}

/// The suspension gate.
///
/// Fails with [`Error::UserSuspended`] if the user is suspended at `now`, and
/// with [`Error::UserDoesNotExist`] if there is no such user at all.
async fn ensure_not_suspended(
	txn: &mut Transaction<'_, MySql>,
	user_id: UserID,
	now: DateTime<Utc>,
) -> Result<()>
{
	let suspended_until = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
		r"
		SELECT
		  suspended_until
		FROM
		  Users
		WHERE
		  id = ?
		",
	)
	.bind(user_id)
	.fetch_optional(txn.as_mut())
	.await?
	.ok_or(Error::UserDoesNotExist { user_id })?;

	match suspended_until {
		Some(until) if until > now => Err(Error::UserSuspended { until }),
		_ => Ok(()),
	}
}

/// Looks up which roster set (if any) the user is in.
async fn roster_status(
	txn: &mut Transaction<'_, MySql>,
	reservation_id: ReservationID,
	user_id: UserID,
) -> Result<Option<RosterStatus>>
{
	let status = sqlx::query_scalar::<_, RosterStatus>(
		r"
		SELECT
		  status
		FROM
		  ReservationPlayers
		WHERE
		  reservation_id = ?
		  AND user_id = ?
		",
	)
	.bind(reservation_id)
	.bind(user_id)
	.fetch_optional(txn.as_mut())
	.await?;

	Ok(status)
}

/// Counts the joined members of a reservation.
async fn joined_count(
	txn: &mut Transaction<'_, MySql>,
	reservation_id: ReservationID,
) -> Result<u64>
{
	let count = sqlx::query_scalar::<_, i64>(
		r"
		SELECT
		  COUNT(id)
		FROM
		  ReservationPlayers
		WHERE
		  reservation_id = ?
		  AND status = 'joined'
		",
	)
	.bind(reservation_id)
	.fetch_one(txn.as_mut())
	.await?;

	Ok(count.try_into().expect("count is non-negative"))
}

/// Checks whether the pitch already has a reservation overlapping `window`.
async fn pitch_is_booked(
	txn: &mut Transaction<'_, MySql>,
	pitch_id: PitchID,
	window: TimeWindow,
) -> Result<bool>
{
	let conflicts = sqlx::query_scalar::<_, i64>(
		r"
		SELECT
		  COUNT(id)
		FROM
		  Reservations
		WHERE
		  pitch_id = ?
		  AND starts_on < ?
		  AND ends_on > ?
		",
	)
	.bind(pitch_id)
	.bind(window.end)
	.bind(window.start)
	.fetch_one(txn.as_mut())
	.await?;

	Ok(conflicts > 0)
}

/// Checks whether the user has already joined another reservation whose
/// window overlaps `window`.
async fn overlapping_commitment(
	txn: &mut Transaction<'_, MySql>,
	user_id: UserID,
	window: TimeWindow,
	exclude: ReservationID,
) -> Result<Option<ReservationID>>
{
	let conflicting = sqlx::query_scalar::<_, ReservationID>(
		r"
		SELECT
		  r.id
		FROM
		  Reservations r
		  JOIN ReservationPlayers rp ON rp.reservation_id = r.id
		  AND rp.user_id = ?
		  AND rp.status = 'joined'
		WHERE
		  r.id != ?
		  AND r.starts_on < ?
		  AND r.ends_on > ?
		LIMIT
		  1
		",
	)
	.bind(user_id)
	.bind(exclude)
	.bind(window.end)
	.bind(window.start)
	.fetch_optional(txn.as_mut())
	.await?;

	Ok(conflicting)
}

/// Removes a user from a reservation's roster.
///
/// Returns whether a row was actually deleted.
async fn remove_member(
	txn: &mut Transaction<'_, MySql>,
	reservation_id: ReservationID,
	user_id: UserID,
) -> Result<bool>
{
	let query_result = sqlx::query(
		r"
		DELETE FROM
		  ReservationPlayers
		WHERE
		  reservation_id = ?
		  AND user_id = ?
		",
	)
	.bind(reservation_id)
	.bind(user_id)
	.execute(txn.as_mut())
	.await?;

	Ok(query_result.rows_affected() > 0)
}

/// Fetches the user IDs in one of a reservation's roster sets, in insertion
/// order.
async fn roster_user_ids(
	txn: &mut Transaction<'_, MySql>,
	reservation_id: ReservationID,
	status: RosterStatus,
) -> Result<Vec<UserID>>
{
	let user_ids = sqlx::query_scalar::<_, UserID>(
		r"
		SELECT
		  user_id
		FROM
		  ReservationPlayers
		WHERE
		  reservation_id = ?
		  AND status = ?
		ORDER BY
		  id ASC
		",
	)
	.bind(reservation_id)
	.bind(status)
	.fetch_all(txn.as_mut())
	.await?;

	Ok(user_ids)
}

#[cfg(test)]
mod tests
{
	use chrono::Duration;
	use sqlx::{MySql, Pool};

	use super::*;
	use crate::testing;

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_works(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(6);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on + Duration::minutes(90),
			price: 1500,
			max_players: 10,
			admin_id: UserID(1),
		};

		let res = svc.create_reservation(req).await?;
		let reservation = svc
			.fetch_reservation(FetchReservationRequest { reservation_id: res.reservation_id })
			.await?
			.expect("reservation was just created");

		testing::assert_eq!(reservation.pitch.name, "North Cage");
		testing::assert_eq!(reservation.max_players, 10);
		testing::assert!(reservation.players.is_empty());
		testing::assert!(reservation.wait_list.is_empty());

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_rejects_inverted_window(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(6);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on - Duration::minutes(30),
			price: 1500,
			max_players: 10,
			admin_id: UserID(1),
		};

		let res = svc.create_reservation(req).await;

		testing::assert_matches!(res, Err(Error::InvalidWindow));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_rejects_zero_capacity(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(6);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on + Duration::hours(1),
			price: 1500,
			max_players: 0,
			admin_id: UserID(1),
		};

		let res = svc.create_reservation(req).await;

		testing::assert_matches!(res, Err(Error::InvalidMaxPlayers));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_rejects_short_notice(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(3);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on + Duration::hours(1),
			price: 1500,
			max_players: 10,
			admin_id: UserID(1),
		};

		let res = svc.create_reservation(req).await;

		testing::assert_matches!(res, Err(Error::InsufficientNotice));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_rejects_long_duration(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(6);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on + Duration::hours(3),
			price: 1500,
			max_players: 10,
			admin_id: UserID(1),
		};

		let res = svc.create_reservation(req).await;

		testing::assert_matches!(res, Err(Error::DurationTooLong));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_reservation_rejects_pitch_overlap(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let starts_on = Utc::now() + Duration::days(6);
		let req = CreateReservationRequest {
			pitch_id: PitchID(1),
			starts_on,
			ends_on: starts_on + Duration::hours(2),
			price: 1500,
			max_players: 10,
			admin_id: UserID(1),
		};

		svc.create_reservation(req).await?;

		// shifted but still overlapping window on the same pitch
		let overlapping = CreateReservationRequest {
			starts_on: starts_on + Duration::hours(1),
			ends_on: starts_on + Duration::hours(3),
			..req
		};

		let res = svc.create_reservation(overlapping).await;

		testing::assert_matches!(res, Err(Error::OverlappingReservation));

		// the same window on another pitch is fine
		let other_pitch = CreateReservationRequest { pitch_id: PitchID(2), ..req };

		svc.create_reservation(other_pitch).await?;

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn join_fills_roster_then_waitlists(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		// Reservation 1 has `max_players = 2` and Mo (2) already joined.
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(3) })
			.await?;

		testing::assert_eq!(res.placement, RosterStatus::Joined);

		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(4) })
			.await?;

		testing::assert_eq!(res.placement, RosterStatus::Waitlisted);

		let reservation = svc
			.fetch_reservation(FetchReservationRequest { reservation_id: ReservationID(1) })
			.await?
			.expect("reservation exists in fixtures");

		// capacity invariant: the joined set never exceeds `max_players`
		testing::assert_eq!(reservation.players.len(), 2);
		testing::assert_eq!(reservation.players[0].id, UserID(2));
		testing::assert_eq!(reservation.players[1].id, UserID(3));
		testing::assert_eq!(reservation.wait_list.len(), 1);
		testing::assert_eq!(reservation.wait_list[0].id, UserID(4));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn join_rejects_duplicate_membership(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(2) })
			.await;

		testing::assert_matches!(res, Err(Error::AlreadyInRoster));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn join_rejects_suspended_users(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		// Jonas (5) is suspended for another 2 days in the fixtures.
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(5) })
			.await;

		testing::assert_matches!(res, Err(Error::UserSuspended { .. }));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn join_rejects_outside_join_window(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		// Reservation 2 starts 10 days from now.
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(2), user_id: UserID(3) })
			.await;

		testing::assert_matches!(res, Err(Error::JoinWindowNotOpen { .. }));

		// Reservation 3 has already finished.
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(3), user_id: UserID(4) })
			.await;

		testing::assert_matches!(res, Err(Error::ReservationStarted));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn join_rejects_overlapping_commitments(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		// Mo (2) has joined reservation 1; reservation 4 overlaps its window.
		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(4), user_id: UserID(2) })
			.await;

		testing::assert_matches!(
			res,
			Err(Error::OverlappingCommitment { reservation_id: ReservationID(1) })
		);

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn leave_notifies_waitlist_without_promoting(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::reservation_svc(database);

		// Fill reservation 1 (Mo already joined) and put Timo on the waitlist.
		svc.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(3) })
			.await?;
		svc.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(4) })
			.await?;
		dispatcher.take();

		svc.leave(LeaveReservationRequest { reservation_id: ReservationID(1), user_id: UserID(2) })
			.await?;

		let notifications = dispatcher.take();

		testing::assert_eq!(notifications.len(), 1);
		testing::assert_eq!(notifications[0].user_id, UserID(4));
		testing::assert_matches!(
			notifications[0].kind,
			NotificationKind::WaitlistSlotAvailable { reservation_id: ReservationID(1), .. }
		);

		// Timo was notified but *not* promoted; re-joining is explicit.
		let reservation = svc
			.fetch_reservation(FetchReservationRequest { reservation_id: ReservationID(1) })
			.await?
			.expect("reservation exists in fixtures");

		testing::assert_eq!(reservation.players.len(), 1);
		testing::assert_eq!(reservation.players[0].id, UserID(3));
		testing::assert_eq!(reservation.wait_list.len(), 1);
		testing::assert_eq!(reservation.wait_list[0].id, UserID(4));

		let res = svc
			.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(4) })
			.await;

		testing::assert_matches!(res, Err(Error::AlreadyInRoster));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn leave_rejects_close_to_kickoff(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::reservation_svc(database);

		// Reservation 5 starts in 3 hours and Mo (2) is joined.
		let res = svc
			.leave(LeaveReservationRequest { reservation_id: ReservationID(5), user_id: UserID(2) })
			.await;

		testing::assert_matches!(res, Err(Error::TooLateToLeave { .. }));
		testing::assert!(dispatcher.take().is_empty());

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn leave_waitlist_works(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		svc.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(3) })
			.await?;
		svc.join(JoinReservationRequest { reservation_id: ReservationID(1), user_id: UserID(4) })
			.await?;

		// Timo is waitlisted, not joined.
		let res = svc
			.leave(LeaveReservationRequest { reservation_id: ReservationID(1), user_id: UserID(4) })
			.await;

		testing::assert_matches!(res, Err(Error::NotJoined));

		svc.leave_waitlist(LeaveWaitlistRequest {
			reservation_id: ReservationID(1),
			user_id: UserID(4),
		})
		.await?;

		let reservation = svc
			.fetch_reservation(FetchReservationRequest { reservation_id: ReservationID(1) })
			.await?
			.expect("reservation exists in fixtures");

		testing::assert!(reservation.wait_list.is_empty());

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn kick_suspends_and_notifies(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::reservation_svc(database.clone());
		let res = svc
			.kick(KickPlayerRequest {
				reservation_id: ReservationID(1),
				user_id: UserID(2),
				reason: String::from("no-show at the last three games"),
				suspension_days: 7,
				admin_id: UserID(1),
			})
			.await?;

		testing::assert!(res.suspended_until > Utc::now());

		let reservation = svc
			.fetch_reservation(FetchReservationRequest { reservation_id: ReservationID(1) })
			.await?
			.expect("reservation exists in fixtures");

		testing::assert!(reservation.players.is_empty());

		let suspended_until = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
			"SELECT suspended_until FROM Users WHERE id = 2",
		)
		.fetch_one(&database)
		.await?;

		testing::assert_eq!(suspended_until, Some(res.suspended_until));

		// empty waitlist, so only the kicked player is notified
		let notifications = dispatcher.take();

		testing::assert_eq!(notifications.len(), 1);
		testing::assert_eq!(notifications[0].user_id, UserID(2));
		testing::assert_matches!(notifications[0].kind, NotificationKind::PlayerKicked { .. });

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn delete_reservation_notifies_joined_players(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::reservation_svc(database);

		svc.delete_reservation(DeleteReservationRequest {
			reservation_id: ReservationID(1),
			admin_id: UserID(1),
		})
		.await?;

		let notifications = dispatcher.take();

		testing::assert_eq!(notifications.len(), 1);
		testing::assert_eq!(notifications[0].user_id, UserID(2));
		testing::assert_matches!(
			notifications[0].kind,
			NotificationKind::ReservationCancelled { reservation_id: ReservationID(1), .. }
		);

		testing::assert!(svc
			.fetch_reservation(FetchReservationRequest { reservation_id: ReservationID(1) })
			.await?
			.is_none());

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures(
			"../../../database/fixtures/users.sql",
			"../../../database/fixtures/pitches.sql",
			"../../../database/fixtures/reservations.sql"
		)
	)]
	async fn delete_reservation_rejects_started_games(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::reservation_svc(database);

		// Reservation 3 has already finished; only a summary may remove it.
		let res = svc
			.delete_reservation(DeleteReservationRequest {
				reservation_id: ReservationID(3),
				admin_id: UserID(1),
			})
			.await;

		testing::assert_matches!(res, Err(Error::ReservationStarted));

		Ok(())
	}
}
