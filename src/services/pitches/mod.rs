//! A service for managing pitches.

use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, Pool};
use tap::TryConv;

use crate::database::SqlErrorExt;
use crate::notifications::{Dispatcher, Notification, NotificationKind};
use crate::services::users::UserID;

mod queries;

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
pub use models::{
	CreatePitchRequest,
	CreatePitchResponse,
	DeletePitchRequest,
	DeletePitchResponse,
	FetchPitchRequest,
	FetchPitchesRequest,
	FetchPitchesResponse,
	Pitch,
	PitchFlags,
	PitchID,
	PitchInfo,
};

/// The minimum capacity format for a pitch.
const MIN_PLAYERS_PER_SIDE: u8 = 5;

/// A service for managing pitches.
#[derive(Clone)]
pub struct PitchService
{
	database: Pool<MySql>,
	dispatcher: Dispatcher,
}

impl fmt::Debug for PitchService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("PitchService").finish_non_exhaustive()
	}
}

impl PitchService
{
	/// Create a new [`PitchService`].
	pub fn new(database: Pool<MySql>, dispatcher: Dispatcher) -> Self
	{
		Self { database, dispatcher }
	}

	/// Registers a new pitch.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn create_pitch(&self, req: CreatePitchRequest) -> Result<CreatePitchResponse>
	{
		if req.players_per_side < MIN_PLAYERS_PER_SIDE {
			return Err(Error::InvalidPlayersPerSide { value: req.players_per_side });
		}

		let pitch_id = sqlx::query(
			r"
			INSERT INTO
			  Pitches (name, players_per_side, flags)
			VALUES
			  (?, ?, ?)
			",
		)
		.bind(&req.name)
		.bind(req.players_per_side)
		.bind(req.flags)
		.execute(&self.database)
		.await
		.map_err(|error| match error.is_duplicate_entry() {
			true => Error::NameAlreadyTaken,
			false => Error::Database(error),
		})?
		.last_insert_id()
		.try_conv::<PitchID>()
		.expect("pitch id fits into its repr");

		tracing::info! {
			target: "fives_api::audit_log",
			%pitch_id,
			name = %req.name,
			admin_id = %req.admin_id,
			"registered new pitch",
		};

		Ok(CreatePitchResponse { pitch_id })
	}

	/// Fetches a single pitch.
	///
	/// This will return `Ok(None)` if the pitch was not found, but everything
	/// else went fine.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_pitch(&self, req: FetchPitchRequest) -> Result<Option<Pitch>>
	{
		let pitch = sqlx::query_as::<_, Pitch>(&format!(
			r"
			{}
			WHERE
			  p.id = ?
			LIMIT
			  1
			",
			queries::SELECT,
		))
		.bind(req.pitch_id)
		.fetch_optional(&self.database)
		.await?;

		Ok(pitch)
	}

	/// Fetches potentially many pitches.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn fetch_pitches(&self, req: FetchPitchesRequest) -> Result<FetchPitchesResponse>
	{
		let pitches = sqlx::query_as::<_, Pitch>(&format!(
			r"
			{}
			ORDER BY
			  p.id ASC
			LIMIT
			  ? OFFSET ?
			",
			queries::SELECT,
		))
		.bind(req.limit.unwrap_or(100))
		.bind(req.offset.unwrap_or(0))
		.fetch_all(&self.database)
		.await?;

		Ok(FetchPitchesResponse { pitches })
	}

	/// Deletes a pitch.
	///
	/// Every future reservation on the pitch is force-cancelled, and every
	/// joined player on those reservations is notified. This is the bulk
	/// variant of deleting a single reservation, with a different root cause.
	///
	/// Finished games are a different matter: their stats only materialize
	/// when their summary is submitted, so the pitch cannot be deleted while
	/// any of them are still around.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn delete_pitch(&self, req: DeletePitchRequest) -> Result<DeletePitchResponse>
	{
		/// A joined player on a future reservation, about to lose their slot.
		#[derive(FromRow)]
		struct AffectedPlayer
		{
			user_id: UserID,
			starts_on: DateTime<Utc>,
		}

		let mut txn = self.database.begin().await?;

		let unsummarized = sqlx::query_scalar::<_, i64>(
			r"
			SELECT
			  COUNT(id)
			FROM
			  Reservations
			WHERE
			  pitch_id = ?
			  AND starts_on < NOW()
			",
		)
		.bind(req.pitch_id)
		.fetch_one(txn.as_mut())
		.await?;

		if unsummarized > 0 {
			return Err(Error::UnsummarizedGames { pitch_id: req.pitch_id });
		}

		let affected = sqlx::query_as::<_, AffectedPlayer>(
			r"
			SELECT
			  rp.user_id,
			  r.starts_on
			FROM
			  Reservations r
			  JOIN ReservationPlayers rp ON rp.reservation_id = r.id
			  AND rp.status = 'joined'
			WHERE
			  r.pitch_id = ?
			  AND r.starts_on >= NOW()
			ORDER BY
			  r.starts_on ASC,
			  rp.id ASC
			",
		)
		.bind(req.pitch_id)
		.fetch_all(txn.as_mut())
		.await?;

		let cancelled_reservations = sqlx::query(
			r"
			DELETE FROM
			  Reservations
			WHERE
			  pitch_id = ?
			  AND starts_on >= NOW()
			",
		)
		.bind(req.pitch_id)
		.execute(txn.as_mut())
		.await?
		.rows_affected();

		let query_result = sqlx::query(
			r"
			DELETE FROM
			  Pitches
			WHERE
			  id = ?
			",
		)
		.bind(req.pitch_id)
		.execute(txn.as_mut())
		.await?;

		if query_result.rows_affected() == 0 {
			return Err(Error::PitchDoesNotExist { pitch_id: req.pitch_id });
		}

		txn.commit().await?;

		tracing::info! {
			target: "fives_api::audit_log",
			pitch_id = %req.pitch_id,
			admin_id = %req.admin_id,
			cancelled_reservations,
			"deleted pitch",
		};

		for player in affected {
			self.dispatcher.dispatch(Notification {
				user_id: player.user_id,
				kind: NotificationKind::PitchDeleted {
					pitch_id: req.pitch_id,
					starts_on: player.starts_on,
				},
			});
		}

		Ok(DeletePitchResponse { cancelled_reservations })
	}
}

#[cfg(test)]
mod tests
{
	use sqlx::{MySql, Pool};

	use super::*;
	use crate::services::reservations::ReservationID;
	use crate::services::summaries;
	use crate::testing;

	#[sqlx::test(migrations = "database/migrations")]
	async fn create_pitch_works(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::pitch_svc(database);
		let req = CreatePitchRequest {
			name: String::from("South Cage"),
			players_per_side: 5,
			flags: PitchFlags::LIGHTING | PitchFlags::PARKING,
			admin_id: UserID(1),
		};

		let res = svc.create_pitch(req).await?;
		let pitch = svc
			.fetch_pitch(FetchPitchRequest { pitch_id: res.pitch_id })
			.await?
			.expect("pitch was just created");

		testing::assert_eq!(pitch.name, "South Cage");
		testing::assert!(pitch.flags.contains(PitchFlags::LIGHTING));
		testing::assert!(!pitch.flags.contains(PitchFlags::INDOOR));

		Ok(())
	}

	#[sqlx::test(migrations = "database/migrations")]
	async fn create_pitch_rejects_small_formats(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::pitch_svc(database);
		let req = CreatePitchRequest {
			name: String::from("Tiny Cage"),
			players_per_side: 4,
			flags: PitchFlags::NONE,
			admin_id: UserID(1),
		};

		let res = svc.create_pitch(req).await;

		testing::assert_matches!(res, Err(Error::InvalidPlayersPerSide { value: 4 }));

		Ok(())
	}

	#[sqlx::test(
		migrations = "database/migrations",
		fixtures("../../../database/fixtures/pitches.sql")
	)]
	async fn create_pitch_rejects_duplicate_names(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, _) = testing::pitch_svc(database);
		let req = CreatePitchRequest {
			name: String::from("North Cage"),
			players_per_side: 5,
			flags: PitchFlags::NONE,
			admin_id: UserID(1),
		};

		let res = svc.create_pitch(req).await;

		testing::assert_matches!(res, Err(Error::NameAlreadyTaken));

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
	async fn delete_pitch_cascades(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::pitch_svc(database.clone());

		// Pitch 1 has two future reservations (1, 2); Mo (user 2) is joined
		// on reservation 1.
		let res = svc
			.delete_pitch(DeletePitchRequest { pitch_id: PitchID(1), admin_id: UserID(1) })
			.await?;

		testing::assert_eq!(res.cancelled_reservations, 2);

		let notifications = dispatcher.take();

		testing::assert_eq!(notifications.len(), 1);
		testing::assert_eq!(notifications[0].user_id, UserID(2));
		testing::assert_matches!(
			notifications[0].kind,
			NotificationKind::PitchDeleted { pitch_id: PitchID(1), .. }
		);

		let remaining = sqlx::query_scalar::<_, i64>(
			"SELECT COUNT(id) FROM Reservations WHERE pitch_id = 1",
		)
		.fetch_one(&database)
		.await?;

		testing::assert_eq!(remaining, 0);
		testing::assert!(svc
			.fetch_pitch(FetchPitchRequest { pitch_id: PitchID(1) })
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
	async fn delete_pitch_requires_summarized_games(database: Pool<MySql>)
	-> color_eyre::Result<()>
	{
		let (svc, dispatcher) = testing::pitch_svc(database.clone());

		// Pitch 2's reservation 3 has finished but has no summary yet; its
		// players' stats would be lost if the deletion went through.
		let res = svc
			.delete_pitch(DeletePitchRequest { pitch_id: PitchID(2), admin_id: UserID(1) })
			.await;

		testing::assert_matches!(res, Err(Error::UnsummarizedGames { pitch_id: PitchID(2) }));
		testing::assert!(dispatcher.take().is_empty());
		testing::assert!(svc
			.fetch_pitch(FetchPitchRequest { pitch_id: PitchID(2) })
			.await?
			.is_some());

		// the summary still goes through and unblocks the deletion
		let (summaries, _) = testing::summary_svc(database);

		summaries
			.submit_summary(summaries::SubmitSummaryRequest {
				reservation_id: ReservationID(3),
				mvp: None,
				outcomes: vec![],
				absences: vec![],
				admin_id: UserID(1),
			})
			.await?;

		let res = svc
			.delete_pitch(DeletePitchRequest { pitch_id: PitchID(2), admin_id: UserID(1) })
			.await?;

		// the two remaining future reservations (4, 5) are cancelled
		testing::assert_eq!(res.cancelled_reservations, 2);

		let notifications = dispatcher.take();

		testing::assert_eq!(notifications.len(), 1);
		testing::assert_eq!(notifications[0].user_id, UserID(2));
		testing::assert_matches!(
			notifications[0].kind,
			NotificationKind::PitchDeleted { pitch_id: PitchID(2), .. }
		);

		Ok(())
	}

	#[sqlx::test(migrations = "database/migrations")]
	async fn delete_pitch_unknown_pitch(database: Pool<MySql>) -> color_eyre::Result<()>
	{
		let (svc, _) = testing::pitch_svc(database);
		let res = svc
			.delete_pitch(DeletePitchRequest { pitch_id: PitchID(42), admin_id: UserID(1) })
			.await;

		testing::assert_matches!(res, Err(Error::PitchDoesNotExist { .. }));

		Ok(())
	}
}
