//! A service for finalizing finished games.
//!
//! A summary is the single all-or-nothing step that turns a finished
//! reservation into history: it applies every joined player's stats,
//! re-evaluates their badges, suspends absentees, and deletes the
//! reservation, all in one transaction. If anything fails, nothing sticks and
//! the summary can simply be resubmitted.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use crate::notifications::{Dispatcher, Notification, NotificationKind};
use crate::services::badges::{self, BadgeCatalog};
use crate::services::reservations::RosterStatus;
use crate::services::users::{self, UserID};

mod error;
pub use error::{Error, Result};

pub(crate) mod models;
pub use models::{Absence, PlayerOutcome, SubmitSummaryRequest, SubmitSummaryResponse};

/// A service for finalizing finished games.
#[derive(Clone)]
pub struct SummaryService
{
	database: Pool<MySql>,
	catalog: Arc<BadgeCatalog>,
	dispatcher: Dispatcher,
}

impl fmt::Debug for SummaryService
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("SummaryService").finish_non_exhaustive()
	}
}

impl SummaryService
{
	/// Create a new [`SummaryService`].
	pub fn new(database: Pool<MySql>, catalog: Arc<BadgeCatalog>, dispatcher: Dispatcher) -> Self
	{
		Self { database, catalog, dispatcher }
	}

	/// Submits the summary for a finished game.
	///
	/// Outcomes and absences for users who were not joined members of the
	/// reservation are skipped, not rejected; the response's counters say how
	/// much actually happened.
	#[tracing::instrument(level = "debug", err(Debug, level = "debug"))]
	pub async fn submit_summary(&self, req: SubmitSummaryRequest) -> Result<SubmitSummaryResponse>
	{
		let mut txn = self.database.begin().await?;
		let now = Utc::now();

		let ends_on = sqlx::query_scalar::<_, DateTime<Utc>>(
			r"
			SELECT
			  ends_on
			FROM
			  Reservations
			WHERE
			  id = ?
			FOR UPDATE
			",
		)
		.bind(req.reservation_id)
		.fetch_optional(txn.as_mut())
		.await?
		.ok_or(Error::ReservationDoesNotExist { reservation_id: req.reservation_id })?;

		if now < ends_on {
			return Err(Error::GameNotOver { ends_on });
		}

		let members = sqlx::query_scalar::<_, UserID>(
			r"
			SELECT
			  user_id
			FROM
			  ReservationPlayers
			WHERE
			  reservation_id = ?
			  AND status = ?
			",
		)
		.bind(req.reservation_id)
		.bind(RosterStatus::Joined)
		.fetch_all(txn.as_mut())
		.await?
		.into_iter()
		.collect::<HashSet<_>>();

		let mut updated_players = 0;
		let mut awarded_badges = 0;
		let mut notifications = Vec::new();

		for outcome in &req.outcomes {
			if !members.contains(&outcome.user_id) {
				tracing::warn! {
					reservation_id = %req.reservation_id,
					user_id = %outcome.user_id,
					"skipping outcome for non-member",
				};

				continue;
			}

			sqlx::query(
				r"
				UPDATE
				  Users
				SET
				  matches = matches + ?,
				  wins = wins + ?,
				  mvps = mvps + ?,
				  goals = goals + ?,
				  assists = assists + ?,
				  interceptions = interceptions + ?,
				  clean_sheets = clean_sheets + ?
				WHERE
				  id = ?
				",
			)
			.bind(u32::from(outcome.played))
			.bind(u32::from(outcome.won))
			.bind(u32::from(req.mvp == Some(outcome.user_id)))
			.bind(outcome.goals)
			.bind(outcome.assists)
			.bind(outcome.interceptions)
			.bind(u32::from(outcome.clean_sheet))
			.bind(outcome.user_id)
			.execute(txn.as_mut())
			.await?;

			updated_players += 1;
			awarded_badges += badges::evaluate(&mut txn, &self.catalog, outcome.user_id)
				.await?
				.expect("roster members reference existing users");
		}

		for absence in &req.absences {
			if !members.contains(&absence.user_id) {
				tracing::warn! {
					reservation_id = %req.reservation_id,
					user_id = %absence.user_id,
					"skipping absence for non-member",
				};

				continue;
			}

			let suspended_until = users::suspend_in_txn(
				&mut txn,
				absence.user_id,
				absence.suspension_days,
				&absence.reason,
				now,
			)
			.await?
			.expect("roster members reference existing users");

			notifications.push(Notification {
				user_id: absence.user_id,
				kind: NotificationKind::PlayerSuspended {
					until: suspended_until,
					reason: absence.reason.clone(),
				},
			});
		}

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
			updated_players,
			awarded_badges,
			absences = req.absences.len(),
			"finalized game summary",
		};

		for notification in notifications {
			self.dispatcher.dispatch(notification);
		}

		Ok(SubmitSummaryResponse { updated_players, awarded_badges })
	}
}
