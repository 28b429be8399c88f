//! Helpers for unit and integration tests.
//!
//! The assertion macros in here mirror the standard library's, except that
//! they return [`color_eyre`] errors instead of panicking, which plays much
//! nicer with `?` in async tests.

use std::sync::{Arc, Mutex};

use sqlx::{MySql, Pool};

use crate::notifications::{Notification, NotificationDispatcher};
use crate::services::badges::{BadgeCatalog, BadgeService};
use crate::services::leaderboards::LeaderboardService;
use crate::services::pitches::PitchService;
use crate::services::reservations::ReservationService;
use crate::services::summaries::SummaryService;
use crate::services::users::UserService;

#[ctor::ctor]
fn test_setup()
{
	use tracing_subscriber::EnvFilter;

	color_eyre::install().expect("failed to install color-eyre");

	tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter(EnvFilter::from_default_env())
		.init();
}

/// A [`NotificationDispatcher`] that records everything it is handed.
#[derive(Debug, Default)]
pub struct RecordingDispatcher
{
	notifications: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher
{
	/// Takes every notification recorded so far.
	pub fn take(&self) -> Vec<Notification>
	{
		std::mem::take(&mut *self.notifications.lock().expect("lock was poisoned"))
	}
}

impl NotificationDispatcher for RecordingDispatcher
{
	fn dispatch(&self, notification: Notification)
	{
		self.notifications
			.lock()
			.expect("lock was poisoned")
			.push(notification);
	}
}

/// Creates a [`UserService`] with a recording dispatcher.
pub fn user_svc(database: Pool<MySql>) -> (UserService, Arc<RecordingDispatcher>)
{
	let dispatcher = Arc::new(RecordingDispatcher::default());

	(UserService::new(database, dispatcher.clone()), dispatcher)
}

/// Creates a [`PitchService`] with a recording dispatcher.
pub fn pitch_svc(database: Pool<MySql>) -> (PitchService, Arc<RecordingDispatcher>)
{
	let dispatcher = Arc::new(RecordingDispatcher::default());

	(PitchService::new(database, dispatcher.clone()), dispatcher)
}

/// Creates a [`ReservationService`] with a recording dispatcher.
pub fn reservation_svc(database: Pool<MySql>) -> (ReservationService, Arc<RecordingDispatcher>)
{
	let dispatcher = Arc::new(RecordingDispatcher::default());

	(ReservationService::new(database, dispatcher.clone()), dispatcher)
}

/// Creates a [`SummaryService`] with the built-in badge catalog and a
/// recording dispatcher.
pub fn summary_svc(database: Pool<MySql>) -> (SummaryService, Arc<RecordingDispatcher>)
{
	let dispatcher = Arc::new(RecordingDispatcher::default());
	let catalog = Arc::new(BadgeCatalog::default());

	(SummaryService::new(database, catalog, dispatcher.clone()), dispatcher)
}

/// Creates a [`BadgeService`] with the built-in badge catalog.
pub fn badge_svc(database: Pool<MySql>) -> BadgeService
{
	BadgeService::new(database, Arc::new(BadgeCatalog::default()))
}

/// Creates a [`LeaderboardService`].
pub fn leaderboard_svc(database: Pool<MySql>) -> LeaderboardService
{
	LeaderboardService::new(database)
}

/// Non-panicking version of [`assert!()`].
macro_rules! assert {
	($($args:tt)*) => {
		color_eyre::eyre::ensure!($($args)*)
	};
}

pub(crate) use assert;

/// Non-panicking version of [`assert_eq!()`].
macro_rules! assert_eq {
	($lhs:expr, $rhs:expr $(,)?) => {{
		let (lhs, rhs) = (&$lhs, &$rhs);

		color_eyre::eyre::ensure!(
			lhs == rhs,
			"assertion `left == right` failed\n  left: {lhs:?}\n right: {rhs:?}",
		);
	}};
}

pub(crate) use assert_eq;

/// Non-panicking version of [`assert_matches!()`].
///
/// [`assert_matches!()`]: std::assert_matches::assert_matches
macro_rules! assert_matches {
	($value:expr, $($pattern:tt)+) => {{
		let value = &$value;

		color_eyre::eyre::ensure!(
			matches!(value, $($pattern)+),
			"assertion `matches!({}, {})` failed\n value: {value:?}",
			stringify!($value),
			stringify!($($pattern)+),
		);
	}};
}

pub(crate) use assert_matches;
