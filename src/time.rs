//! Helper types to deal with time, and the booking policy constants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A closed-open time interval `[start, end)`.
///
/// Two windows overlap iff each one starts before the other ends. Touching
/// windows (`a.end == b.start`) do not overlap, which is what allows
/// back-to-back reservations on the same pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow
{
	/// When this window opens (inclusive).
	pub start: DateTime<Utc>,

	/// When this window closes (exclusive).
	pub end: DateTime<Utc>,
}

impl TimeWindow
{
	/// Creates a new [`TimeWindow`].
	pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self
	{
		Self { start, end }
	}

	/// Whether the window closes after it opens.
	pub fn is_ordered(&self) -> bool
	{
		self.end > self.start
	}

	/// The length of this window.
	pub fn duration(&self) -> Duration
	{
		self.end - self.start
	}

	/// Standard half-open interval overlap test.
	pub fn overlaps(&self, other: &Self) -> bool
	{
		self.start < other.end && self.end > other.start
	}
}

/// The booking policy.
///
/// These values are contractual (clients display them), so they are
/// centralized here rather than scattered across the services.
pub mod policy
{
	use chrono::Duration;

	/// How far in advance a reservation must be created.
	pub fn creation_notice() -> Duration
	{
		Duration::days(5)
	}

	/// The maximum length of a single reservation.
	pub fn max_duration() -> Duration
	{
		Duration::hours(2)
	}

	/// How far before kick-off the join window opens.
	pub fn join_window() -> Duration
	{
		Duration::days(3)
	}

	/// The minimum notice for leaving a roster.
	pub fn leave_cutoff() -> Duration
	{
		Duration::hours(6)
	}
}
