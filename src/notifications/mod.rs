//! Notification triggers.
//!
//! Delivery transport (email, push, ...) is an external collaborator. The
//! services in this crate only *trigger* notifications, through the
//! [`NotificationDispatcher`] contract. Dispatching is fire-and-forget: a
//! failed delivery must never fail or block the mutation that triggered it,
//! so the contract is infallible and implementations are expected to hand off
//! to their transport internally.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::pitches::PitchID;
use crate::services::reservations::ReservationID;
use crate::services::users::UserID;

/// A shared handle to a [`NotificationDispatcher`].
pub type Dispatcher = Arc<dyn NotificationDispatcher>;

/// A notification trigger for a single user.
#[derive(Debug, Clone, Serialize)]
pub struct Notification
{
	/// The user to notify.
	pub user_id: UserID,

	/// What happened.
	pub kind: NotificationKind,
}

/// The notification templates known to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind
{
	/// A reservation the user had joined was cancelled by an admin.
	ReservationCancelled
	{
		/// The cancelled reservation.
		reservation_id: ReservationID,

		/// When the game would have started.
		starts_on: DateTime<Utc>,
	},

	/// The user was kicked from a roster by an admin.
	PlayerKicked
	{
		/// The reservation the user was kicked from.
		reservation_id: ReservationID,

		/// The reason given by the admin.
		reason: String,

		/// When the accompanying suspension expires.
		suspended_until: DateTime<Utc>,
	},

	/// The user was suspended.
	PlayerSuspended
	{
		/// When the suspension expires.
		until: DateTime<Utc>,

		/// The reason given by the admin.
		reason: String,
	},

	/// A joined player left a full reservation; the slot is up for grabs.
	///
	/// This is advisory only. Waitlisted users are never promoted
	/// automatically and have to re-join explicitly.
	WaitlistSlotAvailable
	{
		/// The reservation with a free slot.
		reservation_id: ReservationID,

		/// When the game starts.
		starts_on: DateTime<Utc>,
	},

	/// A pitch was removed; the user's booking on it is gone.
	PitchDeleted
	{
		/// The deleted pitch.
		pitch_id: PitchID,

		/// When the user's cancelled game would have started.
		starts_on: DateTime<Utc>,
	},
}

/// The contract between the services and the notification transport.
pub trait NotificationDispatcher: Send + Sync
{
	/// Triggers delivery of `notification`.
	fn dispatch(&self, notification: Notification);
}

/// A [`NotificationDispatcher`] that only emits audit-log events.
///
/// This is what binaries fall back to until a real transport is wired up, and
/// it doubles as the sink for environments (CI, local dev) that must not send
/// anything.
#[derive(Debug, Clone, Copy)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher
{
	fn dispatch(&self, notification: Notification)
	{
		tracing::info! {
			target: "fives_api::audit_log",
			user_id = %notification.user_id,
			kind = ?notification.kind,
			"dispatched notification",
		};
	}
}
