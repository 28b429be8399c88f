//! API services.
//!
//! These contain the core business logic. Each service owns a database pool
//! handle and the collaborators it needs; the (external) HTTP layer is
//! expected to construct them once and call their methods with
//! already-authenticated parameters.

pub mod pitches;
pub use pitches::PitchService;

pub mod users;
pub use users::UserService;

pub mod reservations;
pub use reservations::ReservationService;

pub mod summaries;
pub use summaries::SummaryService;

pub mod badges;
pub use badges::BadgeService;

pub mod leaderboards;
pub use leaderboards::LeaderboardService;
