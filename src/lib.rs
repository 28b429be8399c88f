//! # fives-api
//!
//! This crate implements the core domain of a booking service for five-a-side
//! football pitches. Admins publish reservation slots on pitches, players join
//! them (bounded roster with a waitlist), and finalized game summaries feed
//! cumulative player stats, badges, and daily top-50 leaderboards.
//!
//! The HTTP layer, credential logic, and notification transport are external
//! collaborators. Everything here is exposed as services over a [`sqlx`]
//! MySQL pool; see the [`services`] module.

mod macros;

pub mod bitflags;
pub mod time;
pub mod database;
pub mod runtime;
pub mod notifications;
pub mod services;

#[cfg(test)]
mod testing;
