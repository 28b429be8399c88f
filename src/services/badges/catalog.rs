//! The badge catalog.
//!
//! The catalog maps stat categories to named badges with tiered thresholds.
//! It is injected into the services that evaluate badges, so deployments can
//! override the built-in set with a JSON document without touching code.

use serde::Deserialize;
use thiserror::Error;

use crate::services::users::{PlayerStats, StatKey};

/// A single badge definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BadgeSpec
{
	/// The badge's name.
	pub name: String,

	/// A human-readable description.
	pub description: String,

	/// The stat category this badge tracks.
	pub stat: StatKey,

	/// The tier thresholds, in strictly ascending order.
	///
	/// Reaching `thresholds[n]` earns level `n + 1`.
	pub thresholds: Vec<u32>,
}

impl BadgeSpec
{
	/// The badge level a given stat value has earned (0 means "not earned").
	///
	/// Stats only ever grow and thresholds are ascending, so levels can never
	/// go down between evaluations.
	pub fn level(&self, value: u32) -> u8
	{
		let earned = self
			.thresholds
			.iter()
			.take_while(|&&threshold| value >= threshold)
			.count();

		earned.try_into().expect("catalogs have at most a handful of tiers")
	}
}

/// The set of badges that can be earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeCatalog
{
	specs: Vec<BadgeSpec>,
}

/// An error for parsing badge catalogs.
#[derive(Debug, Error)]
pub enum InvalidCatalog
{
	/// The document was not valid JSON.
	#[error("failed to parse badge catalog: {0}")]
	ParseJson(#[from] serde_json::Error),

	/// A badge's thresholds were empty or not strictly ascending.
	#[error("badge `{name}` must have strictly ascending thresholds")]
	InvalidThresholds
	{
		/// The offending badge.
		name: String,
	},
}

impl BadgeCatalog
{
	/// Parses a catalog from a JSON array of badge definitions.
	pub fn from_json(json: &str) -> Result<Self, InvalidCatalog>
	{
		let specs = serde_json::from_str::<Vec<BadgeSpec>>(json)?;

		for spec in &specs {
			if spec.thresholds.is_empty()
				|| !spec.thresholds.windows(2).all(|pair| pair[0] < pair[1])
			{
				return Err(InvalidCatalog::InvalidThresholds { name: spec.name.clone() });
			}
		}

		Ok(Self { specs })
	}

	/// The badge definitions in this catalog.
	pub fn specs(&self) -> &[BadgeSpec]
	{
		&self.specs
	}

	/// Every badge a player's stats have earned, with its current level.
	pub fn earned_badges<'c>(
		&'c self,
		stats: &PlayerStats,
	) -> impl Iterator<Item = (&'c BadgeSpec, u8)> + 'c
	{
		let stats = *stats;

		self.specs
			.iter()
			.map(move |spec| (spec, spec.level(stats.get(spec.stat))))
			.filter(|&(_, level)| level > 0)
	}
}

impl Default for BadgeCatalog
{
	fn default() -> Self
	{
		let spec = |name: &str, description: &str, stat, thresholds: [u32; 3]| BadgeSpec {
			name: name.to_owned(),
			description: description.to_owned(),
			stat,
			thresholds: thresholds.to_vec(),
		};

		Self {
			specs: vec![
				spec("Regular", "Keeps showing up.", StatKey::Matches, [10, 50, 100]),
				spec("Winner", "Wins games.", StatKey::Wins, [5, 25, 75]),
				spec("Most Valuable", "Voted MVP by the roster.", StatKey::Mvps, [3, 10, 30]),
				spec("Goalscorer", "Puts the ball in the net.", StatKey::Goals, [10, 50, 150]),
				spec("Playmaker", "Sets up goals for others.", StatKey::Assists, [10, 40, 120]),
				spec("Wall", "Breaks up the other team's play.", StatKey::Interceptions, [
					20, 80, 200,
				]),
				spec("Safe Hands", "Finishes games without conceding.", StatKey::CleanSheets, [
					5, 20, 50,
				]),
			],
		}
	}
}
