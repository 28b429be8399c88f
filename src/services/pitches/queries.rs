//! SQL queries that are used in multiple places.

/// SQL query for fetching pitches.
pub static SELECT: &str = r"
	SELECT
	  p.id,
	  p.name,
	  p.players_per_side,
	  p.flags,
	  p.created_on
	FROM
	  Pitches p
";
