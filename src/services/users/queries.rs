//! SQL queries that are used in multiple places.

/// SQL query for fetching users.
pub static SELECT: &str = r"
	SELECT
	  u.id,
	  u.name,
	  u.email,
	  u.role,
	  u.suspended_until,
	  u.suspension_reason,
	  u.matches,
	  u.wins,
	  u.mvps,
	  u.goals,
	  u.assists,
	  u.interceptions,
	  u.clean_sheets,
	  u.created_on
	FROM
	  Users u
";
