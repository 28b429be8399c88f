//! SQL queries that are used in multiple places.

/// SQL query for fetching reservations.
pub static SELECT: &str = r"
	SELECT
	  r.id,
	  r.pitch_id,
	  p.name pitch_name,
	  r.starts_on,
	  r.ends_on,
	  r.price,
	  r.max_players,
	  r.created_on
	FROM
	  Reservations r
	  JOIN Pitches p ON p.id = r.pitch_id
";

/// SQL query for fetching roster membership rows, in insertion order.
pub static SELECT_ROSTER: &str = r"
	SELECT
	  rp.reservation_id,
	  rp.user_id player_id,
	  u.name player_name,
	  rp.status
	FROM
	  ReservationPlayers rp
	  JOIN Users u ON u.id = rp.user_id
";
