use crate::Position;

// Suffix and punctuation fragments stripped from skill-position names, applied in order.
const NAME_FRAGMENTS: [&str; 6] = ["II", " I", "Jr.", "Sr.", ".", "'"];

/// Canonical player name used to join rankings with salaries.
///
/// A defense keeps only its nickname (`"Baltimore Ravens"` -> `"Ravens"`). Everyone else
/// loses generational suffixes, periods and apostrophes, so `"Marvin Harrison Jr."` and
/// `"Marvin Harrison"` collapse to the same key.
pub fn normalize_player_name(name: &str, position: Position) -> String {
    if position == Position::Dst {
        return name
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string();
    }

    let mut cleaned = name.to_string();
    for fragment in NAME_FRAGMENTS {
        cleaned = cleaned.replace(fragment, "");
    }
    cleaned.trim().to_string()
}

/// Case-insensitive substring match of a requested defense against a DST row name.
pub fn defense_matches(query: &str, name: &str) -> bool {
    let query = query.trim().to_lowercase();
    !query.is_empty() && name.to_lowercase().contains(&query)
}

/// Strip a leading away-game marker from an opponent code (`"@BAL"` -> `"BAL"`).
pub fn normalize_opponent(opponent: &str) -> String {
    opponent.trim().trim_start_matches('@').trim().to_string()
}
