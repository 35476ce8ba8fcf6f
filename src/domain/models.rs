use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized match result ready for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFact {
    pub match_id: i64,
    pub tournament_id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub winner_games: i32,
    pub loser_games: i32,
    /// Positive rounds are the winners bracket, negative the losers bracket.
    pub round: i32,
    pub winner_race: String,
    pub loser_race: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elimination {
    Single,
    Double,
}

impl Elimination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Elimination::Single => "single",
            Elimination::Double => "double",
        }
    }
}

/// Per-edition aggregate folded over the non-skipped matches. A negative
/// round means a losers bracket exists, so the edition is double
/// elimination; the rounds count is the deepest round on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionSummary {
    pub elimination: Elimination,
    pub rounds: i32,
}

impl Default for EditionSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl EditionSummary {
    pub fn new() -> Self {
        Self {
            elimination: Elimination::Single,
            rounds: 0,
        }
    }

    pub fn observe(&mut self, round: i32) {
        if round < 0 {
            self.elimination = Elimination::Double;
        }
        if round.abs() > self.rounds {
            self.rounds = round.abs();
        }
    }

    /// Combine two partial summaries. Matches classify independently, so
    /// per-chunk summaries can be reduced with this instead of sharing
    /// mutable state.
    pub fn merge(self, other: Self) -> Self {
        let elimination = if self.elimination == Elimination::Double
            || other.elimination == Elimination::Double
        {
            Elimination::Double
        } else {
            Elimination::Single
        };

        Self {
            elimination,
            rounds: self.rounds.max(other.rounds),
        }
    }
}

// --- Challonge API Response Structures ---
//
// The v1 API wraps every object in a single-key envelope, e.g.
// [{"participant": {...}}, ...].

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TournamentEnvelope {
    pub tournament: TournamentRecord,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticipantEnvelope {
    pub participant: ParticipantRecord,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchEnvelope {
    #[serde(rename = "match")]
    pub match_record: MatchRecord,
}

/// Raw tournament record from the account's tournament index
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TournamentRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

/// Raw participant record for one edition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticipantRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub challonge_user_id: Option<i64>,
    pub tournament_id: i64,
    /// Only set for participants who checked in and played.
    #[serde(default)]
    pub final_rank: Option<i32>,
}

impl ParticipantRecord {
    pub fn checked_in(&self) -> bool {
        self.final_rank.is_some()
    }
}

/// Raw match record for one edition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchRecord {
    pub id: i64,
    pub tournament_id: i64,
    pub state: String,
    #[serde(default)]
    pub winner_id: Option<i64>,
    #[serde(default)]
    pub loser_id: Option<i64>,
    #[serde(default)]
    pub scores_csv: String,
    /// Kept loose on purpose: years of manual bracket edits have produced
    /// both numeric and string round values upstream.
    pub round: Value,
    #[serde(default)]
    pub started_at: Option<String>,
}

impl MatchRecord {
    pub fn is_complete(&self) -> bool {
        self.state == "complete"
    }

    pub fn round_number(&self) -> Option<i32> {
        match &self.round {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_starts_single_with_zero_rounds() {
        let summary = EditionSummary::new();
        assert_eq!(summary.elimination, Elimination::Single);
        assert_eq!(summary.rounds, 0);
    }

    #[test]
    fn negative_round_flips_to_double_elimination() {
        let mut summary = EditionSummary::new();
        summary.observe(1);
        summary.observe(2);
        assert_eq!(summary.elimination, Elimination::Single);

        summary.observe(-1);
        assert_eq!(summary.elimination, Elimination::Double);
    }

    #[test]
    fn rounds_is_max_absolute_round() {
        let mut summary = EditionSummary::new();
        summary.observe(3);
        summary.observe(-5);
        summary.observe(2);
        assert_eq!(summary.rounds, 5);
    }

    #[test]
    fn merge_combines_partial_summaries() {
        let mut left = EditionSummary::new();
        left.observe(4);

        let mut right = EditionSummary::new();
        right.observe(-2);

        let merged = left.merge(right);
        assert_eq!(merged.elimination, Elimination::Double);
        assert_eq!(merged.rounds, 4);
    }

    #[test]
    fn round_number_accepts_numbers_and_strings() {
        let mut record = match_with_round(serde_json::json!(-3));
        assert_eq!(record.round_number(), Some(-3));

        record = match_with_round(serde_json::json!("2"));
        assert_eq!(record.round_number(), Some(2));

        record = match_with_round(serde_json::json!("finals"));
        assert_eq!(record.round_number(), None);
    }

    fn match_with_round(round: Value) -> MatchRecord {
        MatchRecord {
            id: 1,
            tournament_id: 10,
            state: "complete".to_string(),
            winner_id: Some(100),
            loser_id: Some(200),
            scores_csv: "2-0".to_string(),
            round,
            started_at: None,
        }
    }
}
