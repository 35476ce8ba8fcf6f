use thiserror::Error;

/// A failure scoped to a single raw match record. One bad record never
/// aborts the batch; these are collected into the ingest report so the
/// roster or upstream data gap can be fixed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("match {match_id}: complete but missing a winner or loser id")]
    MissingOutcome { match_id: i64 },
    #[error("match {match_id}: participant {participant_id} is not in the participant index")]
    UnknownParticipant { match_id: i64, participant_id: i64 },
    #[error("match {match_id}: {name:?} has no roster entry")]
    MissingRosterEntry { match_id: i64, name: String },
    #[error("match {match_id}: malformed round value {raw:?}")]
    MalformedRound { match_id: i64, raw: String },
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}
