use std::collections::HashMap;

use log::{error, info, warn};

use crate::domain::models::{EditionSummary, MatchFact, MatchRecord, ParticipantRecord};
use crate::domain::score;
use crate::errors::RecordError;
use crate::roster::RacePair;

/// Result of building one completed raw match.
#[derive(Debug, Clone, PartialEq)]
pub enum Built {
    Fact(MatchFact),
    /// The score string was unrecognized; the record is dropped.
    Skip { score: String },
}

/// Outcome tally for one edition's ingest pass. Per-record failures land
/// here instead of aborting the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub inserted_matches: usize,
    pub already_present: usize,
    pub inserted_participants: usize,
    pub unknown_scores: Vec<String>,
    pub failures: Vec<RecordError>,
}

impl IngestReport {
    pub fn record_skip(&mut self, score: String) {
        self.unknown_scores.push(score);
    }

    pub fn record_failure(&mut self, failure: RecordError) {
        self.failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.unknown_scores.is_empty() && self.failures.is_empty()
    }

    pub fn log_summary(&self, edition: u32) {
        info!(
            "Edition {}: {} matches inserted, {} already present, {} new participants",
            edition, self.inserted_matches, self.already_present, self.inserted_participants
        );
        for score in &self.unknown_scores {
            warn!("Edition {}: skipped match with unknown score {:?}", edition, score);
        }
        for failure in &self.failures {
            error!("Edition {}: {}", edition, failure);
        }
    }
}

/// Index participant ids to usernames for the winner/loser lookups. Covers
/// every participant, checked in or not, since forfeited entrants still
/// appear on the winning side of walkovers.
pub fn name_index(participants: &[ParticipantRecord]) -> HashMap<i64, String> {
    participants
        .iter()
        .map(|p| (p.id, p.name.clone()))
        .collect()
}

/// Build the canonical fact for one completed raw match.
///
/// Identity and race lookups are explicit parameters so a record can be
/// built (and tested) without any shared state. A lookup miss is fatal for
/// this record only.
pub fn build_match(
    raw: &MatchRecord,
    names: &HashMap<i64, String>,
    races: &HashMap<String, RacePair>,
) -> Result<Built, RecordError> {
    let (winner_id, loser_id) = match (raw.winner_id, raw.loser_id) {
        (Some(winner), Some(loser)) => (winner, loser),
        _ => return Err(RecordError::MissingOutcome { match_id: raw.id }),
    };

    let winner_name = lookup_name(names, raw.id, winner_id)?;
    let loser_name = lookup_name(names, raw.id, loser_id)?;
    let winner_race = lookup_main_race(races, raw.id, winner_name)?;
    let loser_race = lookup_main_race(races, raw.id, loser_name)?;

    let round = raw
        .round_number()
        .ok_or_else(|| RecordError::MalformedRound {
            match_id: raw.id,
            raw: raw.round.to_string(),
        })?;

    let (winner_games, loser_games) = match score::normalize(&raw.scores_csv).stored_scores() {
        Some(scores) => scores,
        None => {
            return Ok(Built::Skip {
                score: raw.scores_csv.clone(),
            })
        }
    };

    Ok(Built::Fact(MatchFact {
        match_id: raw.id,
        tournament_id: raw.tournament_id,
        winner_id,
        loser_id,
        winner_games,
        loser_games,
        round,
        winner_race,
        loser_race,
    }))
}

/// Build facts for every completed match of an edition, folding the edition
/// aggregate as it goes. Skipped matches stay out of the round tracking,
/// and failures are collected without halting the pass.
pub fn build_edition(
    matches: &[MatchRecord],
    names: &HashMap<i64, String>,
    races: &HashMap<String, RacePair>,
    report: &mut IngestReport,
) -> (Vec<MatchFact>, EditionSummary) {
    let mut facts = Vec::new();
    let mut summary = EditionSummary::new();

    for raw in matches.iter().filter(|m| m.is_complete()) {
        match build_match(raw, names, races) {
            Ok(Built::Fact(fact)) => {
                summary.observe(fact.round);
                facts.push(fact);
            }
            Ok(Built::Skip { score }) => report.record_skip(score),
            Err(failure) => report.record_failure(failure),
        }
    }

    (facts, summary)
}

fn lookup_name<'a>(
    names: &'a HashMap<i64, String>,
    match_id: i64,
    participant_id: i64,
) -> Result<&'a str, RecordError> {
    names
        .get(&participant_id)
        .map(String::as_str)
        .ok_or(RecordError::UnknownParticipant {
            match_id,
            participant_id,
        })
}

fn lookup_main_race(
    races: &HashMap<String, RacePair>,
    match_id: i64,
    name: &str,
) -> Result<String, RecordError> {
    races
        .get(name)
        .map(|pair| pair.main.clone())
        .ok_or_else(|| RecordError::MissingRosterEntry {
            match_id,
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Elimination;
    use serde_json::json;

    fn raw_match(id: i64, scores_csv: &str, round: i32, winner: i64, loser: i64) -> MatchRecord {
        MatchRecord {
            id,
            tournament_id: 9000,
            state: "complete".to_string(),
            winner_id: Some(winner),
            loser_id: Some(loser),
            scores_csv: scores_csv.to_string(),
            round: json!(round),
            started_at: Some("2024-09-10T19:00:00Z".to_string()),
        }
    }

    fn lookups() -> (HashMap<i64, String>, HashMap<String, RacePair>) {
        let names = HashMap::from([(1, "A".to_string()), (2, "B".to_string())]);
        let races = HashMap::from([
            (
                "A".to_string(),
                RacePair {
                    main: "Zerg".to_string(),
                    off: "Terran".to_string(),
                },
            ),
            (
                "B".to_string(),
                RacePair {
                    main: "Terran".to_string(),
                    off: "Protoss".to_string(),
                },
            ),
        ]);
        (names, races)
    }

    #[test]
    fn builds_a_fact_from_a_played_match() {
        let (names, races) = lookups();
        let raw = raw_match(42, "2-1", 3, 1, 2);

        let built = build_match(&raw, &names, &races).unwrap();
        let Built::Fact(fact) = built else {
            panic!("expected a fact");
        };

        assert_eq!(fact.match_id, 42);
        assert_eq!(fact.winner_games, 2);
        assert_eq!(fact.loser_games, 1);
        assert_eq!(fact.round, 3);
        assert_eq!(fact.winner_race, "Zerg");
        assert_eq!(fact.loser_race, "Terran");
    }

    #[test]
    fn walkover_keeps_the_sentinel_scores() {
        let (names, races) = lookups();
        let raw = raw_match(43, "0--1", 1, 2, 1);

        let Built::Fact(fact) = build_match(&raw, &names, &races).unwrap() else {
            panic!("expected a fact");
        };
        assert_eq!((fact.winner_games, fact.loser_games), (0, -1));
    }

    #[test]
    fn unrecognized_score_is_skipped() {
        let (names, races) = lookups();
        let raw = raw_match(44, "weird", 1, 1, 2);

        let built = build_match(&raw, &names, &races).unwrap();
        assert_eq!(
            built,
            Built::Skip {
                score: "weird".to_string()
            }
        );
    }

    #[test]
    fn unknown_participant_is_a_record_error() {
        let (names, races) = lookups();
        let raw = raw_match(45, "2-0", 1, 7, 2);

        let err = build_match(&raw, &names, &races).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownParticipant {
                match_id: 45,
                participant_id: 7
            }
        );
    }

    #[test]
    fn missing_roster_entry_is_a_record_error() {
        let (names, _) = lookups();
        let races = HashMap::new();
        let raw = raw_match(46, "2-0", 1, 1, 2);

        let err = build_match(&raw, &names, &races).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingRosterEntry {
                match_id: 46,
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn malformed_round_is_a_record_error() {
        let (names, races) = lookups();
        let mut raw = raw_match(47, "2-0", 1, 1, 2);
        raw.round = json!("semis");

        let err = build_match(&raw, &names, &races).unwrap_err();
        assert_eq!(
            err,
            RecordError::MalformedRound {
                match_id: 47,
                raw: "\"semis\"".to_string()
            }
        );
    }

    #[test]
    fn edition_pass_collects_failures_without_halting() {
        let (names, races) = lookups();
        let matches = vec![
            raw_match(1, "2-0", 1, 1, 2),
            raw_match(2, "2-0", 2, 7, 2), // unknown participant
            raw_match(3, "3-2", -1, 2, 1),
        ];

        let mut report = IngestReport::default();
        let (facts, summary) = build_edition(&matches, &names, &races, &mut report);

        assert_eq!(facts.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(summary.elimination, Elimination::Double);
        assert_eq!(summary.rounds, 2);
    }

    #[test]
    fn pending_matches_never_reach_the_builder() {
        let (names, races) = lookups();
        let mut pending = raw_match(4, "", 1, 1, 2);
        pending.state = "open".to_string();

        let mut report = IngestReport::default();
        let (facts, summary) = build_edition(&[pending], &names, &races, &mut report);

        assert!(facts.is_empty());
        assert!(report.is_clean());
        assert_eq!(summary.rounds, 0);
    }

    #[test]
    fn skipped_matches_stay_out_of_round_tracking() {
        let (names, races) = lookups();
        let matches = vec![
            raw_match(5, "2-1", 1, 1, 2),
            raw_match(6, "weird", 5, 1, 2),
        ];

        let mut report = IngestReport::default();
        let (facts, summary) = build_edition(&matches, &names, &races, &mut report);

        assert_eq!(facts.len(), 1);
        assert_eq!(report.unknown_scores, vec!["weird".to_string()]);
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.elimination, Elimination::Single);
    }

    // The full two-match scenario: one played, one with a score nobody has
    // seen before.
    #[test]
    fn mixed_edition_yields_one_fact_and_one_diagnostic() {
        let (names, races) = lookups();
        let matches = vec![
            raw_match(10, "2-1", 1, 1, 2),
            raw_match(11, "weird", 2, 1, 2),
        ];

        let mut report = IngestReport::default();
        let (facts, summary) = build_edition(&matches, &names, &races, &mut report);

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].winner_games, 2);
        assert_eq!(facts[0].loser_games, 1);
        assert_eq!(facts[0].round, 1);
        assert_eq!(report.unknown_scores.len(), 1);
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.elimination, Elimination::Single);
    }
}
