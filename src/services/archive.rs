use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use log::{info, warn};

use crate::cache::Cache;
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, EditionRow, ParticipantRow};
use crate::domain::builder::{self, IngestReport};
use crate::domain::models::{
    EditionSummary, MatchEnvelope, MatchRecord, ParticipantEnvelope, ParticipantRecord,
};
use crate::errors;
use crate::roster::Roster;

/// Normalizes cached editions and persists them into the archive database.
pub struct ArchiveService {
    config: AppConfig,
    cache: Cache,
}

impl ArchiveService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::new(&config.storage.cache_dir)?,
            config,
        })
    }

    /// Create the archive tables.
    pub fn setup(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.storage.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::create_tables(&mut conn)
    }

    /// Ingest one cached edition.
    pub fn ingest_edition(&self, edition: u32) -> Result<()> {
        info!("=== Starting Edition Ingest ===\n");

        let pool = database::create_pool(&self.config.storage.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::create_tables(&mut conn)?;

        let roster = Roster::load(&self.config.storage.roster_path)?;
        let report = self.ingest_into(&mut conn, &roster, edition)?;
        report.log_summary(edition);

        info!("=== Ingest Complete ===");
        Ok(())
    }

    /// Ingest every cached edition from 1 through `through`. An edition
    /// missing from the cache is logged and skipped; the rest still load.
    pub fn backfill(&self, through: u32) -> Result<()> {
        info!("=== Starting Backfill (1..={}) ===\n", through);

        let pool = database::create_pool(&self.config.storage.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::create_tables(&mut conn)?;

        let roster = Roster::load(&self.config.storage.roster_path)?;

        for edition in 1..=through {
            if !self.cache.has_edition(edition) {
                warn!("Edition {} is not cached; skipping", edition);
                continue;
            }

            let report = self.ingest_into(&mut conn, &roster, edition)?;
            report.log_summary(edition);
        }

        info!("=== Backfill Complete ===");
        Ok(())
    }

    /// The full pass for one edition: roster gate, participant upserts,
    /// match normalization, edition aggregate.
    pub fn ingest_into(
        &self,
        conn: &mut DbConn,
        roster: &Roster,
        edition: u32,
    ) -> Result<IngestReport> {
        let participants = self.load_cached_participants(edition)?;
        let matches = self.load_cached_matches(edition)?;

        self.check_roster_gate(roster, &participants)?;

        let mut report = IngestReport::default();
        self.insert_participant_records(conn, roster, &participants, &mut report)?;

        let names = builder::name_index(&participants);
        let (facts, summary) = builder::build_edition(&matches, &names, roster.races(), &mut report);

        for fact in &facts {
            if database::matches::insert_match_if_absent(conn, fact)? {
                report.inserted_matches += 1;
            } else {
                report.already_present += 1;
            }
        }

        self.insert_edition_row(conn, edition, &matches, &summary)?;
        Ok(report)
    }

    // --- Helper Methods ---

    fn load_cached_participants(&self, edition: u32) -> Result<Vec<ParticipantRecord>> {
        let value = self
            .cache
            .load_participants(edition)?
            .with_context(|| format!("Edition {} has no cached participants", edition))?;

        let envelopes: Vec<ParticipantEnvelope> =
            serde_json::from_value(value).context(errors::parse_context("cached participants"))?;

        Ok(envelopes.into_iter().map(|e| e.participant).collect())
    }

    fn load_cached_matches(&self, edition: u32) -> Result<Vec<MatchRecord>> {
        let value = self
            .cache
            .load_matches(edition)?
            .with_context(|| format!("Edition {} has no cached matches", edition))?;

        let envelopes: Vec<MatchEnvelope> =
            serde_json::from_value(value).context(errors::parse_context("cached matches"))?;

        Ok(envelopes.into_iter().map(|e| e.match_record).collect())
    }

    /// Every participant username must resolve through the roster before
    /// anything is written; unknown names are a data gap to fix upstream.
    fn check_roster_gate(&self, roster: &Roster, participants: &[ParticipantRecord]) -> Result<()> {
        let unknown = roster.unknown_names(participants.iter().map(|p| p.name.as_str()));
        if unknown.is_empty() {
            return Ok(());
        }

        anyhow::bail!(
            "{} participant name(s) missing from the roster file, add them and re-run: {}",
            unknown.len(),
            unknown.join(", ")
        )
    }

    fn insert_participant_records(
        &self,
        conn: &mut DbConn,
        roster: &Roster,
        participants: &[ParticipantRecord],
        report: &mut IngestReport,
    ) -> Result<()> {
        for participant in participants {
            let identity = roster
                .identity_for(&participant.name)
                .with_context(|| format!("{:?} passed the roster gate but has no identity", participant.name))?;

            database::players::insert_player_if_absent(conn, identity)?;
            database::players::insert_alias_if_absent(
                conn,
                &participant.name,
                &identity.canonical_name,
            )?;

            // Entrants who never checked in stay out of the participants
            // table but keep their alias and player rows.
            if !participant.checked_in() {
                continue;
            }

            let row = ParticipantRow {
                challonge_id: participant.id,
                challonge_name: participant.name.clone(),
                account_id: participant.challonge_user_id,
                tournament_id: participant.tournament_id,
            };

            if database::participants::insert_participant_if_absent(conn, &row)? {
                report.inserted_participants += 1;
            }
        }

        Ok(())
    }

    fn insert_edition_row(
        &self,
        conn: &mut DbConn,
        edition: u32,
        matches: &[MatchRecord],
        summary: &EditionSummary,
    ) -> Result<()> {
        let first = matches
            .first()
            .with_context(|| format!("Edition {} has no matches cached", edition))?;

        let row = EditionRow {
            tournament_id: first.tournament_id,
            number: edition,
            elimination: summary.elimination.as_str().to_string(),
            rounds: summary.rounds,
            started_at: first.started_at.as_deref().map(normalize_start_date),
        };

        database::editions::insert_edition_if_absent(conn, &row)?;
        Ok(())
    }
}

/// Challonge writes RFC 3339 timestamps; the archive keeps year/month/day
/// only. An unparseable value is stored as-is rather than lost.
fn normalize_start_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y/%m/%d").to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return date.format("%Y/%m/%d").to_string();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;
    use crate::database::{create_memory_pool, get_connection};
    use serde_json::json;

    const ROSTER_TEXT: &str = "\
Name\tNormal Name\tRace\tCountry\tTeam\tOffRace
karp_main\tKarp\tZerg\tCA\tFins\tTerran
TerranTim\tTim\tTerran\tUS\tNone\tRandom
";

    fn service_with_temp_cache(tag: &str) -> (ArchiveService, std::path::PathBuf) {
        let temp_dir = std::env::temp_dir().join(format!("cup_archive_test_{tag}"));
        let _ = std::fs::remove_dir_all(&temp_dir);

        let mut config = AppConfig::new();
        config.storage.cache_dir = temp_dir.to_string_lossy().to_string();

        (ArchiveService::new(config).unwrap(), temp_dir)
    }

    fn cache_edition(cache: &Cache, edition: u32) {
        let participants = json!([
            {"participant": {"id": 1, "name": "karp_main", "challonge_user_id": 11, "tournament_id": 9000, "final_rank": 1}},
            {"participant": {"id": 2, "name": "TerranTim", "challonge_user_id": 22, "tournament_id": 9000, "final_rank": 2}},
            {"participant": {"id": 3, "name": "karp_main", "challonge_user_id": 11, "tournament_id": 9000, "final_rank": null}}
        ]);
        let matches = json!([
            {"match": {"id": 100, "tournament_id": 9000, "state": "complete", "winner_id": 1, "loser_id": 2, "scores_csv": "2-1", "round": 1, "started_at": "2024-09-10T19:00:00+00:00"}},
            {"match": {"id": 101, "tournament_id": 9000, "state": "complete", "winner_id": 2, "loser_id": 1, "scores_csv": "weird", "round": 2, "started_at": "2024-09-10T20:00:00+00:00"}},
            {"match": {"id": 102, "tournament_id": 9000, "state": "open", "winner_id": null, "loser_id": null, "scores_csv": "", "round": 3}}
        ]);

        cache.save_participants(edition, &participants).unwrap();
        cache.save_matches(edition, &matches).unwrap();
    }

    #[test]
    fn ingests_a_cached_edition_end_to_end() {
        let (service, temp_dir) = service_with_temp_cache("ingest");
        cache_edition(&service.cache, 5);

        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::create_tables(&mut conn).unwrap();

        let roster = Roster::parse(ROSTER_TEXT).unwrap();
        let report = service.ingest_into(&mut conn, &roster, 5).unwrap();

        // One played match persisted, the unknown score skipped.
        assert_eq!(report.inserted_matches, 1);
        assert_eq!(report.unknown_scores, vec!["weird".to_string()]);
        assert!(report.failures.is_empty());
        // Third entrant never checked in.
        assert_eq!(report.inserted_participants, 2);

        let stored = database::matches::find_by_match_id(&mut conn, 100)
            .unwrap()
            .unwrap();
        assert_eq!(stored.winner_games, 2);
        assert_eq!(stored.loser_games, 1);
        assert_eq!(stored.winner_race.as_deref(), Some("Zerg"));

        let edition = database::editions::find_by_number(&mut conn, 5)
            .unwrap()
            .unwrap();
        assert_eq!(edition.elimination, "single");
        assert_eq!(edition.rounds, 1);
        assert_eq!(edition.started_at.as_deref(), Some("2024/09/10"));

        // Re-ingest adds nothing new.
        let second = service.ingest_into(&mut conn, &roster, 5).unwrap();
        assert_eq!(second.inserted_matches, 0);
        assert_eq!(second.already_present, 1);
        assert_eq!(second.inserted_participants, 0);

        std::fs::remove_dir_all(&temp_dir).unwrap();
    }

    #[test]
    fn unknown_participant_names_block_the_edition() {
        let (service, temp_dir) = service_with_temp_cache("gate");
        cache_edition(&service.cache, 6);

        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::create_tables(&mut conn).unwrap();

        let roster = Roster::parse("Name\tNormal Name\tRace\tCountry\tTeam\tOffRace\n").unwrap();
        let err = service.ingest_into(&mut conn, &roster, 6).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("TerranTim"), "message: {message}");
        assert!(message.contains("karp_main"), "message: {message}");

        std::fs::remove_dir_all(&temp_dir).unwrap();
    }

    #[test]
    fn start_dates_are_normalized_to_day_precision() {
        assert_eq!(normalize_start_date("2024-09-10T19:00:00+00:00"), "2024/09/10");
        assert_eq!(normalize_start_date("2024/09/10"), "2024/09/10");
        assert_eq!(normalize_start_date("sometime"), "sometime");
    }
}
