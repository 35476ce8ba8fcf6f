use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::MatchRow;
use crate::domain::MatchFact;

/// Insert a normalized match if absent, so an edition can be re-ingested
/// without duplicating rows. Returns true when a row was added.
pub fn insert_match_if_absent(conn: &mut DbConn, fact: &MatchFact) -> Result<bool> {
    if find_by_match_id(conn, fact.match_id)?.is_some() {
        return Ok(false);
    }

    let sql = "INSERT INTO matches (match_id, tournament_id, winner_id, loser_id, winner_games, loser_games, round, winner_race, loser_race) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
    conn.execute(
        sql,
        params![
            fact.match_id,
            fact.tournament_id,
            fact.winner_id,
            fact.loser_id,
            fact.winner_games,
            fact.loser_games,
            fact.round,
            fact.winner_race,
            fact.loser_race
        ],
    )
    .context("Failed to insert new match")?;

    Ok(true)
}

pub fn find_by_match_id(conn: &mut DbConn, match_id: i64) -> Result<Option<MatchRow>> {
    let sql = "SELECT match_id, tournament_id, winner_id, loser_id, winner_games, loser_games, round, winner_race, loser_race FROM matches WHERE match_id = ?1";

    conn.query_row(sql, params![match_id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_tournament(conn: &mut DbConn, tournament_id: i64) -> Result<Vec<MatchRow>> {
    let sql = "SELECT match_id, tournament_id, winner_id, loser_id, winner_games, loser_games, round, winner_race, loser_race FROM matches WHERE tournament_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    Ok(MatchRow {
        match_id: row.get(0)?,
        tournament_id: row.get(1)?,
        winner_id: row.get(2)?,
        loser_id: row.get(3)?,
        winner_games: row.get(4)?,
        loser_games: row.get(5)?,
        round: row.get(6)?,
        winner_race: row.get(7)?,
        loser_race: row.get(8)?,
    })
}
