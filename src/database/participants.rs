use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::ParticipantRow;

/// Insert a per-edition participant binding if absent. Returns true when a
/// row was added.
pub fn insert_participant_if_absent(conn: &mut DbConn, row: &ParticipantRow) -> Result<bool> {
    if find_by_challonge_id(conn, row.challonge_id)?.is_some() {
        return Ok(false);
    }

    let sql = "INSERT INTO participants (challonge_id, challonge_name, account_id, tournament_id) VALUES (?1, ?2, ?3, ?4)";
    conn.execute(
        sql,
        params![
            row.challonge_id,
            row.challonge_name,
            row.account_id,
            row.tournament_id
        ],
    )
    .context("Failed to insert new participant")?;

    Ok(true)
}

pub fn find_by_challonge_id(conn: &mut DbConn, challonge_id: i64) -> Result<Option<ParticipantRow>> {
    let sql = "SELECT challonge_id, challonge_name, account_id, tournament_id FROM participants WHERE challonge_id = ?1";

    conn.query_row(sql, params![challonge_id], parse_participant_row)
        .optional()
        .context("Failed to query participant by challonge id")
}

pub fn list_by_tournament(conn: &mut DbConn, tournament_id: i64) -> Result<Vec<ParticipantRow>> {
    let sql = "SELECT challonge_id, challonge_name, account_id, tournament_id FROM participants WHERE tournament_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<ParticipantRow> {
    Ok(ParticipantRow {
        challonge_id: row.get(0)?,
        challonge_name: row.get(1)?,
        account_id: row.get(2)?,
        tournament_id: row.get(3)?,
    })
}
