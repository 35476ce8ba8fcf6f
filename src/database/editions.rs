use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::EditionRow;

/// Insert the per-edition aggregate row if absent. Returns true when a row
/// was added.
pub fn insert_edition_if_absent(conn: &mut DbConn, row: &EditionRow) -> Result<bool> {
    if find_by_number(conn, row.number)?.is_some() {
        return Ok(false);
    }

    let sql = "INSERT INTO editions (tournament_id, number, elimination, rounds, started_at) VALUES (?1, ?2, ?3, ?4, ?5)";
    conn.execute(
        sql,
        params![
            row.tournament_id,
            row.number,
            row.elimination,
            row.rounds,
            row.started_at
        ],
    )
    .context("Failed to insert new edition")?;

    Ok(true)
}

pub fn find_by_number(conn: &mut DbConn, number: u32) -> Result<Option<EditionRow>> {
    let sql = "SELECT tournament_id, number, elimination, rounds, started_at FROM editions WHERE number = ?1";

    conn.query_row(sql, params![number], parse_edition_row)
        .optional()
        .context("Failed to query edition by number")
}

pub fn find_by_tournament_id(conn: &mut DbConn, tournament_id: i64) -> Result<Option<EditionRow>> {
    let sql = "SELECT tournament_id, number, elimination, rounds, started_at FROM editions WHERE tournament_id = ?1";

    conn.query_row(sql, params![tournament_id], parse_edition_row)
        .optional()
        .context("Failed to query edition by tournament id")
}

fn parse_edition_row(row: &rusqlite::Row) -> rusqlite::Result<EditionRow> {
    Ok(EditionRow {
        tournament_id: row.get(0)?,
        number: row.get(1)?,
        elimination: row.get(2)?,
        rounds: row.get(3)?,
        started_at: row.get(4)?,
    })
}
