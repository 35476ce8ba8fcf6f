use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{AliasRow, PlayerRow};
use crate::roster::PlayerIdentity;

/// Insert the canonical player if absent. Returns true when a row was added.
pub fn insert_player_if_absent(conn: &mut DbConn, identity: &PlayerIdentity) -> Result<bool> {
    if find_by_name(conn, &identity.canonical_name)?.is_some() {
        return Ok(false);
    }

    let sql = "INSERT INTO players (name, main_race, country, team, off_race) VALUES (?1, ?2, ?3, ?4, ?5)";
    conn.execute(
        sql,
        params![
            identity.canonical_name,
            identity.main_race,
            identity.country,
            identity.team,
            identity.off_race
        ],
    )
    .context("Failed to insert new player")?;

    Ok(true)
}

pub fn find_by_name(conn: &mut DbConn, name: &str) -> Result<Option<PlayerRow>> {
    let sql = "SELECT name, main_race, country, team, off_race FROM players WHERE name = ?1";

    conn.query_row(sql, params![name], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}

/// Bind a Challonge username to its canonical player if absent.
pub fn insert_alias_if_absent(
    conn: &mut DbConn,
    challonge_name: &str,
    canonical_name: &str,
) -> Result<bool> {
    if find_alias(conn, challonge_name)?.is_some() {
        return Ok(false);
    }

    let sql = "INSERT INTO challonge_names (challonge_name, name) VALUES (?1, ?2)";
    conn.execute(sql, params![challonge_name, canonical_name])
        .context("Failed to insert new challonge name")?;

    Ok(true)
}

pub fn find_alias(conn: &mut DbConn, challonge_name: &str) -> Result<Option<AliasRow>> {
    let sql = "SELECT challonge_name, name FROM challonge_names WHERE challonge_name = ?1";

    conn.query_row(sql, params![challonge_name], |row| {
        Ok(AliasRow {
            challonge_name: row.get(0)?,
            name: row.get(1)?,
        })
    })
    .optional()
    .context("Failed to query challonge name")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<PlayerRow>> {
    let sql = "SELECT name, main_race, country, team, off_race FROM players";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerRow> {
    Ok(PlayerRow {
        name: row.get(0)?,
        main_race: row.get(1)?,
        country: row.get(2)?,
        team: row.get(3)?,
        off_race: row.get(4)?,
    })
}
