use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Canonical player record from the roster reference file, keyed by the
/// standardized name used across editions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub canonical_name: String,
    pub main_race: String,
    pub country: String,
    pub team: String,
    pub off_race: String,
}

/// Main and off race for one roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacePair {
    pub main: String,
    pub off: String,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Normal Name")]
    canonical_name: String,
    #[serde(rename = "Race")]
    main_race: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "OffRace")]
    off_race: String,
}

/// Roster lookups keyed by Challonge username. Multiple usernames may alias
/// to one canonical player.
#[derive(Debug, Default)]
pub struct Roster {
    aliases: HashMap<String, String>,
    races: HashMap<String, RacePair>,
    identities: HashMap<String, PlayerIdentity>,
}

impl Roster {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read roster file {path:?}"))?;
        let text = decode_roster_bytes(&bytes)?;
        Self::parse(&text)
    }

    /// Parse tab-separated roster text with a `Name`, `Normal Name`, `Race`,
    /// `Country`, `Team`, `OffRace` header.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(text.as_bytes());

        let mut roster = Self::default();
        for row in reader.deserialize::<RosterRow>() {
            let row = row.context("Failed to parse roster row")?;
            roster.add_row(row);
        }

        Ok(roster)
    }

    fn add_row(&mut self, row: RosterRow) {
        self.aliases
            .insert(row.name.clone(), row.canonical_name.clone());
        self.races.insert(
            row.name,
            RacePair {
                main: row.main_race.clone(),
                off: row.off_race.clone(),
            },
        );
        self.identities
            .entry(row.canonical_name.clone())
            .or_insert(PlayerIdentity {
                canonical_name: row.canonical_name,
                main_race: row.main_race,
                country: row.country,
                team: row.team,
                off_race: row.off_race,
            });
    }

    pub fn contains(&self, username: &str) -> bool {
        self.aliases.contains_key(username)
    }

    pub fn canonical_name(&self, username: &str) -> Option<&str> {
        self.aliases.get(username).map(String::as_str)
    }

    pub fn identity_for(&self, username: &str) -> Option<&PlayerIdentity> {
        self.canonical_name(username)
            .and_then(|name| self.identities.get(name))
    }

    /// Race lookup keyed by username, as the match builder consumes it.
    pub fn races(&self) -> &HashMap<String, RacePair> {
        &self.races
    }

    /// Usernames with no roster entry, for the pre-ingest gate. Each unknown
    /// name has to be added to the roster file before the edition can be
    /// ingested.
    pub fn unknown_names<'a, I>(&self, usernames: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut unknown: Vec<String> = usernames
            .into_iter()
            .filter(|name| !self.contains(name))
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

/// Roster exports have been saved both as UTF-16 (tab-separated spreadsheet
/// export) and as plain UTF-8; sniff the BOM and decode accordingly.
fn decode_roster_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }

    String::from_utf8(bytes.to_vec()).context("Roster file is neither UTF-16 nor UTF-8")
}

fn decode_utf16(bytes: &[u8], read_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        anyhow::bail!("UTF-16 roster file has an odd byte length");
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| read_unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).context("Roster file is not valid UTF-16")
}
