/// Row types mirroring the archive tables.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub name: String,
    pub main_race: String,
    pub country: String,
    pub team: String,
    pub off_race: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
    pub challonge_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionRow {
    pub tournament_id: i64,
    pub number: u32,
    pub elimination: String,
    pub rounds: i32,
    pub started_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub challonge_id: i64,
    pub challonge_name: String,
    pub account_id: Option<i64>,
    pub tournament_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub match_id: i64,
    pub tournament_id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub winner_games: i32,
    pub loser_games: i32,
    pub round: i32,
    pub winner_race: Option<String>,
    pub loser_race: Option<String>,
}
