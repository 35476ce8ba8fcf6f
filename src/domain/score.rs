use log::warn;

/// Canonical outcome of one raw score string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A played best-of-N result.
    Games { winner: i32, loser: i32 },
    /// Match decided without games played (forfeit / no-show).
    Walkover,
    /// A score string the classifier has never seen; the match is dropped.
    Unrecognized,
}

impl Outcome {
    /// Scores as stored in the archive. Walkovers keep the 0 / -1 sentinel
    /// pair, which never collides with a real game count; Unrecognized is
    /// never persisted.
    pub fn stored_scores(&self) -> Option<(i32, i32)> {
        match self {
            Outcome::Games { winner, loser } => Some((*winner, *loser)),
            Outcome::Walkover => Some((0, -1)),
            Outcome::Unrecognized => None,
        }
    }
}

// Every score string players have entered for each result, each verified by
// hand once. Upstream entry is inconsistent about whether the winner's games
// come first, so the strings are matched literally rather than parsed game
// by game.
const WALKOVERS: &[&str] = &[
    "0--1", "2-99", "990-0", "69-0", "-99-99", "99-0", "0-99", "0-0", "0--99", "99-1", "0-98",
    "-1-0",
];
const ONE_ZERO: &[&str] = &["0-1", "1-0"];
const TWO_ZERO: &[&str] = &["1-0,1-0", "0-2", "0-1,0-1", "2-0"];
const TWO_ONE: &[&str] = &["0-1,1-0,0-1", "1-2", "2-1", "0-1,1-0,1-0"];
const THREE_ZERO: &[&str] = &["3-0", "0-3"];
const THREE_ONE: &[&str] = &["0-1,0-1,1-0,0-1", "3-1", "1-0,0-1,0-1,0-1", "1-3"];
const THREE_TWO: &[&str] = &["2-3", "3-2"];

const GAME_CLASSES: &[(&[&str], i32, i32)] = &[
    (ONE_ZERO, 1, 0),
    (TWO_ZERO, 2, 0),
    (TWO_ONE, 2, 1),
    (THREE_ZERO, 3, 0),
    (THREE_ONE, 3, 1),
    (THREE_TWO, 3, 2),
];

/// Map a raw Challonge score string onto a canonical outcome.
///
/// An empty string is silently unrecognized; any other unmatched string is
/// logged so it can be triaged and added to the tables above.
pub fn normalize(score: &str) -> Outcome {
    if score.is_empty() {
        return Outcome::Unrecognized;
    }

    if WALKOVERS.contains(&score) {
        return Outcome::Walkover;
    }

    for (class, winner, loser) in GAME_CLASSES {
        if class.contains(&score) {
            return Outcome::Games {
                winner: *winner,
                loser: *loser,
            };
        }
    }

    warn!("{score} is unknown to the system");
    Outcome::Unrecognized
}
