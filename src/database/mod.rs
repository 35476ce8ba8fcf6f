pub mod connection;
pub mod editions;
pub mod matches;
pub mod models;
pub mod participants;
pub mod players;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchFact;
    use crate::roster::PlayerIdentity;

    fn test_conn() -> DbConn {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::create_tables(&mut conn).unwrap();
        conn
    }

    fn karp() -> PlayerIdentity {
        PlayerIdentity {
            canonical_name: "Karp".to_string(),
            main_race: "Zerg".to_string(),
            country: "CA".to_string(),
            team: "Fins".to_string(),
            off_race: "Terran".to_string(),
        }
    }

    #[test]
    fn create_tables_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::create_tables(&mut conn).unwrap();
        setup::create_tables(&mut conn).unwrap();
    }

    #[test]
    fn player_and_alias_inserts_are_idempotent() {
        let mut conn = test_conn();

        assert!(players::insert_player_if_absent(&mut conn, &karp()).unwrap());
        assert!(!players::insert_player_if_absent(&mut conn, &karp()).unwrap());

        assert!(players::insert_alias_if_absent(&mut conn, "karp_smurf", "Karp").unwrap());
        assert!(!players::insert_alias_if_absent(&mut conn, "karp_smurf", "Karp").unwrap());

        let alias = players::find_alias(&mut conn, "karp_smurf").unwrap().unwrap();
        assert_eq!(alias.name, "Karp");
        assert_eq!(players::list_all(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn participant_round_trip() {
        let mut conn = test_conn();

        let row = ParticipantRow {
            challonge_id: 111,
            challonge_name: "karp_smurf".to_string(),
            account_id: Some(4242),
            tournament_id: 9000,
        };

        assert!(participants::insert_participant_if_absent(&mut conn, &row).unwrap());
        assert!(!participants::insert_participant_if_absent(&mut conn, &row).unwrap());

        let listed = participants::list_by_tournament(&mut conn, 9000).unwrap();
        assert_eq!(listed, vec![row]);
    }

    #[test]
    fn match_round_trip_keeps_walkover_sentinels() {
        let mut conn = test_conn();

        let fact = MatchFact {
            match_id: 555,
            tournament_id: 9000,
            winner_id: 111,
            loser_id: 222,
            winner_games: 0,
            loser_games: -1,
            round: -2,
            winner_race: "Zerg".to_string(),
            loser_race: "Terran".to_string(),
        };

        assert!(matches::insert_match_if_absent(&mut conn, &fact).unwrap());
        assert!(!matches::insert_match_if_absent(&mut conn, &fact).unwrap());

        let stored = matches::find_by_match_id(&mut conn, 555).unwrap().unwrap();
        assert_eq!(stored.winner_games, 0);
        assert_eq!(stored.loser_games, -1);
        assert_eq!(stored.round, -2);
        assert_eq!(matches::list_by_tournament(&mut conn, 9000).unwrap().len(), 1);
    }

    #[test]
    fn edition_round_trip() {
        let mut conn = test_conn();

        let row = EditionRow {
            tournament_id: 9000,
            number: 104,
            elimination: "double".to_string(),
            rounds: 7,
            started_at: Some("2024/09/10".to_string()),
        };

        assert!(editions::insert_edition_if_absent(&mut conn, &row).unwrap());
        assert!(!editions::insert_edition_if_absent(&mut conn, &row).unwrap());

        let stored = editions::find_by_tournament_id(&mut conn, 9000).unwrap().unwrap();
        assert_eq!(stored, row);
        assert!(editions::find_by_number(&mut conn, 105).unwrap().is_none());
    }
}
