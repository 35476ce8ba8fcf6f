pub mod challonge_client;

pub use challonge_client::ChallongeClient;
