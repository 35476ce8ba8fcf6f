pub mod builder;
pub mod models;
pub mod score;

pub use builder::{build_edition, build_match, name_index, Built, IngestReport};
pub use models::{EditionSummary, Elimination, MatchFact, MatchRecord, ParticipantRecord};
pub use score::{normalize, Outcome};
