pub mod archive;
pub mod ingestion;
