//! Append-only diagnostic stream (spec §3 `ParsingLog`): per-row parse and
//! matching failures are recorded here and swallowed rather than aborting
//! the enclosing task (spec §7 "Propagation").

pub mod model;
pub mod repository;

pub use model::ParsingLog;
pub use repository::{ParsingLogRepository, PostgresParsingLogRepository};
