//! Persisted raw supplier rows and the match-status state machine (spec §3,
//! §4.6) that the matching pipeline worker drives.

pub mod model;
pub mod repository;

pub use model::{MatchStatus, SupplierItem};
pub use repository::{PostgresSupplierItemRepository, SupplierItemRepository};
