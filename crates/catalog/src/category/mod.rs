//! Self-referential category tree (spec §9): ownership by id, cycle
//! prevention by ancestor-walk at insert time since the database alone
//! cannot forbid cycles in a `parent_id` self-reference.

pub mod model;
pub mod repository;

pub use model::Category;
pub use repository::{CategoryRepository, PostgresCategoryRepository};
