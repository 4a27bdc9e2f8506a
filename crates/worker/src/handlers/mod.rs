//! One `JobHandler` per `TaskKind` (spec §2 "Data flow"), registered with the
//! `JobExecutor` in `main.rs`.

pub mod enrich_item;
pub mod match_items_task;
pub mod parse_task;
pub mod recalc_aggregates;

pub use enrich_item::EnrichItemHandler;
pub use match_items_task::MatchItemsHandler;
pub use parse_task::ParseTaskHandler;
pub use recalc_aggregates::RecalcAggregatesHandler;
