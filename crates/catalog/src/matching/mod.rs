//! Fuzzy matching (spec §4.3): a stateless scorer plus the category-blocked
//! candidate lookup that feeds it.

pub mod matcher;
pub mod scorer;
pub mod types;
pub mod worker;

pub use matcher::{match_against, MatcherConfig};
pub use types::{MatchCandidate, MatchResult, MatchStatusOutcome};
pub use worker::MatchingWorker;

use uuid::Uuid;

use crate::category::CategoryRepository;
use crate::product::ProductRepository;
use crate::error::Result;

/// Default bound on the candidate window handed to the scorer (spec §4.6
/// "at most a bounded candidate window (e.g., 1000)").
pub const DEFAULT_CANDIDATE_WINDOW: i64 = 1000;

/// Resolves the candidate product set for a supplier item and scores it.
/// When the item has a `category_id`, candidates are restricted to that
/// category's subtree (spec §4.3 "category blocking"); with no category the
/// matcher short-circuits to `needs_category` without scoring.
pub async fn match_item(
    query_name: &str,
    category_id: Option<Uuid>,
    categories: &dyn CategoryRepository,
    products: &dyn ProductRepository,
    config: &MatcherConfig,
) -> Result<MatchResult> {
    let Some(category_id) = category_id else {
        return Ok(MatchResult::needs_category());
    };

    let subtree = categories.subtree_ids(category_id).await?;
    let candidates = products.list_candidates(Some(&subtree), DEFAULT_CANDIDATE_WINDOW).await?;

    Ok(match_against(query_name, &candidates, config))
}
