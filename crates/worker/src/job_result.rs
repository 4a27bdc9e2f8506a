//! Maps the pipeline's error taxonomy onto `JobResult` (spec §7): retryable
//! errors become `Retry`, everything else is terminal `Failed`.

use catalog_core::jobs::traits::JobResult;
use catalog_pipeline::error::CatalogError;

pub fn from_catalog_error(err: CatalogError) -> JobResult {
    if err.is_retryable() {
        JobResult::retry(err.to_string())
    } else {
        JobResult::failed(err.to_string())
    }
}
