//! The seam between the dispatch loop and whatever feeds it updates.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AllowedUpdate, Update};

/// Supplies batches of updates to the dispatch loop.
///
/// The HTTP client implements this against the platform's long-poll endpoint;
/// tests implement it with scripted batches.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetches the next batch. `offset` is the smallest unseen update id;
    /// `timeout_secs` is the server-side long-poll wait; `allowed_updates`
    /// is the category allow-list.
    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
        allowed_updates: &[AllowedUpdate],
    ) -> Result<Vec<Update>>;
}
