//! Odds Acquisition Module
//! Mission: Supply raw event snapshots to the pipeline
//! Philosophy: The engine never knows where its odds came from

pub mod simulated;
pub mod upstream;

use async_trait::async_trait;

use crate::models::RawEvent;

/// Source of raw odds snapshots.
///
/// Implementations own their I/O and randomness; callers only see the
/// returned batch. Scheduling and retry policy live with the caller.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fetch the current raw event snapshot
    async fn fetch_events(&self) -> anyhow::Result<Vec<RawEvent>>;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

pub use simulated::SimulatedOddsFeed;
pub use upstream::UpstreamOddsFeed;
