// Topic labeler trait — swap-ready abstraction.
//
// The summary builder asks for labels through this trait, one labeler per
// granularity. The default implementation is the salience scorer, but any
// ranking over the same scopes (e.g. a PMI-based one) can be dropped in.

use anyhow::Result;

use super::salience::{Granularity, LabelEntry};
use super::stats::Scope;

/// Produces ranked labels for a topic or topic/year scope.
///
/// `Sync` because per-year scans run in parallel over a shared labeler.
pub trait TopicLabeler: Sync {
    /// Which kind of term this labeler ranks.
    fn granularity(&self) -> Granularity;

    /// At most `k` labels for `scope`, best first.
    fn label(&self, scope: Scope, k: usize) -> Result<Vec<LabelEntry>>;
}
