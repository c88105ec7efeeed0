use crate::page_id::PageId;

/// An error produced by a [`PageEvictionStrategy`](crate::PageEvictionStrategy).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvictionError {
    /// A tracked page had no entry in the page map handed to the strategy.
    ///
    /// Every page that was hit must have state in the page map until it is evicted or closed.
    #[error("no page state for tracked page {0}")]
    MissingPageState(PageId),
}
