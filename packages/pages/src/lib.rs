#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod lru;
pub mod page_id;

mod error;
mod eviction_cfg;

pub use error::EvictionError;
pub use eviction_cfg::EvictionConfig;
pub use lru::{LruPageStateEvictions, PageEvictionStrategy, PageHit, PageState};
pub use page_id::{PageId, PageIdAlgorithm, PathAndSearchPageId};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::{
        EvictionConfig, EvictionError, LruPageStateEvictions, PageEvictionStrategy, PageHit,
        PageId, PageIdAlgorithm, PageState, PathAndSearchPageId,
    };
}
