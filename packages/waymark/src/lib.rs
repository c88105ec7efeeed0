//! Client-side navigation for single-page applications.
//!
//! - [`history`]: where the current location comes from.
//! - [`router`]: matching the location against a route table and navigating.
//! - [`pages`]: identifying pages and deciding when their state can go.

#![deny(missing_docs)]

pub use waymark_history as history;

#[cfg(feature = "router")]
pub use waymark_router as router;

#[cfg(feature = "pages")]
pub use waymark_pages as pages;

/// Everything needed to route, navigate and track page state.
pub mod prelude {
    pub use waymark_history::{ListenerHandle, Locator, MemoryLocator};

    #[cfg(feature = "router")]
    pub use waymark_router::prelude::*;

    #[cfg(feature = "pages")]
    pub use waymark_pages::prelude::*;
}
