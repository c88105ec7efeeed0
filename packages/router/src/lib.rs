#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod fragment;
pub mod matcher;
pub mod navigation;
pub mod parameters;

mod error;
mod route;
mod router_cfg;
mod state;
mod store;

pub use error::RouterError;
pub use fragment::UrlFragment;
pub use matcher::{ComplexRouteMatching, RouteMatchResult, RouteMatchStrategy};
pub use navigation::NavigationRequest;
pub use parameters::RouteParameters;
pub use route::Route;
pub use router_cfg::{RouterConfig, RouterMode};
pub use state::{RouteHit, RouterState};
pub use store::RouterStore;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::{
        ComplexRouteMatching, NavigationRequest, Route, RouteHit, RouteMatchResult,
        RouteMatchStrategy, RouteParameters, RouterConfig, RouterError, RouterMode, RouterState,
        RouterStore, UrlFragment,
    };
    pub use waymark_history::{ListenerHandle, Locator, MemoryLocator};
}
