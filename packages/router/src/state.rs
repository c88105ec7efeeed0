use url::Url;

use crate::{parameters::RouteParameters, route::Route};

/// A route that matched the current location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteHit {
    /// The route that matched.
    pub route: Route,
    /// The location it matched against.
    pub url: Url,
    /// The parameters captured by the match.
    pub parameters: RouteParameters,
}

/// The current routing information.
///
/// The state is replaced as a whole whenever it changes; it is never patched in place.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouterState {
    /// The route matching the current location, if any.
    pub current_hit: Option<RouteHit>,

    /// Whether the router follows changes of the location.
    pub is_connected: bool,
}

impl RouterState {
    /// Check whether the current location matched the route named `name`.
    #[must_use]
    pub fn is_at(&self, name: &str) -> bool {
        self.current_hit
            .as_ref()
            .and_then(|hit| hit.route.name())
            .is_some_and(|n| n == name)
    }
}
