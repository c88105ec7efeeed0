use std::fmt;

/// A route the router can match the current location against.
///
/// The expression combines three sections, mirroring the URL it is matched against:
///
/// - **path**: literal text with `{name}` placeholders, each matching one path segment,
/// - **search**: `key={+}` (required), `key={*}` (optional) or `key=literal` (exact),
/// - **hash**: a regular expression, whose named groups (`(?<name>...)`) become parameters.
///
/// ```rust
/// # use waymark_router::Route;
/// let route = Route::new("/users/{id}?tab={*}#(?<section>.*)").named("user");
/// assert_eq!(route.name(), Some("user"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    expression: String,
    #[cfg_attr(feature = "serde", serde(default))]
    name: Option<String>,
}

impl Route {
    /// Create a route from its expression.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            name: None,
        }
    }

    /// Give the route a name, so it can be found with
    /// [`RouterStore::route_named`](crate::RouterStore::route_named).
    ///
    /// Names must be unique among the routes passed to a [`RouterStore`](crate::RouterStore).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The route expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The name of the route, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<&str> for Route {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl From<String> for Route {
    fn from(expression: String) -> Self {
        Self::new(expression)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.expression),
            None => f.write_str(&self.expression),
        }
    }
}
