//! Types relating to navigation.

use url::Url;

/// A request for the router to navigate somewhere.
///
/// Exactly one of `url` and `path` is expected to be set. If both are, the `url` wins; if
/// neither is, [`RouterStore::navigate`](crate::RouterStore::navigate) refuses the request.
///
/// ```rust
/// # use waymark_router::NavigationRequest;
/// let request = NavigationRequest::to_path("/users/5").replacing();
/// assert_eq!(request.path.as_deref(), Some("/users/5"));
/// assert!(request.replace_history_entry);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Navigate to this absolute URL.
    pub url: Option<Url>,
    /// Navigate to this path, relative to the router root.
    pub path: Option<String>,
    /// Replace the current history entry instead of pushing a new one.
    pub replace_history_entry: bool,
}

impl NavigationRequest {
    /// Navigate to a path below the router root.
    pub fn to_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Navigate to an absolute URL.
    pub fn to_url(url: Url) -> Self {
        Self {
            url: Some(url),
            ..Default::default()
        }
    }

    /// Replace the current history entry instead of pushing a new one.
    pub fn replacing(self) -> Self {
        Self {
            replace_history_entry: true,
            ..self
        }
    }
}

impl From<&str> for NavigationRequest {
    fn from(path: &str) -> Self {
        Self::to_path(path)
    }
}

impl From<Url> for NavigationRequest {
    fn from(url: Url) -> Self {
        Self::to_url(url)
    }
}
