use crate::fragment::collapse_slashes;

/// How the router maps routes onto the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RouterMode {
    /// Routes live in the path of the location and navigation uses the history API.
    History,
    /// Routes live in the fragment (`#/users/5`) of the location.
    Hash,
}

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use waymark_router::{RouterConfig, RouterMode};
/// let cfg = RouterConfig::default().root("/app/").mode(RouterMode::Hash);
/// ```
///
/// With the `serde` feature the configuration can also be read from a configuration file;
/// missing fields take their default values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    pub(crate) root: String,
    pub(crate) mode: Option<RouterMode>,
}

impl RouterConfig {
    /// The path the application is served from.
    ///
    /// Routes are matched against the location with this prefix removed, and navigation puts
    /// it back in. Defaults to the domain root.
    pub fn root(self, root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..self
        }
    }

    /// Force a [`RouterMode`].
    ///
    /// Defaults to [`RouterMode::History`] if the locator supports the history API, and to
    /// [`RouterMode::Hash`] otherwise.
    pub fn mode(self, mode: RouterMode) -> Self {
        Self {
            mode: Some(mode),
            ..self
        }
    }
}

/// Normalize a configured root.
///
/// Anything from the first `?` or `#` on is dropped, doubled slashes collapse, and the result
/// starts but doesn't end with `/`. The domain root is the empty string.
pub(crate) fn normalize_root(root: &str) -> String {
    let end = root.find(|c: char| c == '?' || c == '#').unwrap_or(root.len());
    let root = collapse_slashes(&root[..end]);
    let root = root.trim_end_matches('/');

    match root.is_empty() || root.starts_with('/') {
        true => root.to_string(),
        false => format!("/{root}"),
    }
}
