//! Stable identities for the pages of an application.

use std::{borrow::Borrow, collections::HashSet, fmt};

use url::{form_urlencoded, Url};

/// The identity of a page, used to key per-page state.
///
/// Two URLs that show the same page produce the same [`PageId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PageId(String);

impl PageId {
    /// Wrap an already computed identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Derives the [`PageId`] of a URL.
pub trait PageIdAlgorithm {
    /// The identity of the page shown at `url`.
    fn page_id(&self, url: &Url) -> PageId;
}

/// Identifies pages by their path and search parameters.
///
/// The search parameters are sorted by name, then by value, so their order in the URL never
/// matters. Parameters listed as ignored are left out entirely. The scheme, host and hash of
/// the URL never contribute.
///
/// ```rust
/// # use url::Url;
/// # use waymark_pages::{PageIdAlgorithm, PathAndSearchPageId};
/// let algorithm = PathAndSearchPageId::new(["session"]);
///
/// let a = algorithm.page_id(&Url::parse("https://a.com/p?y=2&x=1&session=abc#top").unwrap());
/// let b = algorithm.page_id(&Url::parse("http://b.org/p?x=1&y=2").unwrap());
///
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "/p?x=1&y=2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathAndSearchPageId {
    ignored_parameters: HashSet<String>,
}

impl PathAndSearchPageId {
    /// Create the algorithm, leaving out the search parameters named in `ignored`.
    pub fn new<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_parameters: ignored.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether the search parameter `name` is left out of page ids.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_parameters.contains(name)
    }
}

impl PageIdAlgorithm for PathAndSearchPageId {
    fn page_id(&self, url: &Url) -> PageId {
        let mut pairs: Vec<_> = url
            .query_pairs()
            .filter(|(name, _)| !self.is_ignored(name))
            .collect();
        pairs.sort();

        let search = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();

        PageId(format!("{}?{search}", url.path()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn id(algorithm: &impl PageIdAlgorithm, url: &str) -> String {
        algorithm
            .page_id(&Url::parse(url).unwrap())
            .as_str()
            .to_string()
    }

    #[test]
    fn origin_and_hash_never_matter() {
        let algorithm = PathAndSearchPageId::default();

        assert_eq!(
            id(&algorithm, "https://a.com/p?x=1&y=2#h1"),
            id(&algorithm, "https://b.com/p?y=2&x=1#h2")
        );
    }

    #[test]
    fn always_has_a_search_separator() {
        let algorithm = PathAndSearchPageId::default();

        assert_eq!(id(&algorithm, "https://a.com/"), "/?");
        assert_eq!(id(&algorithm, "https://a.com/docs#intro"), "/docs?");
    }

    #[test]
    fn repeated_names_sort_by_value() {
        let algorithm = PathAndSearchPageId::default();

        assert_eq!(id(&algorithm, "https://a.com/t?tag=b&tag=a"), "/t?tag=a&tag=b");
        assert_eq!(
            id(&algorithm, "https://a.com/t?tag=a&tag=b"),
            id(&algorithm, "https://a.com/t?tag=b&tag=a")
        );
    }

    #[test]
    fn path_and_values_distinguish_pages() {
        let algorithm = PathAndSearchPageId::default();

        assert_ne!(id(&algorithm, "https://a.com/p?x=1"), id(&algorithm, "https://a.com/q?x=1"));
        assert_ne!(id(&algorithm, "https://a.com/p?x=1"), id(&algorithm, "https://a.com/p?x=2"));
    }

    #[test]
    fn ignored_parameters_are_dropped() {
        let algorithm = PathAndSearchPageId::new(["utm_source", "session"]);

        assert!(algorithm.is_ignored("session"));
        assert_eq!(
            id(&algorithm, "https://a.com/p?session=1&x=1&utm_source=mail"),
            "/p?x=1"
        );
        assert_eq!(id(&algorithm, "https://a.com/p?session=1"), "/p?");
    }

    #[test]
    fn values_are_normalized_through_decoding() {
        let algorithm = PathAndSearchPageId::default();

        assert_eq!(
            id(&algorithm, "https://a.com/s?q=a%20b"),
            id(&algorithm, "https://a.com/s?q=a+b")
        );
        assert_eq!(id(&algorithm, "https://a.com/s?q=a%20b"), "/s?q=a+b");
    }
}
