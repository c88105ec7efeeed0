//! Splitting a raw URL fragment into its path, search and hash sections.

use std::{convert::Infallible, fmt, str::FromStr};

/// A URL fragment split into path, search parameters and hash.
///
/// The fragment is anything that follows the origin of a URL, like `/users/5?tab=posts#top`.
/// Parsing never fails; text that isn't shaped like a URL simply ends up in the path.
///
/// ```rust
/// # use waymark_router::UrlFragment;
/// let fragment = UrlFragment::parse("/users/5?Tab=posts&sort=new#top#more");
/// assert_eq!(fragment.path(), "/users/5");
/// assert_eq!(fragment.search_parameter("tab"), Some("posts"));
/// assert_eq!(fragment.hash(), "top#more");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlFragment {
    path: String,
    search_parameters: Vec<(String, String)>,
    hash: String,
}

impl UrlFragment {
    /// Split `raw` into its sections.
    ///
    /// - The search section only exists if there is a `?` that comes before the first `#`.
    /// - Search keys are lower-cased, values are kept verbatim (they are *not* URL-decoded).
    ///   A repeated key keeps its first position and its last value.
    /// - The hash is everything after the first `#`, including any further `#`.
    pub fn parse(raw: &str) -> Self {
        let question = raw.find('?');
        let hash_start = raw.find('#');

        let search_start = match (question, hash_start) {
            (Some(q), Some(h)) if q < h => Some(q),
            (Some(q), None) => Some(q),
            _ => None,
        };
        let path_end = match (question, hash_start) {
            (Some(q), Some(h)) => q.min(h),
            (Some(i), None) | (None, Some(i)) => i,
            (None, None) => raw.len(),
        };

        let search_parameters = match search_start {
            Some(q) => parse_search(&raw[q + 1..hash_start.unwrap_or(raw.len())]),
            None => Vec::new(),
        };

        Self {
            path: raw[..path_end].to_string(),
            search_parameters,
            hash: hash_start
                .map(|h| raw[h + 1..].to_string())
                .unwrap_or_default(),
        }
    }

    /// The path section.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The hash section, without the leading `#`. Empty if there is none.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The search parameters in the order they appeared.
    pub fn search_parameters(&self) -> &[(String, String)] {
        &self.search_parameters
    }

    /// Look up a search parameter. The key is compared case-insensitively.
    pub fn search_parameter(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.search_parameters
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Normalize the slashes of the path and the hash before matching.
    ///
    /// Leading slashes are removed from the path, and runs of slashes collapse into one in
    /// both the path and the hash.
    ///
    /// ```rust
    /// # use waymark_router::UrlFragment;
    /// let mut fragment = UrlFragment::parse("//users///5#a//b");
    /// fragment.clean_slashes();
    /// assert_eq!(fragment.path(), "users/5");
    /// assert_eq!(fragment.hash(), "a/b");
    /// ```
    pub fn clean_slashes(&mut self) {
        self.path = collapse_slashes(self.path.trim_start_matches('/'));
        self.hash = collapse_slashes(&self.hash);
    }
}

impl FromStr for UrlFragment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for UrlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.search_parameters.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        if !self.hash.is_empty() {
            write!(f, "#{}", self.hash)?;
        }
        Ok(())
    }
}

fn parse_search(search: &str) -> Vec<(String, String)> {
    let mut parameters: Vec<(String, String)> = Vec::new();

    for pair in search.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = key.to_lowercase();

        match parameters.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => parameters.push((key, value.to_string())),
        }
    }

    parameters
}

/// Collapse every run of `/` into a single `/`.
pub(crate) fn collapse_slashes(value: &str) -> String {
    let mut collapsed = String::with_capacity(value.len());
    let mut previous_was_slash = false;

    for c in value.chars() {
        let is_slash = c == '/';
        if !(is_slash && previous_was_slash) {
            collapsed.push(c);
        }
        previous_was_slash = is_slash;
    }

    collapsed
}
