//! Matching URL fragments against route expressions.

use regex::Regex;
use tracing::{trace, warn};

use crate::{fragment::UrlFragment, route::Route};

/// The outcome of matching a URL fragment against a [`Route`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteMatchResult {
    /// Whether the fragment matched the route.
    pub is_match: bool,
    /// The parameters captured from the path, search and hash sections, in that order.
    ///
    /// Always empty if [`is_match`](Self::is_match) is [`false`].
    pub parameters: Vec<(String, Option<String>)>,
}

impl RouteMatchResult {
    /// A failed match.
    pub fn no_match() -> Self {
        Self::default()
    }

    fn matched(parameters: Vec<(String, Option<String>)>) -> Self {
        Self {
            is_match: true,
            parameters,
        }
    }

    /// Look up the value of a captured parameter, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.parameters
            .iter()
            .find(|(k, _)| k.to_lowercase() == name)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// A strategy deciding whether a URL fragment matches a route.
///
/// Implementations must not panic; a URL that doesn't match is a [`RouteMatchResult::no_match`].
pub trait RouteMatchStrategy {
    /// Match `url_fragment` (everything after the origin) against `route`.
    fn match_url(&self, url_fragment: &str, route: &Route) -> RouteMatchResult;
}

/// Matches all three sections of a URL against a route expression.
///
/// - The path is matched case-insensitively and in full, with `{name}` placeholders capturing
///   a single segment each. A trailing slash on either side is ignored.
/// - Every search parameter declared by the route must be satisfied, while parameters the
///   route doesn't mention are still passed along.
/// - A route hash is a case-insensitive regular expression matched against the whole hash.
///
/// ```rust
/// # use waymark_router::{ComplexRouteMatching, Route, RouteMatchStrategy};
/// let result = ComplexRouteMatching.match_url(
///     "/Orders/42?view=full#line-3",
///     &Route::new("/orders/{orderId}?view={+}#line-(?<line>\\d+)"),
/// );
///
/// assert!(result.is_match);
/// assert_eq!(result.get("orderid"), Some("42"));
/// assert_eq!(result.get("view"), Some("full"));
/// assert_eq!(result.get("line"), Some("3"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ComplexRouteMatching;

impl RouteMatchStrategy for ComplexRouteMatching {
    fn match_url(&self, url_fragment: &str, route: &Route) -> RouteMatchResult {
        let mut url = UrlFragment::parse(url_fragment);
        let mut expected = UrlFragment::parse(route.expression());
        url.clean_slashes();
        expected.clean_slashes();

        let Some(path) = match_path(&url, &expected) else {
            trace!(route = %route, url = url_fragment, "path does not match");
            return RouteMatchResult::no_match();
        };
        let Some(search) = match_search(&url, &expected) else {
            trace!(route = %route, url = url_fragment, "search does not match");
            return RouteMatchResult::no_match();
        };
        let Some(hash) = match_hash(&url, &expected) else {
            trace!(route = %route, url = url_fragment, "hash does not match");
            return RouteMatchResult::no_match();
        };

        let mut parameters: Captured = Vec::with_capacity(path.len() + search.len() + hash.len());
        for (key, value) in path.into_iter().chain(search).chain(hash) {
            let lowered = key.to_lowercase();
            match parameters.iter_mut().find(|(k, _)| k.to_lowercase() == lowered) {
                Some(existing) => existing.1 = value,
                None => parameters.push((key, value)),
            }
        }

        trace!(route = %route, url = url_fragment, "matched");
        RouteMatchResult::matched(parameters)
    }
}

type Captured = Vec<(String, Option<String>)>;

fn match_path(url: &UrlFragment, expected: &UrlFragment) -> Option<Captured> {
    let mut pattern = String::from("(?i)^");
    let mut names = Vec::new();
    let mut rest = expected.path().trim_end_matches('/');

    while let Some(open) = rest.find('{') {
        let Some(length) = rest[open..].find('}') else {
            break;
        };
        let close = open + length;
        pattern.push_str(&regex::escape(&rest[..open]));
        pattern.push_str("([^/?#]+)");
        names.push(&rest[open + 1..close]);
        rest = &rest[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push_str("/?$");

    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(err) => {
            warn!(path = expected.path(), %err, "route path cannot be compiled");
            return None;
        }
    };
    let captures = regex.captures(url.path())?;

    Some(
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let value = captures.get(i + 1).map(|m| m.as_str().to_string());
                (name.to_string(), value)
            })
            .collect(),
    )
}

fn match_search(url: &UrlFragment, expected: &UrlFragment) -> Option<Captured> {
    let mut parameters: Captured = url
        .search_parameters()
        .iter()
        .map(|(k, v)| (k.clone(), Some(v.clone())))
        .collect();

    for (key, requirement) in expected.search_parameters() {
        let actual = url.search_parameter(key);
        match requirement.as_str() {
            "{+}" => {
                if actual.map_or(true, str::is_empty) {
                    return None;
                }
            }
            "{*}" => {
                if actual.is_none() {
                    parameters.push((key.clone(), None));
                }
            }
            literal => {
                if actual != Some(literal) {
                    return None;
                }
            }
        }
    }

    Some(parameters)
}

fn match_hash(url: &UrlFragment, expected: &UrlFragment) -> Option<Captured> {
    if expected.hash().is_empty() {
        return Some(Vec::new());
    }

    // the expression has to compile on its own to stay inside the anchoring group
    let regex = match Regex::new(expected.hash())
        .and_then(|_| Regex::new(&format!("(?i)^(?:{})$", expected.hash())))
    {
        Ok(regex) => regex,
        Err(err) => {
            warn!(hash = expected.hash(), %err, "route hash is not a valid regular expression");
            return None;
        }
    };
    let captures = regex.captures(url.hash())?;

    Some(
        regex
            .capture_names()
            .flatten()
            .map(|name| {
                let value = captures.name(name).map(|m| m.as_str().to_string());
                (name.to_string(), value)
            })
            .collect(),
    )
}
