/// Configuration for [`LruPageStateEvictions`](crate::LruPageStateEvictions).
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use waymark_pages::EvictionConfig;
/// let cfg = EvictionConfig::default()
///     .target_number_pages_in_cache(5)
///     .ignored_parameter("session");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvictionConfig {
    pub(crate) target_number_pages_in_cache: usize,
    pub(crate) ignored_parameters: Vec<String>,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            target_number_pages_in_cache: 10,
            ignored_parameters: Vec::new(),
        }
    }
}

impl EvictionConfig {
    /// The number of pages to keep state for.
    ///
    /// This is a soft limit: pinned pages are never evicted, so more pages may be kept for a
    /// while. Defaults to 10.
    pub fn target_number_pages_in_cache(self, target: usize) -> Self {
        Self {
            target_number_pages_in_cache: target,
            ..self
        }
    }

    /// Leave the search parameter `name` out of page ids.
    ///
    /// URLs that only differ in ignored parameters share their page state.
    pub fn ignored_parameter(mut self, name: impl Into<String>) -> Self {
        self.ignored_parameters.push(name.into());
        self
    }
}
