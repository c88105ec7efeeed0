//! Deciding which page state to drop as the user moves through an application.

use std::collections::HashMap;

use slab::Slab;
use tracing::{debug, error, trace};
use url::Url;
use waymark_router::RouteHit;

use crate::{
    error::EvictionError,
    eviction_cfg::EvictionConfig,
    page_id::{PageId, PageIdAlgorithm, PathAndSearchPageId},
};

/// The parts of a page's state that decide whether it may be evicted.
pub trait PageState {
    /// Whether the user is editing something on the page.
    fn is_in_edit_mode(&self) -> bool;

    /// Whether the page is waiting for the answer to a request it made.
    fn has_page_request(&self) -> bool;

    /// The number of requests that were made to the page and are still open.
    fn open_request_count(&self) -> usize;

    /// A pinned page must not be evicted.
    fn is_pinned(&self) -> bool {
        self.is_in_edit_mode() || self.has_page_request() || self.open_request_count() > 0
    }
}

/// Anything that identifies the page the user navigated to.
pub trait PageHit {
    /// The URL of the page.
    fn url(&self) -> &Url;
}

impl PageHit for Url {
    fn url(&self) -> &Url {
        self
    }
}

impl PageHit for RouteHit {
    fn url(&self) -> &Url {
        &self.url
    }
}

/// Decides which pages lose their state.
///
/// The page map belongs to the caller. Strategies only read it, and the caller drops the
/// state of the pages a strategy returns.
pub trait PageEvictionStrategy<P: PageState> {
    /// Record a visit to the page of `hit` and return the pages whose state should be dropped.
    fn evictions_on_hit(
        &mut self,
        hit: &impl PageHit,
        page_map: &HashMap<PageId, P>,
    ) -> Result<Vec<PageId>, EvictionError>;

    /// Forget the page `page_id`, pinned or not.
    fn on_page_closed(&mut self, page_id: &PageId);
}

#[derive(Debug)]
struct Node {
    page_id: PageId,
    previous: Option<usize>,
    next: Option<usize>,
}

/// Keeps the state of the most recently used pages.
///
/// Pages are kept in a list ordered from the most to the least recently hit. Whenever the
/// list grows beyond the target size, the least recently used pages that aren't
/// [pinned](PageState::is_pinned) are evicted until the list is back at its target. The page
/// that was just hit is never evicted by that same hit.
///
/// ```rust
/// # use std::collections::HashMap;
/// # use url::Url;
/// # use waymark_pages::{EvictionConfig, LruPageStateEvictions, PageEvictionStrategy, PageId, PageState};
/// struct Page;
/// impl PageState for Page {
///     fn is_in_edit_mode(&self) -> bool { false }
///     fn has_page_request(&self) -> bool { false }
///     fn open_request_count(&self) -> usize { 0 }
/// }
///
/// let mut lru = LruPageStateEvictions::new(EvictionConfig::default().target_number_pages_in_cache(1));
/// let mut pages: HashMap<PageId, Page> = HashMap::new();
///
/// for path in ["/a", "/b"] {
///     let url = Url::parse(&format!("https://example.com{path}")).unwrap();
///     for evicted in lru.evictions_on_hit(&url, &pages).unwrap() {
///         pages.remove(&evicted);
///     }
///     pages.insert(PageId::from(format!("{path}?")), Page);
/// }
///
/// assert_eq!(pages.keys().collect::<Vec<_>>(), [&PageId::from("/b?")]);
/// ```
#[derive(Debug)]
pub struct LruPageStateEvictions<A = PathAndSearchPageId> {
    target_number_pages_in_cache: usize,
    algorithm: A,
    nodes: Slab<Node>,
    index: HashMap<PageId, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LruPageStateEvictions {
    /// Create the strategy, identifying pages with [`PathAndSearchPageId`].
    pub fn new(config: EvictionConfig) -> Self {
        Self::with_algorithm(
            config.target_number_pages_in_cache,
            PathAndSearchPageId::new(config.ignored_parameters),
        )
    }
}

impl Default for LruPageStateEvictions {
    fn default() -> Self {
        Self::new(EvictionConfig::default())
    }
}

impl<A> LruPageStateEvictions<A> {
    /// Create the strategy with a custom [`PageIdAlgorithm`].
    pub fn with_algorithm(target_number_pages_in_cache: usize, algorithm: A) -> Self {
        Self {
            target_number_pages_in_cache,
            algorithm,
            nodes: Slab::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// The number of pages kept when none of them are pinned.
    pub fn target_number_pages_in_cache(&self) -> usize {
        self.target_number_pages_in_cache
    }

    /// The algorithm identifying pages.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// The number of tracked pages.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check whether no pages are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check whether `page_id` is tracked.
    pub fn contains(&self, page_id: &PageId) -> bool {
        self.index.contains_key(page_id)
    }

    /// The tracked pages, from the most to the least recently used.
    pub fn page_ids(&self) -> impl Iterator<Item = &PageId> + '_ {
        std::iter::successors(self.head.and_then(|key| self.nodes.get(key)), |node| {
            node.next.and_then(|key| self.nodes.get(key))
        })
        .map(|node| &node.page_id)
    }

    /// Move `page_id` to the front of the list, tracking it if it's new.
    fn touch(&mut self, page_id: PageId) -> usize {
        if let Some(&key) = self.index.get(&page_id) {
            if self.head != Some(key) {
                self.unlink(key);
                self.push_front(key);
            }
            return key;
        }

        trace!(%page_id, "tracking page");
        let key = self.nodes.insert(Node {
            page_id: page_id.clone(),
            previous: None,
            next: None,
        });
        self.index.insert(page_id, key);
        self.push_front(key);
        key
    }

    fn push_front(&mut self, key: usize) {
        let next = self.head;
        if let Some(node) = self.nodes.get_mut(key) {
            node.previous = None;
            node.next = next;
        }

        // the old head must point back at its new predecessor
        match next {
            Some(next) => {
                if let Some(node) = self.nodes.get_mut(next) {
                    node.previous = Some(key);
                }
            }
            None => self.tail = Some(key),
        }
        self.head = Some(key);
    }

    fn unlink(&mut self, key: usize) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let previous = node.previous.take();
        let next = node.next.take();

        match previous {
            Some(previous) => {
                if let Some(node) = self.nodes.get_mut(previous) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next) => {
                if let Some(node) = self.nodes.get_mut(next) {
                    node.previous = previous;
                }
            }
            None => self.tail = previous,
        }
    }

    fn remove(&mut self, key: usize) -> Option<PageId> {
        self.unlink(key);
        let node = self.nodes.try_remove(key)?;
        self.index.remove(&node.page_id);
        Some(node.page_id)
    }

    /// Pick the least recently used pages that may be evicted, skipping `hit`.
    ///
    /// Nothing is removed yet, so a missing page state leaves the list as it was.
    fn eviction_candidates<P: PageState>(
        &self,
        hit: usize,
        page_map: &HashMap<PageId, P>,
    ) -> Result<Vec<usize>, EvictionError> {
        let excess = self.len().saturating_sub(self.target_number_pages_in_cache);
        let mut candidates = Vec::with_capacity(excess);
        let mut cursor = self.tail;

        while let Some(key) = cursor {
            if candidates.len() == excess {
                break;
            }
            let Some(node) = self.nodes.get(key) else {
                break;
            };
            cursor = node.previous;
            if key == hit {
                continue;
            }

            let Some(state) = page_map.get(&node.page_id) else {
                error!(page_id = %node.page_id, "tracked page has no page state");
                return Err(EvictionError::MissingPageState(node.page_id.clone()));
            };
            if state.is_pinned() {
                trace!(page_id = %node.page_id, "page is pinned");
                continue;
            }
            candidates.push(key);
        }

        Ok(candidates)
    }
}

impl<A: PageIdAlgorithm, P: PageState> PageEvictionStrategy<P> for LruPageStateEvictions<A> {
    /// Fails with [`EvictionError::MissingPageState`] if a page that had to be checked for
    /// eviction has no state in `page_map`. The hit itself is recorded regardless.
    fn evictions_on_hit(
        &mut self,
        hit: &impl PageHit,
        page_map: &HashMap<PageId, P>,
    ) -> Result<Vec<PageId>, EvictionError> {
        let page_id = self.algorithm.page_id(hit.url());
        let key = self.touch(page_id);

        if self.len() <= self.target_number_pages_in_cache {
            return Ok(Vec::new());
        }

        let evicted: Vec<PageId> = self
            .eviction_candidates(key, page_map)?
            .into_iter()
            .filter_map(|key| self.remove(key))
            .collect();

        if self.len() > self.target_number_pages_in_cache {
            debug!(
                tracked = self.len(),
                target = self.target_number_pages_in_cache,
                "pinned pages keep the cache above its target"
            );
        }
        if !evicted.is_empty() {
            debug!(?evicted, "evicting page state");
        }
        Ok(evicted)
    }

    fn on_page_closed(&mut self, page_id: &PageId) {
        if let Some(key) = self.index.get(page_id).copied() {
            self.remove(key);
            debug!(%page_id, "page closed");
        }
    }
}
