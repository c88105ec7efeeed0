use std::{
    cell::RefCell,
    collections::HashSet,
    fmt,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};
use url::{Position, Url};
use waymark_history::{ListenerHandle, ListenerSet, Locator};

use crate::{
    error::RouterError,
    fragment::collapse_slashes,
    matcher::{ComplexRouteMatching, RouteMatchStrategy},
    navigation::NavigationRequest,
    route::Route,
    router_cfg::{normalize_root, RouterConfig, RouterMode},
    state::{RouteHit, RouterState},
};

/// The core of the router.
///
/// This combines a route table and a [`Locator`] to find the route matching the current
/// location. Routes are tried in the order they were passed in, so more specific routes belong
/// in front of more general ones.
///
/// A [`RouterStore`] is an ordinary value owned by the host application; create as many as you
/// need. Once [connected](RouterStore::connect), it follows every change the locator reports
/// until it is [disconnected](RouterStore::disconnect) or dropped.
///
/// ```rust
/// # use std::rc::Rc;
/// # use waymark_history::{Locator, MemoryLocator};
/// # use waymark_router::{Route, RouterConfig, RouterStore};
/// let locator = Rc::new(MemoryLocator::with_initial_url("https://example.com/app/").unwrap());
/// let store = RouterStore::new(
///     RouterConfig::default().root("/app"),
///     vec![Route::new("/users/{id}").named("user"), Route::new("/").named("home")],
///     locator.clone(),
/// )
/// .unwrap();
///
/// store.connect();
/// assert!(store.state().is_at("home"));
///
/// store.navigate_to_path("/users/7", false).unwrap();
/// assert_eq!(locator.location().path(), "/app/users/7");
///
/// let hit = store.current_hit().unwrap();
/// assert_eq!(hit.parameters.get_as_int("id"), Some(7));
/// ```
pub struct RouterStore {
    inner: Rc<StoreInner>,
    connection: RefCell<Option<ListenerHandle>>,
}

struct StoreInner {
    root: String,
    mode: RouterMode,
    routes: Vec<Route>,
    strategy: Box<dyn RouteMatchStrategy>,
    locator: Rc<dyn Locator>,
    state: RefCell<RouterState>,
    observers: ListenerSet,
}

impl RouterStore {
    /// Create a new [`RouterStore`] using [`ComplexRouteMatching`].
    ///
    /// Fails if two routes share a name.
    pub fn new(
        config: RouterConfig,
        routes: Vec<Route>,
        locator: Rc<dyn Locator>,
    ) -> Result<Self, RouterError> {
        Self::with_strategy(config, routes, locator, ComplexRouteMatching)
    }

    /// Create a new [`RouterStore`] that decides matches with `strategy`.
    pub fn with_strategy(
        config: RouterConfig,
        routes: Vec<Route>,
        locator: Rc<dyn Locator>,
        strategy: impl RouteMatchStrategy + 'static,
    ) -> Result<Self, RouterError> {
        let mut names = HashSet::new();
        for name in routes.iter().filter_map(Route::name) {
            if !names.insert(name) {
                return Err(RouterError::DuplicateRouteName(name.to_string()));
            }
        }

        let mode = config.mode.unwrap_or(match locator.is_history_available() {
            true => RouterMode::History,
            false => RouterMode::Hash,
        });
        let root = normalize_root(&config.root);
        debug!(?mode, root = %root, routes = routes.len(), "router created");

        Ok(Self {
            inner: Rc::new(StoreInner {
                root,
                mode,
                routes,
                strategy: Box::new(strategy),
                locator,
                state: RefCell::new(RouterState::default()),
                observers: ListenerSet::new(),
            }),
            connection: RefCell::new(None),
        })
    }

    /// Start following the locator.
    ///
    /// Evaluates the current location right away. Connecting a connected router only
    /// re-evaluates.
    pub fn connect(&self) {
        {
            let mut connection = self.connection.borrow_mut();
            if connection.is_none() {
                let inner: Weak<StoreInner> = Rc::downgrade(&self.inner);
                *connection = Some(self.inner.locator.subscribe(Rc::new(move || {
                    if let Some(inner) = inner.upgrade() {
                        inner.evaluate();
                    }
                })));
                debug!("router connected");
            }
        }

        let hit = self.inner.find_hit();
        self.inner.update(|state| {
            state.current_hit = hit;
            state.is_connected = true;
        });
    }

    /// Stop following the locator. Does nothing if the router isn't connected.
    pub fn disconnect(&self) {
        if let Some(handle) = self.connection.borrow_mut().take() {
            handle.cancel();
            debug!("router disconnected");
        }
        self.inner.update(|state| state.is_connected = false);
    }

    /// Navigate to `path`, relative to the router root.
    ///
    /// In [`RouterMode::History`] a history entry for the root joined with `path` is pushed, or
    /// replaces the current one if `replace_history_entry` is set. In [`RouterMode::Hash`] the
    /// fragment of the location is rewritten instead.
    pub fn navigate_to_path(
        &self,
        path: &str,
        replace_history_entry: bool,
    ) -> Result<(), RouterError> {
        let inner = &self.inner;
        let locator = &inner.locator;

        match inner.mode {
            RouterMode::History => {
                let url = locator.location().join(&inner.absolute_path(path))?;
                debug!(%url, replace = replace_history_entry, "navigating");
                match replace_history_entry {
                    true => locator.replace_history_state("", &url),
                    false => locator.push_history_state("", &url),
                }
            }
            RouterMode::Hash => {
                let mut url = locator.location();
                url.set_fragment(Some(path));
                debug!(%url, replace = replace_history_entry, "navigating");
                match replace_history_entry && locator.is_history_available() {
                    true => locator.replace_history_state("", &url),
                    false => locator.set_location(url),
                }
            }
        }

        inner.evaluate();
        Ok(())
    }

    /// Navigate to an absolute `url`.
    ///
    /// The router root is removed from the URL, and the remainder is handed to
    /// [`navigate_to_path`](Self::navigate_to_path). In [`RouterMode::Hash`], a URL that carries
    /// a fragment navigates to that fragment.
    pub fn navigate_to_url(&self, url: &Url, replace_history_entry: bool) -> Result<(), RouterError> {
        let path = match (self.inner.mode, url.fragment()) {
            (RouterMode::Hash, Some(fragment)) => fragment,
            _ => strip_root(&url[Position::BeforePath..], &self.inner.root),
        };
        self.navigate_to_path(path, replace_history_entry)
    }

    /// Carry out a [`NavigationRequest`].
    ///
    /// Fails with [`RouterError::EmptyNavigation`] if the request has neither a URL nor a
    /// path; that is a programming error on the caller's side.
    pub fn navigate(&self, request: impl Into<NavigationRequest>) -> Result<(), RouterError> {
        let request = request.into();
        match (&request.url, &request.path) {
            (Some(url), _) => self.navigate_to_url(url, request.replace_history_entry),
            (None, Some(path)) => self.navigate_to_path(path, request.replace_history_entry),
            (None, None) => Err(RouterError::EmptyNavigation),
        }
    }

    /// The `href` for a link to `path`, without any navigation side effects.
    ///
    /// ```rust
    /// # use std::rc::Rc;
    /// # use waymark_history::MemoryLocator;
    /// # use waymark_router::{RouterConfig, RouterMode, RouterStore};
    /// let locator = Rc::new(MemoryLocator::default());
    /// let store = RouterStore::new(
    ///     RouterConfig::default().mode(RouterMode::Hash),
    ///     Vec::new(),
    ///     locator,
    /// )
    /// .unwrap();
    /// assert_eq!(store.href("/users"), "#/users");
    /// ```
    pub fn href(&self, path: &str) -> String {
        match self.inner.mode {
            RouterMode::History => path.to_string(),
            RouterMode::Hash => format!("#{path}"),
        }
    }

    /// Resolve `path` into an absolute URL below the origin of the locator and the router root.
    pub fn url(&self, path: &str) -> Result<Url, RouterError> {
        let location = self.inner.locator.location();
        Ok(location.join(&self.inner.absolute_path(path))?)
    }

    /// Be told whenever the [`RouterState`] changes.
    ///
    /// Re-evaluating a location to the same route hit is not a change.
    pub fn subscribe(&self, callback: Rc<dyn Fn()>) -> ListenerHandle {
        self.inner.observers.subscribe(callback)
    }

    /// A snapshot of the current state.
    ///
    /// The snapshot doesn't follow later changes; observe those with
    /// [`subscribe`](Self::subscribe).
    pub fn state(&self) -> RouterState {
        self.inner.state.borrow().clone()
    }

    /// The route matching the current location, if any.
    pub fn current_hit(&self) -> Option<RouteHit> {
        self.inner.state.borrow().current_hit.clone()
    }

    /// Whether the router follows changes of the location.
    pub fn is_connected(&self) -> bool {
        self.inner.state.borrow().is_connected
    }

    /// The mode the router runs in.
    pub fn mode(&self) -> RouterMode {
        self.inner.mode
    }

    /// The normalized router root. Empty for the domain root.
    pub fn root(&self) -> &str {
        &self.inner.root
    }

    /// The route table, in matching order.
    pub fn routes(&self) -> &[Route] {
        &self.inner.routes
    }

    /// Find the route named `name`.
    pub fn route_named(&self, name: &str) -> Option<&Route> {
        self.inner.routes.iter().find(|r| r.name() == Some(name))
    }
}

impl fmt::Debug for RouterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterStore")
            .field("root", &self.inner.root)
            .field("mode", &self.inner.mode)
            .field("routes", &self.inner.routes)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl StoreInner {
    /// Re-evaluate the current location and publish the result.
    fn evaluate(&self) {
        let hit = self.find_hit();
        self.update(|state| state.current_hit = hit);
    }

    /// Apply `change` to the state and notify observers if that changed anything.
    fn update(&self, change: impl FnOnce(&mut RouterState)) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let mut next = state.clone();
            change(&mut next);
            let changed = next != *state;
            *state = next;
            changed
        };

        if changed {
            self.observers.notify();
        }
    }

    fn find_hit(&self) -> Option<RouteHit> {
        let location = self.locator.location();
        let fragment = self.fragment_of(&location);

        let hit = self.routes.iter().find_map(|route| {
            let result = self.strategy.match_url(fragment, route);
            result.is_match.then(|| RouteHit {
                route: route.clone(),
                url: location.clone(),
                parameters: result.into(),
            })
        });

        match &hit {
            Some(hit) => trace!(route = %hit.route, fragment, "route hit"),
            None => trace!(fragment, "no route matches"),
        }
        hit
    }

    /// The part of `location` the routes are matched against.
    fn fragment_of<'a>(&self, location: &'a Url) -> &'a str {
        match self.mode {
            RouterMode::History => strip_root(&location[Position::BeforePath..], &self.root),
            RouterMode::Hash => location.fragment().unwrap_or_default(),
        }
    }

    /// Join the root and `path`. Only the path part collapses doubled slashes, the search and
    /// hash are kept verbatim.
    fn absolute_path(&self, path: &str) -> String {
        let split = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
        let (path, rest) = path.split_at(split);
        format!("{}{rest}", collapse_slashes(&format!("{}/{path}", self.root)))
    }
}

/// Remove `root` from the front of `full` (a path with optional search and hash).
///
/// Locations outside of the root are returned unchanged.
fn strip_root<'a>(full: &'a str, root: &str) -> &'a str {
    if root.is_empty() {
        return full;
    }

    match full.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with(|c: char| matches!(c, '/' | '?' | '#')) => {
            rest
        }
        _ => {
            trace!(location = full, root, "location is outside of the router root");
            full
        }
    }
}
