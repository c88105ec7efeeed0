use std::{cell::Cell, rc::Rc};

use pretty_assertions::assert_eq;
use url::Url;
use waymark_router::prelude::*;

fn routes() -> Vec<Route> {
    vec![
        Route::new("/users/{id}").named("user"),
        Route::new("/search?q={+}").named("search"),
        Route::new("/").named("home"),
    ]
}

fn store_at(url: &str, config: RouterConfig) -> (Rc<MemoryLocator>, RouterStore) {
    let locator = Rc::new(MemoryLocator::with_initial_url(url).unwrap());
    let store = RouterStore::new(config, routes(), locator.clone()).unwrap();
    (locator, store)
}

fn current(store: &RouterStore) -> Option<String> {
    store
        .current_hit()
        .and_then(|hit| hit.route.name().map(str::to_string))
}

#[test]
fn nothing_happens_before_connecting() {
    let (_, store) = store_at("https://example.com/users/1", RouterConfig::default());

    assert_eq!(store.state(), RouterState::default());
    assert!(!store.is_connected());
}

#[test]
fn connecting_evaluates_the_current_location() {
    let (_, store) = store_at("https://example.com/users/1", RouterConfig::default());
    store.connect();

    assert!(store.is_connected());
    let hit = store.current_hit().unwrap();
    assert_eq!(hit.route.name(), Some("user"));
    assert_eq!(hit.url.as_str(), "https://example.com/users/1");
    assert_eq!(hit.parameters.get("id"), Some("1"));
}

#[test]
fn unmatched_location_has_no_hit() {
    let (_, store) = store_at("https://example.com/nowhere", RouterConfig::default());
    store.connect();

    assert!(store.is_connected());
    assert_eq!(store.current_hit(), None);
}

#[test]
fn first_matching_route_wins() {
    let locator = Rc::new(MemoryLocator::with_initial_url("https://example.com/users/me").unwrap());
    let store = RouterStore::new(
        RouterConfig::default(),
        vec![
            Route::new("/users/me").named("me"),
            Route::new("/users/{id}").named("user"),
        ],
        locator,
    )
    .unwrap();
    store.connect();

    assert!(store.state().is_at("me"));
}

#[test]
fn history_mode_pushes_and_replaces_entries() {
    let (locator, store) = store_at("https://example.com/", RouterConfig::default());
    store.connect();

    store.navigate_to_path("/users/5", false).unwrap();
    assert_eq!(locator.location().as_str(), "https://example.com/users/5");
    assert_eq!(locator.back_len(), 1);

    store.navigate_to_path("/search?q=rust", true).unwrap();
    assert_eq!(locator.location().as_str(), "https://example.com/search?q=rust");
    assert_eq!(locator.back_len(), 1);
    assert_eq!(current(&store).as_deref(), Some("search"));
}

#[test]
fn external_location_changes_are_followed_while_connected() {
    let (locator, store) = store_at("https://example.com/", RouterConfig::default());
    store.connect();
    store.navigate_to_path("/users/5", false).unwrap();

    locator.go_back();
    assert_eq!(current(&store).as_deref(), Some("home"));

    store.disconnect();
    locator.go_forward();
    assert_eq!(current(&store).as_deref(), Some("home"));
    assert!(!store.is_connected());

    store.connect();
    assert_eq!(current(&store).as_deref(), Some("user"));
}

#[test]
fn connect_and_disconnect_are_idempotent() {
    let (locator, store) = store_at("https://example.com/", RouterConfig::default());
    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let _handle = store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

    store.disconnect();
    assert_eq!(notified.get(), 0);

    store.connect();
    store.connect();
    assert_eq!(notified.get(), 1);

    // a single subscription means a single evaluation per change
    locator.set_location(Url::parse("https://example.com/users/2").unwrap());
    assert_eq!(notified.get(), 2);

    store.disconnect();
    store.disconnect();
    assert_eq!(notified.get(), 3);
    assert!(!store.is_connected());
}

#[test]
fn navigating_while_disconnected_still_updates_the_hit() {
    let (locator, store) = store_at("https://example.com/", RouterConfig::default());

    store.navigate_to_path("/users/3", false).unwrap();

    assert_eq!(locator.location().path(), "/users/3");
    assert_eq!(current(&store).as_deref(), Some("user"));
    assert!(!store.is_connected());
}

#[test]
fn search_and_hash_values_keep_their_slashes() {
    let locator = Rc::new(MemoryLocator::with_initial_url("https://example.com/").unwrap());
    let store = RouterStore::new(
        RouterConfig::default(),
        vec![Route::new("/login?next={+}#(?<section>.*)").named("login")],
        locator.clone(),
    )
    .unwrap();
    store.connect();

    store
        .navigate_to_path("/login?next=https://other.example/x#docs//intro", false)
        .unwrap();

    assert_eq!(
        locator.location().as_str(),
        "https://example.com/login?next=https://other.example/x#docs//intro"
    );
    let hit = store.current_hit().unwrap();
    assert_eq!(hit.parameters.get("next"), Some("https://other.example/x"));
}

#[test]
fn root_is_stripped_and_restored() {
    let (locator, store) = store_at(
        "https://example.com/app/users/9?tab=info",
        RouterConfig::default().root("app/"),
    );
    store.connect();

    assert_eq!(store.root(), "/app");
    let hit = store.current_hit().unwrap();
    assert_eq!(hit.parameters.get_as_int("id"), Some(9));
    assert_eq!(hit.parameters.get("tab"), Some("info"));

    store.navigate_to_path("search?q=x", false).unwrap();
    assert_eq!(locator.location().as_str(), "https://example.com/app/search?q=x");
    assert_eq!(store.url("/users/1").unwrap().as_str(), "https://example.com/app/users/1");
}

#[test]
fn navigate_to_url_removes_the_root() {
    let (locator, store) = store_at("https://example.com/app/", RouterConfig::default().root("/app"));
    store.connect();

    let target = Url::parse("https://example.com/app/users/4").unwrap();
    store.navigate_to_url(&target, false).unwrap();

    assert_eq!(locator.location().path(), "/app/users/4");
    assert!(store.state().is_at("user"));
}

#[test]
fn hash_mode_routes_on_the_fragment() {
    let (locator, store) = store_at(
        "https://example.com/index.html#/users/8",
        RouterConfig::default().mode(RouterMode::Hash),
    );
    store.connect();
    assert!(store.state().is_at("user"));

    store.navigate_to_path("/search?q=hash", false).unwrap();
    assert_eq!(
        locator.location().as_str(),
        "https://example.com/index.html#/search?q=hash"
    );
    assert_eq!(locator.back_len(), 1);
    assert!(store.state().is_at("search"));

    store.navigate_to_path("/", true).unwrap();
    assert_eq!(locator.location().fragment(), Some("/"));
    assert_eq!(locator.back_len(), 1);
    assert!(store.state().is_at("home"));

    assert_eq!(store.href("/users/1"), "#/users/1");
}

#[test]
fn hash_mode_without_history_always_assigns_the_location() {
    let locator = Rc::new(
        MemoryLocator::with_initial_url("https://example.com/")
            .unwrap()
            .with_history(false),
    );
    let store = RouterStore::new(RouterConfig::default(), routes(), locator.clone()).unwrap();
    assert_eq!(store.mode(), RouterMode::Hash);

    store.navigate_to_path("/users/1", true).unwrap();

    assert_eq!(locator.location().fragment(), Some("/users/1"));
    assert_eq!(locator.back_len(), 1);
}

#[test]
fn hash_mode_navigate_to_url_uses_its_fragment() {
    let (locator, store) = store_at(
        "https://example.com/",
        RouterConfig::default().mode(RouterMode::Hash),
    );

    let target = Url::parse("https://example.com/#/users/6").unwrap();
    store.navigate_to_url(&target, false).unwrap();

    assert_eq!(locator.location().fragment(), Some("/users/6"));
    assert!(store.state().is_at("user"));
}

#[test]
fn navigation_requests() {
    let (locator, store) = store_at("https://example.com/", RouterConfig::default());

    store.navigate("/users/1").unwrap();
    assert_eq!(locator.location().path(), "/users/1");

    store
        .navigate(NavigationRequest::to_path("/users/2").replacing())
        .unwrap();
    assert_eq!(locator.location().path(), "/users/2");
    assert_eq!(locator.back_len(), 1);

    let both = NavigationRequest {
        url: Some(Url::parse("https://example.com/search?q=url").unwrap()),
        path: Some("/users/3".to_string()),
        replace_history_entry: false,
    };
    store.navigate(both).unwrap();
    assert_eq!(locator.location().path(), "/search");

    let empty = store.navigate(NavigationRequest::default());
    assert!(matches!(empty, Err(RouterError::EmptyNavigation)));
}

#[test]
fn lookups_by_name() {
    let (_, store) = store_at("https://example.com/", RouterConfig::default());

    assert_eq!(store.routes().len(), 3);
    assert_eq!(
        store.route_named("search").map(Route::expression),
        Some("/search?q={+}")
    );
    assert_eq!(store.route_named("missing"), None);
    assert_eq!(store.href("/users/1"), "/users/1");
}
