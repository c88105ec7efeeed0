//! Keeping page state for the pages a router visits.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use pretty_assertions::assert_eq;
use waymark_pages::prelude::*;
use waymark_router::prelude::*;

#[derive(Default)]
struct Page {
    draft: Option<String>,
    loading: bool,
}

impl PageState for Page {
    fn is_in_edit_mode(&self) -> bool {
        self.draft.is_some()
    }

    fn has_page_request(&self) -> bool {
        self.loading
    }

    fn open_request_count(&self) -> usize {
        0
    }
}

#[derive(Default)]
struct PageManager {
    evictions: LruPageStateEvictions,
    pages: HashMap<PageId, Page>,
    evicted: Vec<PageId>,
}

impl PageManager {
    fn visit(&mut self, hit: &RouteHit) {
        let evicted = self.evictions.evictions_on_hit(hit, &self.pages).unwrap();
        for page in &evicted {
            self.pages.remove(page);
        }
        self.evicted.extend(evicted);

        let id = self.evictions.algorithm().page_id(&hit.url);
        self.pages.entry(id).or_default();
    }

    fn close(&mut self, id: &PageId) {
        PageEvictionStrategy::<Page>::on_page_closed(&mut self.evictions, id);
        self.pages.remove(id);
    }
}

fn setup(target: usize) -> (Rc<MemoryLocator>, RouterStore, Rc<RefCell<PageManager>>) {
    let locator = Rc::new(MemoryLocator::with_initial_url("https://shop.example/").unwrap());
    let store = RouterStore::new(
        RouterConfig::default(),
        vec![
            Route::new("/products/{id}").named("product"),
            Route::new("/cart").named("cart"),
            Route::new("/").named("home"),
        ],
        locator.clone(),
    )
    .unwrap();

    let manager = Rc::new(RefCell::new(PageManager {
        evictions: LruPageStateEvictions::new(
            EvictionConfig::default()
                .target_number_pages_in_cache(target)
                .ignored_parameter("utm_source"),
        ),
        ..Default::default()
    }));

    (locator, store, manager)
}

fn follow(store: &RouterStore, manager: &Rc<RefCell<PageManager>>) {
    if let Some(hit) = store.current_hit() {
        manager.borrow_mut().visit(&hit);
    }
}

#[test]
fn router_hits_drive_evictions() {
    let (_, store, manager) = setup(2);
    store.connect();
    follow(&store, &manager);

    for path in ["/products/1", "/products/2?utm_source=mail", "/products/2", "/cart"] {
        store.navigate_to_path(path, false).unwrap();
        follow(&store, &manager);
    }

    let manager = manager.borrow();
    assert_eq!(manager.evicted, vec![PageId::from("/?"), PageId::from("/products/1?")]);
    assert_eq!(
        manager.evictions.page_ids().collect::<Vec<_>>(),
        vec![&PageId::from("/cart?"), &PageId::from("/products/2?")]
    );
    assert_eq!(manager.pages.len(), 2);
}

#[test]
fn pages_with_unsaved_work_survive() {
    let (locator, store, manager) = setup(1);
    store.connect();
    follow(&store, &manager);

    store.navigate_to_path("/products/7", false).unwrap();
    follow(&store, &manager);
    manager
        .borrow_mut()
        .pages
        .get_mut(&PageId::from("/products/7?"))
        .unwrap()
        .draft = Some("a review".to_string());

    store.navigate_to_path("/cart", false).unwrap();
    follow(&store, &manager);
    assert!(manager.borrow().pages.contains_key("/products/7?"));

    locator.go_back();
    follow(&store, &manager);
    assert!(store.state().is_at("product"));
    assert!(manager.borrow().pages.contains_key("/products/7?"));
    assert!(!manager.borrow().pages.contains_key("/cart?"));

    manager.borrow_mut().close(&PageId::from("/products/7?"));
    assert!(manager.borrow().evictions.is_empty());
    assert!(manager.borrow().pages.is_empty());
}

#[test]
fn observers_can_feed_the_page_manager() {
    let (_, store, manager) = setup(10);
    let store = Rc::new(store);

    let _handle = {
        let weak = Rc::downgrade(&store);
        let manager = manager.clone();
        store.subscribe(Rc::new(move || {
            if let Some(store) = weak.upgrade() {
                follow(&store, &manager);
            }
        }))
    };

    store.connect();
    store.navigate_to_path("/products/3?b=2&a=1", false).unwrap();
    store.navigate_to_path("/products/3?a=1&b=2", true).unwrap();

    let manager = manager.borrow();
    assert_eq!(
        manager.evictions.page_ids().collect::<Vec<_>>(),
        vec![&PageId::from("/products/3?a=1&b=2"), &PageId::from("/?")]
    );
}
