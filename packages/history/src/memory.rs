use std::{cell::RefCell, rc::Rc};

use tracing::trace;
use url::Url;

use crate::{ListenerHandle, ListenerSet, Locator};

struct MemoryLocatorState {
    current: Url,
    title: String,
    past: Vec<Url>,
    future: Vec<Url>,
}

/// A [`Locator`] that stores all navigation information in memory.
///
/// Every change of the current location notifies the subscribed listeners, including changes
/// made through [`Locator::push_history_state`]. That makes it a deterministic stand-in for a
/// browser window in tests and on platforms without one.
pub struct MemoryLocator {
    state: RefCell<MemoryLocatorState>,
    history_available: bool,
    listeners: ListenerSet,
}

impl Default for MemoryLocator {
    fn default() -> Self {
        // a literal without user input always parses
        let url = Url::parse("http://localhost/").expect("static url is valid");
        Self::new(url)
    }
}

impl MemoryLocator {
    /// Create a [`MemoryLocator`] starting at `url`.
    ///
    /// ```rust
    /// # use waymark_history::{Locator, MemoryLocator};
    /// # use url::Url;
    /// let locator = MemoryLocator::new(Url::parse("https://example.com/app/").unwrap());
    /// assert_eq!(locator.location().path(), "/app/");
    /// assert!(!locator.can_go_back());
    /// ```
    pub fn new(url: Url) -> Self {
        Self {
            state: RefCell::new(MemoryLocatorState {
                current: url,
                title: String::new(),
                past: Vec::new(),
                future: Vec::new(),
            }),
            history_available: true,
            listeners: ListenerSet::new(),
        }
    }

    /// Create a [`MemoryLocator`] starting at the parsed `url`.
    pub fn with_initial_url(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    /// Choose whether the locator claims to support the history API.
    ///
    /// Without it, routers fall back to hash based navigation.
    pub fn with_history(mut self, available: bool) -> Self {
        self.history_available = available;
        self
    }

    /// The title passed along with the latest history state.
    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    /// The number of entries that can be navigated back to.
    pub fn back_len(&self) -> usize {
        self.state.borrow().past.len()
    }

    /// Check whether there is a previous location to go back to.
    pub fn can_go_back(&self) -> bool {
        !self.state.borrow().past.is_empty()
    }

    /// Check whether there is a later location to go forward to.
    pub fn can_go_forward(&self) -> bool {
        !self.state.borrow().future.is_empty()
    }

    /// Go back to the previous location, if there is one.
    pub fn go_back(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.past.pop() {
                Some(last) => {
                    let old = std::mem::replace(&mut write.current, last);
                    write.future.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.listeners.notify();
        }
    }

    /// Go forward to the next location, if there is one.
    pub fn go_forward(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.future.pop() {
                Some(next) => {
                    let old = std::mem::replace(&mut write.current, next);
                    write.past.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.listeners.notify();
        }
    }

    fn push(&self, url: Url) {
        {
            let mut write = self.state.borrow_mut();
            // don't push the same location twice
            if write.current == url {
                return;
            }
            trace!(from = %write.current, to = %url, "memory locator push");
            let old = std::mem::replace(&mut write.current, url);
            write.past.push(old);
            write.future.clear();
        }
        self.listeners.notify();
    }

    fn replace(&self, url: Url) {
        {
            let mut write = self.state.borrow_mut();
            if write.current == url {
                return;
            }
            trace!(from = %write.current, to = %url, "memory locator replace");
            write.current = url;
        }
        self.listeners.notify();
    }
}

impl Locator for MemoryLocator {
    fn location(&self) -> Url {
        self.state.borrow().current.clone()
    }

    fn set_location(&self, url: Url) {
        self.push(url);
    }

    fn is_history_available(&self) -> bool {
        self.history_available
    }

    fn push_history_state(&self, title: &str, url: &Url) {
        self.state.borrow_mut().title = title.to_string();
        self.push(url.clone());
    }

    fn replace_history_state(&self, title: &str, url: &Url) {
        self.state.borrow_mut().title = title.to_string();
        self.replace(url.clone());
    }

    fn subscribe(&self, callback: Rc<dyn Fn()>) -> ListenerHandle {
        self.listeners.subscribe(callback)
    }
}
