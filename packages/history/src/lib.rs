//! Location integration
//!
//! The waymark router relies on a [`Locator`] to read and change the current URL, and to learn
//! about changes it did not cause itself (a user pressing the back button, editing the hash,
//! ...). In a browser this wraps `window.location` and `window.history`; anywhere else the
//! [`MemoryLocator`] keeps everything in memory.
//!
//! To integrate the router with any other kind of location source, all you have to do is
//! implement the [`Locator`] trait.

use std::rc::Rc;

use url::Url;

mod listener;
pub use listener::*;

mod memory;
pub use memory::*;

/// An integration with some kind of current location and navigation history.
///
/// The described behaviors mimic a web browser. Implementations that deviate from them should
/// document it.
pub trait Locator {
    /// Get the current location.
    #[must_use]
    fn location(&self) -> Url;

    /// Assign a new location, creating a new history entry.
    ///
    /// In a browser this is `window.location = url`, which is how hash based routers move
    /// between fragments.
    fn set_location(&self, url: Url);

    /// Check whether the locator supports [`push_history_state`] and
    /// [`replace_history_state`].
    ///
    /// [`push_history_state`]: Locator::push_history_state
    /// [`replace_history_state`]: Locator::replace_history_state
    fn is_history_available(&self) -> bool;

    /// Push a new history entry for `url` and make it the current location.
    fn push_history_state(&self, title: &str, url: &Url);

    /// Replace the current history entry with `url`.
    ///
    /// In contrast to [`push_history_state`](Locator::push_history_state), the navigation
    /// history stays untouched.
    fn replace_history_state(&self, title: &str, url: &Url);

    /// Be told whenever the location changes.
    ///
    /// The subscription lasts as long as the returned [`ListenerHandle`].
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> ListenerHandle;
}

impl<L: Locator + ?Sized> Locator for Rc<L> {
    fn location(&self) -> Url {
        (**self).location()
    }

    fn set_location(&self, url: Url) {
        (**self).set_location(url)
    }

    fn is_history_available(&self) -> bool {
        (**self).is_history_available()
    }

    fn push_history_state(&self, title: &str, url: &Url) {
        (**self).push_history_state(title, url)
    }

    fn replace_history_state(&self, title: &str, url: &Url) {
        (**self).replace_history_state(title, url)
    }

    fn subscribe(&self, callback: Rc<dyn Fn()>) -> ListenerHandle {
        (**self).subscribe(callback)
    }
}
