//! DOM access abstraction.
//!
//! Selector queries and element actions are the only backend-dependent
//! operations in the engine. Everything above this seam is plain Rust and
//! runs natively under test; `tb-wasm` provides the `web-sys` backend that
//! talks to the real page.
//!
//! All operations are infallible by contract: an element that vanished
//! between detection and action (the host page owns the tree and mutates it
//! concurrently) makes the action report `false`, never raise.

/// Handle to a matched page element.
pub trait ElementHandle {
    /// Activate the element as a user click would.
    /// Returns false if the element is gone or not clickable.
    fn click(&self) -> bool;

    /// Hide the element without detaching it from the tree. The host page's
    /// own scripts may still hold references to it, so removal is off-limits.
    /// Returns true only when the element was visible and is now hidden.
    fn hide(&self) -> bool;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool;
}

/// Handle to a media (video) element.
pub trait MediaHandle {
    /// Total duration in seconds, or None while metadata has not loaded
    /// (also None for non-finite values, e.g. live streams).
    fn duration(&self) -> Option<f64>;

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Move the playback position. Returns false if the element is gone.
    fn seek_to(&self, seconds: f64) -> bool;
}

/// A live view of the page document.
///
/// Cloning must be cheap (backends hold a shared reference to the document);
/// scan callbacks keep their own clone.
pub trait DomView: Clone {
    type Element: ElementHandle;
    type Media: MediaHandle;

    /// First element matching the selector, in document order.
    fn query_first(&self, selector: &str) -> Option<Self::Element>;

    /// Every element matching the selector.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// The media element currently hosting playback, if attached yet.
    fn active_media(&self) -> Option<Self::Media>;

    /// Current page URL, used to detect in-page navigation.
    fn page_url(&self) -> String;
}
