//! `web-sys` backed implementation of the core DOM traits.
//!
//! Every fallible JS call degrades to "not found" or a no-op; nothing in
//! here may throw into the host page.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlMediaElement};

use tb_core::{DomView, ElementHandle, MediaHandle};

/// Live view of the real page document.
#[derive(Clone)]
pub struct PageDom {
    document: Document,
}

impl PageDom {
    pub fn new() -> Option<Self> {
        web_sys::window()?
            .document()
            .map(|document| Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DomView for PageDom {
    type Element = PageElement;
    type Media = PageMedia;

    fn query_first(&self, selector: &str) -> Option<PageElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(PageElement)
    }

    fn query_all(&self, selector: &str) -> Vec<PageElement> {
        match self.document.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.get(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .map(PageElement)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn active_media(&self) -> Option<PageMedia> {
        self.document
            .query_selector("video")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlMediaElement>().ok())
            .map(PageMedia)
    }

    fn page_url(&self) -> String {
        self.document
            .location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }
}

/// Handle to a matched element on the real page.
pub struct PageElement(Element);

impl ElementHandle for PageElement {
    fn click(&self) -> bool {
        match self.0.dyn_ref::<HtmlElement>() {
            Some(element) if element.is_connected() => {
                element.click();
                true
            }
            _ => false,
        }
    }

    fn hide(&self) -> bool {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            return false;
        };
        if !element.is_connected() {
            return false;
        }
        let style = element.style();
        let already_hidden = style
            .get_property_value("display")
            .map(|display| display == "none")
            .unwrap_or(false);
        if already_hidden {
            return false;
        }
        style.set_property("display", "none").is_ok()
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }
}

/// Handle to the page's media element.
pub struct PageMedia(HtmlMediaElement);

impl MediaHandle for PageMedia {
    fn duration(&self) -> Option<f64> {
        // NaN until metadata loads, infinity for live streams; neither is a
        // position we can seek to.
        let duration = self.0.duration();
        duration.is_finite().then_some(duration)
    }

    fn position(&self) -> f64 {
        self.0.current_time()
    }

    fn seek_to(&self, seconds: f64) -> bool {
        if !self.0.is_connected() {
            return false;
        }
        self.0.set_current_time(seconds);
        true
    }
}
