//! Mutation observation and timers over the real page.

use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, MutationObserver, MutationObserverInit, Window};

use tb_core::{Scheduler, WatchBackend, WatchError};

use crate::dom::PageDom;

fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Installs `MutationObserver`s over the whole document.
#[derive(Clone)]
pub struct DomWatchBackend {
    document: Document,
}

impl DomWatchBackend {
    pub fn new(page: &PageDom) -> Self {
        Self {
            document: page.document().clone(),
        }
    }
}

impl WatchBackend for DomWatchBackend {
    type Subscription = MutationWatch;

    fn subscribe(&self, on_mutation: Rc<dyn Fn()>) -> Result<MutationWatch, WatchError> {
        let root = self
            .document
            .document_element()
            .ok_or(WatchError::DocumentUnavailable)?;

        let callback = Closure::<dyn FnMut()>::new(move || on_mutation());
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| WatchError::ObserverRejected(describe_js(&err)))?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&root, &options)
            .map_err(|err| WatchError::ObserverRejected(describe_js(&err)))?;

        Ok(MutationWatch {
            observer,
            _callback: callback,
        })
    }
}

/// Live mutation subscription; disconnects on drop.
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// One-shot timers via `setTimeout`.
#[derive(Clone)]
pub struct PageScheduler {
    window: Window,
}

impl PageScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for PageScheduler {
    type Pending = ScheduledTimeout;

    fn defer(&self, delay: Duration, run: Box<dyn FnOnce()>) -> ScheduledTimeout {
        let callback: Closure<dyn FnMut()> = Closure::once(run);
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay.as_millis() as i32,
            )
            .unwrap_or(-1);
        ScheduledTimeout {
            window: self.window.clone(),
            id,
            _callback: callback,
        }
    }
}

/// Pending `setTimeout`; canceled on drop.
pub struct ScheduledTimeout {
    window: Window,
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for ScheduledTimeout {
    fn drop(&mut self) {
        if self.id >= 0 {
            self.window.clear_timeout_with_handle(self.id);
        }
    }
}

/// Install a repeating callback for the life of the page.
///
/// There is deliberately no handle: the navigation poll runs until the page
/// itself goes away, so the closure is forgotten rather than tracked.
pub fn install_interval(window: &Window, period: Duration, run: Rc<dyn Fn()>) {
    let callback = Closure::<dyn FnMut()>::new(move || run());
    let installed = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period.as_millis() as i32,
        )
        .is_ok();
    if installed {
        callback.forget();
    }
}
