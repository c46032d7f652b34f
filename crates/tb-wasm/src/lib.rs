//! WebAssembly bindings for TubeBlocker
//!
//! This is the content-script side of the extension: it wires the core
//! engine to the real page (DOM queries, mutation observers, timers) and to
//! the extension runtime (persisted settings, block reports). The exported
//! statistics helpers are called by the background script, which owns the
//! counters.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use tb_core::{
    BlockerConfig, ConfigGate, Coordinator, SignatureCatalog, NAV_POLL_INTERVAL,
};

mod bridge;
mod dom;
mod logger;
mod watch;

type PageCoordinator = Coordinator<dom::PageDom, watch::DomWatchBackend, watch::PageScheduler>;

#[wasm_bindgen(start)]
pub fn start() {
    logger::init();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(page) = dom::PageDom::new() else {
        return;
    };

    let backend = watch::DomWatchBackend::new(&page);
    let scheduler = watch::PageScheduler::new(window.clone());
    let coordinator = Rc::new(RefCell::new(Coordinator::new(
        page,
        backend,
        scheduler,
        ConfigGate::default(),
        SignatureCatalog::youtube(),
        Rc::new(bridge::RuntimeReporter),
    )));

    // Persisted settings decide whether watching starts at all.
    {
        let coordinator = Rc::clone(&coordinator);
        bridge::load_settings(move |config| apply_config(&coordinator, config));
    }

    // The popup pushes changed settings without a page reload.
    {
        let coordinator = Rc::clone(&coordinator);
        bridge::on_settings_updated(Rc::new(move || {
            let coordinator = Rc::clone(&coordinator);
            bridge::load_settings(move |config| apply_config(&coordinator, config));
        }));
    }

    // The host site is a single-page app: poll the URL as a fallback for
    // navigations that produce no usable mutation events.
    {
        let coordinator = Rc::clone(&coordinator);
        watch::install_interval(
            &window,
            NAV_POLL_INTERVAL,
            Rc::new(move || coordinator.borrow_mut().nav_tick()),
        );
    }
}

fn apply_config(coordinator: &Rc<RefCell<PageCoordinator>>, config: BlockerConfig) {
    if let Err(err) = coordinator.borrow_mut().apply_config(config) {
        // Retryable: the next settings push or page load tries again.
        log::warn!("could not install watchers: {err}");
    }
}

/// Count one blocked ad against the persisted counters, rolling the daily
/// counter over when `today` differs from the stored date. Returns the
/// updated counters object.
#[wasm_bindgen]
pub fn record_ad_blocked(stats: JsValue, today: &str) -> JsValue {
    let mut stats = bridge::stats_from_js(&stats);
    stats.record(today);
    bridge::stats_to_js(&stats)
}

/// Roll the daily counter over to `today` without counting anything, for
/// display paths. Returns the updated counters object.
#[wasm_bindgen]
pub fn roll_over_stats(stats: JsValue, today: &str) -> JsValue {
    let mut stats = bridge::stats_from_js(&stats);
    stats.roll_over(today);
    bridge::stats_to_js(&stats)
}
