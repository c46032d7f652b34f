//! Bridge to the extension runtime: persisted settings, block reports and
//! settings-change notifications.
//!
//! Everything here goes through `js_sys::Reflect` against whatever `chrome`
//! (or `browser`) object the page exposes, and degrades silently when the
//! API surface is missing: a page without an extension runtime simply runs
//! with default settings and uncounted blocks.

use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use tb_core::{BlockReporter, BlockStats, BlockedKind, BlockerConfig};

fn api_root() -> Option<Object> {
    let global = js_sys::global();
    for name in ["chrome", "browser"] {
        if let Ok(value) = Reflect::get(&global, &JsValue::from_str(name)) {
            if let Ok(object) = value.dyn_into::<Object>() {
                return Some(object);
            }
        }
    }
    None
}

fn sub_object(parent: &Object, key: &str) -> Option<Object> {
    Reflect::get(parent, &JsValue::from_str(key))
        .ok()?
        .dyn_into()
        .ok()
}

fn method(object: &Object, name: &str) -> Option<Function> {
    Reflect::get(object, &JsValue::from_str(name))
        .ok()?
        .dyn_into()
        .ok()
}

fn runtime() -> Option<Object> {
    sub_object(&api_root()?, "runtime")
}

fn storage_local() -> Option<Object> {
    sub_object(&sub_object(&api_root()?, "storage")?, "local")
}

fn read_bool(object: &JsValue, key: &str, fallback: bool) -> bool {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(fallback)
}

fn read_count(object: &JsValue, key: &str) -> u64 {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .map(|value| value.max(0.0) as u64)
        .unwrap_or(0)
}

// =============================================================================
// Settings
// =============================================================================

pub fn config_from_js(value: &JsValue) -> BlockerConfig {
    let defaults = BlockerConfig::default();
    BlockerConfig {
        enabled: read_bool(value, "enabled", defaults.enabled),
        block_video_ads: read_bool(value, "blockVideoAds", defaults.block_video_ads),
        block_banner_ads: read_bool(value, "blockBannerAds", defaults.block_banner_ads),
    }
}

fn config_defaults_js() -> Object {
    let defaults = Object::new();
    for key in ["enabled", "blockVideoAds", "blockBannerAds"] {
        let _ = Reflect::set(&defaults, &JsValue::from_str(key), &JsValue::TRUE);
    }
    defaults
}

/// Read persisted settings and hand them to `apply`.
///
/// The storage API answers through a callback; without a runtime (or if the
/// call throws) `apply` runs immediately with the all-true defaults.
pub fn load_settings(apply: impl FnOnce(BlockerConfig) + 'static) {
    let Some(local) = storage_local() else {
        apply(BlockerConfig::default());
        return;
    };
    let Some(get) = method(&local, "get") else {
        apply(BlockerConfig::default());
        return;
    };

    let callback =
        Closure::once_into_js(move |settings: JsValue| apply(config_from_js(&settings)));
    let _ = get.call2(&local, &config_defaults_js(), &callback);
}

/// Invoke `handler` whenever the settings surface announces a change.
pub fn on_settings_updated(handler: Rc<dyn Fn()>) {
    let Some(runtime) = runtime() else { return };
    let Some(on_message) = sub_object(&runtime, "onMessage") else {
        return;
    };
    let Some(add_listener) = method(&on_message, "addListener") else {
        return;
    };

    let callback = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
        let action = Reflect::get(&message, &JsValue::from_str("action"))
            .ok()
            .and_then(|value| value.as_string());
        if action.as_deref() == Some("settingsUpdated") {
            handler();
        }
    });
    let _ = add_listener.call1(&on_message, callback.as_ref());
    // The listener stays registered for the life of the page.
    callback.forget();
}

// =============================================================================
// Block reports
// =============================================================================

/// Forwards each block report as a one-way runtime message.
///
/// Best-effort: a missing runtime or a failed send is ignored, the counters
/// just miss one.
pub struct RuntimeReporter;

impl BlockReporter for RuntimeReporter {
    fn ad_blocked(&self, kind: BlockedKind) {
        debug!("ad blocked: {kind:?}");
        let Some(runtime) = runtime() else { return };
        let Some(send_message) = method(&runtime, "sendMessage") else {
            return;
        };
        let message = Object::new();
        let _ = Reflect::set(
            &message,
            &JsValue::from_str("action"),
            &JsValue::from_str("adBlocked"),
        );
        let _ = send_message.call1(&runtime, &message);
    }
}

// =============================================================================
// Statistics objects
// =============================================================================

pub fn stats_from_js(value: &JsValue) -> BlockStats {
    BlockStats {
        stats_today: read_count(value, "statsToday"),
        stats_total: read_count(value, "statsTotal"),
        last_date: Reflect::get(value, &JsValue::from_str("lastDate"))
            .ok()
            .and_then(|date| date.as_string())
            .unwrap_or_default(),
    }
}

pub fn stats_to_js(stats: &BlockStats) -> JsValue {
    let object = Object::new();
    let _ = Reflect::set(
        &object,
        &JsValue::from_str("statsToday"),
        &JsValue::from_f64(stats.stats_today as f64),
    );
    let _ = Reflect::set(
        &object,
        &JsValue::from_str("statsTotal"),
        &JsValue::from_f64(stats.stats_total as f64),
    );
    let _ = Reflect::set(
        &object,
        &JsValue::from_str("lastDate"),
        &JsValue::from_str(&stats.last_date),
    );
    object.into()
}
