//! Watch coordinator: owns the mutation-observation lifecycle.
//!
//! Two roles are watched while running: one subscription drives skip-control
//! activation, the other drives the in-stream/banner sweep. The coordinator
//! guarantees at most one live subscription per role; every (re)start tears
//! the old ones down first, so a configuration flip can never leave a stale
//! callback firing on a page the user disabled blocking for.
//!
//! A low-frequency URL poll backs up the observers: the host site is a
//! single-page application and does not produce a reliable mutation signal
//! on every in-page navigation, so a detected URL change schedules one
//! explicit re-scan after a short settle delay.

use std::rc::Rc;
use std::time::Duration;

use log::{debug, info};

use crate::catalog::SignatureCatalog;
use crate::config::{BlockerConfig, ConfigGate};
use crate::dom::DomView;
use crate::layout::LayoutSuppressor;
use crate::playback::PlaybackNeutralizer;
use crate::types::BlockReporter;

/// How often the page URL is compared against the navigation cursor.
pub const NAV_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long a detected navigation is given to populate the new page's DOM
/// before the explicit re-scan runs.
pub const NAV_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Error installing a tree-mutation subscription.
///
/// Never fatal: the coordinator stays stopped and a later start may retry.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("document root is not available yet")]
    DocumentUnavailable,
    #[error("mutation observer rejected: {0}")]
    ObserverRejected(String),
}

/// Installs tree-mutation subscriptions over the whole document.
///
/// A subscription stays live until dropped; dropping must synchronously
/// disconnect it so no callback fires afterwards.
pub trait WatchBackend {
    type Subscription;

    fn subscribe(&self, on_mutation: Rc<dyn Fn()>) -> Result<Self::Subscription, WatchError>;
}

/// One-shot deferred execution.
///
/// Dropping the returned handle before the delay elapses cancels the run.
pub trait Scheduler {
    type Pending;

    fn defer(&self, delay: Duration, run: Box<dyn FnOnce()>) -> Self::Pending;
}

/// Last-observed page identity, for spotting in-page navigations.
#[derive(Debug)]
pub struct NavigationCursor {
    last_url: String,
}

impl NavigationCursor {
    pub fn new(initial_url: String) -> Self {
        Self { last_url: initial_url }
    }

    /// Record the given URL; true when it differs from the last one seen.
    pub fn observe(&mut self, url: &str) -> bool {
        if self.last_url == url {
            return false;
        }
        self.last_url = url.to_owned();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Stopped,
    Running,
}

/// The observation lifecycle state machine.
pub struct Coordinator<D: DomView, B: WatchBackend, S: Scheduler> {
    dom: D,
    backend: B,
    scheduler: S,
    gate: ConfigGate,
    playback: PlaybackNeutralizer<D>,
    layout: LayoutSuppressor<D>,
    skip_watch: Option<B::Subscription>,
    sweep_watch: Option<B::Subscription>,
    settle: Option<S::Pending>,
    cursor: NavigationCursor,
    state: WatchState,
}

impl<D: DomView + 'static, B: WatchBackend, S: Scheduler> Coordinator<D, B, S> {
    pub fn new(
        dom: D,
        backend: B,
        scheduler: S,
        gate: ConfigGate,
        catalog: SignatureCatalog,
        reporter: Rc<dyn BlockReporter>,
    ) -> Self {
        let playback =
            PlaybackNeutralizer::new(dom.clone(), catalog, gate.clone(), Rc::clone(&reporter));
        let layout = LayoutSuppressor::new(dom.clone(), catalog, gate.clone(), reporter);
        let cursor = NavigationCursor::new(dom.page_url());
        Self {
            dom,
            backend,
            scheduler,
            gate,
            playback,
            layout,
            skip_watch: None,
            sweep_watch: None,
            settle: None,
            cursor,
            state: WatchState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == WatchState::Running
    }

    /// Install both watchers and scan once, if blocking is enabled.
    ///
    /// Always stops first, so calling this on a running coordinator is the
    /// reinit path and cannot duplicate subscriptions. With blocking
    /// disabled this is equivalent to `stop`.
    pub fn start(&mut self) -> Result<(), WatchError> {
        self.stop();

        if !self.gate.snapshot().enabled {
            return Ok(());
        }

        let skip = {
            let playback = self.playback.clone();
            self.backend.subscribe(Rc::new(move || {
                playback.activate_skip_if_present();
            }))?
        };
        let sweep = {
            let playback = self.playback.clone();
            let layout = self.layout.clone();
            self.backend.subscribe(Rc::new(move || {
                playback.advance_past_ad_if_playing();
                layout.suppress_matches();
            }))?
        };

        self.skip_watch = Some(skip);
        self.sweep_watch = Some(sweep);
        self.state = WatchState::Running;
        info!("ad blocking started");

        // Ads already on the page will not produce a mutation; catch them now.
        self.scan_now();
        Ok(())
    }

    /// Dispose both subscriptions and any pending settle re-scan.
    pub fn stop(&mut self) {
        if self.state == WatchState::Running {
            info!("ad blocking stopped");
        }
        // Dropping a subscription disconnects it synchronously.
        self.skip_watch = None;
        self.sweep_watch = None;
        self.settle = None;
        self.state = WatchState::Stopped;
    }

    /// Adopt externally-updated settings and restart watching accordingly.
    ///
    /// Safe to call at any time, including while running.
    pub fn apply_config(&mut self, config: BlockerConfig) -> Result<(), WatchError> {
        debug!("applying settings update: {config:?}");
        self.gate.store(config);
        self.start()
    }

    /// Run every scan operation once against the current document.
    pub fn scan_now(&self) {
        self.playback.activate_skip_if_present();
        self.playback.advance_past_ad_if_playing();
        self.layout.suppress_matches();
    }

    /// Periodic navigation poll. On a URL change, schedules a one-shot
    /// re-scan of both neutralizers after the settle delay, giving the new
    /// page's DOM time to populate.
    pub fn nav_tick(&mut self) {
        let url = self.dom.page_url();
        if !self.cursor.observe(&url) {
            return;
        }

        debug!("in-page navigation to {url}");
        if !self.gate.snapshot().enabled {
            return;
        }

        let playback = self.playback.clone();
        let layout = self.layout.clone();
        self.settle = Some(self.scheduler.defer(
            NAV_SETTLE_DELAY,
            Box::new(move || {
                playback.advance_past_ad_if_playing();
                layout.suppress_matches();
            }),
        ));
    }
}
