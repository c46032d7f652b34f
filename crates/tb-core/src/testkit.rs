//! Mock backends for native tests: an in-memory page, a manually-fired
//! watch backend and a manually-drained scheduler.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::coordinator::{Scheduler, WatchBackend, WatchError};
use crate::dom::{DomView, ElementHandle, MediaHandle};
use crate::types::{BlockReporter, BlockedKind};

// =============================================================================
// Mock page
// =============================================================================

struct ElementState {
    selectors: Vec<String>,
    connected: bool,
    hidden: bool,
    clicks: u32,
}

struct MediaState {
    duration: Option<f64>,
    position: f64,
}

struct PageState {
    elements: Vec<ElementState>,
    media: Option<MediaState>,
    url: String,
}

/// In-memory document. Elements are tagged with the selectors they match;
/// queries are exact-string lookups against those tags, which is all the
/// engine's catalog-driven queries need.
#[derive(Clone)]
pub struct MockPage {
    state: Rc<RefCell<PageState>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(PageState {
                elements: Vec::new(),
                media: None,
                url: "https://www.youtube.com/watch?v=first".to_owned(),
            })),
        }
    }

    /// Add an element matching the given selectors; returns its index.
    pub fn add_element(&self, selectors: &[&str]) -> usize {
        let mut state = self.state.borrow_mut();
        state.elements.push(ElementState {
            selectors: selectors.iter().map(|s| (*s).to_owned()).collect(),
            connected: true,
            hidden: false,
            clicks: 0,
        });
        state.elements.len() - 1
    }

    /// Detach an element, as the host page removing it would.
    pub fn disconnect(&self, id: usize) {
        self.state.borrow_mut().elements[id].connected = false;
    }

    pub fn is_hidden(&self, id: usize) -> bool {
        self.state.borrow().elements[id].hidden
    }

    pub fn click_count(&self, id: usize) -> u32 {
        self.state.borrow().elements[id].clicks
    }

    pub fn attach_media(&self, duration: Option<f64>, position: f64) {
        self.state.borrow_mut().media = Some(MediaState { duration, position });
    }

    pub fn set_media_duration(&self, duration: Option<f64>) {
        if let Some(media) = self.state.borrow_mut().media.as_mut() {
            media.duration = duration;
        }
    }

    pub fn media_position(&self) -> Option<f64> {
        self.state.borrow().media.as_ref().map(|m| m.position)
    }

    pub fn set_url(&self, url: &str) {
        self.state.borrow_mut().url = url.to_owned();
    }
}

pub struct MockElement {
    state: Rc<RefCell<PageState>>,
    id: usize,
}

impl MockElement {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl ElementHandle for MockElement {
    fn click(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let element = &mut state.elements[self.id];
        if !element.connected {
            return false;
        }
        element.clicks += 1;
        true
    }

    fn hide(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let element = &mut state.elements[self.id];
        if !element.connected || element.hidden {
            return false;
        }
        element.hidden = true;
        true
    }

    fn is_connected(&self) -> bool {
        self.state.borrow().elements[self.id].connected
    }
}

pub struct MockMedia {
    state: Rc<RefCell<PageState>>,
}

impl MediaHandle for MockMedia {
    fn duration(&self) -> Option<f64> {
        self.state
            .borrow()
            .media
            .as_ref()
            .and_then(|m| m.duration)
            .filter(|d| d.is_finite())
    }

    fn position(&self) -> f64 {
        self.state
            .borrow()
            .media
            .as_ref()
            .map(|m| m.position)
            .unwrap_or(0.0)
    }

    fn seek_to(&self, seconds: f64) -> bool {
        match self.state.borrow_mut().media.as_mut() {
            Some(media) => {
                media.position = seconds;
                true
            }
            None => false,
        }
    }
}

impl DomView for MockPage {
    type Element = MockElement;
    type Media = MockMedia;

    fn query_first(&self, selector: &str) -> Option<MockElement> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .position(|e| e.connected && e.selectors.iter().any(|s| s == selector))
            .map(|id| MockElement {
                state: Rc::clone(&self.state),
                id,
            })
    }

    fn query_all(&self, selector: &str) -> Vec<MockElement> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.connected && e.selectors.iter().any(|s| s == selector))
            .map(|(id, _)| MockElement {
                state: Rc::clone(&self.state),
                id,
            })
            .collect()
    }

    fn active_media(&self) -> Option<MockMedia> {
        if self.state.borrow().media.is_some() {
            Some(MockMedia {
                state: Rc::clone(&self.state),
            })
        } else {
            None
        }
    }

    fn page_url(&self) -> String {
        self.state.borrow().url.clone()
    }
}

// =============================================================================
// Mock watch backend
// =============================================================================

type MutationCallback = Rc<dyn Fn()>;

struct WatchSubs {
    next_id: u64,
    calls: usize,
    fail_next: usize,
    fail_on_call: Option<usize>,
    subs: Vec<(u64, MutationCallback)>,
}

#[derive(Clone)]
pub struct MockWatchBackend {
    state: Rc<RefCell<WatchSubs>>,
}

impl MockWatchBackend {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(WatchSubs {
                next_id: 0,
                calls: 0,
                fail_next: 0,
                fail_on_call: None,
                subs: Vec::new(),
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn live(&self) -> usize {
        self.state.borrow().subs.len()
    }

    /// Make the next `n` subscribe calls fail.
    pub fn fail_next_subscribes(&self, n: usize) {
        self.state.borrow_mut().fail_next = n;
    }

    /// Make the `n`-th subscribe call from now fail (1-based).
    pub fn fail_subscribe_number(&self, n: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_on_call = Some(state.calls + n);
    }

    /// Simulate a batch of document mutations reaching every live watcher.
    pub fn fire_all(&self) {
        let callbacks: Vec<MutationCallback> = self
            .state
            .borrow()
            .subs
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

pub struct MockSubscription {
    state: Rc<RefCell<WatchSubs>>,
    id: u64,
}

impl Drop for MockSubscription {
    fn drop(&mut self) {
        self.state.borrow_mut().subs.retain(|(id, _)| *id != self.id);
    }
}

impl WatchBackend for MockWatchBackend {
    type Subscription = MockSubscription;

    fn subscribe(&self, on_mutation: Rc<dyn Fn()>) -> Result<MockSubscription, WatchError> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(WatchError::DocumentUnavailable);
        }
        if state.fail_on_call == Some(state.calls) {
            return Err(WatchError::DocumentUnavailable);
        }
        let id = state.next_id;
        state.next_id += 1;
        state.subs.push((id, on_mutation));
        Ok(MockSubscription {
            state: Rc::clone(&self.state),
            id,
        })
    }
}

// =============================================================================
// Mock scheduler
// =============================================================================

struct DeferredRun {
    id: u64,
    run: Option<Box<dyn FnOnce()>>,
}

struct SchedulerState {
    next_id: u64,
    queue: Vec<DeferredRun>,
}

#[derive(Clone)]
pub struct MockScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                next_id: 0,
                queue: Vec::new(),
            })),
        }
    }

    /// Deferred runs that are scheduled and not yet fired or canceled.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Fire every pending run, as if all delays elapsed.
    pub fn run_all(&self) {
        let runs: Vec<Box<dyn FnOnce()>> = {
            let mut state = self.state.borrow_mut();
            state
                .queue
                .drain(..)
                .filter_map(|mut entry| entry.run.take())
                .collect()
        };
        for run in runs {
            run();
        }
    }
}

pub struct PendingRun {
    state: Rc<RefCell<SchedulerState>>,
    id: u64,
}

impl Drop for PendingRun {
    fn drop(&mut self) {
        self.state.borrow_mut().queue.retain(|e| e.id != self.id);
    }
}

impl Scheduler for MockScheduler {
    type Pending = PendingRun;

    fn defer(&self, _delay: Duration, run: Box<dyn FnOnce()>) -> PendingRun {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.queue.push(DeferredRun { id, run: Some(run) });
        PendingRun {
            state: Rc::clone(&self.state),
            id,
        }
    }
}

// =============================================================================
// Recording reporter
// =============================================================================

#[derive(Clone, Default)]
pub struct RecordingReporter {
    taken: Rc<RefCell<Vec<BlockedKind>>>,
}

impl RecordingReporter {
    pub fn taken(&self) -> Vec<BlockedKind> {
        self.taken.borrow().clone()
    }

    pub fn clear(&self) {
        self.taken.borrow_mut().clear();
    }
}

impl BlockReporter for RecordingReporter {
    fn ad_blocked(&self, kind: BlockedKind) {
        self.taken.borrow_mut().push(kind);
    }
}
