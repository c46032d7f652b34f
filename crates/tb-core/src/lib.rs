//! TubeBlocker Core Library
//!
//! This crate provides the in-page ad-neutralization engine for the
//! TubeBlocker extension. It watches a live, externally-mutated document,
//! classifies newly-appeared nodes against a catalog of known ad signatures
//! and neutralizes them: skip controls get clicked, in-stream ads get
//! fast-forwarded, banner containers get hidden.
//!
//! # Architecture
//!
//! The engine never touches browser types directly. All DOM access goes
//! through the traits in [`dom`], mutation watching and deferred execution
//! through the traits in [`coordinator`]; `tb-wasm` supplies the `web-sys`
//! implementations while tests run against in-memory mocks. Every scan
//! operation consults the configuration gate synchronously before acting
//! and is idempotent, since mutation callbacks fire in bursts.
//!
//! # Modules
//!
//! - `types`: signature categories, block scope, block reports
//! - `config`: blocker settings and the shared configuration gate
//! - `catalog`: ordered selector tables identifying ad elements
//! - `dom`: the backend abstraction for queries and element actions
//! - `playback`: skip-control activation and in-stream fast-forward
//! - `layout`: banner/overlay suppression
//! - `coordinator`: observation lifecycle and navigation fallback
//! - `stats`: persisted counter shape and day-rollover rule

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod dom;
pub mod layout;
pub mod playback;
pub mod stats;
pub mod types;

#[cfg(test)]
mod testkit;

// Re-export commonly used types
pub use catalog::SignatureCatalog;
pub use config::{BlockerConfig, ConfigGate};
pub use coordinator::{
    Coordinator, NavigationCursor, Scheduler, WatchBackend, WatchError, NAV_POLL_INTERVAL,
    NAV_SETTLE_DELAY,
};
pub use dom::{DomView, ElementHandle, MediaHandle};
pub use layout::LayoutSuppressor;
pub use playback::PlaybackNeutralizer;
pub use stats::BlockStats;
pub use types::{BlockReporter, BlockScope, BlockedKind, NullReporter, SignatureCategory};
