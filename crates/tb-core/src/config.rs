//! Blocker configuration and the gate that every scan consults.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::BlockScope;

/// User-facing blocker settings.
///
/// This is an in-memory projection of the extension's persisted settings;
/// the serde shape matches the storage keys exactly. Absent keys default to
/// `true`, so a fresh install blocks everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlockerConfig {
    /// Master switch. When false, nothing is scanned or mutated.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Skip-control activation and in-stream ad fast-forward.
    #[serde(default = "enabled_by_default")]
    pub block_video_ads: bool,
    /// Banner/overlay container hiding.
    #[serde(default = "enabled_by_default")]
    pub block_banner_ads: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for BlockerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            block_video_ads: true,
            block_banner_ads: true,
        }
    }
}

impl BlockerConfig {
    /// The categories this configuration actually blocks.
    /// Empty when the master switch is off.
    pub fn scope(&self) -> BlockScope {
        if !self.enabled {
            return BlockScope::empty();
        }
        let mut scope = BlockScope::empty();
        if self.block_video_ads {
            scope |= BlockScope::VIDEO;
        }
        if self.block_banner_ads {
            scope |= BlockScope::BANNER;
        }
        scope
    }
}

/// Shared configuration cell: one writer (the coordinator, on external
/// updates), many readers (every scanner, synchronously before it acts).
///
/// Single-threaded by design; the page has one UI thread.
#[derive(Debug, Clone)]
pub struct ConfigGate {
    inner: Rc<Cell<BlockerConfig>>,
}

impl ConfigGate {
    pub fn new(config: BlockerConfig) -> Self {
        Self {
            inner: Rc::new(Cell::new(config)),
        }
    }

    /// Current settings snapshot.
    pub fn snapshot(&self) -> BlockerConfig {
        self.inner.get()
    }

    /// Current blocking scope.
    pub fn scope(&self) -> BlockScope {
        self.inner.get().scope()
    }

    /// Replace the current settings. Takes effect on the next read.
    pub fn store(&self, config: BlockerConfig) {
        self.inner.set(config);
    }
}

impl Default for ConfigGate {
    fn default() -> Self {
        Self::new(BlockerConfig::default())
    }
}
