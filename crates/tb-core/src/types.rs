//! Core type definitions for TubeBlocker
//!
//! These types are shared by the signature catalog, the scanners and the
//! watch coordinator, and by the wasm bindings on the other side of the
//! trait seam.

// =============================================================================
// Signature Categories
// =============================================================================

/// Category of page element a signature identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignatureCategory {
    /// A clickable "Skip Ad" control inside the player.
    SkipButton = 0,
    /// A player-state marker present while an in-stream ad is playing.
    AdIndicator = 1,
    /// A banner, overlay or feed-slot ad container.
    BannerAd = 2,
}

// =============================================================================
// Block Scope (derived from configuration)
// =============================================================================

bitflags::bitflags! {
    /// Which ad categories are currently being blocked.
    ///
    /// Empty when blocking is disabled entirely, regardless of the
    /// per-category settings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockScope: u8 {
        /// In-stream video ads and skip controls
        const VIDEO = 1 << 0;
        /// Banner and overlay containers
        const BANNER = 1 << 1;
        /// Everything
        const ALL = Self::VIDEO.bits() | Self::BANNER.bits();
    }
}

// =============================================================================
// Block Reports
// =============================================================================

/// The blocking action that was taken, one report per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockedKind {
    /// A skip control was activated.
    SkipClicked = 0,
    /// Playback was advanced past an in-stream ad.
    AdFastForwarded = 1,
    /// A banner/overlay container was hidden.
    BannerHidden = 2,
}

/// Outbound sink for block reports.
///
/// Reports are one-way and best-effort: a lost report only skews the
/// external counters, it never affects blocking behavior. Implementations
/// must not fail and must return immediately.
pub trait BlockReporter {
    fn ad_blocked(&self, kind: BlockedKind);
}

/// Reporter that drops every report. Useful before the real sink is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl BlockReporter for NullReporter {
    fn ad_blocked(&self, _kind: BlockedKind) {}
}
