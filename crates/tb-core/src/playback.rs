//! In-stream ad neutralization: skip-control activation and fast-forward.

use std::rc::Rc;

use log::debug;

use crate::catalog::SignatureCatalog;
use crate::config::ConfigGate;
use crate::dom::{DomView, ElementHandle, MediaHandle};
use crate::types::{BlockReporter, BlockScope, BlockedKind, SignatureCategory};

/// Detects an active in-stream ad and gets playback past it.
///
/// Both operations read the configuration gate before acting and are cheap
/// no-ops when nothing matches, so they can run on every mutation batch.
pub struct PlaybackNeutralizer<D: DomView> {
    dom: D,
    catalog: SignatureCatalog,
    gate: ConfigGate,
    reporter: Rc<dyn BlockReporter>,
}

impl<D: DomView> Clone for PlaybackNeutralizer<D> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            catalog: self.catalog,
            gate: self.gate.clone(),
            reporter: Rc::clone(&self.reporter),
        }
    }
}

impl<D: DomView> PlaybackNeutralizer<D> {
    pub fn new(
        dom: D,
        catalog: SignatureCatalog,
        gate: ConfigGate,
        reporter: Rc<dyn BlockReporter>,
    ) -> Self {
        Self {
            dom,
            catalog,
            gate,
            reporter,
        }
    }

    /// Click the highest-priority skip control if one is present.
    ///
    /// Acts at most once per invocation: mutation callbacks fire in bursts,
    /// and a second click on a control that is already being dismissed is a
    /// race we do not want. Returns whether a control was activated.
    pub fn activate_skip_if_present(&self) -> bool {
        if !self.gate.scope().contains(BlockScope::VIDEO) {
            return false;
        }

        let Some(button) = self
            .catalog
            .first_match(&self.dom, SignatureCategory::SkipButton)
        else {
            return false;
        };

        if !button.click() {
            // Disappeared between detection and action; the next batch
            // will find its replacement if there is one.
            return false;
        }

        debug!("skip control activated");
        self.reporter.ad_blocked(BlockedKind::SkipClicked);
        true
    }

    /// If an in-stream ad is playing, jump the media element to its end so
    /// the player's own logic completes the ad and resumes content.
    ///
    /// No-ops when the media element is not attached yet or its duration is
    /// still unknown; a later mutation retriggers the scan. Returns whether
    /// the position actually moved.
    pub fn advance_past_ad_if_playing(&self) -> bool {
        if !self.gate.scope().contains(BlockScope::VIDEO) {
            return false;
        }

        if !self
            .catalog
            .any_match(&self.dom, SignatureCategory::AdIndicator)
        {
            return false;
        }

        let Some(media) = self.dom.active_media() else {
            // Indicator can appear before the <video> is attached.
            return false;
        };

        let Some(end) = media.duration() else {
            // Metadata not loaded; acting on NaN would corrupt playback.
            return false;
        };

        if media.position() >= end {
            return false;
        }

        if !media.seek_to(end) {
            return false;
        }

        debug!("in-stream ad fast-forwarded to {end:.1}s");
        self.reporter.ad_blocked(BlockedKind::AdFastForwarded);
        true
    }
}
