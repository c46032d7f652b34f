//! Banner and overlay ad suppression.

use std::rc::Rc;

use log::debug;

use crate::catalog::SignatureCatalog;
use crate::config::ConfigGate;
use crate::dom::{DomView, ElementHandle};
use crate::types::{BlockReporter, BlockScope, BlockedKind, SignatureCategory};

/// Hides banner/overlay ad containers matching the catalog.
pub struct LayoutSuppressor<D: DomView> {
    dom: D,
    catalog: SignatureCatalog,
    gate: ConfigGate,
    reporter: Rc<dyn BlockReporter>,
}

impl<D: DomView> Clone for LayoutSuppressor<D> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            catalog: self.catalog,
            gate: self.gate.clone(),
            reporter: Rc::clone(&self.reporter),
        }
    }
}

impl<D: DomView> LayoutSuppressor<D> {
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

    /// Hide every banner-ad match in the document.
    ///
    /// Hiding keeps the node in the tree: the host page's scripts may still
    /// reference these containers, and detaching them throws errors inside
    /// the page. One report per element newly hidden; elements that are
    /// already hidden are skipped, so re-running under mutation bursts is
    /// harmless. Returns the number of elements newly hidden.
    pub fn suppress_matches(&self) -> usize {
        if !self.gate.scope().contains(BlockScope::BANNER) {
            return 0;
        }

        let mut hidden = 0;
        for element in self.catalog.matches(&self.dom, SignatureCategory::BannerAd) {
            if element.hide() {
                self.reporter.ad_blocked(BlockedKind::BannerHidden);
                hidden += 1;
            }
        }

        if hidden > 0 {
            debug!("{hidden} banner container(s) hidden");
        }
        hidden
    }
}
