//! Signature catalog: the selector tables that identify ad elements.
//!
//! Signatures are static, ordered within their category, and loaded once at
//! startup. Skip-button signatures are a priority list: the first selector
//! that matches wins and the rest are not evaluated, so one invocation can
//! never activate two controls.
//!
//! The tables below target YouTube's current markup and will need occasional
//! upkeep as the site's class names churn. They are data only; nothing else
//! in the engine knows a selector from a hole in the ground.

use crate::dom::DomView;
use crate::types::SignatureCategory;

/// Skip controls, highest priority first.
const SKIP_BUTTONS: &[&str] = &[
    ".ytp-ad-skip-button",
    ".ytp-ad-skip-button-modern",
    ".ytp-skip-ad-button",
    ".videoAdUiSkipButton",
    "[data-text=\"Skip Ad\"]",
    "[data-text=\"Skip Ads\"]",
];

/// Player-state classes present while an in-stream ad is playing.
const AD_INDICATORS: &[&str] = &[
    ".ad-showing",
    ".ad-interrupting",
    ".ytp-ad-player-overlay",
];

/// Banner, overlay and feed-slot ad containers.
const BANNER_ADS: &[&str] = &[
    ".ytd-display-ad-renderer",
    ".ytd-statement-banner-renderer",
    ".ytd-in-feed-ad-layout-renderer",
    ".ytd-banner-promo-renderer",
    ".ytd-video-masthead-ad-v3-renderer",
    ".ytd-primetime-promo-renderer",
    ".ytd-ad-slot-renderer",
    ".ad-container",
    ".ad-div",
    ".masthead-ad",
    ".ytd-promoted-video-renderer",
    ".ytd-merch-shelf-renderer",
    "#player-ads",
    "#panels",
    "#masthead-ad",
];

/// Immutable set of ad signatures, grouped by category.
#[derive(Debug, Clone, Copy)]
pub struct SignatureCatalog {
    skip_buttons: &'static [&'static str],
    ad_indicators: &'static [&'static str],
    banner_ads: &'static [&'static str],
}

impl SignatureCatalog {
    /// The built-in YouTube signature set.
    pub fn youtube() -> Self {
        Self {
            skip_buttons: SKIP_BUTTONS,
            ad_indicators: AD_INDICATORS,
            banner_ads: BANNER_ADS,
        }
    }

    /// Selector table for a category, in priority order.
    pub fn selectors(&self, category: SignatureCategory) -> &'static [&'static str] {
        match category {
            SignatureCategory::SkipButton => self.skip_buttons,
            SignatureCategory::AdIndicator => self.ad_indicators,
            SignatureCategory::BannerAd => self.banner_ads,
        }
    }

    /// First element matched by the category's table, evaluated in priority
    /// order. Later selectors are not queried once one matches.
    pub fn first_match<D: DomView>(
        &self,
        dom: &D,
        category: SignatureCategory,
    ) -> Option<D::Element> {
        self.selectors(category)
            .iter()
            .find_map(|selector| dom.query_first(selector))
    }

    /// Whether any selector in the category matches at all.
    pub fn any_match<D: DomView>(&self, dom: &D, category: SignatureCategory) -> bool {
        self.first_match(dom, category).is_some()
    }

    /// Every element matched by the category's table, in table order.
    pub fn matches<D: DomView>(&self, dom: &D, category: SignatureCategory) -> Vec<D::Element> {
        self.selectors(category)
            .iter()
            .flat_map(|selector| dom.query_all(selector))
            .collect()
    }
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::youtube()
    }
}
