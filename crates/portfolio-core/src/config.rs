#![forbid(unsafe_code)]

//! Page configuration: selectors, class names, thresholds and timings.
//!
//! The web host passes a JSON options object at mount time. Every field is
//! optional; anything left out keeps its default, so `{}` is the stock page.

use serde::Deserialize;

use crate::error::PageError;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Local storage key holding `"light"` or `"dark"`.
    pub storage_key: String,
    /// Attribute on `<body>` that carries the active theme.
    pub theme_attribute: String,
    /// Media query consulted once when no preference is stored.
    pub dark_scheme_query: String,
    /// Maximum tracing level for console output.
    pub log_level: String,
    pub selectors: Selectors,
    pub classes: ClassNames,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub catalog: CatalogConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".into(),
            theme_attribute: "data-theme".into(),
            dark_scheme_query: "(prefers-color-scheme: dark)".into(),
            log_level: "info".into(),
            selectors: Selectors::default(),
            classes: ClassNames::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl PageConfig {
    /// Parse host options and validate them.
    ///
    /// An empty or whitespace-only string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)
            .map_err(|err| PageError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the page half-wired.
    pub fn validate(&self) -> Result<(), PageError> {
        if self.storage_key.is_empty() {
            return Err(PageError::InvalidConfig("storageKey is empty".into()));
        }
        if self.theme_attribute.is_empty() {
            return Err(PageError::InvalidConfig("themeAttribute is empty".into()));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(PageError::InvalidConfig(format!(
                "logLevel {:?} is not one of {LOG_LEVELS:?}",
                self.log_level
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(PageError::InvalidConfig(format!(
                "reveal.threshold {} is outside [0, 1]",
                self.reveal.threshold
            )));
        }
        if self.scroll.header_threshold < 0.0 || self.scroll.scroll_top_threshold < 0.0 {
            return Err(PageError::InvalidConfig(
                "scroll thresholds must be non-negative".into(),
            ));
        }
        if let Some(name) = self.selectors.first_empty() {
            return Err(PageError::InvalidConfig(format!("selectors.{name} is empty")));
        }
        if self.reveal.selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(PageError::InvalidConfig(
                "reveal.selectors contains an empty selector".into(),
            ));
        }
        Ok(())
    }
}

/// CSS selectors for every element the page binds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub theme_toggle: String,
    pub header: String,
    pub hamburger: String,
    pub nav_links: String,
    pub nav_link: String,
    pub anchor_links: String,
    pub scroll_top: String,
    pub filter_buttons: String,
    pub search_input: String,
    pub visible_count: String,
    pub project_cards: String,
    pub card_title: String,
    pub card_description: String,
    pub card_tags: String,
    pub card_links: String,
    pub modal: String,
    pub modal_close: String,
    pub modal_overlay: String,
    pub modal_title: String,
    pub modal_description: String,
    pub modal_tags: String,
    pub modal_links: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            theme_toggle: ".theme-toggle".into(),
            header: ".header".into(),
            hamburger: ".hamburger".into(),
            nav_links: ".nav-links".into(),
            nav_link: ".nav-links a".into(),
            anchor_links: "a[href^=\"#\"]".into(),
            scroll_top: ".scroll-top".into(),
            filter_buttons: ".filter-btn".into(),
            search_input: "#project-search".into(),
            visible_count: "#project-count".into(),
            project_cards: ".project-card".into(),
            card_title: "h3".into(),
            card_description: "p".into(),
            card_tags: ".project-tags span".into(),
            card_links: ".project-links a".into(),
            modal: "#project-modal".into(),
            modal_close: ".modal-close".into(),
            modal_overlay: ".modal-overlay".into(),
            modal_title: ".modal-title".into(),
            modal_description: ".modal-description".into(),
            modal_tags: ".modal-tags".into(),
            modal_links: ".modal-links".into(),
        }
    }
}

impl Selectors {
    fn first_empty(&self) -> Option<&'static str> {
        let fields: [(&'static str, &str); 22] = [
            ("themeToggle", &self.theme_toggle),
            ("header", &self.header),
            ("hamburger", &self.hamburger),
            ("navLinks", &self.nav_links),
            ("navLink", &self.nav_link),
            ("anchorLinks", &self.anchor_links),
            ("scrollTop", &self.scroll_top),
            ("filterButtons", &self.filter_buttons),
            ("searchInput", &self.search_input),
            ("visibleCount", &self.visible_count),
            ("projectCards", &self.project_cards),
            ("cardTitle", &self.card_title),
            ("cardDescription", &self.card_description),
            ("cardTags", &self.card_tags),
            ("cardLinks", &self.card_links),
            ("modal", &self.modal),
            ("modalClose", &self.modal_close),
            ("modalOverlay", &self.modal_overlay),
            ("modalTitle", &self.modal_title),
            ("modalDescription", &self.modal_description),
            ("modalTags", &self.modal_tags),
            ("modalLinks", &self.modal_links),
        ];
        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

/// Class names toggled by the bindings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    /// Open nav menu, pressed hamburger, selected filter button, open modal.
    pub active: String,
    /// Header past its scroll threshold.
    pub scrolled: String,
    /// Scroll-to-top control past its threshold.
    pub visible: String,
    /// Card fading out after a filter change.
    pub fading: String,
    /// Card fully removed from layout.
    pub hidden: String,
    /// Tag chip inside the overlay.
    pub tag: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: "active".into(),
            scrolled: "scrolled".into(),
            visible: "visible".into(),
            fading: "fade-out".into(),
            hidden: "hide".into(),
            tag: "tag".into(),
        }
    }
}

/// Scroll thresholds in CSS pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    pub header_threshold: f64,
    pub scroll_top_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_threshold: 50.0,
            scroll_top_threshold: 500.0,
        }
    }
}

/// Reveal animation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    /// Intersection ratio that counts as "entered the viewport".
    pub threshold: f64,
    pub root_margin: String,
    /// Elements observed at mount.
    pub selectors: Vec<String>,
    /// Class applied at observe time (pre-animation state).
    pub pending_class: String,
    /// Class applied once the element has entered the viewport.
    pub revealed_class: String,
    pub duration_secs: f32,
    pub offset_px: u16,
    /// Inject the animation stylesheet at mount.
    pub inject_stylesheet: bool,
    pub stagger: Vec<StaggerRule>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px".into(),
            selectors: [
                ".section-title",
                ".hero-content > *",
                ".timeline-item",
                ".project-card",
                ".skills-list li",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            pending_class: "hidden-animate".into(),
            revealed_class: "fade-in-up".into(),
            duration_secs: 0.6,
            offset_px: 30,
            inject_stylesheet: true,
            stagger: vec![
                StaggerRule::new(".timeline-item", 3, 0.2),
                StaggerRule::new(".project-card", 3, 0.2),
            ],
        }
    }
}

/// Transition delays for the first siblings matching `selector`.
///
/// Child `n` (1-based, `2..=children`) waits `(n - 1) * step_secs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaggerRule {
    pub selector: String,
    pub children: u16,
    pub step_secs: f32,
}

impl StaggerRule {
    #[must_use]
    pub fn new(selector: impl Into<String>, children: u16, step_secs: f32) -> Self {
        Self {
            selector: selector.into(),
            children,
            step_secs,
        }
    }
}

/// Project catalog timings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Delay between the fade-out class and the hidden class.
    pub fade_out_ms: u32,
    /// Attribute on each card naming its category.
    pub category_attribute: String,
    /// Attribute on each filter button naming its category.
    pub filter_attribute: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: 300,
            category_attribute: "data-category".into(),
            filter_attribute: "data-filter".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_options_are_defaults() {
        assert_eq!(PageConfig::from_json("").unwrap(), PageConfig::default());
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_options_keep_other_defaults() {
        let config =
            PageConfig::from_json(r#"{"storageKey":"site-theme","scroll":{"headerThreshold":80}}"#)
                .unwrap();
        assert_eq!(config.storage_key, "site-theme");
        assert_eq!(config.scroll.header_threshold, 80.0);
        assert_eq!(config.scroll.scroll_top_threshold, 500.0);
        assert_eq!(config.selectors, Selectors::default());
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let err = PageConfig::from_json("{storageKey").unwrap_err();
        assert!(matches!(err, PageError::InvalidConfig(_)));
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let err = PageConfig::from_json(r#"{"reveal":{"threshold":1.5}}"#).unwrap_err();
        assert!(matches!(err, PageError::InvalidConfig(msg) if msg.contains("reveal.threshold")));
    }

    #[test]
    fn empty_selector_rejected_by_name() {
        let err = PageConfig::from_json(r#"{"selectors":{"header":"  "}}"#).unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidConfig("selectors.header is empty".into())
        );
    }

    #[test]
    fn unknown_log_level_rejected() {
        let err = PageConfig::from_json(r#"{"logLevel":"loud"}"#).unwrap_err();
        assert!(matches!(err, PageError::InvalidConfig(_)));
        assert!(PageConfig::from_json(r#"{"logLevel":"DEBUG"}"#).is_ok());
    }

    #[test]
    fn empty_storage_key_rejected() {
        assert!(PageConfig::from_json(r#"{"storageKey":""}"#).is_err());
    }
}
