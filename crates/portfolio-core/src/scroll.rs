#![forbid(unsafe_code)]

//! Scroll-driven header styling, scroll-to-top visibility and in-page
//! anchor resolution.

use crate::trace;

/// Flag changes produced by one scroll position update.
///
/// Each field is `Some(new_value)` only when that flag flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollUpdate {
    pub header_scrolled: Option<bool>,
    pub scroll_top_visible: Option<bool>,
}

impl ScrollUpdate {
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.header_scrolled.is_none() && self.scroll_top_visible.is_none()
    }
}

/// Threshold state for the header and the scroll-to-top control.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollEffects {
    header_threshold: f64,
    scroll_top_threshold: f64,
    header_scrolled: bool,
    scroll_top_visible: bool,
}

impl Default for ScrollEffects {
    fn default() -> Self {
        Self::new(50.0, 500.0)
    }
}

impl ScrollEffects {
    #[must_use]
    pub const fn new(header_threshold: f64, scroll_top_threshold: f64) -> Self {
        Self {
            header_threshold,
            scroll_top_threshold,
            header_scrolled: false,
            scroll_top_visible: false,
        }
    }

    /// Feed the current vertical scroll offset.
    ///
    /// Both flags are set strictly past their threshold.
    pub fn update(&mut self, scroll_y: f64) -> ScrollUpdate {
        let header = scroll_y > self.header_threshold;
        let top = scroll_y > self.scroll_top_threshold;
        let update = ScrollUpdate {
            header_scrolled: (header != self.header_scrolled).then_some(header),
            scroll_top_visible: (top != self.scroll_top_visible).then_some(top),
        };
        self.header_scrolled = header;
        self.scroll_top_visible = top;
        if !update.is_unchanged() {
            trace!(scroll_y, header, top, "scroll flags changed");
        }
        update
    }

    #[must_use]
    pub const fn header_scrolled(&self) -> bool {
        self.header_scrolled
    }

    #[must_use]
    pub const fn scroll_top_visible(&self) -> bool {
        self.scroll_top_visible
    }
}

/// Where an in-page link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorTarget {
    /// `#` or `#top`.
    Top,
    /// `#<id>`.
    Element(String),
    /// Not a same-page fragment; left to the browser.
    External,
}

/// Classify an `href` attribute value.
#[must_use]
pub fn anchor_target(href: &str) -> AnchorTarget {
    let Some(fragment) = href.trim().strip_prefix('#') else {
        return AnchorTarget::External;
    };
    match fragment {
        "" | "top" => AnchorTarget::Top,
        id => AnchorTarget::Element(id.to_owned()),
    }
}

/// Document offset to scroll to so the target lands just below a fixed
/// header.
///
/// `element_top` is the target's viewport-relative top edge.
#[must_use]
pub fn scroll_destination(element_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    (element_top + scroll_y - header_height).max(0.0)
}
