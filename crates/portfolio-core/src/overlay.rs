#![forbid(unsafe_code)]

//! Project detail overlay.
//!
//! The overlay is either closed or showing exactly one [`OverlayContent`],
//! copied from the card that was last activated. Opening engages a
//! background scroll lock; the first close after an open releases it, and
//! only that close. Every close trigger ends in the same state.

use crate::catalog::{CardLink, ProjectCard};
use crate::debug;

/// Fields copied out of a [`ProjectCard`] for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub links: Vec<CardLink>,
}

impl From<&ProjectCard> for OverlayContent {
    fn from(card: &ProjectCard) -> Self {
        Self {
            title: card.title.clone(),
            description: card.description.clone(),
            tags: card.tags.clone(),
            links: card.links.clone(),
        }
    }
}

/// What dismissed the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    Escape,
}

/// Result of [`ProjectDetailOverlay::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    /// The host must suppress background scrolling now.
    pub lock_scroll: bool,
    /// Content from a previous open was overwritten.
    pub replaced: bool,
}

/// Result of [`ProjectDetailOverlay::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The overlay was open and is now closed; the host must hide it and
    /// restore background scrolling.
    Closed { trigger: CloseTrigger },
    /// Nothing to do.
    AlreadyClosed,
}

/// Overlay state. Scroll lock is held exactly while content is present.
#[derive(Debug, Clone, Default)]
pub struct ProjectDetailOverlay {
    content: Option<OverlayContent>,
}

impl ProjectDetailOverlay {
    #[must_use]
    pub const fn new() -> Self {
        Self { content: None }
    }

    /// Show `card`, replacing whatever was shown before.
    pub fn open(&mut self, card: &ProjectCard) -> OpenOutcome {
        let previous = self.content.replace(OverlayContent::from(card));
        debug!(title = %card.title, replaced = previous.is_some(), "overlay opened");
        OpenOutcome {
            lock_scroll: previous.is_none(),
            replaced: previous.is_some(),
        }
    }

    /// Dismiss the overlay.
    pub fn close(&mut self, trigger: CloseTrigger) -> CloseOutcome {
        match self.content.take() {
            Some(_) => {
                debug!(?trigger, "overlay closed");
                CloseOutcome::Closed { trigger }
            }
            None => CloseOutcome::AlreadyClosed,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.content.is_some()
    }

    #[must_use]
    pub const fn content(&self) -> Option<&OverlayContent> {
        self.content.as_ref()
    }

    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.content.is_some()
    }
}

/// Decide whether a click inside a card should open the overlay.
///
/// `ancestors` are the tag names from the click target up to (excluding) the
/// card element. Clicks that land on or inside a link are left to the link.
#[must_use]
pub fn click_activates_overlay<'a, I>(ancestors: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    !ancestors
        .into_iter()
        .any(|tag| tag.eq_ignore_ascii_case("a"))
}

/// Map a click on the overlay backdrop to a close trigger.
///
/// Only clicks whose target is the backdrop itself count; clicks that bubble
/// up from the content panel do not.
#[must_use]
pub const fn backdrop_click(target_is_backdrop: bool) -> Option<CloseTrigger> {
    if target_is_backdrop {
        Some(CloseTrigger::Backdrop)
    } else {
        None
    }
}

/// DOM `KeyboardEvent.key` values that dismiss the overlay.
#[must_use]
pub fn is_escape_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}
