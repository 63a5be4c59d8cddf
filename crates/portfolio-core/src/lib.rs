#![forbid(unsafe_code)]

//! Host-agnostic interaction state for a portfolio page.
//!
//! `portfolio-core` holds every decision the page makes in response to user
//! input, without touching the DOM. The web frontend (`portfolio-web`) binds
//! browser events to these state objects and applies their outcomes as class
//! and attribute changes.
//!
//! # Components
//!
//! - **Catalog**: category filter + substring search over project cards.
//! - **Overlay**: project detail overlay with a single scroll lock.
//! - **Theme**: light/dark preference, persisted through a [`PreferenceStore`].
//! - **Nav**: mobile menu open/closed flag.
//! - **Scroll**: header/scroll-to-top thresholds and in-page anchor targets.
//! - **Reveal**: one-shot viewport reveal tracking.
//!
//! # Design principles
//!
//! - **No I/O**: the host supplies events and storage.
//! - **Outcomes, not effects**: operations return what changed so the host
//!   touches only the nodes that need it.
//! - **`#![forbid(unsafe_code)]`**.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod nav;
pub mod overlay;
pub mod reveal;
pub mod scroll;
pub mod theme;

pub use catalog::{
    ALL_CATEGORIES, CardLink, CatalogUpdate, FilterButtons, FilterState, PendingHide,
    ProjectCard, ProjectCatalog,
};
pub use config::{
    CatalogConfig, ClassNames, PageConfig, RevealConfig, ScrollConfig, Selectors, StaggerRule,
};
pub use error::PageError;
pub use nav::NavMenu;
pub use overlay::{
    CloseOutcome, CloseTrigger, OpenOutcome, OverlayContent, ProjectDetailOverlay,
    backdrop_click, click_activates_overlay, is_escape_key,
};
pub use reveal::{RevealAnimator, RevealDecision, animation_stylesheet};
pub use scroll::{AnchorTarget, ScrollEffects, ScrollUpdate, anchor_target, scroll_destination};
pub use theme::{MemoryStore, PreferenceStore, ThemeController, ThemePreference};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
