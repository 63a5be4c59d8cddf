#![forbid(unsafe_code)]

//! WASM frontend for the portfolio page.
//!
//! This crate binds browser events to the state objects in `portfolio-core`
//! and applies their outcomes to the existing markup. It exposes:
//! - [`PortfolioPage`], a `wasm-bindgen` class with `mount`/`destroy` and a
//!   few programmatic entry points (`setFilter`, `setSearch`, ...),
//! - `start()`, which mounts with default options for pages that just load
//!   the module.
//!
//! All decisions live in `portfolio-core`; nothing here is more than
//! "read the DOM, call core, write the DOM".

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PortfolioPage, start};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PortfolioPage {
    config: portfolio_core::PageConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl PortfolioPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate options the same way the browser build does.
    ///
    /// There is no document to bind on native targets, so this only parses.
    pub fn mount(&mut self, options_json: &str) -> Result<(), portfolio_core::PageError> {
        self.config = portfolio_core::PageConfig::from_json(options_json)?;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &portfolio_core::PageConfig {
        &self.config
    }
}
