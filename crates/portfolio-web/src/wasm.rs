#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use portfolio_core::{CloseTrigger, PageConfig, PageError};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use crate::bindings::{
    self, CatalogBinding, OverlayBinding, PageContext, RevealBinding, ThemeBinding,
};
use crate::console;
use crate::dom::{Listener, to_js};

thread_local! {
    static AUTO_PAGE: RefCell<Option<PortfolioPage>> = const { RefCell::new(None) };
}

/// Mount the page with default options and keep it alive for the page
/// lifetime.
///
/// Calling it again remounts (listeners from the previous mount are removed
/// first).
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let mut page = PortfolioPage::new();
    page.mount(None)?;
    AUTO_PAGE.with(|slot| {
        if let Some(mut previous) = slot.borrow_mut().replace(page) {
            previous.destroy();
        }
    });
    Ok(())
}

/// Everything one mount registered.
struct Mounted {
    listeners: Vec<Listener>,
    theme: Rc<ThemeBinding>,
    catalog: Rc<CatalogBinding>,
    overlay: Option<Rc<OverlayBinding>>,
    reveal: RevealBinding,
}

impl Mounted {
    fn bind(ctx: &PageContext) -> Result<Self, PageError> {
        let mut listeners = Vec::new();
        match Self::bind_all(ctx, &mut listeners) {
            Ok((theme, catalog, overlay, reveal)) => Ok(Self {
                listeners,
                theme,
                catalog,
                overlay,
                reveal,
            }),
            Err(err) => {
                for listener in &listeners {
                    listener.detach();
                }
                Err(err)
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn bind_all(
        ctx: &PageContext,
        listeners: &mut Vec<Listener>,
    ) -> Result<
        (
            Rc<ThemeBinding>,
            Rc<CatalogBinding>,
            Option<Rc<OverlayBinding>>,
            RevealBinding,
        ),
        PageError,
    > {
        let theme = bindings::bind_theme(ctx, listeners)?;
        bindings::bind_nav(ctx, listeners)?;
        bindings::bind_scroll(ctx, listeners)?;
        let catalog = bindings::bind_catalog(ctx, listeners)?;
        let overlay = bindings::bind_overlay(ctx, &catalog, listeners)?;
        // Last, so a failure above never leaves an armed observer behind.
        let reveal = bindings::bind_reveal(ctx)?;
        Ok((theme, catalog, overlay, reveal))
    }

    fn teardown(self) {
        if let Some(overlay) = &self.overlay {
            overlay.close(CloseTrigger::CloseButton);
        }
        self.catalog.reset();
        for listener in &self.listeners {
            listener.detach();
        }
        self.reveal.disconnect();
        debug!(listeners = self.listeners.len(), "page unmounted");
    }
}

fn parse_options(options: Option<JsValue>) -> Result<PageConfig, PageError> {
    let Some(options) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(PageConfig::default());
    };
    let json = js_sys::JSON::stringify(&options)
        .map_err(|err| crate::dom::js_error("options", &err))?;
    PageConfig::from_json(&String::from(json))
}

/// Interactive behavior for a portfolio page.
///
/// Construct, then `mount(options?)` once the document is parsed. `options`
/// is a plain object mirroring `PageConfig` (camelCase keys); anything left
/// out keeps its default.
#[wasm_bindgen]
#[derive(Default)]
pub struct PortfolioPage {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl PortfolioPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { mounted: None }
    }

    /// Bind every listener. Remounting tears down the previous mount first.
    pub fn mount(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        self.destroy();
        let config = parse_options(options).map_err(|err| to_js(&err))?;
        console::init(&config.log_level);
        let ctx = PageContext::new(config).map_err(|err| to_js(&err))?;
        let mounted = Mounted::bind(&ctx).map_err(|err| to_js(&err))?;
        info!(
            listeners = mounted.listeners.len(),
            theme = mounted.theme.current(),
            "portfolio page mounted"
        );
        self.mounted = Some(mounted);
        Ok(())
    }

    /// Apply a category filter as if its button had been clicked.
    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&self, category: &str) {
        if let Some(mounted) = &self.mounted {
            mounted.catalog.set_filter(category);
        }
    }

    /// Apply search text as if it had been typed into the search box.
    #[wasm_bindgen(js_name = setSearch)]
    pub fn set_search(&self, text: &str) {
        if let Some(mounted) = &self.mounted {
            mounted.catalog.set_search(text);
        }
    }

    #[wasm_bindgen(js_name = visibleCount)]
    pub fn visible_count(&self) -> u32 {
        self.mounted
            .as_ref()
            .map_or(0, |m| u32::try_from(m.catalog.visible_count()).unwrap_or(u32::MAX))
    }

    /// Close the project overlay. Returns whether it was open.
    #[wasm_bindgen(js_name = closeOverlay)]
    pub fn close_overlay(&self) -> bool {
        self.mounted
            .as_ref()
            .and_then(|m| m.overlay.as_ref())
            .is_some_and(|overlay| overlay.close(CloseTrigger::CloseButton))
    }

    /// Active theme (`"light"` or `"dark"`), or `undefined` when unmounted.
    pub fn theme(&self) -> Option<String> {
        self.mounted
            .as_ref()
            .map(|m| m.theme.current().to_owned())
    }

    /// Remove every listener and the observer. Releases the scroll lock if
    /// the overlay is open.
    pub fn destroy(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown();
        }
    }
}
