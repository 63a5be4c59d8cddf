#![forbid(unsafe_code)]

//! One binding per interaction source.
//!
//! Each `bind_*` function looks up its elements, constructs the matching
//! `portfolio-core` state object, and registers its listeners into the shared
//! list owned by the mounted page. Shared state lives in `Rc<RefCell<_>>`;
//! every handler borrows it for the duration of one event.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use portfolio_core::{
    ALL_CATEGORIES, AnchorTarget, CardLink, CatalogUpdate, CloseOutcome, CloseTrigger, FilterButtons, NavMenu,
    OverlayContent, PageConfig, PageError, PendingHide, ProjectCard, ProjectCatalog,
    ProjectDetailOverlay, RevealAnimator, RevealDecision, ScrollEffects, ThemeController,
    anchor_target, animation_stylesheet, backdrop_click, click_activates_overlay, is_escape_key,
    scroll_destination,
};
use tracing::{debug, info, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Node, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::dom::{
    self, Listener, LocalStorage, js_error, query, query_all, query_all_in, require, set_class,
    text_of,
};

const REVEAL_KEY_ATTR: &str = "data-reveal-key";

thread_local! {
    // Keys stay unique across remounts so a tag left by an earlier mount never
    // collides with a fresh one.
    static NEXT_REVEAL_KEY: Cell<u32> = const { Cell::new(0) };
}

/// Handles every binding needs.
pub(crate) struct PageContext {
    pub window: Window,
    pub document: Document,
    pub body: HtmlElement,
    pub config: Rc<PageConfig>,
}

impl PageContext {
    pub(crate) fn new(config: PageConfig) -> Result<Self, PageError> {
        let window = dom::window()?;
        let document = dom::document(&window)?;
        let body = document
            .body()
            .ok_or_else(|| PageError::MissingElement("body".into()))?;
        Ok(Self {
            window,
            document,
            body,
            config: Rc::new(config),
        })
    }
}

fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

pub(crate) struct ThemeBinding {
    controller: RefCell<ThemeController<LocalStorage>>,
    body: HtmlElement,
    attribute: String,
}

impl ThemeBinding {
    fn apply(&self) {
        let theme = self.controller.borrow().current();
        if let Err(err) = self.body.set_attribute(&self.attribute, theme.as_str()) {
            warn!(error = ?err, "theme attribute not applied");
        }
    }

    pub(crate) fn current(&self) -> &'static str {
        self.controller.borrow().current().as_str()
    }
}

pub(crate) fn bind_theme(
    ctx: &PageContext,
    listeners: &mut Vec<Listener>,
) -> Result<Rc<ThemeBinding>, PageError> {
    let config = &ctx.config;
    let toggle = require(&ctx.document, &config.selectors.theme_toggle)?;

    let prefers_dark = match ctx.window.match_media(&config.dark_scheme_query) {
        Ok(Some(list)) => list.matches(),
        Ok(None) => false,
        Err(err) => {
            debug!(error = ?err, "matchMedia unavailable");
            false
        }
    };
    let controller = ThemeController::load(
        LocalStorage::open(&ctx.window),
        config.storage_key.as_str(),
        prefers_dark,
    );
    let binding = Rc::new(ThemeBinding {
        controller: RefCell::new(controller),
        body: ctx.body.clone(),
        attribute: config.theme_attribute.clone(),
    });
    binding.apply();

    let handler = Rc::clone(&binding);
    listeners.push(Listener::attach(&toggle, "click", move |_| {
        handler.controller.borrow_mut().toggle();
        handler.apply();
    })?);
    Ok(binding)
}

// ---------------------------------------------------------------------------
// Navigation menu
// ---------------------------------------------------------------------------

pub(crate) fn bind_nav(ctx: &PageContext, listeners: &mut Vec<Listener>) -> Result<(), PageError> {
    let selectors = &ctx.config.selectors;
    let active = ctx.config.classes.active.clone();
    let hamburger = require(&ctx.document, &selectors.hamburger)?;
    let menu = require(&ctx.document, &selectors.nav_links)?;
    let nav = Rc::new(RefCell::new(NavMenu::new()));

    {
        let (nav, menu, button, active) =
            (Rc::clone(&nav), menu.clone(), hamburger.clone(), active.clone());
        listeners.push(Listener::attach(&hamburger, "click", move |_| {
            let open = nav.borrow_mut().toggle();
            set_class(&menu, &active, open);
            set_class(&button, &active, open);
        })?);
    }

    for link in query_all(&ctx.document, &selectors.nav_link)? {
        let (nav, menu, button, active) =
            (Rc::clone(&nav), menu.clone(), hamburger.clone(), active.clone());
        listeners.push(Listener::attach(&link, "click", move |_| {
            if nav.borrow_mut().close() {
                set_class(&menu, &active, false);
                set_class(&button, &active, false);
            }
        })?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scroll effects + anchors
// ---------------------------------------------------------------------------

pub(crate) fn bind_scroll(
    ctx: &PageContext,
    listeners: &mut Vec<Listener>,
) -> Result<(), PageError> {
    let config = &ctx.config;
    let header = require(&ctx.document, &config.selectors.header)?;
    let scroll_top = query(&ctx.document, &config.selectors.scroll_top)?;
    let effects = Rc::new(RefCell::new(ScrollEffects::new(
        config.scroll.header_threshold,
        config.scroll.scroll_top_threshold,
    )));

    let on_scroll = {
        let window = ctx.window.clone();
        let header = header.clone();
        let scroll_top = scroll_top.clone();
        let scrolled = config.classes.scrolled.clone();
        let visible = config.classes.visible.clone();
        move || {
            let update = effects.borrow_mut().update(scroll_y(&window));
            if let Some(on) = update.header_scrolled {
                set_class(&header, &scrolled, on);
            }
            if let (Some(on), Some(control)) = (update.scroll_top_visible, &scroll_top) {
                set_class(control, &visible, on);
            }
        }
    };
    // Pages restored mid-scroll need the flags before the first event.
    on_scroll();
    listeners.push(Listener::attach(&ctx.window, "scroll", move |_| on_scroll())?);

    match &scroll_top {
        Some(control) => {
            let window = ctx.window.clone();
            listeners.push(Listener::attach(control, "click", move |event| {
                event.prevent_default();
                smooth_scroll_to(&window, 0.0);
            })?);
        }
        None => debug!(selector = %config.selectors.scroll_top, "no scroll-to-top control"),
    }

    for anchor in query_all(&ctx.document, &config.selectors.anchor_links)? {
        let window = ctx.window.clone();
        let document = ctx.document.clone();
        let header = header.clone();
        let href_source = anchor.clone();
        listeners.push(Listener::attach(&anchor, "click", move |event| {
            let href = href_source.get_attribute("href").unwrap_or_default();
            match anchor_target(&href) {
                AnchorTarget::External => {}
                AnchorTarget::Top => {
                    event.prevent_default();
                    smooth_scroll_to(&window, 0.0);
                }
                AnchorTarget::Element(id) => {
                    let Some(target) = document.get_element_by_id(&id) else {
                        debug!(%id, "anchor target not found");
                        return;
                    };
                    event.prevent_default();
                    let top = scroll_destination(
                        target.get_bounding_client_rect().top(),
                        scroll_y(&window),
                        header.get_bounding_client_rect().height(),
                    );
                    smooth_scroll_to(&window, top);
                }
            }
        })?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reveal animations
// ---------------------------------------------------------------------------

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub(crate) struct RevealBinding {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
    stylesheet: Option<Element>,
}

impl RevealBinding {
    pub(crate) fn disconnect(&self) {
        self.observer.disconnect();
        if let Some(style) = &self.stylesheet {
            style.remove();
        }
    }
}

fn reveal_key(el: &Element) -> Option<u32> {
    el.get_attribute(REVEAL_KEY_ATTR)?.parse().ok()
}

fn inject_stylesheet(document: &Document, css: &str) -> Result<Element, PageError> {
    let head = document
        .head()
        .ok_or_else(|| PageError::MissingElement("head".into()))?;
    let style = document
        .create_element("style")
        .map_err(|err| js_error("create <style>", &err))?;
    style.set_text_content(Some(css));
    head.append_child(&style)
        .map_err(|err| js_error("append <style>", &err))?;
    Ok(style)
}

pub(crate) fn bind_reveal(ctx: &PageContext) -> Result<RevealBinding, PageError> {
    let reveal = &ctx.config.reveal;
    let animator: Rc<RefCell<RevealAnimator<u32>>> = Rc::new(RefCell::new(RevealAnimator::new()));

    let callback: ObserverCallback = {
        let animator = Rc::clone(&animator);
        let revealed_class = reveal.revealed_class.clone();
        Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(key) = reveal_key(&target) else {
                    continue;
                };
                let decision = animator
                    .borrow_mut()
                    .on_intersection(&key, entry.is_intersecting());
                if decision == RevealDecision::Reveal {
                    set_class(&target, &revealed_class, true);
                    observer.unobserve(&target);
                }
            }
        })
    };

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&reveal.root_margin);
    init.set_threshold(&JsValue::from_f64(reveal.threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(|err| js_error("IntersectionObserver", &err))?;

    let mut binding = RevealBinding {
        observer,
        _callback: callback,
        stylesheet: None,
    };
    if let Err(err) = observe_targets(ctx, &binding.observer, &animator) {
        binding.disconnect();
        return Err(err);
    }
    if reveal.inject_stylesheet {
        match inject_stylesheet(&ctx.document, &animation_stylesheet(reveal)) {
            Ok(style) => binding.stylesheet = Some(style),
            Err(err) => {
                binding.disconnect();
                return Err(err);
            }
        }
    }
    debug!(observed = animator.borrow().pending(), "reveal observer armed");
    Ok(binding)
}

/// Tag every reveal target with a stable key and start observing it.
///
/// Elements matched by several selectors keep their first key and are
/// observed once per mount. Elements already carrying the revealed class
/// (from an earlier mount) are recorded as revealed and left alone.
fn observe_targets(
    ctx: &PageContext,
    observer: &IntersectionObserver,
    animator: &RefCell<RevealAnimator<u32>>,
) -> Result<(), PageError> {
    let reveal = &ctx.config.reveal;
    for selector in &reveal.selectors {
        for el in query_all(&ctx.document, selector)? {
            let key = match reveal_key(&el) {
                Some(key) => key,
                None => {
                    let key = NEXT_REVEAL_KEY.with(|next| next.replace(next.get().wrapping_add(1)));
                    el.set_attribute(REVEAL_KEY_ATTR, &key.to_string())
                        .map_err(|err| js_error(REVEAL_KEY_ATTR, &err))?;
                    key
                }
            };
            if el.class_list().contains(&reveal.revealed_class) {
                animator.borrow_mut().mark_revealed(key);
                continue;
            }
            if animator.borrow_mut().observe(key) {
                set_class(&el, &reveal.pending_class, true);
                observer.observe(&el);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project catalog
// ---------------------------------------------------------------------------

pub(crate) struct CatalogBinding {
    catalog: RefCell<ProjectCatalog>,
    buttons: RefCell<FilterButtons>,
    cards: Vec<Element>,
    button_elements: Vec<Element>,
    count_label: Option<Element>,
    config: Rc<PageConfig>,
}

fn read_card(el: &Element, config: &PageConfig) -> Result<ProjectCard, PageError> {
    let selectors = &config.selectors;
    let category = el
        .get_attribute(&config.catalog.category_attribute)
        .unwrap_or_default();
    let tags: Vec<String> = query_all_in(el, &selectors.card_tags)?
        .iter()
        .filter_map(|tag| tag.text_content())
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect();
    let links: Vec<CardLink> = query_all_in(el, &selectors.card_links)?
        .iter()
        .map(|a| {
            CardLink::new(
                a.text_content().unwrap_or_default().trim(),
                a.get_attribute("href").unwrap_or_default(),
            )
        })
        .collect();
    Ok(ProjectCard::new(
        category,
        text_of(el, &selectors.card_title),
        text_of(el, &selectors.card_description),
    )
    .with_tags(tags)
    .with_links(links))
}

impl CatalogBinding {
    pub(crate) fn set_filter(self: &Rc<Self>, category: &str) {
        let update = self.catalog.borrow_mut().set_filter(category);
        let active = self.buttons.borrow_mut().select(category);
        self.mark_active(active);
        self.apply(update);
    }

    /// Back to the stock view: every card shown, the "all" button active.
    ///
    /// Hides still scheduled from earlier filters become no-ops.
    pub(crate) fn reset(self: &Rc<Self>) {
        let update = self.catalog.borrow_mut().reset();
        let active = self.buttons.borrow_mut().select(ALL_CATEGORIES);
        self.mark_active(active);
        self.apply(update);
    }

    fn mark_active(&self, active: Option<usize>) {
        for (index, button) in self.button_elements.iter().enumerate() {
            set_class(button, &self.config.classes.active, Some(index) == active);
        }
    }

    pub(crate) fn set_search(self: &Rc<Self>, text: &str) {
        let update = self.catalog.borrow_mut().set_search(text);
        self.apply(update);
    }

    pub(crate) fn visible_count(&self) -> usize {
        self.catalog.borrow().visible_count()
    }

    pub(crate) fn card(&self, index: usize) -> Option<ProjectCard> {
        self.catalog.borrow().card(index).cloned()
    }

    fn apply(self: &Rc<Self>, update: CatalogUpdate) {
        let classes = &self.config.classes;
        for &index in &update.shown {
            set_class(&self.cards[index], &classes.hidden, false);
            set_class(&self.cards[index], &classes.fading, false);
        }
        for pending in update.hidden {
            set_class(&self.cards[pending.index], &classes.fading, true);
            let this = Rc::clone(self);
            Timeout::new(self.config.catalog.fade_out_ms, move || this.commit_hide(pending))
                .forget();
        }
        if let Some(label) = &self.count_label {
            label.set_text_content(Some(&update.visible_count.to_string()));
        }
    }

    fn commit_hide(&self, pending: PendingHide) {
        if self.catalog.borrow().commit_hide(&pending) {
            set_class(&self.cards[pending.index], &self.config.classes.hidden, true);
        } else {
            trace!(index = pending.index, generation = pending.generation, "stale hide skipped");
        }
    }
}

pub(crate) fn bind_catalog(
    ctx: &PageContext,
    listeners: &mut Vec<Listener>,
) -> Result<Rc<CatalogBinding>, PageError> {
    let config = &ctx.config;
    let selectors = &config.selectors;

    let cards = query_all(&ctx.document, &selectors.project_cards)?;
    let projects = cards
        .iter()
        .map(|el| read_card(el, config))
        .collect::<Result<Vec<_>, _>>()?;
    let (buttons, button_elements) = FilterButtons::from_buttons(
        query_all(&ctx.document, &selectors.filter_buttons)?
            .into_iter()
            .map(|b| {
                let category = b.get_attribute(&config.catalog.filter_attribute);
                (b, category)
            }),
    );
    let count_label = query(&ctx.document, &selectors.visible_count)?;

    let binding = Rc::new(CatalogBinding {
        catalog: RefCell::new(ProjectCatalog::new(projects)),
        buttons: RefCell::new(buttons),
        cards,
        button_elements,
        count_label,
        config: Rc::clone(config),
    });
    // Cards may still carry classes from an earlier mount; the fresh
    // catalog starts with everything visible.
    for card in &binding.cards {
        set_class(card, &config.classes.hidden, false);
        set_class(card, &config.classes.fading, false);
    }
    binding.mark_active(binding.buttons.borrow().active());
    if let Some(label) = &binding.count_label {
        label.set_text_content(Some(&binding.visible_count().to_string()));
    }

    for (index, button) in binding.button_elements.iter().enumerate() {
        let this = Rc::clone(&binding);
        listeners.push(Listener::attach(button, "click", move |_| {
            let category = this.buttons.borrow().category(index).map(str::to_owned);
            if let Some(category) = category {
                this.set_filter(&category);
            }
        })?);
    }

    match query(&ctx.document, &selectors.search_input)? {
        Some(el) => {
            let input: HtmlInputElement = el
                .dyn_into()
                .map_err(|_| PageError::Dom(format!("{} is not an <input>", selectors.search_input)))?;
            let this = Rc::clone(&binding);
            let source = input.clone();
            listeners.push(Listener::attach(&input, "input", move |_| {
                this.set_search(&source.value());
            })?);
        }
        None => debug!(selector = %selectors.search_input, "no search input"),
    }

    info!(
        cards = binding.cards.len(),
        filters = binding.button_elements.len(),
        "project catalog bound"
    );
    Ok(binding)
}

// ---------------------------------------------------------------------------
// Project detail overlay
// ---------------------------------------------------------------------------

pub(crate) struct OverlayBinding {
    state: RefCell<ProjectDetailOverlay>,
    document: Document,
    body: HtmlElement,
    modal: Element,
    title: Option<Element>,
    description: Option<Element>,
    tags: Option<Element>,
    links: Option<Element>,
    saved_overflow: RefCell<Option<String>>,
    config: Rc<PageConfig>,
}

impl OverlayBinding {
    fn open(&self, card: &ProjectCard) {
        let outcome = self.state.borrow_mut().open(card);
        if let Err(err) = self.render(&OverlayContent::from(card)) {
            warn!(%err, "overlay content not rendered");
        }
        if outcome.lock_scroll {
            let style = self.body.style();
            let previous = style.get_property_value("overflow").unwrap_or_default();
            match style.set_property("overflow", "hidden") {
                Ok(()) => *self.saved_overflow.borrow_mut() = Some(previous),
                Err(err) => warn!(error = ?err, "scroll lock not applied"),
            }
        }
        set_class(&self.modal, &self.config.classes.active, true);
    }

    /// Returns whether the overlay was open.
    pub(crate) fn close(&self, trigger: CloseTrigger) -> bool {
        match self.state.borrow_mut().close(trigger) {
            CloseOutcome::Closed { .. } => {
                set_class(&self.modal, &self.config.classes.active, false);
                if let Some(previous) = self.saved_overflow.borrow_mut().take() {
                    let style = self.body.style();
                    let _ = if previous.is_empty() {
                        style.remove_property("overflow").map(|_| ())
                    } else {
                        style.set_property("overflow", &previous)
                    };
                }
                true
            }
            CloseOutcome::AlreadyClosed => false,
        }
    }

    fn render(&self, content: &OverlayContent) -> Result<(), PageError> {
        if let Some(el) = &self.title {
            el.set_text_content(Some(&content.title));
        }
        if let Some(el) = &self.description {
            el.set_text_content(Some(&content.description));
        }
        if let Some(el) = &self.tags {
            el.set_inner_html("");
            for tag in &content.tags {
                let chip = self.create("span")?;
                chip.set_class_name(&self.config.classes.tag);
                chip.set_text_content(Some(tag));
                el.append_child(&chip)
                    .map_err(|err| js_error("append tag", &err))?;
            }
        }
        if let Some(el) = &self.links {
            el.set_inner_html("");
            for link in &content.links {
                let anchor = self.create("a")?;
                for (name, value) in [
                    ("href", link.url.as_str()),
                    ("target", "_blank"),
                    ("rel", "noopener noreferrer"),
                ] {
                    anchor
                        .set_attribute(name, value)
                        .map_err(|err| js_error(name, &err))?;
                }
                anchor.set_text_content(Some(&link.label));
                el.append_child(&anchor)
                    .map_err(|err| js_error("append link", &err))?;
            }
        }
        Ok(())
    }

    fn create(&self, tag: &str) -> Result<Element, PageError> {
        self.document
            .create_element(tag)
            .map_err(|err| js_error(tag, &err))
    }
}

/// Tag names from `target` up to, but excluding, `card`.
fn ancestor_tags(target: Option<web_sys::EventTarget>, card: &Element) -> Vec<String> {
    let card: &Node = card;
    let mut tags = Vec::new();
    let mut current = target.and_then(|t| t.dyn_into::<Element>().ok());
    while let Some(el) = current {
        if el.is_same_node(Some(card)) {
            break;
        }
        tags.push(el.tag_name());
        current = el.parent_element();
    }
    tags
}

pub(crate) fn bind_overlay(
    ctx: &PageContext,
    catalog: &Rc<CatalogBinding>,
    listeners: &mut Vec<Listener>,
) -> Result<Option<Rc<OverlayBinding>>, PageError> {
    let config = &ctx.config;
    let selectors = &config.selectors;
    let Some(modal) = query(&ctx.document, &selectors.modal)? else {
        debug!(selector = %selectors.modal, "no project modal; cards stay inert");
        return Ok(None);
    };
    let part = |selector: &str| modal.query_selector(selector).ok().flatten();

    let binding = Rc::new(OverlayBinding {
        state: RefCell::new(ProjectDetailOverlay::new()),
        document: ctx.document.clone(),
        body: ctx.body.clone(),
        title: part(&selectors.modal_title),
        description: part(&selectors.modal_description),
        tags: part(&selectors.modal_tags),
        links: part(&selectors.modal_links),
        modal: modal.clone(),
        saved_overflow: RefCell::new(None),
        config: Rc::clone(config),
    });

    for (index, card_el) in catalog.cards.iter().enumerate() {
        let overlay = Rc::clone(&binding);
        let catalog = Rc::clone(catalog);
        let card_el_inner = card_el.clone();
        listeners.push(Listener::attach(card_el, "click", move |event| {
            let tags = ancestor_tags(event.target(), &card_el_inner);
            if !click_activates_overlay(tags.iter().map(String::as_str)) {
                return;
            }
            if let Some(card) = catalog.card(index) {
                overlay.open(&card);
            }
        })?);
    }

    match part(&selectors.modal_close) {
        Some(close) => {
            let overlay = Rc::clone(&binding);
            listeners.push(Listener::attach(&close, "click", move |_| {
                overlay.close(CloseTrigger::CloseButton);
            })?);
        }
        None => debug!(selector = %selectors.modal_close, "no modal close control"),
    }

    // Without a dedicated backdrop element the modal root acts as one.
    let backdrop = part(&selectors.modal_overlay).unwrap_or_else(|| modal.clone());
    {
        let overlay = Rc::clone(&binding);
        let source: Node = backdrop.clone().into();
        listeners.push(Listener::attach(&backdrop, "click", move |event: Event| {
            let on_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|node| node.is_same_node(Some(&source)));
            if let Some(trigger) = backdrop_click(on_backdrop) {
                overlay.close(trigger);
            }
        })?);
    }

    {
        let overlay = Rc::clone(&binding);
        listeners.push(Listener::attach(&ctx.document, "keydown", move |event: Event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| is_escape_key(&key.key()));
            if escape {
                overlay.close(CloseTrigger::Escape);
            }
        })?);
    }

    Ok(Some(binding))
}
