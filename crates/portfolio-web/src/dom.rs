#![forbid(unsafe_code)]

//! Thin DOM helpers shared by the bindings.

use portfolio_core::{PageError, PreferenceStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, Storage, Window};

pub(crate) fn js_error(context: &str, err: &JsValue) -> PageError {
    let detail = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"));
    PageError::Dom(format!("{context}: {detail}"))
}

/// Convert a page error into a JS `Error` for promise rejection.
pub(crate) fn to_js(err: &PageError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

pub(crate) fn window() -> Result<Window, PageError> {
    web_sys::window().ok_or_else(|| PageError::Dom("no global `window`".into()))
}

pub(crate) fn document(window: &Window) -> Result<Document, PageError> {
    window
        .document()
        .ok_or_else(|| PageError::Dom("window has no document".into()))
}

/// First match for `selector`, if any.
pub(crate) fn query(root: &Document, selector: &str) -> Result<Option<Element>, PageError> {
    root.query_selector(selector)
        .map_err(|err| js_error(selector, &err))
}

/// First match for `selector`, or [`PageError::MissingElement`].
pub(crate) fn require(root: &Document, selector: &str) -> Result<Element, PageError> {
    query(root, selector)?.ok_or_else(|| PageError::MissingElement(selector.to_owned()))
}

/// Every match for `selector` under a document.
pub(crate) fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, PageError> {
    let list = root
        .query_selector_all(selector)
        .map_err(|err| js_error(selector, &err))?;
    Ok(elements(&list))
}

/// Every match for `selector` under an element.
pub(crate) fn query_all_in(root: &Element, selector: &str) -> Result<Vec<Element>, PageError> {
    let list = root
        .query_selector_all(selector)
        .map_err(|err| js_error(selector, &err))?;
    Ok(elements(&list))
}

fn elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn text_of(root: &Element, selector: &str) -> String {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
        .map(|text| text.trim().to_owned())
        .unwrap_or_default()
}

pub(crate) fn set_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    let result = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(err) = result {
        tracing::warn!(class, error = ?err, "class toggle failed");
    }
}

/// A registered event listener, detached on [`Listener::detach`].
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, PageError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| js_error(event, &err))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub(crate) fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// `window.localStorage`, or nothing when the browser denies it.
pub(crate) struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub(crate) fn open(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                tracing::warn!(error = ?err, "localStorage unavailable");
                None
            }
        };
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        storage
            .get_item(key)
            .map_err(|err| PageError::Storage(js_error(key, &err).to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        let Some(storage) = &self.storage else {
            return Err(PageError::Storage("localStorage unavailable".into()));
        };
        storage
            .set_item(key, value)
            .map_err(|err| PageError::Storage(js_error(key, &err).to_string()))
    }
}
