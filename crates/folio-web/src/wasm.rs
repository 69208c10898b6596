#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the page runner.
//!
//! This module wraps [`folio_core::PageController`] over a [`DomView`] with
//! JS-friendly types. Only compiled on `wasm32` targets.
//!
//! The controller lives in an `Rc<RefCell<_>>` shared by every DOM listener.
//! Each dispatch first syncs the controller clock to `web_time::Instant`,
//! then runs the handler, then re-arms a single `setTimeout` for the next
//! pending revert.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{ElementId, FilterOutcome, PageController, PageView};
use js_sys::{Object, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget};
use web_time::Instant;

use crate::dom::DomView;
use crate::host::{config_from_json, href_fragment, timeout_millis};

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn filter_outcome_to_js(outcome: FilterOutcome) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "visible", JsValue::from_f64(outcome.visible as f64));
    set_js(&obj, "hidden", JsValue::from_f64(outcome.hidden as f64));
    obj.into()
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn is_loading(document: &Document) -> bool {
    document.ready_state() == "loading"
}

// ---------------------------------------------------------------------------
// Shared state and dispatch
// ---------------------------------------------------------------------------

struct RunnerState {
    controller: PageController<DomView>,
    origin: Instant,
    timeout: Option<i32>,
}

type Shared = Rc<RefCell<RunnerState>>;

/// Run `f` against the controller with the clock synced, then re-arm the
/// revert timer.
fn dispatch<R>(state: &Shared, f: impl FnOnce(&mut PageController<DomView>) -> R) -> R {
    let result = {
        let mut guard = state.borrow_mut();
        let now = guard.origin.elapsed();
        guard.controller.advance_to(now);
        f(&mut guard.controller)
    };
    arm_timer(state);
    result
}

fn arm_timer(state: &Shared) {
    let mut guard = state.borrow_mut();
    let window = guard.controller.view().window().clone();
    if let Some(handle) = guard.timeout.take() {
        window.clear_timeout_with_handle(handle);
    }
    let Some(deadline) = guard.controller.next_deadline() else {
        return;
    };
    let delay = timeout_millis(deadline.saturating_sub(guard.origin.elapsed()));

    let weak = Rc::downgrade(state);
    let callback = Closure::once_into_js(move || {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().timeout = None;
            dispatch(&state, |_| ());
        }
    });
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        Ok(handle) => guard.timeout = Some(handle),
        Err(err) => warn!(?err, "failed to arm revert timer"),
    }
}

/// Attach a page-lifetime listener.
fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

// ---------------------------------------------------------------------------
// Exported runner
// ---------------------------------------------------------------------------

/// JS-facing page runner.
#[wasm_bindgen]
pub struct PageRunner {
    state: Shared,
}

#[wasm_bindgen]
impl PageRunner {
    /// Mount the controller over the current document without installing
    /// listeners. `config_json` may be omitted to use the default markup.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PageRunner, JsValue> {
        install_panic_hook();
        let config = config_from_json(config_json.as_deref()).map_err(to_js_error)?;
        let view = DomView::new()?;
        let controller = PageController::mount(view, config).map_err(to_js_error)?;
        Ok(Self {
            state: Rc::new(RefCell::new(RunnerState {
                controller,
                origin: Instant::now(),
                timeout: None,
            })),
        })
    }

    /// Install click, anchor, and scroll listeners.
    #[wasm_bindgen(js_name = attachListeners)]
    pub fn attach_listeners(&self) -> Result<(), JsValue> {
        let (nav, actions, anchors, window) = {
            let guard = self.state.borrow();
            let controller = &guard.controller;
            let view = controller.view();
            let resolve = |ids: &[ElementId]| -> Vec<(ElementId, Element)> {
                ids.iter()
                    .filter_map(|&id| view.element(id).map(|el| (id, el)))
                    .collect()
            };
            let anchor_ids = view.query_all(&controller.config().selectors.anchors);
            (
                resolve(controller.nav_controls()),
                resolve(controller.action_controls()),
                resolve(&anchor_ids),
                view.window().clone(),
            )
        };

        for (id, el) in nav {
            let state = Rc::clone(&self.state);
            listen(&el, "click", move |_| {
                dispatch(&state, |c| c.on_nav_click(id));
            })?;
        }

        for (id, el) in actions {
            let state = Rc::clone(&self.state);
            listen(&el, "click", move |_| {
                dispatch(&state, |c| c.on_interact(id));
            })?;
        }

        for (_, el) in anchors {
            let state = Rc::clone(&self.state);
            let anchor = el.clone();
            listen(&el, "click", move |event| {
                let href = anchor.get_attribute("href").unwrap_or_default();
                let fragment = href_fragment(&href).unwrap_or_default();
                let outcome = dispatch(&state, |c| c.on_navigate(fragment));
                if outcome.prevent_default() {
                    event.prevent_default();
                }
            })?;
        }

        let state = Rc::clone(&self.state);
        listen(&window, "scroll", move |_| {
            dispatch(&state, |c| c.on_scroll());
        })?;

        debug!("page listeners attached");
        Ok(())
    }

    /// Run page-ready initialization now, or on `DOMContentLoaded` if the
    /// document is still loading.
    #[wasm_bindgen(js_name = runWhenReady)]
    pub fn run_when_ready(&self) -> Result<(), JsValue> {
        let document = self.state.borrow().controller.view().document().clone();
        if is_loading(&document) {
            let state = Rc::clone(&self.state);
            listen(&document, "DOMContentLoaded", move |_| {
                dispatch(&state, |c| c.on_ready());
            })
        } else {
            self.on_ready();
            Ok(())
        }
    }

    #[wasm_bindgen(js_name = onReady)]
    pub fn on_ready(&self) {
        dispatch(&self.state, |c| c.on_ready());
    }

    /// Select a category token. Returns `{ visible, hidden }`.
    #[wasm_bindgen(js_name = onFilterSelect)]
    pub fn on_filter_select(&self, category: &str) -> JsValue {
        filter_outcome_to_js(dispatch(&self.state, |c| c.on_filter_select(category)))
    }

    /// Activate the navigation control at `index`. Returns `{ visible, hidden }`,
    /// or `undefined` for an unknown index.
    #[wasm_bindgen(js_name = onNavClick)]
    pub fn on_nav_click(&self, index: u32) -> JsValue {
        dispatch(&self.state, |c| {
            let control = c.nav_controls().get(index as usize).copied()?;
            Some(c.on_nav_click(control))
        })
        .map_or(JsValue::UNDEFINED, filter_outcome_to_js)
    }

    /// Count an interaction on the action control at `index`. Returns the new
    /// counter value, or `undefined` for an unknown index.
    #[wasm_bindgen(js_name = onInteract)]
    pub fn on_interact(&self, index: u32) -> Option<f64> {
        dispatch(&self.state, |c| {
            let control = c.action_controls().get(index as usize).copied()?;
            Some(c.on_interact(control) as f64)
        })
    }

    /// Activate a same-page anchor. Returns whether a target was scrolled to.
    #[wasm_bindgen(js_name = onNavigate)]
    pub fn on_navigate(&self, fragment: &str) -> bool {
        matches!(
            dispatch(&self.state, |c| c.on_navigate(fragment)),
            folio_core::NavigateOutcome::Scrolled(_)
        )
    }

    /// Run a reveal pass. Returns how many elements were newly revealed.
    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&self) -> u32 {
        dispatch(&self.state, |c| c.on_scroll()) as u32
    }

    /// Fire any reverts that are due. Returns how many ran.
    pub fn tick(&self) -> u32 {
        let fired = {
            let mut guard = self.state.borrow_mut();
            let now = guard.origin.elapsed();
            guard.controller.advance_to(now)
        };
        arm_timer(&self.state);
        fired as u32
    }

    pub fn counter(&self) -> f64 {
        self.state.borrow().controller.counter() as f64
    }

    #[wasm_bindgen(js_name = activeCategory)]
    pub fn active_category(&self) -> String {
        self.state
            .borrow()
            .controller
            .active_category()
            .token()
            .to_owned()
    }
}

/// Mount the page with `config_json` (or the defaults), install listeners,
/// and run page-ready initialization.
///
/// While the document is still loading, the markup the controller resolves
/// at mount is not parsed yet, so the whole sequence is deferred to
/// `DOMContentLoaded` and `undefined` is returned. Errors raised then go to
/// `console.error`.
#[wasm_bindgen(js_name = mountPage)]
pub fn mount_page(config_json: Option<String>) -> Result<Option<PageRunner>, JsValue> {
    install_panic_hook();
    let document = DomView::new()?.document().clone();
    if is_loading(&document) {
        mount_on_content_loaded(&document, config_json)?;
        return Ok(None);
    }
    mount_now(config_json).map(Some)
}

/// Mount, attach listeners, and run page-ready initialization when `target`
/// fires `DOMContentLoaded`.
///
/// The runner stays alive through its listeners.
pub fn mount_on_content_loaded(
    target: &EventTarget,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let mut pending = Some(config_json);
    listen(target, "DOMContentLoaded", move |_| {
        let Some(config_json) = pending.take() else {
            return;
        };
        match mount_now(config_json) {
            Ok(_) => debug!("page mounted after DOMContentLoaded"),
            Err(err) => console_error(&err.as_string().unwrap_or_else(|| format!("{err:?}"))),
        }
    })
}

fn mount_now(config_json: Option<String>) -> Result<PageRunner, JsValue> {
    let runner = PageRunner::new(config_json)?;
    runner.attach_listeners()?;
    runner.on_ready();
    Ok(runner)
}
