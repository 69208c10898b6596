#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_core::{PageConfig, PageController, PageView, StyleProperty};
use folio_web::{DomView, PageRunner, mount_on_content_loaded, mount_page};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlElement};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<nav>
  <button class="nav-btn" data-category="all">All</button>
  <button class="nav-btn" data-category="drinks">Drinks</button>
  <button class="nav-btn" data-category="mains">Mains</button>
  <a id="to-contact" href="#contact">Contact</a>
</nav>
<div id="orderCounter"><span id="orderCount">0</span></div>
<div id="menuGrid">
  <div class="menu-item" data-category="drinks"><button class="order-btn">Review</button></div>
  <div class="menu-item" data-category="mains"><button class="order-btn">Review</button></div>
  <div class="menu-item" data-category="drinks"><button class="order-btn">Review</button></div>
</div>
<ul><li id="contact" class="contact-item">hello@example.com</li></ul>
"##;

fn load_page(html: &str) {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(html);
}

fn js_number(obj: &JsValue, key: &str) -> f64 {
    Reflect::get(obj, &JsValue::from_str(key))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
fn dom_view_reads_and_writes_the_document() {
    load_page(PAGE);
    let mut view = DomView::new().unwrap();

    let items = view.query_all(".menu-item");
    assert_eq!(items.len(), 3);
    assert_eq!(view.query_all(".menu-item"), items, "handles are stable");
    assert_eq!(view.attribute(items[1], "data-category").as_deref(), Some("mains"));

    let buttons = view.query_all(".order-btn");
    assert_eq!(view.closest(buttons[2], ".menu-item"), Some(items[2]));

    view.add_class(items[0], "hidden");
    assert!(view.has_class(items[0], "hidden"));
    view.remove_class(items[0], "hidden");
    assert!(!view.has_class(items[0], "hidden"));

    view.set_style(items[0], StyleProperty::Opacity, "1");
    let html = view.element(items[0]).unwrap().outer_html();
    assert!(html.contains("opacity: 1"), "{html}");
    view.clear_style(items[0], StyleProperty::Opacity);
    let html = view.element(items[0]).unwrap().outer_html();
    assert!(!html.contains("opacity"), "{html}");

    assert!(view.by_id("nope").is_none());
    assert!(view.query_all("[[invalid").is_empty());
}

#[wasm_bindgen_test]
fn controller_over_dom_view() {
    load_page(PAGE);
    let mut controller =
        PageController::mount(DomView::new().unwrap(), PageConfig::default()).unwrap();
    controller.on_filter_select("drinks");

    let view = controller.view();
    let items = view.query_all(".menu-item");
    let hidden: Vec<bool> = items.iter().map(|&i| view.has_class(i, "hidden")).collect();
    assert_eq!(hidden, vec![false, true, false]);

    let button = controller.action_controls()[0];
    controller.on_interact(button);
    let display = controller.view().by_id("orderCount").unwrap();
    assert_eq!(controller.view().text(display), "1");
    assert_eq!(controller.view().text(button), "Reviewed");

    controller.advance_by(core::time::Duration::from_millis(1000));
    assert_eq!(controller.view().text(button), "Review");
}

#[wasm_bindgen_test]
fn runner_exports() {
    load_page(PAGE);
    let runner = PageRunner::new(None).unwrap();
    runner.on_ready();
    assert_eq!(runner.active_category(), "all");

    let outcome = runner.on_filter_select("mains");
    assert_eq!(js_number(&outcome, "visible"), 1.0);
    assert_eq!(js_number(&outcome, "hidden"), 2.0);
    assert_eq!(runner.active_category(), "mains");

    assert_eq!(runner.on_interact(0), Some(1.0));
    assert_eq!(runner.on_interact(1), Some(2.0));
    assert_eq!(runner.on_interact(99), None);
    assert_eq!(runner.counter(), 2.0);

    assert!(runner.on_navigate("#contact"));
    assert!(!runner.on_navigate("#missing"));
}

#[wasm_bindgen_test]
fn missing_counter_fails_mount() {
    load_page(r#"<div class="menu-item" data-category="drinks"></div>"#);
    let err = PageRunner::new(None).err().expect("mount must fail");
    let message = err.as_string().unwrap();
    assert!(message.contains("counter container"), "{message}");
}

#[wasm_bindgen_test]
fn invalid_config_fails_mount() {
    load_page(PAGE);
    let err = PageRunner::new(Some("{\"timing\": {\"label_revert_ms\": 0}}".into()))
        .err()
        .expect("mount must fail");
    assert!(err.as_string().unwrap().contains("label_revert_ms"));
}

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn click(selector: &str) {
    document()
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

fn counter_text() -> String {
    document()
        .get_element_by_id("orderCount")
        .unwrap()
        .text_content()
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn mount_page_on_a_loaded_document_runs_ready() {
    load_page(PAGE);
    let runner = mount_page(None).unwrap().expect("document is already loaded");
    assert_eq!(runner.active_category(), "all");

    click(".order-btn");
    assert_eq!(counter_text(), "1");
    assert_eq!(runner.counter(), 1.0);
}

#[wasm_bindgen_test]
fn mounting_waits_for_content_loaded() {
    // Before the event fires the counter markup does not exist yet; mounting
    // now would fail.
    load_page("");
    let document = document();
    mount_on_content_loaded(&document, None).unwrap();

    load_page(PAGE);
    let event = Event::new("DOMContentLoaded").unwrap();
    document.dispatch_event(&event).unwrap();

    let all = document.query_selector(".nav-btn").unwrap().unwrap();
    assert!(all.class_list().contains("active"), "ready ran on the event");

    click(".order-btn");
    assert_eq!(counter_text(), "1", "listeners were attached on the event");

    // A second event does not mount again.
    document.dispatch_event(&event).unwrap();
    click(".order-btn");
    assert_eq!(counter_text(), "2");
}
