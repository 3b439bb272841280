// Browser tests for the DOM layer. Run with `wasm-pack test --headless --firefox`.
//
// Every test mounts a fresh body and calls `start_page` again. Document-level
// keydown listeners from earlier mounts stay registered, so each test leaves
// its gallery closed.
#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlVideoElement, KeyboardEvent,
    KeyboardEventInit, window,
};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"
<div id="puzzle-container"><div id="puzzle"></div></div>
<button id="giveupBtn" class="giveup-btn">Give up</button>
<div id="welcome-msg" class="hidden"></div>
<div id="main-content" class="hidden">
  <div class="media-slot"><video class="media-preview" src="clip.mp4" muted></video></div>
  <div class="media-slot"><img class="media-preview" src="photo.png"></div>
</div>
<div id="mediaModal" class="modal hidden">
  <span class="close-modal">&times;</span>
  <button id="prevMedia">&lt;</button>
  <img id="modalImg" class="hidden">
  <video id="modalVid" class="hidden" muted></video>
  <button id="nextMedia">&gt;</button>
</div>"#;

fn mount() -> Document {
    let doc = window().unwrap().document().unwrap();
    doc.body().unwrap().set_inner_html(PAGE);
    heart_gate::start_page().unwrap();
    doc
}

fn el<T: JsCast>(doc: &Document, selector: &str) -> T {
    doc.query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("missing {selector}"))
        .dyn_into::<T>()
        .unwrap()
}

fn is_hidden(el: &Element) -> bool {
    el.class_list().contains("hidden")
}

fn open_slot(doc: &Document, idx: usize) {
    let slots = doc.query_selector_all(".media-slot").unwrap();
    let slot: HtmlElement = slots.get(idx as u32).unwrap().dyn_into().unwrap();
    slot.click();
    assert!(!is_hidden(&el::<Element>(doc, "#mediaModal")));
}

fn press(doc: &Document, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    let evt = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    doc.dispatch_event(&evt).unwrap();
}

#[wasm_bindgen_test]
fn start_page_renders_board() {
    let doc = mount();

    let puzzle: HtmlElement = el(&doc, "#puzzle");
    let tiles = puzzle.query_selector_all(".tile").unwrap();
    assert_eq!(tiles.length(), 9);
    assert_eq!(puzzle.query_selector_all(".tile.blank").unwrap().length(), 1);
    assert_eq!(
        puzzle.style().get_property_value("grid-template-columns").unwrap(),
        "repeat(3, 1fr)"
    );
}

#[wasm_bindgen_test]
async fn leaving_a_video_pauses_it() {
    let doc = mount();
    let img: HtmlImageElement = el(&doc, "#modalImg");
    let vid: HtmlVideoElement = el(&doc, "#modalVid");

    open_slot(&doc, 0);
    assert!(!is_hidden(&vid));
    assert!(is_hidden(&img));
    // clip.mp4 does not exist, so the play promise rejects; that is logged
    // and the modal stays usable.
    TimeoutFuture::new(100).await;
    assert!(!is_hidden(&vid));

    el::<HtmlElement>(&doc, "#nextMedia").click();
    assert!(vid.paused());
    assert!(is_hidden(&vid));
    assert!(!is_hidden(&img));
    assert!(img.src().ends_with("photo.png"));

    el::<HtmlElement>(&doc, ".close-modal").click();
}

#[wasm_bindgen_test]
fn every_close_path_hides_modal_and_pauses_video() {
    let doc = mount();
    let modal: HtmlElement = el(&doc, "#mediaModal");
    let vid: HtmlVideoElement = el(&doc, "#modalVid");

    let close_button = |doc: &Document| el::<HtmlElement>(doc, ".close-modal").click();
    let backdrop = |doc: &Document| el::<HtmlElement>(doc, "#mediaModal").click();
    let escape = |doc: &Document| press(doc, "Escape");
    let closers: [(&str, &dyn Fn(&Document)); 3] = [
        ("close button", &close_button),
        ("backdrop", &backdrop),
        ("escape", &escape),
    ];

    for (name, close) in closers {
        open_slot(&doc, 0);
        close(&doc);
        assert!(is_hidden(&modal), "{name} left the modal open");
        assert!(vid.paused(), "{name} left the video playing");
    }
}

#[wasm_bindgen_test]
fn content_click_keeps_modal_open() {
    let doc = mount();
    let modal: HtmlElement = el(&doc, "#mediaModal");

    open_slot(&doc, 1);
    el::<HtmlElement>(&doc, "#modalImg").click();
    assert!(!is_hidden(&modal));

    modal.click();
    assert!(is_hidden(&modal));
}

#[wasm_bindgen_test]
fn arrow_keys_navigate_only_while_open() {
    let doc = mount();
    let img: HtmlImageElement = el(&doc, "#modalImg");

    press(&doc, "ArrowRight");
    assert!(is_hidden(&el::<Element>(&doc, "#mediaModal")));

    open_slot(&doc, 0);
    press(&doc, "ArrowLeft");
    assert!(!is_hidden(&img));
    assert!(img.src().ends_with("photo.png"));

    press(&doc, "Escape");
}

#[wasm_bindgen_test]
async fn give_up_unlocks_after_delay() {
    let doc = mount();
    let welcome: Element = el(&doc, "#welcome-msg");
    let content: Element = el(&doc, "#main-content");

    el::<HtmlElement>(&doc, "#giveupBtn").click();
    // the board snaps back at once; the unlock waits for the win delay
    let puzzle: Element = el(&doc, "#puzzle");
    let blank = puzzle.query_selector(".tile.blank").unwrap().unwrap();
    assert_eq!(puzzle.last_element_child(), Some(blank));
    assert!(is_hidden(&welcome));

    TimeoutFuture::new(700).await;
    assert!(!is_hidden(&welcome));
    assert!(!is_hidden(&content));
    assert!(is_hidden(&el::<Element>(&doc, "#puzzle-container")));
}

#[wasm_bindgen_test]
async fn service_worker_registers_when_page_already_loaded() {
    let win = window().unwrap();
    let doc = win.document().unwrap();
    let Ok(container) = Reflect::get(&win.navigator(), &JsValue::from_str("serviceWorker")) else {
        return;
    };
    if container.is_undefined() {
        return;
    }
    let recorder = Function::new_with_args(
        "url",
        "globalThis.__swRegistered = url; return Promise.resolve(null);",
    );
    Reflect::set(&container, &JsValue::from_str("register"), &recorder).unwrap();
    while doc.ready_state() != "complete" {
        TimeoutFuture::new(10).await;
    }

    // `load` has already fired; registration must not wait for it.
    mount();
    let url = Reflect::get(&win, &JsValue::from_str("__swRegistered")).unwrap();
    assert_eq!(url.as_string().as_deref(), Some("/sw.js"));
}
