//! DOM glue. Everything here runs in the browser only: it finds the page's
//! elements, forwards raw events to the [`Controller`] as [`PageInput`]s and
//! applies the returned [`Effect`]s.

mod channels;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlVideoElement, KeyboardEvent, MouseEvent, TouchEvent, Url, Window, window,
};

use crate::config::PageConfig;
use crate::controller::{Controller, Effect, PageInput};
use crate::gallery::{MediaItem, MediaKind, ModalView, Surface};
use crate::notify::{Notification, NotificationKind, send_best_effort};
use crate::prompt::{
    Bounds, ButtonPlacement, EvasiveButton, HUG_LABEL, HUG_SENDING_LABEL, HUG_SENT_LABEL,
    SendStatus, YES_MESSAGE,
};
use crate::puzzle::{SimpleRng, TileView};
use channels::{BrowserChannel, EndpointChannel, js_error_text};

/// Page-wide state shared by every handler.
struct Page {
    doc: Document,
    cfg: PageConfig,
    controller: RefCell<Controller>,
}

type PageRef = Rc<Page>;

/// Wire up the whole page. Call once after the DOM is ready.
pub fn start_page() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let cfg = load_config(&doc);
    let mut controller = Controller::new(&cfg, SimpleRng::from_entropy());
    controller.puzzle_mut().set_win_notifier(unlock_site);
    let page: PageRef = Rc::new(Page {
        doc,
        cfg,
        controller: RefCell::new(controller),
    });

    init_puzzle(&page, &win)?;
    init_prompt(&page, &win)?;
    init_gallery(&page)?;
    register_service_worker(&win, &page.cfg.service_worker_url)?;
    Ok(())
}

fn load_config(doc: &Document) -> PageConfig {
    let Some(text) = doc
        .get_element_by_id("page-config")
        .and_then(|el| el.text_content())
    else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            gloo::console::warn!(format!("config: {e}; using defaults"));
            PageConfig::default()
        }
    }
}

fn dispatch(page: &PageRef, input: PageInput) {
    let effects = page.controller.borrow_mut().dispatch(input);
    apply_all(page, effects);
}

fn apply_all(page: &PageRef, effects: Vec<Effect>) {
    for effect in effects {
        if let Err(e) = apply(page, effect) {
            gloo::console::warn!(format!("render: {}", js_error_text(&e)));
        }
    }
}

fn apply(page: &PageRef, effect: Effect) -> Result<(), JsValue> {
    match effect {
        Effect::RenderPuzzle(tiles) => render_puzzle(page, &tiles),
        Effect::ScheduleWin { delay_ms } => {
            let page = page.clone();
            Timeout::new(delay_ms, move || {
                page.controller.borrow_mut().fire_pending_win();
            })
            .forget();
            Ok(())
        }
        Effect::OpenModal => {
            if let Some(modal) = page.doc.get_element_by_id("mediaModal") {
                modal.class_list().remove_1("hidden")?;
            }
            Ok(())
        }
        Effect::ShowMedia(view) => show_media(&page.doc, &view),
        Effect::CloseModal => {
            if let Some(modal) = page.doc.get_element_by_id("mediaModal") {
                modal.class_list().add_1("hidden")?;
            }
            pause_modal_video(&page.doc);
            Ok(())
        }
    }
}

fn viewport_width(win: &Window) -> f64 {
    win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn html_by_id(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

// --- Puzzle gate --------------------------------------------------------------

fn init_puzzle(page: &PageRef, win: &Window) -> Result<(), JsValue> {
    let container = html_by_id(&page.doc, "puzzle")
        .ok_or_else(|| JsValue::from_str("missing #puzzle"))?;
    container.style().set_property(
        "grid-template-columns",
        &format!("repeat({}, 1fr)", page.cfg.grid_size),
    )?;

    // One delegated listener; tiles are rebuilt on every render.
    {
        let page = page.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let slot = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".tile").ok().flatten())
                .and_then(|tile| tile.get_attribute("data-slot"))
                .and_then(|s| s.parse::<usize>().ok());
            if let Some(slot) = slot {
                dispatch(&page, PageInput::TileClicked(slot));
            }
        }) as Box<dyn FnMut(_)>);
        container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let effects = page.controller.borrow_mut().start();
    apply_all(page, effects);

    if let Some(giveup) = html_by_id(&page.doc, "giveupBtn") {
        if page.cfg.give_up_immediately(viewport_width(win)) {
            giveup.class_list().add_1("visible")?;
        } else {
            let btn = giveup.clone();
            Timeout::new(page.cfg.give_up_delay_ms, move || {
                btn.class_list().add_1("visible").ok();
            })
            .forget();
        }
        let page = page.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            dispatch(&page, PageInput::GiveUp);
        }) as Box<dyn FnMut(_)>);
        giveup.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
    Ok(())
}

fn render_puzzle(page: &PageRef, tiles: &[TileView]) -> Result<(), JsValue> {
    let Some(container) = page.doc.get_element_by_id("puzzle") else {
        return Ok(());
    };
    container.set_inner_html("");
    for view in tiles {
        let tile: HtmlElement = page.doc.create_element("div")?.dyn_into()?;
        tile.set_class_name("tile");
        match &view.background {
            None => tile.class_list().add_1("blank")?,
            Some(bg) => {
                let style = tile.style();
                style.set_property("background-image", &format!("url({})", page.cfg.image_url))?;
                style.set_property("background-size", &bg.css_size())?;
                style.set_property("background-position", &bg.css_position())?;
                tile.set_attribute("data-slot", &view.slot.to_string())?;
            }
        }
        container.append_child(&tile)?;
    }
    Ok(())
}

/// Win notifier: swap the gate for the unlocked content.
fn unlock_site() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let toggle = |id: &str, hide: bool| {
        if let Some(el) = doc.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hide {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    };
    toggle("puzzle-container", true);
    toggle("welcome-msg", false);
    toggle("main-content", false);
    gloo::console::log!("gate: unlocked");
}

// --- Yes / No prompt and notifications ----------------------------------------

fn init_prompt(page: &PageRef, win: &Window) -> Result<(), JsValue> {
    if let Some(yes) = html_by_id(&page.doc, "yesBtn") {
        let page = page.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            if let Some(q) = html_by_id(&page.doc, "questionText") {
                q.set_inner_text(YES_MESSAGE);
            }
            if let Some(no) = html_by_id(&page.doc, "noBtn") {
                no.style().set_property("display", "none").ok();
            }
            send_with_status(&page, NotificationKind::Valentine, "yesStatus", |_| {});
        }) as Box<dyn FnMut(_)>);
        yes.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(hug) = page
        .doc
        .get_element_by_id("hugBtn")
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    {
        let page = page.clone();
        let btn = hug.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            btn.set_disabled(true);
            btn.set_text_content(Some(HUG_SENDING_LABEL));
            let btn = btn.clone();
            let reset_ms = page.cfg.status_reset_ms;
            send_with_status(&page, NotificationKind::Hug, "hugStatus", move |ok| {
                btn.set_text_content(Some(if ok { HUG_SENT_LABEL } else { HUG_LABEL }));
                Timeout::new(reset_ms, move || {
                    btn.set_disabled(false);
                    btn.set_text_content(Some(HUG_LABEL));
                })
                .forget();
            });
        }) as Box<dyn FnMut(_)>);
        hug.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    setup_no_button(page, win)
}

fn set_status(doc: &Document, id: &str, status: &SendStatus) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_class_name(status.class_name());
        el.set_text_content(Some(&status.text()));
    }
}

/// Fire-and-forget send; the status element reflects the outcome and `done`
/// runs with whether delivery succeeded.
fn send_with_status(
    page: &PageRef,
    kind: NotificationKind,
    status_id: &'static str,
    done: impl FnOnce(bool) + 'static,
) {
    set_status(&page.doc, status_id, &SendStatus::Sending);
    let doc = page.doc.clone();
    let endpoint = EndpointChannel {
        url: page.cfg.notify_endpoint.clone(),
    };
    let browser = BrowserChannel {
        icon: page.cfg.notify_icon.clone(),
    };
    spawn_local(async move {
        let stamp = String::from(js_sys::Date::new_0().to_iso_string());
        let note = Notification::new(&kind, None, stamp);
        let status = match send_best_effort(&endpoint, &browser, &note).await {
            Ok(route) => {
                gloo::console::log!(format!("notify: {} delivered via {route:?}", note.kind));
                let at = String::from(js_sys::Date::new_0().to_locale_time_string("default"));
                SendStatus::Sent { at }
            }
            Err(e) => {
                gloo::console::warn!(format!("notify: {e}"));
                SendStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
        let ok = matches!(status, SendStatus::Sent { .. });
        set_status(&doc, status_id, &status);
        done(ok);
    });
}

fn setup_no_button(page: &PageRef, win: &Window) -> Result<(), JsValue> {
    let Some(no) = html_by_id(&page.doc, "noBtn") else {
        return Ok(());
    };
    let Some(container) = html_by_id(&page.doc, "targetContainer").or_else(|| {
        no.parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
    }) else {
        return Ok(());
    };

    let touch = js_sys::Reflect::has(win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let button = Rc::new(RefCell::new(EvasiveButton::new(
        page.cfg.evasive_min_width,
        SimpleRng::from_entropy(),
    )));
    let bounds = {
        let container = container.clone();
        let no = no.clone();
        move || Bounds {
            container_w: container.client_width() as f64,
            container_h: container.client_height() as f64,
            button_w: no.offset_width() as f64,
            button_h: no.offset_height() as f64,
        }
    };

    let initial = button.borrow().initial(touch, viewport_width(win), bounds());
    if initial == ButtonPlacement::Static {
        return place_button(&no, initial);
    }
    if container.style().get_property_value("position")?.is_empty() {
        container.style().set_property("position", "relative")?;
    }
    place_button(&no, initial)?;

    {
        let button = button.clone();
        let no_el = no.clone();
        let bounds = bounds.clone();
        let win_c = win.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            let placement = button
                .borrow_mut()
                .dodge(touch, viewport_width(&win_c), bounds());
            place_button(&no_el, placement).ok();
        }) as Box<dyn FnMut(_)>);
        no.add_event_listener_with_callback("mouseover", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let win_c = win.clone();
        let no_el = no.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let placement = button
                .borrow()
                .initial(touch, viewport_width(&win_c), bounds());
            place_button(&no_el, placement).ok();
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn place_button(no: &HtmlElement, placement: ButtonPlacement) -> Result<(), JsValue> {
    let style = no.style();
    match placement {
        ButtonPlacement::Static => {
            style.set_property("position", "static")?;
            style.set_property("margin-left", "12px")?;
        }
        ButtonPlacement::Absolute { left, top } => {
            style.set_property("position", "absolute")?;
            style.set_property("left", &format!("{left}px"))?;
            style.set_property("top", &format!("{top}px"))?;
        }
    }
    Ok(())
}

// --- Media gallery --------------------------------------------------------------

fn scan_slots(doc: &Document) -> Vec<Option<MediaItem>> {
    let Ok(slots) = doc.query_selector_all(".media-slot") else {
        return Vec::new();
    };
    (0..slots.length())
        .filter_map(|i| slots.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|slot| {
            let preview = slot.query_selector(".media-preview").ok().flatten()?;
            if let Some(img) = preview.dyn_ref::<HtmlImageElement>() {
                return Some(MediaItem::image(img.src()));
            }
            let vid = preview.dyn_ref::<HtmlVideoElement>()?;
            let src = vid.current_src();
            Some(MediaItem::video(if src.is_empty() { vid.src() } else { src }))
        })
        .collect()
}

fn modal_video(doc: &Document) -> Option<HtmlVideoElement> {
    doc.get_element_by_id("modalVid")
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
}

fn pause_modal_video(doc: &Document) {
    if let Some(vid) = modal_video(doc) {
        vid.pause().ok();
    }
}

fn show_media(doc: &Document, view: &ModalView) -> Result<(), JsValue> {
    pause_modal_video(doc);
    let (Some(img), Some(vid)) = (
        doc.get_element_by_id("modalImg")
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok()),
        modal_video(doc),
    ) else {
        return Ok(());
    };
    match &view.surface {
        None => {}
        Some(Surface::Image(src)) => {
            img.set_src(src);
            img.class_list().remove_1("hidden")?;
            vid.class_list().add_1("hidden")?;
        }
        Some(Surface::Video(src)) => {
            vid.set_src(src);
            vid.class_list().remove_1("hidden")?;
            img.class_list().add_1("hidden")?;
            // Autoplay may be refused; the user can still press play.
            match vid.play() {
                Ok(promise) => spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        gloo::console::warn!(format!("media: play refused: {}", js_error_text(&e)));
                    }
                }),
                Err(e) => gloo::console::warn!(format!("media: play failed: {}", js_error_text(&e))),
            }
        }
    }
    Ok(())
}

fn init_gallery(page: &PageRef) -> Result<(), JsValue> {
    dispatch(page, PageInput::MediaChanged(scan_slots(&page.doc)));

    let slots = page.doc.query_selector_all(".media-slot")?;
    for idx in 0..slots.length() {
        let Some(slot) = slots.get(idx).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        {
            let page = page.clone();
            let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
                let on_edit = evt
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(".edit-media-btn").ok().flatten())
                    .is_some();
                if !on_edit {
                    dispatch(&page, PageInput::ThumbnailClicked(idx as usize));
                }
            }) as Box<dyn FnMut(_)>);
            slot.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        wire_media_picker(page, &slot)?;
    }

    let nav = |id: &str, input: PageInput| -> Result<(), JsValue> {
        if let Some(btn) = html_by_id(&page.doc, id) {
            let page = page.clone();
            let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
                evt.stop_propagation();
                dispatch(&page, input.clone());
            }) as Box<dyn FnMut(_)>);
            btn.set_onclick(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        Ok(())
    };
    nav("prevMedia", PageInput::PrevClicked)?;
    nav("nextMedia", PageInput::NextClicked)?;

    {
        let page_k = page.clone();
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            dispatch(&page_k, PageInput::Key(evt.key()));
        }) as Box<dyn FnMut(_)>);
        page.doc
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(close) = page
        .doc
        .query_selector(".close-modal")?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let page = page.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            dispatch(&page, PageInput::CloseClicked);
        }) as Box<dyn FnMut(_)>);
        close.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    let Some(modal) = html_by_id(&page.doc, "mediaModal") else {
        return Ok(());
    };
    {
        let page = page.clone();
        let modal_c = modal.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let on_backdrop = evt
                .target()
                .map(|t| js_sys::Object::is(&t, &modal_c))
                .unwrap_or(false);
            dispatch(&page, PageInput::ModalClicked { on_backdrop });
        }) as Box<dyn FnMut(_)>);
        modal.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
    for (event, start) in [("touchstart", true), ("touchend", false)] {
        let page = page.clone();
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            let Some(x) = evt.changed_touches().get(0).map(|t| t.screen_x() as f64) else {
                return;
            };
            let input = if start {
                PageInput::TouchStart(x)
            } else {
                PageInput::TouchEnd(x)
            };
            dispatch(&page, input);
        }) as Box<dyn FnMut(_)>);
        modal.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Edit button opens the file picker; a picked file replaces the slot preview.
fn wire_media_picker(page: &PageRef, slot: &Element) -> Result<(), JsValue> {
    let input = slot
        .query_selector(".media-input")?
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
    let edit = slot
        .query_selector(".edit-media-btn")?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let (Some(input), Some(edit)) = (input, edit) else {
        return Ok(());
    };

    {
        let input = input.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            evt.stop_propagation();
            input.click();
        }) as Box<dyn FnMut(_)>);
        edit.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    let page = page.clone();
    let slot = slot.clone();
    let input_c = input.clone();
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        let Some(file) = input_c.files().and_then(|files| files.get(0)) else {
            return;
        };
        let kind = MediaKind::from_mime(&file.type_());
        let replaced = Url::create_object_url_with_blob(&file)
            .and_then(|url| replace_preview(&page.doc, &slot, kind, &url));
        if let Err(e) = replaced {
            gloo::console::warn!(format!("media: {}", js_error_text(&e)));
            return;
        }
        dispatch(&page, PageInput::MediaChanged(scan_slots(&page.doc)));
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn replace_preview(doc: &Document, slot: &Element, kind: MediaKind, url: &str) -> Result<(), JsValue> {
    let preview = slot.query_selector(".media-preview")?;
    let same_kind = preview.as_ref().map(|p| match kind {
        MediaKind::Image => p.is_instance_of::<HtmlImageElement>(),
        MediaKind::Video => p.is_instance_of::<HtmlVideoElement>(),
    });
    if let (Some(p), Some(true)) = (&preview, same_kind) {
        p.set_attribute("src", url)?;
        return Ok(());
    }
    let fresh: Element = match kind {
        MediaKind::Image => {
            let img: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
            img.set_src(url);
            img.into()
        }
        MediaKind::Video => {
            let vid: HtmlVideoElement = doc.create_element("video")?.dyn_into()?;
            vid.set_src(url);
            vid.set_controls(false);
            vid.into()
        }
    };
    fresh.set_class_name("media-preview");
    match preview {
        Some(old) => old.replace_with_with_node_1(&fresh)?,
        None => {
            slot.append_child(&fresh)?;
        }
    }
    Ok(())
}

// --- Service worker ---------------------------------------------------------------

fn register_service_worker(win: &Window, url: &str) -> Result<(), JsValue> {
    let navigator = win.navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker"))? {
        return Ok(());
    }
    let url = url.to_string();
    let register = move || {
        let promise = navigator.service_worker().register(&url);
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => gloo::console::log!("sw: registered"),
                Err(e) => gloo::console::warn!(format!("sw: registration failed: {}", js_error_text(&e))),
            }
        });
    };
    // wasm init is async, so `load` may already be behind us.
    let loaded = win
        .document()
        .map(|doc| doc.ready_state() == "complete")
        .unwrap_or(false);
    if loaded {
        register();
        return Ok(());
    }
    let closure = Closure::once(move |_evt: web_sys::Event| register());
    win.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
