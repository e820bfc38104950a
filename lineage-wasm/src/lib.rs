//! Browser shell: renders the genealogy tree into `#treeContainer`, wires the
//! search box, paper selector, zoom and export buttons, drag-to-pan and wheel
//! zoom, and hands exports to the pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, MouseEvent, WheelEvent};

use lineage_core::constants::AUTO_FIT_SETTLE_MS;
use lineage_core::scene::ROOT_GROUP_ID;
use lineage_core::{Entity, Readiness, wait_until_ready};
use lineage_export::{ExportSettings, Exporter, PaperSize, ResvgCapture};

mod constants;
mod dom;
mod export;
mod state;
mod utils;

use constants::*;
use dom::{DomGeometry, DomHost};
use state::{SessionState, State};
use utils::{get_query_param, window_flag, window_string};

fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn container_size(document: &Document) -> (f64, f64) {
    match document.get_element_by_id(ID_CONTAINER) {
        Some(el) => {
            let r = el.get_bounding_client_rect();
            (r.width().max(1.0), r.height().max(1.0))
        }
        None => (1200.0, 800.0),
    }
}

/// Pointer position relative to the tree container.
fn event_container_coords(e: &MouseEvent, container: &Element) -> (f64, f64) {
    let rect = container.get_bounding_client_rect();
    (e.client_x() as f64 - rect.left(), e.client_y() as f64 - rect.top())
}

/// Rebuild the scene for the current search and mount it in the container.
fn render(state: &mut State) {
    let scene = state.session.scene_for(&state.root);
    if let Some(el) = state.document.get_element_by_id(ID_CONTAINER) {
        el.set_inner_html(&scene.to_svg());
    }
    tracing::debug!(nodes = scene.nodes.len(), search = %state.session.search, "tree rendered");
    state.scene = Some(scene);
    state.generation += 1;
}

/// Re-apply the view transform without rebuilding the tree.
fn apply_view(state: &mut State) {
    if let Some(scene) = state.scene.as_mut() {
        scene.view = state.session.view;
    }
    if let Some(g) = state.document.get_element_by_id(ROOT_GROUP_ID)
        && g.set_attribute("transform", &state.session.view.svg_transform()).is_err()
    {
        tracing::warn!("could not update the tree transform");
    }
}

fn update_svg_button(state: &State) {
    if let Some(btn) = element::<web_sys::HtmlButtonElement>(&state.document, ID_EXPORT_SVG) {
        let ready = state.session.content_ready;
        btn.set_disabled(!ready || state.exporter.gate().is_busy());
        btn.set_text_content(Some(if ready { LABEL_EXPORT_SVG } else { LABEL_SVG_LOADING }));
    }
}

/// After a re-render: wait for the layout to settle, fit the tree to the
/// container, then poll until the content reports a size.
fn schedule_fit(st: Rc<RefCell<State>>) {
    let generation = st.borrow().generation;
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(AUTO_FIT_SETTLE_MS).await;
        let (document, policy) = {
            let s = st.borrow();
            if s.generation != generation {
                return;
            }
            (s.document.clone(), s.exporter.settings().readiness)
        };
        let geometry = DomGeometry {
            document: &document,
        };
        {
            let mut s = st.borrow_mut();
            let (cw, ch) = container_size(&document);
            s.session.container = (cw, ch);
            if s.session.view.fit_to(&geometry, cw, ch) {
                apply_view(&mut s);
            }
        }
        let readiness = wait_until_ready(&geometry, policy, gloo_timers::future::sleep).await;
        let mut s = st.borrow_mut();
        if s.generation != generation {
            return;
        }
        s.session.content_ready = readiness.is_ready();
        // The first fit may have run before layout finished
        if let Readiness::Ready(b) = readiness {
            let (cw, ch) = s.session.container;
            s.session.view.fit_to(&b, cw, ch);
        }
        apply_view(&mut s);
        update_svg_button(&s);
    });
}

fn rerender(st: &Rc<RefCell<State>>) {
    {
        let mut s = st.borrow_mut();
        render(&mut s);
        update_svg_button(&s);
    }
    schedule_fit(st.clone());
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    // Search box: filter branches as the user types
    if let Some(input) = element::<HtmlInputElement>(&doc, ID_SEARCH) {
        input.set_value(&state.borrow().session.search);
        let st = state.clone();
        let field = input.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let changed = st.borrow_mut().session.set_search(&field.value());
            if changed {
                rerender(&st);
            }
        }));
        input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // Paper selector
    if let Some(sel) = element::<HtmlSelectElement>(&doc, ID_PAPER) {
        if sel.length() == 0 {
            for p in PaperSize::ALL {
                let opt = doc.create_element("option")?;
                opt.set_attribute("value", p.key())?;
                opt.set_text_content(Some(p.label()));
                sel.append_child(&opt)?;
            }
        }
        sel.set_value(state.borrow().session.paper.key());
        let st = state.clone();
        let field = sel.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut().session.set_paper(&field.value());
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    // Zoom buttons
    for (id, zoom_in) in [(ID_ZOOM_IN, true), (ID_ZOOM_OUT, false)] {
        if let Some(btn) = element::<HtmlElement>(&doc, id) {
            let st = state.clone();
            let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
                let mut s = st.borrow_mut();
                let size = container_size(&s.document);
                s.session.container = size;
                s.session.zoom_step(zoom_in);
                apply_view(&mut s);
            }));
            btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
            onclick.forget();
        }
    }

    if let Some(container) = doc.get_element_by_id(ID_CONTAINER) {
        attach_pan_zoom(&state, &container)?;
    }

    // Info panel toggle
    if let Some(btn) = element::<HtmlElement>(&doc, ID_INFO_TOGGLE) {
        let st = state.clone();
        let label = btn.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.session.info_expanded = !s.session.info_expanded;
            let expanded = s.session.info_expanded;
            label.set_text_content(Some(if expanded { LABEL_INFO_SHOWN } else { LABEL_INFO_HIDDEN }));
            if let Some(body) = element::<HtmlElement>(&s.document, ID_INFO_BODY)
                && body
                    .style()
                    .set_property("display", if expanded { "block" } else { "none" })
                    .is_err()
            {
                tracing::warn!("could not toggle the info panel");
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    export::attach_export_buttons(state)?;
    Ok(())
}

/// Drag to pan, wheel to zoom about the cursor.
fn attach_pan_zoom(state: &Rc<RefCell<State>>, container: &Element) -> Result<(), JsValue> {
    {
        let st = state.clone();
        let el = container.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            e.prevent_default();
            st.borrow_mut().session.begin_drag(event_container_coords(&e, &el));
        }));
        container.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let el = container.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.session.drag_to(event_container_coords(&e, &el)) {
                apply_view(&mut s);
            }
        }));
        // On the window so a drag keeps going outside the container
        state
            .borrow()
            .window
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            st.borrow_mut().session.end_drag();
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    {
        let st = state.clone();
        let el = container.clone();
        let wheel = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            let at = event_container_coords(&e, &el);
            let mut s = st.borrow_mut();
            s.session.view.wheel_zoom(e.delta_y(), at);
            apply_view(&mut s);
        }));
        container.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
        wheel.forget();
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let root = Entity::from_json(TREE_JSON).map_err(|e| JsValue::from_str(&e.to_string()))?;
    tracing::info!(entities = root.count(), depth = root.depth(), "tree loaded");

    let settings = match window_string(&window, "__EXPORT_SETTINGS") {
        Some(json) => ExportSettings::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!(%e, "ignoring invalid export settings");
            ExportSettings::default()
        }),
        None => ExportSettings::default(),
    };
    let capture = ResvgCapture::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let exporter = Exporter::new(DomHost::new(document.clone()), capture, settings);

    let inline_preview = window_flag(&window, "__INLINE_PREVIEW").unwrap_or(true);
    let mut session = SessionState::new(container_size(&document), inline_preview);
    if let Ok(search) = window.location().search() {
        if let Some(p) = get_query_param(&search, "paper") {
            session.set_paper(&p);
        }
        if let Some(q) = get_query_param(&search, "q") {
            session.set_search(&q);
        }
    }

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        root,
        session,
        scene: None,
        exporter: Rc::new(exporter),
        generation: 0,
    }));

    attach_ui(state.clone())?;
    rerender(&state);
    Ok(())
}
