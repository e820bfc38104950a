//! Export buttons: run the pipeline off the click handler and deliver the
//! artifact as a download or an inline PDF preview.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlButtonElement, HtmlElement};

use lineage_export::{Artifact, EXPORT_FAILED_NOTICE, ExportError, ExportKind};

use crate::constants::*;
use crate::element;
use crate::state::{PdfDelivery, State};
use crate::utils::{alert, open_in_new_tab, save_bytes_as_file};

const EXPORT_BUTTONS: [&str; 3] = [ID_EXPORT_PNG, ID_EXPORT_PDF, ID_EXPORT_SVG];

/// Disable every export button and show the overlay while an export runs.
fn set_busy(state: &State, busy: bool) {
    for id in EXPORT_BUTTONS {
        if let Some(btn) = element::<HtmlButtonElement>(&state.document, id) {
            let svg_waiting = id == ID_EXPORT_SVG && !state.session.content_ready;
            btn.set_disabled(busy || svg_waiting);
        }
    }
    if let Some(overlay) = element::<HtmlElement>(&state.document, ID_OVERLAY) {
        overlay.set_text_content(Some(OVERLAY_TEXT));
        let shown = if busy { "flex" } else { "none" };
        if overlay.style().set_property("display", shown).is_err() {
            tracing::warn!("could not toggle the export overlay");
        }
    }
}

fn deliver(state: &State, kind: ExportKind, artifact: &Artifact) -> Result<(), JsValue> {
    if let Some(pages) = artifact.pages {
        tracing::info!(pages, "pdf ready");
    }
    if kind == ExportKind::Pdf && state.session.pdf_delivery() == PdfDelivery::Preview {
        if !open_in_new_tab(&state.window, artifact.mime, &artifact.bytes)? {
            alert(&state.window, NOTICE_POPUP_BLOCKED);
        }
        return Ok(());
    }
    save_bytes_as_file(
        &state.document,
        &artifact.file_name,
        artifact.mime,
        &artifact.bytes,
    )?;
    if kind == ExportKind::Pdf {
        alert(&state.window, NOTICE_PDF_DOWNLOADED);
    }
    Ok(())
}

async fn run_export(st: Rc<RefCell<State>>, kind: ExportKind) {
    // Clone what the export needs; no borrow is held across an await
    let (exporter, scene, paper) = {
        let s = st.borrow();
        if s.exporter.gate().is_busy() {
            return;
        }
        if kind == ExportKind::Svg && !s.session.content_ready {
            tracing::debug!("svg export requested before the tree was ready");
            return;
        }
        set_busy(&s, true);
        (s.exporter.clone(), s.scene.clone(), s.session.paper)
    };

    let result = match kind {
        ExportKind::Png => exporter.export_png(scene.as_ref()).await,
        ExportKind::Pdf => exporter.export_pdf(scene.as_ref(), paper).await,
        ExportKind::Svg => exporter.export_svg(scene.as_ref()).await,
    };

    let s = st.borrow();
    set_busy(&s, false);
    match result {
        Ok(Some(artifact)) => {
            if let Err(e) = deliver(&s, kind, &artifact) {
                tracing::error!(?e, "delivering the export failed");
                alert(&s.window, EXPORT_FAILED_NOTICE);
            }
        }
        Ok(None) => tracing::debug!(?kind, "nothing to export"),
        Err(ExportError::Busy(running)) => tracing::debug!(?running, "export already running"),
        Err(e) => {
            tracing::error!(%e, ?kind, "export failed");
            alert(&s.window, EXPORT_FAILED_NOTICE);
        }
    }
}

pub fn attach_export_buttons(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let buttons = [
        (ID_EXPORT_PNG, ExportKind::Png),
        (ID_EXPORT_PDF, ExportKind::Pdf),
        (ID_EXPORT_SVG, ExportKind::Svg),
    ];
    for (id, kind) in buttons {
        let Some(btn) = element::<HtmlElement>(&doc, id) else {
            continue;
        };
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            wasm_bindgen_futures::spawn_local(run_export(st.clone(), kind));
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}
