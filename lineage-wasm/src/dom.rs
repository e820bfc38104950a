//! Browser side of the geometry and export host seams.

use std::future::Future;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, SvgGraphicsElement, XmlSerializer};

use lineage_core::scene::ROOT_GROUP_ID;
use lineage_core::{Bounds, GeometryProvider, Scene};
use lineage_export::{CaptureFrame, ExportError, ExportHost};

/// Reads the bounding box of the mounted tree group.
pub struct DomGeometry<'a> {
    pub document: &'a Document,
}

impl GeometryProvider for DomGeometry<'_> {
    fn content_bounds(&self) -> Bounds {
        let Some(group) = self
            .document
            .get_element_by_id(ROOT_GROUP_ID)
            .and_then(|el| el.dyn_into::<SvgGraphicsElement>().ok())
        else {
            return Bounds::EMPTY;
        };
        match group.get_b_box() {
            Ok(r) => Bounds::new(r.x() as f64, r.y() as f64, r.width() as f64, r.height() as f64),
            Err(_) => Bounds::EMPTY,
        }
    }
}

/// Mounts isolated copies off-screen, outside the live container. Captures
/// read the mounted copy back, so the paint waits cover what is rasterized.
#[derive(Clone)]
pub struct DomHost {
    document: Document,
}

/// An off-screen copy; removed from the page when dropped.
pub struct OffscreenMount(Element);

impl Drop for OffscreenMount {
    fn drop(&mut self) {
        self.0.remove();
    }
}

impl DomHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn mount(&self, scene: &Scene, frame: &CaptureFrame) -> Result<OffscreenMount, wasm_bindgen::JsValue> {
        let div = self.document.create_element("div")?.dyn_into::<HtmlElement>()?;
        let style = div.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "-99999px")?;
        style.set_property("top", "-99999px")?;
        style.set_property("overflow", "visible")?;
        style.set_property("width", &format!("{}px", frame.width))?;
        style.set_property("height", &format!("{}px", frame.height))?;
        div.set_inner_html(&scene.to_svg());
        // Ids must stay unique on the page
        if let Ok(Some(group)) = div.query_selector(&format!("#{ROOT_GROUP_ID}")) {
            group.remove_attribute("id")?;
        }
        let body = self.document.body().ok_or("no body")?;
        body.append_child(&div)?;
        Ok(OffscreenMount(div.into()))
    }
}

impl ExportHost for DomHost {
    type Isolation = OffscreenMount;

    fn isolate(&self, scene: &Scene, frame: &CaptureFrame) -> Result<OffscreenMount, ExportError> {
        self.mount(scene, frame)
            .map_err(|e| ExportError::host(format!("{e:?}")))
    }

    /// Serializes the mounted `<svg>` as the browser holds it after layout.
    fn snapshot(&self, mount: &OffscreenMount) -> Result<String, ExportError> {
        let svg = mount
            .0
            .query_selector("svg")
            .map_err(|e| ExportError::host(format!("{e:?}")))?
            .ok_or_else(|| ExportError::host("mounted copy has no svg element"))?;
        let serializer = XmlSerializer::new().map_err(|e| ExportError::host(format!("{e:?}")))?;
        serializer
            .serialize_to_string(&svg)
            .map_err(|e| ExportError::host(format!("{e:?}")))
    }

    fn settle(&self, delay: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(delay)
    }

    fn fonts_ready(&self) -> impl Future<Output = ()> {
        let ready = self.document.fonts().ready();
        async move {
            if let Ok(promise) = ready
                && JsFuture::from(promise).await.is_err()
            {
                tracing::warn!("font loading failed, capturing anyway");
            }
        }
    }
}
