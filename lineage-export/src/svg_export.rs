//! Standalone vector export: the tree fitted onto a fixed landscape page under
//! a caption band.

use serde::Deserialize;

use lineage_core::scene::{Annotation, TextAnchor};
use lineage_core::{Bounds, GeometryProvider, Scene, ViewState};

const MM_PER_INCH: f64 = 25.4;
const CSS_DPI: f64 = 96.0;
/// Connector width forced onto exported links.
pub const LINK_STROKE_WIDTH: f64 = 2.0;

const TITLE_COLOR: &str = "#92400e";
const TEXT_COLOR: &str = "#78350f";

/// Text block drawn above the tree.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Caption {
    pub title: String,
    pub address: String,
    pub motto: Vec<String>,
}

impl Default for Caption {
    fn default() -> Self {
        Self {
            title: "Phả hệ Trịnh Bá Tộc - Chi 2".into(),
            address: "Làng Thượng Phúc, xã Xuân Thượng, huyện Xuân Trường, tỉnh Nam Định.".into(),
            motto: vec![
                "CON NGƯỜI SINH TRƯỞNG BỞI ĐÂU,".into(),
                "GỐC LÀ TIÊN TỔ - ƠN SÂU RÕ RÀNG…".into(),
            ],
        }
    }
}

impl Caption {
    /// Caption elements centred on `center_x`, stacked down from `top`.
    pub fn annotations(&self, center_x: f64, top: f64) -> Vec<Annotation> {
        let text = |y: f64, size: f64, bold: bool, fill: &str, text: &str| Annotation::Text {
            x: center_x,
            y,
            size,
            bold,
            fill: fill.to_string(),
            anchor: TextAnchor::Middle,
            text: text.to_string(),
        };
        let mut out = vec![
            text(top + 96.0, 96.0, true, TITLE_COLOR, &self.title),
            text(top + 170.0, 44.0, false, TEXT_COLOR, &self.address),
        ];
        for (i, line) in self.motto.iter().enumerate() {
            out.push(text(
                top + 240.0 + i as f64 * 52.0,
                40.0,
                true,
                TITLE_COLOR,
                line,
            ));
        }
        out
    }
}

/// Physical target page of the vector export.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgPage {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Reserved at the top for the caption, in px.
    pub caption_band: f64,
    pub margin: f64,
}

impl Default for SvgPage {
    fn default() -> Self {
        // A0 landscape
        Self {
            width_mm: 1189.0,
            height_mm: 841.0,
            caption_band: 420.0,
            margin: 60.0,
        }
    }
}

impl SvgPage {
    /// Page size in CSS pixels.
    pub fn size_px(&self) -> (f64, f64) {
        let k = CSS_DPI / MM_PER_INCH;
        (self.width_mm * k, self.height_mm * k)
    }

    /// View that fits `content` below the caption band, centred horizontally.
    pub fn fit(&self, content: Bounds) -> Option<ViewState> {
        if !content.has_area() {
            return None;
        }
        let (w, h) = self.size_px();
        let avail_w = w - 2.0 * self.margin;
        let avail_h = h - self.caption_band - self.margin;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return None;
        }
        let zoom = (avail_w / content.width).min(avail_h / content.height);
        Some(ViewState {
            zoom,
            translate: (
                (w - content.width * zoom) / 2.0 - content.x * zoom,
                self.caption_band - content.y * zoom,
            ),
        })
    }
}

/// Rewrite a copy of `scene` into the printable vector document. `None` when
/// the scene has no laid-out content.
pub fn build_svg_document(scene: &Scene, page: &SvgPage, caption: &Caption) -> Option<String> {
    let view = page.fit(scene.content_bounds())?;
    let (w, h) = page.size_px();
    let mut doc = scene.clone();
    doc.width = w;
    doc.height = h;
    doc.physical_mm = Some((page.width_mm, page.height_mm));
    doc.background = Some("#ffffff".into());
    doc.view = view;
    let forced = doc.force_link_strokes(LINK_STROKE_WIDTH);
    doc.prepend_annotations(caption.annotations(w / 2.0, 0.0));
    tracing::debug!(zoom = view.zoom, forced, "svg document prepared");
    Some(doc.to_svg())
}
