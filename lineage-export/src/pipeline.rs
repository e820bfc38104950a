//! One export invocation, start to finish.
//!
//! PNG and PDF share the raster path: claim the gate, frame the content,
//! mount an isolated copy, wait for it to paint, snapshot and capture that
//! copy, correct colours, unmount, then encode. SVG skips the raster path and rewrites a copy of the
//! scene instead. Nothing here touches the live scene.

use lineage_core::scene::{Annotation, TextAnchor};
use lineage_core::{GeometryProvider, Scene};

use crate::capture::{CaptureOptions, RasterCapture, RasterImage};
use crate::error::ExportError;
use crate::frame::{CaptureFrame, isolate_scene};
use crate::gate::{ExportGate, ExportKind};
use crate::host::ExportHost;
use crate::paper::PaperSize;
use crate::pdf::write_pdf;
use crate::png_encode::encode_png;
use crate::settings::{ExportSettings, FILE_BASE_NAME};
use crate::svg_export::build_svg_document;

const FOOTER_FONT_SIZE: f64 = 40.0;
const FOOTER_COLOR: &str = "#92400e";

/// A finished file, ready to be handed to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// Page count, for paginated documents.
    pub pages: Option<usize>,
}

impl Artifact {
    fn new(ext: &str, mime: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{FILE_BASE_NAME}.{ext}"),
            mime,
            bytes,
            pages: None,
        }
    }
}

pub struct Exporter<H, C> {
    host: H,
    capture: C,
    settings: ExportSettings,
    gate: ExportGate,
}

impl<H: ExportHost, C: RasterCapture> Exporter<H, C> {
    pub fn new(host: H, capture: C, settings: ExportSettings) -> Self {
        Self {
            host,
            capture,
            settings,
            gate: ExportGate::new(),
        }
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    fn begin(&self, kind: ExportKind) -> Result<crate::gate::ExportTicket, ExportError> {
        let ticket = self.gate.try_begin(kind).map_err(|running| {
            tracing::warn!(requested = ?kind, ?running, "export refused, another is running");
            ExportError::Busy(running)
        })?;
        tracing::info!(kind = ?kind, "export started");
        Ok(ticket)
    }

    fn footer(&self, frame: &CaptureFrame) -> Option<Annotation> {
        let band = self.settings.padding.bottom;
        if !self.settings.raster_footer || band < FOOTER_FONT_SIZE {
            return None;
        }
        Some(Annotation::Text {
            x: frame.width / 2.0,
            y: frame.height - band / 2.0 + FOOTER_FONT_SIZE / 3.0,
            size: FOOTER_FONT_SIZE,
            bold: true,
            fill: FOOTER_COLOR.to_string(),
            anchor: TextAnchor::Middle,
            text: self.settings.caption.title.clone(),
        })
    }

    /// Steps shared by PNG and PDF, up to and including colour correction.
    async fn capture_raster(&self, scene: &Scene, scale: f64) -> Result<RasterImage, ExportError> {
        let frame = CaptureFrame::around(scene.content_bounds(), &self.settings.padding);
        let (pw, ph) = frame.pixel_size(scale);
        tracing::debug!(
            x = frame.x,
            y = frame.y,
            width = frame.width,
            height = frame.height,
            pixels_w = pw,
            pixels_h = ph,
            "capture frame"
        );

        let mut copy = isolate_scene(scene, &frame);
        copy.annotations.extend(self.footer(&frame));
        let isolation = self.host.isolate(&copy, &frame)?;

        self.host.settle(self.settings.paint_settle()).await;
        self.host.fonts_ready().await;

        let opts = CaptureOptions {
            scale,
            background: Some(self.settings.background),
            width: frame.width,
            height: frame.height,
        };
        let svg = self.host.snapshot(&isolation)?;
        let mut img = self.capture.capture(&svg, &opts)?;
        self.settings.color.apply(&mut img);
        drop(isolation);
        Ok(img)
    }

    /// `Ok(None)` when there is no scene to export.
    pub async fn export_png(&self, scene: Option<&Scene>) -> Result<Option<Artifact>, ExportError> {
        let Some(scene) = scene else {
            tracing::debug!("png export skipped, no scene");
            return Ok(None);
        };
        let _ticket = self.begin(ExportKind::Png)?;
        let img = self.capture_raster(scene, self.settings.png_scale).await?;
        let bytes = encode_png(&img)?;
        tracing::info!(width = img.width, height = img.height, bytes = bytes.len(), "png ready");
        Ok(Some(Artifact::new("png", "image/png", bytes)))
    }

    pub async fn export_pdf(
        &self,
        scene: Option<&Scene>,
        paper: PaperSize,
    ) -> Result<Option<Artifact>, ExportError> {
        let Some(scene) = scene else {
            tracing::debug!("pdf export skipped, no scene");
            return Ok(None);
        };
        let _ticket = self.begin(ExportKind::Pdf)?;
        let img = self.capture_raster(scene, self.settings.pdf_scale).await?;
        let (bytes, pages) = write_pdf(&img, paper)?;
        let mut artifact = Artifact::new("pdf", "application/pdf", bytes);
        artifact.pages = Some(pages);
        Ok(Some(artifact))
    }

    /// `Ok(None)` also when the scene has no laid-out content yet.
    pub async fn export_svg(&self, scene: Option<&Scene>) -> Result<Option<Artifact>, ExportError> {
        let Some(scene) = scene else {
            tracing::debug!("svg export skipped, no scene");
            return Ok(None);
        };
        let _ticket = self.begin(ExportKind::Svg)?;
        let Some(doc) = build_svg_document(scene, &self.settings.svg_page, &self.settings.caption)
        else {
            tracing::warn!("svg export skipped, content has no size");
            return Ok(None);
        };
        tracing::info!(bytes = doc.len(), "svg ready");
        Ok(Some(Artifact::new("svg", "image/svg+xml", doc.into_bytes())))
    }
}
