use std::time::Duration;

use serde::Deserialize;

use lineage_core::ReadinessPolicy;

use crate::capture::Rgb;
use crate::color::ColorCorrection;
use crate::frame::Padding;
use crate::svg_export::{Caption, SvgPage};

pub const PNG_SCALE: f64 = 3.0;
pub const PDF_SCALE: f64 = 2.0;
/// Wait after mounting the isolated copy before capturing (ms).
pub const PAINT_SETTLE_MS: u32 = 500;
/// Base name of every downloaded file.
pub const FILE_BASE_NAME: &str = "so-do-pha-he-trinh-ba";

/// Everything an export run can be tuned with. Every field has a default, so
/// a partial JSON object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub padding: Padding,
    pub png_scale: f64,
    pub pdf_scale: f64,
    pub paint_settle_ms: u32,
    pub color: ColorCorrection,
    pub readiness: ReadinessPolicy,
    pub svg_page: SvgPage,
    pub caption: Caption,
    /// Draw the caption title in the bottom padding band of PNG/PDF captures.
    pub raster_footer: bool,
    pub background: Rgb,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            png_scale: PNG_SCALE,
            pdf_scale: PDF_SCALE,
            paint_settle_ms: PAINT_SETTLE_MS,
            color: ColorCorrection::default(),
            readiness: ReadinessPolicy::default(),
            svg_page: SvgPage::default(),
            caption: Caption::default(),
            raster_footer: true,
            background: Rgb::WHITE,
        }
    }
}

impl ExportSettings {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn paint_settle(&self) -> Duration {
        Duration::from_millis(self.paint_settle_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let s = ExportSettings::from_json(r#"{"png_scale": 1.5, "padding": {"bottom": 0}}"#).unwrap();
        assert_eq!(s.png_scale, 1.5);
        assert_eq!(s.pdf_scale, PDF_SCALE);
        assert_eq!(s.padding.bottom, 0.0);
        assert_eq!(s.padding.top, 60.0);
        assert_eq!(s.readiness.max_attempts, 20);
        assert_eq!(s.paint_settle(), Duration::from_millis(500));
    }
}
