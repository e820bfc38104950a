//! Print and download exports of a laid-out genealogy scene: high-resolution
//! PNG, paginated PDF and a standalone SVG poster.

pub mod capture;
pub mod color;
pub mod error;
pub mod frame;
pub mod gate;
pub mod host;
pub mod paper;
pub mod pdf;
pub mod pipeline;
pub mod png_encode;
pub mod settings;
pub mod svg_export;

pub use capture::{CaptureOptions, RasterCapture, RasterImage, ResvgCapture, Rgb};
pub use color::ColorCorrection;
pub use error::ExportError;
pub use frame::{CaptureFrame, Padding};
pub use gate::{ExportGate, ExportKind, ExportTicket};
pub use host::{ExportHost, HeadlessHost};
pub use paper::PaperSize;
pub use pipeline::{Artifact, Exporter};
pub use settings::{ExportSettings, FILE_BASE_NAME};
pub use svg_export::{Caption, SvgPage};

/// Generic notice shown when an export fails.
pub const EXPORT_FAILED_NOTICE: &str = "Xuất file thất bại, vui lòng thử lại.";
