use thiserror::Error;

use crate::gate::ExportKind;

/// Failures of one export invocation. Callers surface a single generic
/// notice; no partial artifact is ever produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("another export is already running ({0:?})")]
    Busy(ExportKind),

    #[error("scene could not be parsed for capture: {0}")]
    SceneParse(String),

    #[error("no fonts available for text rendering")]
    NoFonts,

    #[error("cannot allocate a {width}x{height} raster")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("PDF image compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("capture surface unavailable: {0}")]
    Host(String),
}

impl ExportError {
    pub fn host<S: Into<String>>(message: S) -> Self {
        Self::Host(message.into())
    }
}
