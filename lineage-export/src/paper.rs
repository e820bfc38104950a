//! Printable paper sizes, always used in landscape.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A0,
    A1,
    A2,
    A3,
    A4,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::A0,
        PaperSize::A1,
        PaperSize::A2,
        PaperSize::A3,
        PaperSize::A4,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PaperSize::A0 => "a0",
            PaperSize::A1 => "a1",
            PaperSize::A2 => "a2",
            PaperSize::A3 => "a3",
            PaperSize::A4 => "a4",
        }
    }

    /// Label shown in the paper selector.
    pub fn label(self) -> &'static str {
        match self {
            PaperSize::A0 => "A0 (rất lớn)",
            PaperSize::A1 => "A1 (lớn)",
            PaperSize::A2 => "A2",
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4 (chuẩn)",
        }
    }

    /// Portrait size in points.
    fn portrait_pt(self) -> (f64, f64) {
        match self {
            PaperSize::A0 => (2383.94, 3370.39),
            PaperSize::A1 => (1683.78, 2383.94),
            PaperSize::A2 => (1190.55, 1683.78),
            PaperSize::A3 => (841.89, 1190.55),
            PaperSize::A4 => (595.28, 841.89),
        }
    }

    /// Landscape page size in points (width > height).
    pub fn landscape_pt(self) -> (f64, f64) {
        let (w, h) = self.portrait_pt();
        (h, w)
    }

    /// Landscape page size in CSS pixels (96 per inch), floored, never zero.
    pub fn tile_px(self) -> (u32, u32) {
        let (w, h) = self.landscape_pt();
        let px = |pt: f64| ((pt * 96.0 / 72.0).floor() as u32).max(1);
        (px(w), px(h))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown paper size '{0}'")]
pub struct UnknownPaper(pub String);

impl FromStr for PaperSize {
    type Err = UnknownPaper;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        PaperSize::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or(UnknownPaper(s.to_string()))
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
