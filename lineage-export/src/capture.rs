//! Raster capture: turn a scene's SVG into pixels.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::ExportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Straight-alpha RGBA8 image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Uniformly filled image.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            rgba.extend_from_slice(&[color.0, color.1, color.2, 255]);
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn from_pixmap(pixmap: &tiny_skia::Pixmap) -> Self {
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[i..i + 4].copy_from_slice(&px);
    }
}

/// What to capture and at which resolution. `width`/`height` are in layout
/// units; the raster is `round(width * scale)` x `round(height * scale)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureOptions {
    pub scale: f64,
    pub background: Option<Rgb>,
    pub width: f64,
    pub height: f64,
}

impl CaptureOptions {
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale).round().max(0.0) as u32,
            (self.height * self.scale).round().max(0.0) as u32,
        )
    }
}

/// The raster-capture collaborator.
pub trait RasterCapture {
    fn capture(&self, svg: &str, opts: &CaptureOptions) -> Result<RasterImage, ExportError>;
}

/// Captures with resvg, using the embedded font when one was built in and the
/// system fonts otherwise.
pub struct ResvgCapture {
    options: usvg::Options<'static>,
}

impl ResvgCapture {
    pub fn new() -> Result<Self, ExportError> {
        let mut fontdb = usvg::fontdb::Database::new();
        if fonts::is_embedded() {
            fontdb.load_font_data(fonts::FONT_BYTES.to_vec());
        } else {
            tracing::warn!("no embedded font; using system fonts for capture");
            fontdb.load_system_fonts();
        }
        Self::with_fonts(fontdb)
    }

    /// Text would silently vanish from every capture, so an empty database
    /// is refused.
    pub fn with_fonts(mut fontdb: usvg::fontdb::Database) -> Result<Self, ExportError> {
        // Map generic 'sans-serif' to the first available family
        let Some(family_name) = fontdb
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(n, _)| n.clone()))
        else {
            tracing::error!("font database is empty");
            return Err(ExportError::NoFonts);
        };
        fontdb.set_sans_serif_family(family_name);
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::new(fontdb);
        Ok(Self { options: opt })
    }
}

impl RasterCapture for ResvgCapture {
    fn capture(&self, svg: &str, opts: &CaptureOptions) -> Result<RasterImage, ExportError> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| ExportError::SceneParse(e.to_string()))?;
        let (w, h) = opts.pixel_size();
        let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or(ExportError::Allocation {
            width: w,
            height: h,
        })?;
        if let Some(bg) = opts.background {
            pixmap.fill(tiny_skia::Color::from_rgba8(bg.0, bg.1, bg.2, 255));
        }
        let size = tree.size();
        let sx = w as f32 / size.width();
        let sy = h as f32 / size.height();
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );
        tracing::debug!(width = w, height = h, scale = opts.scale, "raster captured");
        Ok(RasterImage::from_pixmap(&pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="5" y="0" width="5" height="10" fill="#000000"/></svg>"##;

    #[test]
    fn captures_at_scale_over_background() {
        let cap = ResvgCapture::new().unwrap();
        let opts = CaptureOptions {
            scale: 2.0,
            background: Some(Rgb::WHITE),
            width: 10.0,
            height: 10.0,
        };
        let img = cap.capture(SQUARE, &opts).unwrap();
        assert_eq!((img.width, img.height), (20, 20));
        assert_eq!(img.pixel(2, 10), [255, 255, 255, 255]);
        assert_eq!(img.pixel(15, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn zero_sized_capture_is_an_allocation_error() {
        let cap = ResvgCapture::new().unwrap();
        let opts = CaptureOptions {
            scale: 0.0,
            background: None,
            width: 10.0,
            height: 10.0,
        };
        assert!(matches!(
            cap.capture(SQUARE, &opts),
            Err(ExportError::Allocation { .. })
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let cap = ResvgCapture::new().unwrap();
        let opts = CaptureOptions {
            scale: 1.0,
            background: None,
            width: 1.0,
            height: 1.0,
        };
        assert!(matches!(
            cap.capture("not svg", &opts),
            Err(ExportError::SceneParse(_))
        ));
    }

    #[test]
    fn empty_font_database_is_refused() {
        let err = ResvgCapture::with_fonts(usvg::fontdb::Database::new()).err();
        assert!(matches!(err, Some(ExportError::NoFonts)));
    }

    #[test]
    fn node_names_reach_the_raster() {
        let cap = ResvgCapture::new().unwrap();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="40" viewBox="0 0 200 40"><text x="4" y="28" font-family="sans-serif" font-size="24" fill="#000000">TRINH BA CONG</text></svg>"##;
        let opts = CaptureOptions {
            scale: 1.0,
            background: Some(Rgb::WHITE),
            width: 200.0,
            height: 40.0,
        };
        let img = cap.capture(svg, &opts).unwrap();
        let dark = img.rgba.chunks_exact(4).filter(|p| p[0] < 128).count();
        assert!(dark > 50, "only {dark} text pixels");
    }
}
