//! Paginated PDF: the capture is cut into page-sized tiles, blank tiles are
//! dropped and every remaining tile becomes one landscape page.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

use crate::capture::RasterImage;
use crate::error::ExportError;
use crate::paper::PaperSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
    pub tile_w: u32,
    pub tile_h: u32,
}

/// A tile's pixel rectangle; edge tiles are clipped to the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a tile lands on its page, in points from the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PdfPage {
    pub tile: Tile,
    pub placement: PagePlacement,
}

pub fn tile_grid(img_w: u32, img_h: u32, paper: PaperSize) -> TileGrid {
    let (tile_w, tile_h) = paper.tile_px();
    TileGrid {
        rows: img_h.div_ceil(tile_h),
        cols: img_w.div_ceil(tile_w),
        tile_w,
        tile_h,
    }
}

impl TileGrid {
    /// Tiles in reading order: row by row, left to right.
    pub fn tiles(&self, img_w: u32, img_h: u32) -> impl Iterator<Item = Tile> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| {
                let x = col * self.tile_w;
                let y = row * self.tile_h;
                Tile {
                    row,
                    col,
                    x,
                    y,
                    width: self.tile_w.min(img_w - x),
                    height: self.tile_h.min(img_h - y),
                }
            })
        })
    }
}

/// True when every pixel of the tile is pure white or fully transparent.
pub fn is_blank(img: &RasterImage, tile: &Tile) -> bool {
    let stride = img.width as usize * 4;
    (tile.y..tile.y + tile.height).all(|y| {
        let start = y as usize * stride + tile.x as usize * 4;
        let end = start + tile.width as usize * 4;
        img.rgba[start..end]
            .chunks_exact(4)
            .all(|p| p[3] == 0 || (p[0] == 255 && p[1] == 255 && p[2] == 255))
    })
}

/// Scale a `w` x `h` tile to fit the page, preserving aspect ratio, centred.
pub fn place_on_page(w: u32, h: u32, page_w: f64, page_h: f64) -> PagePlacement {
    let ratio = (page_w / w as f64).min(page_h / h as f64);
    let width = w as f64 * ratio;
    let height = h as f64 * ratio;
    PagePlacement {
        x: (page_w - width) / 2.0,
        y: (page_h - height) / 2.0,
        width,
        height,
    }
}

/// Lay out the pages for `img`. A capture with no content anywhere still
/// yields its first tile, so the document is never empty.
pub fn paginate(img: &RasterImage, paper: PaperSize) -> Vec<PdfPage> {
    let grid = tile_grid(img.width, img.height, paper);
    let (page_w, page_h) = paper.landscape_pt();
    let all: Vec<Tile> = grid.tiles(img.width, img.height).collect();
    let mut kept: Vec<Tile> = all.iter().copied().filter(|t| !is_blank(img, t)).collect();
    tracing::debug!(
        rows = grid.rows,
        cols = grid.cols,
        skipped = all.len() - kept.len(),
        "paginated capture"
    );
    if kept.is_empty() {
        kept.extend(all.first().copied());
    }
    kept.into_iter()
        .map(|tile| PdfPage {
            tile,
            placement: place_on_page(tile.width, tile.height, page_w, page_h),
        })
        .collect()
}

/// RGB bytes of one tile, flattened over white, zlib-compressed.
fn tile_rgb_deflated(img: &RasterImage, tile: &Tile) -> Result<Vec<u8>, ExportError> {
    let mut rgb = Vec::with_capacity(tile.width as usize * tile.height as usize * 3);
    let stride = img.width as usize * 4;
    for y in tile.y..tile.y + tile.height {
        let start = y as usize * stride + tile.x as usize * 4;
        let end = start + tile.width as usize * 4;
        for p in img.rgba[start..end].chunks_exact(4) {
            let a = p[3] as u32;
            for c in &p[..3] {
                rgb.push(((*c as u32 * a + 255 * (255 - a)) / 255) as u8);
            }
        }
    }
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&rgb)?;
    Ok(enc.finish()?)
}

/// Build the PDF document. Returns the bytes and the page count.
pub fn write_pdf(img: &RasterImage, paper: PaperSize) -> Result<(Vec<u8>, usize), ExportError> {
    let pages = paginate(img, paper);
    let (page_w, page_h) = paper.landscape_pt();

    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    // Three objects per page: page, content stream, image
    let page_ref = |i: usize| Ref::new(3 + 3 * i as i32);
    let content_ref = |i: usize| Ref::new(4 + 3 * i as i32);
    let image_ref = |i: usize| Ref::new(5 + 3 * i as i32);
    let image_name = Name(b"Im0");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids((0..pages.len()).map(page_ref))
        .count(pages.len() as i32);

    for (i, page) in pages.iter().enumerate() {
        let mut p = pdf.page(page_ref(i));
        p.media_box(Rect::new(0.0, 0.0, page_w as f32, page_h as f32));
        p.parent(tree_id);
        p.contents(content_ref(i));
        p.resources().x_objects().pair(image_name, image_ref(i));
        p.finish();

        let data = tile_rgb_deflated(img, &page.tile)?;
        let mut image = pdf.image_xobject(image_ref(i), &data);
        image.filter(Filter::FlateDecode);
        image.width(page.tile.width as i32);
        image.height(page.tile.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();

        let pl = page.placement;
        let mut content = Content::new();
        content.save_state();
        content.transform([
            pl.width as f32,
            0.0,
            0.0,
            pl.height as f32,
            pl.x as f32,
            pl.y as f32,
        ]);
        content.x_object(image_name);
        content.restore_state();
        pdf.stream(content_ref(i), &content.finish());
    }

    tracing::info!(pages = pages.len(), paper = %paper, "pdf written");
    Ok((pdf.finish(), pages.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Rgb;

    #[test]
    fn grid_rounds_up() {
        let g = tile_grid(1123, 793, PaperSize::A4);
        assert_eq!((g.cols, g.rows), (2, 1));
        let tiles: Vec<_> = g.tiles(1123, 793).collect();
        assert_eq!(tiles[1].width, 1);
        assert_eq!(tiles[1].x, 1122);
    }

    #[test]
    fn transparent_and_white_are_blank() {
        let mut img = RasterImage::filled(4, 4, Rgb::WHITE);
        img.set_pixel(1, 1, [0, 0, 0, 0]);
        let t = Tile {
            row: 0,
            col: 0,
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        };
        assert!(is_blank(&img, &t));
        img.set_pixel(3, 3, [254, 255, 255, 255]);
        assert!(!is_blank(&img, &t));
    }

    #[test]
    fn small_tiles_are_scaled_up_and_centred() {
        let p = place_on_page(100, 100, 800.0, 400.0);
        assert_eq!(p.width, 400.0);
        assert_eq!(p.x, 200.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn fully_blank_capture_keeps_one_page() {
        let img = RasterImage::filled(3000, 100, Rgb::WHITE);
        let pages = paginate(&img, PaperSize::A4);
        assert_eq!(pages.len(), 1);
        assert_eq!((pages[0].tile.row, pages[0].tile.col), (0, 0));
    }
}
