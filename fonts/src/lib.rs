//! Font bytes embedded at build time.
//!
//! `FONT_BYTES` is empty only on native builds that could not fetch a font;
//! callers fall back to system fonts there. Wasm builds fail instead.

pub static FONT_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/NotoSans-Regular.ttf"));

/// Whether a font was embedded at build time.
pub fn is_embedded() -> bool {
    !FONT_BYTES.is_empty()
}
