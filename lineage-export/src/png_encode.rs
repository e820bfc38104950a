use png::{BitDepth, ColorType, Encoder};

use crate::capture::RasterImage;

// RGBA -> PNG bytes (deterministic for same input)
pub fn encode_png(img: &RasterImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, img.width, img.height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(&img.rgba)?;
    }
    Ok(buf)
}
