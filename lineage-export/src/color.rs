//! Cosmetic colour correction applied to captured rasters.
//!
//! The multipliers were never calibrated against a print profile; they warm
//! the image slightly. All are >= 1.0 so pure white stays pure white, which
//! the PDF blank-tile check relies on.

use serde::Deserialize;

use crate::capture::RasterImage;

pub const RED_GAIN: f32 = 1.03;
pub const GREEN_GAIN: f32 = 1.01;
pub const BLUE_GAIN: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorCorrection {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self {
            red: RED_GAIN,
            green: GREEN_GAIN,
            blue: BLUE_GAIN,
        }
    }
}

fn gain(v: u8, k: f32) -> u8 {
    (v as f32 * k).round().clamp(0.0, 255.0) as u8
}

impl ColorCorrection {
    pub const IDENTITY: ColorCorrection = ColorCorrection {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn apply(&self, img: &mut RasterImage) {
        if *self == Self::IDENTITY {
            return;
        }
        for px in img.rgba.chunks_exact_mut(4) {
            if px[3] == 0 {
                continue;
            }
            px[0] = gain(px[0], self.red);
            px[1] = gain(px[1], self.green);
            px[2] = gain(px[2], self.blue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_is_a_fixed_point_and_colours_shift() {
        let mut img = RasterImage {
            width: 2,
            height: 1,
            rgba: vec![255, 255, 255, 255, 100, 100, 100, 255],
        };
        ColorCorrection::default().apply(&mut img);
        assert_eq!(&img.rgba[..4], &[255, 255, 255, 255]);
        assert_eq!(&img.rgba[4..], &[103, 101, 100, 255]);
    }

    #[test]
    fn transparent_pixels_are_untouched() {
        let mut img = RasterImage {
            width: 1,
            height: 1,
            rgba: vec![10, 10, 10, 0],
        };
        ColorCorrection::default().apply(&mut img);
        assert_eq!(img.rgba, [10, 10, 10, 0]);
    }
}
