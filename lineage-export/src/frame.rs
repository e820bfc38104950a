//! The padded capture rectangle around the content, and the isolated copy of
//! the scene sized to it.

use serde::Deserialize;

use lineage_core::{Bounds, Scene, ViewState};

pub const PADDING_TOP: f64 = 60.0;
pub const PADDING_SIDE: f64 = 60.0;
/// Larger at the bottom to leave room for the footer caption.
pub const PADDING_BOTTOM: f64 = 160.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub side: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: PADDING_TOP,
            side: PADDING_SIDE,
            bottom: PADDING_BOTTOM,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CaptureFrame {
    pub fn around(content: Bounds, pad: &Padding) -> Self {
        Self {
            x: content.x - pad.side,
            y: content.y - pad.top,
            width: content.width + 2.0 * pad.side,
            height: content.height + pad.top + pad.bottom,
        }
    }

    pub fn pixel_size(&self, scale: f64) -> (u32, u32) {
        (
            (self.width * scale).round() as u32,
            (self.height * scale).round() as u32,
        )
    }
}

/// Copy of `scene` whose surface is exactly the frame and whose root group
/// maps the frame's top-left corner to the origin at zoom 1.
pub fn isolate_scene(scene: &Scene, frame: &CaptureFrame) -> Scene {
    let mut copy = scene.clone();
    copy.width = frame.width;
    copy.height = frame.height;
    copy.physical_mm = None;
    copy.view = ViewState {
        zoom: 1.0,
        translate: (-frame.x, -frame.y),
    };
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::{Entity, GeometryProvider, LayoutConfig};

    #[test]
    fn frame_pads_content() {
        let f = CaptureFrame::around(Bounds::new(-100.0, -20.0, 400.0, 300.0), &Padding::default());
        assert_eq!(f, CaptureFrame {
            x: -160.0,
            y: -80.0,
            width: 520.0,
            height: 520.0
        });
        assert_eq!(f.pixel_size(3.0), (1560, 1560));
    }

    #[test]
    fn isolation_leaves_the_live_scene_alone() {
        let root = Entity::new("root").with_children(vec![Entity::new("a")]);
        let live = Scene::build(&root, &LayoutConfig::default(), 1000.0, 700.0);
        let frame = CaptureFrame::around(live.content_bounds(), &Padding::default());
        let iso = isolate_scene(&live, &frame);
        assert_eq!(iso.view.translate, (-frame.x, -frame.y));
        assert_eq!(iso.width, frame.width);
        assert_eq!(live.width, 1000.0);
        assert_eq!(live.view, ViewState::initial(1000.0));
        // content's top-left lands at the padding offset
        let b = iso.content_bounds();
        assert_eq!(iso.view.to_screen((b.x, b.y)), (PADDING_SIDE, PADDING_TOP));
    }
}
