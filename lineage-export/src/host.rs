//! The environment an export runs in: where the isolated copy is mounted and
//! how the pipeline waits for it to paint.

use std::future::Future;
use std::time::Duration;

use lineage_core::Scene;

use crate::error::ExportError;
use crate::frame::CaptureFrame;

pub trait ExportHost {
    /// Keeps the isolated copy alive; dropping it removes the copy.
    type Isolation;

    fn isolate(&self, scene: &Scene, frame: &CaptureFrame) -> Result<Self::Isolation, ExportError>;

    /// The isolated copy as an SVG document, read after it has settled.
    /// This is what gets rasterized.
    fn snapshot(&self, isolation: &Self::Isolation) -> Result<String, ExportError>;

    fn settle(&self, delay: Duration) -> impl Future<Output = ()>;

    fn fonts_ready(&self) -> impl Future<Output = ()>;
}

/// Host with nothing to mount and nothing to wait for; the isolated copy is
/// the scene's own SVG text.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessHost;

impl ExportHost for HeadlessHost {
    type Isolation = String;

    fn isolate(&self, scene: &Scene, frame: &CaptureFrame) -> Result<String, ExportError> {
        tracing::trace!(width = frame.width, height = frame.height, "headless isolation");
        Ok(scene.to_svg())
    }

    fn snapshot(&self, isolation: &String) -> Result<String, ExportError> {
        Ok(isolation.clone())
    }

    fn settle(&self, _delay: Duration) -> impl Future<Output = ()> {
        std::future::ready(())
    }

    fn fonts_ready(&self) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::{Entity, LayoutConfig};

    #[test]
    fn headless_snapshot_is_the_isolated_scene() {
        let scene = Scene::build(&Entity::new("Tổ"), &LayoutConfig::default(), 400.0, 300.0);
        let frame = CaptureFrame {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 300.0,
        };
        let iso = HeadlessHost.isolate(&scene, &frame).unwrap();
        assert_eq!(HeadlessHost.snapshot(&iso).unwrap(), scene.to_svg());
    }
}
