use std::rc::Rc;

use web_sys::{Document, Window};

use lineage_core::{Entity, Scene, ViewState, filtered_view};
use lineage_export::{Exporter, PaperSize, ResvgCapture};

use crate::dom::DomHost;

/// What the viewer session knows, independent of the DOM.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub search: String,
    pub view: ViewState,
    pub paper: PaperSize,
    /// Tree container size in CSS pixels.
    pub container: (f64, f64),
    /// PDFs open in a new tab instead of downloading.
    pub inline_preview: bool,
    /// The rendered tree has reported a non-zero size.
    pub content_ready: bool,
    pub info_expanded: bool,
    /// Last pointer position of an ongoing pan, container-relative.
    pub drag_from: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdfDelivery {
    Preview,
    Download,
}

impl SessionState {
    pub fn new(container: (f64, f64), inline_preview: bool) -> Self {
        Self {
            search: String::new(),
            view: ViewState::initial(container.0),
            paper: PaperSize::default(),
            container,
            inline_preview,
            content_ready: false,
            info_expanded: true,
            drag_from: None,
        }
    }

    /// Returns whether the search actually changed; a change invalidates the
    /// readiness of the rendered content.
    pub fn set_search(&mut self, search: &str) -> bool {
        if self.search == search {
            return false;
        }
        self.search = search.to_string();
        self.content_ready = false;
        true
    }

    pub fn begin_drag(&mut self, at: (f64, f64)) {
        self.drag_from = Some(at);
    }

    /// Pan by the pointer movement since the last call; false when no drag
    /// is in progress.
    pub fn drag_to(&mut self, at: (f64, f64)) -> bool {
        let Some(from) = self.drag_from.replace(at) else {
            return false;
        };
        self.view.pan_by(at.0 - from.0, at.1 - from.1);
        true
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    /// Zoom buttons keep the container centre fixed.
    pub fn zoom_step(&mut self, zoom_in: bool) {
        let centre = (self.container.0 / 2.0, self.container.1 / 2.0);
        if zoom_in {
            self.view.zoom_in_at(centre);
        } else {
            self.view.zoom_out_at(centre);
        }
    }

    /// Unknown keys leave the current paper in place.
    pub fn set_paper(&mut self, key: &str) {
        match key.parse() {
            Ok(p) => self.paper = p,
            Err(e) => tracing::warn!(%e, "paper selection ignored"),
        }
    }

    pub fn pdf_delivery(&self) -> PdfDelivery {
        if self.inline_preview {
            PdfDelivery::Preview
        } else {
            PdfDelivery::Download
        }
    }

    /// The tree shown for the current search.
    pub fn scene_for(&self, root: &Entity) -> Scene {
        let view = filtered_view(root, &self.search);
        let mut scene = Scene::build(
            &view,
            &Default::default(),
            self.container.0,
            self.container.1,
        );
        scene.view = self.view;
        scene
    }
}

pub type DomExporter = Exporter<DomHost, ResvgCapture>;

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub root: Entity,
    pub session: SessionState,
    /// The scene currently mounted in the container.
    pub scene: Option<Scene>,
    pub exporter: Rc<DomExporter>,
    /// Bumped on every re-render so stale delayed tasks can bail out.
    pub generation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Entity {
        Entity::new("Tổ").with_children(vec![Entity::new("Con cả"), Entity::new("Con thứ")])
    }

    #[test]
    fn search_change_resets_readiness() {
        let mut s = SessionState::new((1000.0, 600.0), true);
        s.content_ready = true;
        assert!(!s.set_search(""));
        assert!(s.content_ready);
        assert!(s.set_search("cả"));
        assert!(!s.content_ready);
        assert_eq!(s.scene_for(&root()).nodes.len(), 2);
    }

    #[test]
    fn paper_and_delivery() {
        let mut s = SessionState::new((800.0, 600.0), false);
        assert_eq!(s.paper, PaperSize::A0);
        s.set_paper("a4");
        assert_eq!(s.paper, PaperSize::A4);
        s.set_paper("letter");
        assert_eq!(s.paper, PaperSize::A4);
        assert_eq!(s.pdf_delivery(), PdfDelivery::Download);
        s.inline_preview = true;
        assert_eq!(s.pdf_delivery(), PdfDelivery::Preview);
    }

    #[test]
    fn dragging_pans_the_view() {
        let mut s = SessionState::new((800.0, 600.0), true);
        assert!(!s.drag_to((50.0, 50.0)));
        assert_eq!(s.view, ViewState::initial(800.0));
        s.begin_drag((100.0, 100.0));
        assert!(s.drag_to((130.0, 90.0)));
        assert!(s.drag_to((140.0, 95.0)));
        assert_eq!(s.view.translate, (440.0, 95.0));
        s.end_drag();
        assert!(!s.drag_to((500.0, 500.0)));
        assert_eq!(s.view.translate, (440.0, 95.0));
    }

    #[test]
    fn zoom_buttons_hold_the_container_centre() {
        let mut s = SessionState::new((800.0, 600.0), true);
        let centre = s.view.to_content((400.0, 300.0));
        s.zoom_step(true);
        s.zoom_step(true);
        let (x, y) = s.view.to_screen(centre);
        assert!((x - 400.0).abs() < 1e-9 && (y - 300.0).abs() < 1e-9);
        s.zoom_step(false);
        assert!((s.view.zoom - 1.2).abs() < 1e-9);
    }

    #[test]
    fn scene_carries_the_session_view() {
        let mut s = SessionState::new((800.0, 600.0), true);
        s.zoom_step(true);
        let scene = s.scene_for(&root());
        assert_eq!(scene.view, s.view);
        assert_eq!(scene.nodes.len(), 3);
    }
}
