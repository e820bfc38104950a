//! The rendered vector scene: laid-out nodes and connectors under one root
//! group carrying the view transform, plus optional static annotations drawn
//! outside that group.
//!
//! The scene is a plain value. Exporters clone it and rewrite the clone
//! (size, root transform, strokes, annotations) without touching the live one.

use crate::constants::LINK_STROKE;
use crate::geometry::{Bounds, GeometryProvider};
use crate::layout::{LayoutConfig, PlacedNode, layout};
use crate::model::Entity;
use crate::svg::{escape, num};
use crate::viewport::ViewState;

/// `id` of the group that holds every node and link.
pub const ROOT_GROUP_ID: &str = "tree-root";

#[derive(Clone, Debug, PartialEq)]
pub struct LinkPath {
    pub d: String,
    pub stroke_width: Option<f64>,
    pub vector_effect: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Text {
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        fill: String,
        anchor: TextAnchor,
        text: String,
    },
    Rect {
        bounds: Bounds,
        fill: String,
        stroke: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Surface size in layout units.
    pub width: f64,
    pub height: f64,
    /// Physical page size written as `width`/`height` in millimetres, if any.
    pub physical_mm: Option<(f64, f64)>,
    pub background: Option<String>,
    pub view: ViewState,
    /// Drawn before (underneath) the tree content.
    pub annotations: Vec<Annotation>,
    pub links: Vec<LinkPath>,
    pub nodes: Vec<PlacedNode>,
    content: Bounds,
}

impl Scene {
    /// Lay out `root` for a `width` x `height` viewport with the initial view.
    pub fn build(root: &Entity, cfg: &LayoutConfig, width: f64, height: f64) -> Self {
        let tree = layout(root, cfg);
        let links = tree
            .links()
            .map(|(p, c)| LinkPath {
                d: tree.link_path(p, c),
                stroke_width: None,
                vector_effect: None,
            })
            .collect();
        let content = tree.bounds();
        tracing::debug!(
            nodes = tree.nodes.len(),
            width = content.width,
            height = content.height,
            "scene built"
        );
        Self {
            width,
            height,
            physical_mm: None,
            background: None,
            view: ViewState::initial(width),
            annotations: Vec::new(),
            links,
            nodes: tree.nodes,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Give every connector without an explicit stroke width a fixed,
    /// zoom-independent one. Returns how many were changed.
    pub fn force_link_strokes(&mut self, width: f64) -> usize {
        let mut changed = 0;
        for link in self.links.iter_mut().filter(|l| l.stroke_width.is_none()) {
            link.stroke_width = Some(width);
            link.vector_effect = Some("non-scaling-stroke");
            changed += 1;
        }
        changed
    }

    /// Insert annotations ahead of the existing ones, i.e. before the tree.
    pub fn prepend_annotations(&mut self, items: Vec<Annotation>) {
        self.annotations.splice(0..0, items);
    }

    /// Serialize as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut s = String::new();
        s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let (w_attr, h_attr) = match self.physical_mm {
            Some((w, h)) => (format!("{}mm", num(w)), format!("{}mm", num(h))),
            None => (num(self.width), num(self.height)),
        };
        s.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">\n",
            w_attr,
            h_attr,
            num(self.width),
            num(self.height)
        ));
        if let Some(bg) = &self.background {
            s.push_str(&format!(
                "<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{bg}\"/>\n"
            ));
        }
        for a in &self.annotations {
            write_annotation(&mut s, a);
        }
        s.push_str(&format!(
            "<g id=\"{}\" transform=\"{}\">\n",
            ROOT_GROUP_ID,
            self.view.svg_transform()
        ));
        s.push_str(&format!(
            "<g class=\"links\" fill=\"none\" stroke=\"{LINK_STROKE}\">\n"
        ));
        for l in &self.links {
            s.push_str(&format!("<path class=\"link\" d=\"{}\"", l.d));
            if let Some(w) = l.stroke_width {
                s.push_str(&format!(" stroke-width=\"{}\"", num(w)));
            }
            if let Some(v) = l.vector_effect {
                s.push_str(&format!(" vector-effect=\"{v}\""));
            }
            s.push_str("/>\n");
        }
        s.push_str("</g>\n");
        for n in &self.nodes {
            n.block.write_svg(&mut s, n.x, n.y);
        }
        s.push_str("</g>\n</svg>\n");
        s
    }
}

impl GeometryProvider for Scene {
    fn content_bounds(&self) -> Bounds {
        self.content
    }
}

fn write_annotation(s: &mut String, a: &Annotation) {
    match a {
        Annotation::Text {
            x,
            y,
            size,
            bold,
            fill,
            anchor,
            text,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
            };
            let weight = if *bold { " font-weight=\"bold\"" } else { "" };
            s.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\"{}>{}</text>\n",
                num(*x),
                num(*y),
                num(*size),
                fill,
                anchor,
                weight,
                escape(text)
            ));
        }
        Annotation::Rect {
            bounds,
            fill,
            stroke,
        } => {
            s.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"{}\"",
                num(bounds.x),
                num(bounds.y),
                num(bounds.width),
                num(bounds.height),
                fill
            ));
            if let Some(st) = stroke {
                s.push_str(&format!(" stroke=\"{st}\""));
            }
            s.push_str("/>\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        let root = Entity::new("root").with_children(vec![Entity::new("a"), Entity::new("b")]);
        Scene::build(&root, &LayoutConfig::default(), 1200.0, 800.0)
    }

    #[test]
    fn builds_links_and_initial_view() {
        let s = scene();
        assert_eq!(s.nodes.len(), 3);
        assert_eq!(s.links.len(), 2);
        assert_eq!(s.view, ViewState::initial(1200.0));
        assert!(s.content_bounds().has_area());
    }

    #[test]
    fn forcing_strokes_only_touches_unset_links() {
        let mut s = scene();
        s.links[0].stroke_width = Some(5.0);
        assert_eq!(s.force_link_strokes(2.0), 1);
        assert_eq!(s.links[0].stroke_width, Some(5.0));
        assert_eq!(s.links[0].vector_effect, None);
        assert_eq!(s.links[1].vector_effect, Some("non-scaling-stroke"));
        assert_eq!(s.force_link_strokes(2.0), 0);
    }

    #[test]
    fn serializes_annotations_before_tree_group() {
        let mut s = scene();
        s.physical_mm = Some((1189.0, 841.0));
        s.prepend_annotations(vec![Annotation::Text {
            x: 10.0,
            y: 20.0,
            size: 30.0,
            bold: true,
            fill: "#92400e".into(),
            anchor: TextAnchor::Middle,
            text: "Phả hệ".into(),
        }]);
        let svg = s.to_svg();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("width=\"1189mm\" height=\"841mm\""));
        let caption = svg.find("Phả hệ").unwrap();
        let group = svg.find(ROOT_GROUP_ID).unwrap();
        assert!(caption < group);
        assert_eq!(svg.matches("class=\"link\"").count(), 2);
    }
}
