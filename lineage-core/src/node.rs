//! Per-entity visual block: a rounded box holding a stack of text lines.

use crate::constants::{NODE_LINE_SPACING, NODE_PADDING, NODE_WIDTH};
use crate::model::{Entity, attrs};
use crate::palette::generation_fill;
use crate::svg::{escape, num};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub fill: &'static str,
    pub font_size: f64,
    pub italic: bool,
}

const GENERATION: LineStyle = LineStyle {
    fill: "#1f2937",
    font_size: 15.0,
    italic: false,
};
const ROLE: LineStyle = LineStyle {
    fill: "#111827",
    font_size: 15.0,
    italic: true,
};
const NAME: LineStyle = LineStyle {
    fill: "#000",
    font_size: 16.0,
    italic: false,
};
const MUTED_NAME: LineStyle = LineStyle {
    fill: "#6b7280",
    font_size: 16.0,
    italic: false,
};
const TITLE: LineStyle = LineStyle {
    fill: "#1e3a8a",
    font_size: 14.0,
    italic: false,
};
const YEARS: LineStyle = LineStyle {
    fill: "#374151",
    font_size: 14.0,
    italic: false,
};
const ANNIVERSARY: LineStyle = LineStyle {
    fill: "#6b7280",
    font_size: 14.0,
    italic: false,
};

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub style: LineStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeBlock {
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
    pub lines: Vec<TextLine>,
}

fn push(lines: &mut Vec<TextLine>, text: impl Into<String>, style: LineStyle) {
    lines.push(TextLine {
        text: text.into(),
        style,
    });
}

fn years(birth: &str, death: Option<&str>) -> String {
    match death {
        Some(d) => format!("Sinh: {birth} - Mất: {d}"),
        None => format!("Sinh: {birth}"),
    }
}

/// Build the visual block for one entity.
pub fn render_node(e: &Entity) -> NodeBlock {
    let mut lines = Vec::new();
    if let Some(g) = e.attr(attrs::GENERATION) {
        push(&mut lines, format!("Đời Thứ {g}"), GENERATION);
    }
    if let Some(r) = e.attr(attrs::ROLE) {
        push(&mut lines, r, ROLE);
    }
    push(&mut lines, e.name.to_uppercase(), NAME);
    if let Some(r) = e.attr(attrs::REAL_NAME) {
        push(&mut lines, r, MUTED_NAME);
    }
    if let Some(titles) = e.attr(attrs::TITLES) {
        for t in titles.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            push(&mut lines, t, TITLE);
        }
    }
    if let Some(b) = e.attr(attrs::BIRTH) {
        push(&mut lines, years(b, e.attr(attrs::DEATH)), YEARS);
    }
    if let Some(d) = e.attr(attrs::ANNIVERSARY) {
        push(&mut lines, format!("Ngày kỵ: {d}"), ANNIVERSARY);
    }
    if let Some(r) = e.attr(attrs::ROLE_SECONDARY) {
        push(&mut lines, r, ROLE);
    }
    if let Some(s) = e.attr(attrs::SPOUSE) {
        push(&mut lines, s.to_uppercase(), MUTED_NAME);
    }
    if let Some(s) = e.attr(attrs::SPOUSE_SECONDARY) {
        push(&mut lines, s.to_uppercase(), MUTED_NAME);
    }
    if let Some(b) = e.attr(attrs::BIRTH_SECONDARY) {
        push(&mut lines, years(b, e.attr(attrs::DEATH_SECONDARY)), YEARS);
    }
    if let Some(d) = e.attr(attrs::ANNIVERSARY_SECONDARY) {
        push(&mut lines, format!("Ngày kỵ: {d}"), ANNIVERSARY);
    }
    if let Some(s) = e.attr(attrs::SPOUSE_LATER) {
        push(&mut lines, s.to_uppercase(), MUTED_NAME);
    }

    let height = lines.len() as f64 * NODE_LINE_SPACING + NODE_PADDING;
    NodeBlock {
        width: NODE_WIDTH,
        height,
        fill: generation_fill(e.generation()),
        lines,
    }
}

impl NodeBlock {
    /// Top-left corner relative to the node anchor; the block is centred on it.
    pub fn origin(&self) -> (f64, f64) {
        (-self.width / 2.0, -self.height / 2.0)
    }

    /// Baseline offset of line `i` relative to the anchor.
    pub fn line_y(&self, i: usize) -> f64 {
        -self.height / 2.0 + 20.0 + i as f64 * NODE_LINE_SPACING
    }

    /// Write the block as an SVG group translated to `(x, y)`.
    pub fn write_svg(&self, out: &mut String, x: f64, y: f64) {
        let (ox, oy) = self.origin();
        out.push_str(&format!(
            "<g class=\"node\" transform=\"translate({},{})\">\n",
            num(x),
            num(y)
        ));
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"{}\" stroke=\"#444\" stroke-width=\"2\"/>\n",
            num(ox),
            num(oy),
            num(self.width),
            num(self.height),
            self.fill
        ));
        for (i, line) in self.lines.iter().enumerate() {
            let italic = if line.style.italic {
                " font-style=\"italic\""
            } else {
                ""
            };
            out.push_str(&format!(
                "<text x=\"0\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" fill=\"{}\" font-size=\"{}\"{} letter-spacing=\"0.3\">{}</text>\n",
                num(self.line_y(i)),
                line.style.fill,
                num(line.style.font_size),
                italic,
                escape(&line.text)
            ));
        }
        out.push_str("</g>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::FALLBACK_FILL;

    fn texts(b: &NodeBlock) -> Vec<&str> {
        b.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn name_only_node() {
        let b = render_node(&Entity::new("Trịnh Bá Lộc"));
        assert_eq!(texts(&b), ["TRỊNH BÁ LỘC"]);
        assert_eq!(b.height, 18.0 + 30.0);
        assert_eq!(b.fill, FALLBACK_FILL);
    }

    #[test]
    fn full_node_line_order() {
        let e = Entity::new("Trịnh Bá An")
            .with_attr(attrs::GENERATION, "3")
            .with_attr(attrs::ROLE, "Trưởng chi")
            .with_attr(attrs::REAL_NAME, "Trịnh Văn An")
            .with_attr(attrs::TITLES, "Lý trưởng; Chánh tổng ;")
            .with_attr(attrs::BIRTH, "1890")
            .with_attr(attrs::DEATH, "1950")
            .with_attr(attrs::ANNIVERSARY, "12/3 âm lịch")
            .with_attr(attrs::ROLE_SECONDARY, "Chính thất")
            .with_attr(attrs::SPOUSE, "Nguyễn Thị Bình")
            .with_attr(attrs::SPOUSE_SECONDARY, "Lê Thị Cúc")
            .with_attr(attrs::BIRTH_SECONDARY, "1895")
            .with_attr(attrs::ANNIVERSARY_SECONDARY, "5/8")
            .with_attr(attrs::SPOUSE_LATER, "Phạm Thị Dung");
        let b = render_node(&e);
        assert_eq!(
            texts(&b),
            [
                "Đời Thứ 3",
                "Trưởng chi",
                "TRỊNH BÁ AN",
                "Trịnh Văn An",
                "Lý trưởng",
                "Chánh tổng",
                "Sinh: 1890 - Mất: 1950",
                "Ngày kỵ: 12/3 âm lịch",
                "Chính thất",
                "NGUYỄN THỊ BÌNH",
                "LÊ THỊ CÚC",
                "Sinh: 1895",
                "Ngày kỵ: 5/8",
                "PHẠM THỊ DUNG",
            ]
        );
        assert_eq!(b.height, 14.0 * 18.0 + 30.0);
        assert_eq!(b.fill, "#fbbf24");
        assert!(b.lines[1].style.italic);
    }

    #[test]
    fn death_without_birth_is_not_shown() {
        let b = render_node(&Entity::new("x").with_attr(attrs::DEATH, "1900"));
        assert_eq!(texts(&b), ["X"]);
    }

    #[test]
    fn block_is_centred_on_anchor() {
        let b = render_node(&Entity::new("a").with_attr(attrs::GENERATION, "x"));
        let (ox, oy) = b.origin();
        assert_eq!(ox + b.width / 2.0, 0.0);
        assert_eq!(oy + b.height / 2.0, 0.0);
        assert_eq!(b.fill, FALLBACK_FILL);
    }

    #[test]
    fn rendering_is_idempotent() {
        let e = Entity::new("a").with_attr(attrs::GENERATION, "7");
        assert_eq!(render_node(&e), render_node(&e));
    }

    #[test]
    fn svg_fragment_escapes_text() {
        let mut s = String::new();
        render_node(&Entity::new("A & B")).write_svg(&mut s, 10.0, 20.0);
        assert!(s.contains("translate(10,20)"));
        assert!(s.contains("A &amp; B"));
    }
}
