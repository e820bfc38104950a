//! Vertical tidy-tree layout.
//!
//! Leaves are laid out left to right in pre-order, spaced by
//! `separation * node_size_x` (sibling and cousin separations differ); every
//! parent sits midway between its first and last child. Depth maps to `y`.

use crate::constants::{
    NODE_SIZE_X, NODE_SIZE_Y, SEPARATION_NON_SIBLINGS, SEPARATION_SIBLINGS,
};
use crate::geometry::Bounds;
use crate::model::Entity;
use crate::node::{NodeBlock, render_node};
use crate::svg::num;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub node_size_x: f64,
    pub node_size_y: f64,
    pub separation_siblings: f64,
    pub separation_non_siblings: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size_x: NODE_SIZE_X,
            node_size_y: NODE_SIZE_Y,
            separation_siblings: SEPARATION_SIBLINGS,
            separation_non_siblings: SEPARATION_NON_SIBLINGS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub parent: Option<usize>,
    pub block: NodeBlock,
}

impl PlacedNode {
    pub fn bounds(&self) -> Bounds {
        let (ox, oy) = self.block.origin();
        Bounds::new(self.x + ox, self.y + oy, self.block.width, self.block.height)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeLayout {
    /// Nodes in pre-order; index 0 is the root.
    pub nodes: Vec<PlacedNode>,
}

struct Walker<'c> {
    cfg: &'c LayoutConfig,
    nodes: Vec<PlacedNode>,
    last_leaf: Option<(f64, Option<usize>)>,
}

impl Walker<'_> {
    fn place(&mut self, e: &Entity, depth: usize, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PlacedNode {
            x: 0.0,
            y: depth as f64 * self.cfg.node_size_y,
            depth,
            parent,
            block: render_node(e),
        });
        let x = if e.is_leaf() {
            let x = match self.last_leaf {
                None => 0.0,
                Some((prev_x, prev_parent)) => {
                    let sep = if prev_parent == parent {
                        self.cfg.separation_siblings
                    } else {
                        self.cfg.separation_non_siblings
                    };
                    prev_x + sep * self.cfg.node_size_x
                }
            };
            self.last_leaf = Some((x, parent));
            x
        } else {
            let kids: Vec<usize> = e
                .children
                .iter()
                .map(|c| self.place(c, depth + 1, Some(idx)))
                .collect();
            let first = self.nodes[kids[0]].x;
            let last = self.nodes[kids[kids.len() - 1]].x;
            (first + last) / 2.0
        };
        self.nodes[idx].x = x;
        idx
    }
}

pub fn layout(root: &Entity, cfg: &LayoutConfig) -> TreeLayout {
    let mut w = Walker {
        cfg,
        nodes: Vec::with_capacity(root.count()),
        last_leaf: None,
    };
    w.place(root, 0, None);
    // Root anchored at x = 0
    let shift = w.nodes[0].x;
    for n in &mut w.nodes {
        n.x -= shift;
    }
    TreeLayout { nodes: w.nodes }
}

impl TreeLayout {
    /// Union of every node block.
    pub fn bounds(&self) -> Bounds {
        let mut it = self.nodes.iter().map(PlacedNode::bounds);
        match it.next() {
            Some(first) => it.fold(first, |acc, b| acc.union(&b)),
            None => Bounds::EMPTY,
        }
    }

    /// Parent/child index pairs, in pre-order of the child.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.parent.map(|p| (p, i)))
    }

    /// Vertical diagonal connector between two nodes, as path data.
    pub fn link_path(&self, parent: usize, child: usize) -> String {
        let s = &self.nodes[parent];
        let t = &self.nodes[child];
        let mid = (s.y + t.y) / 2.0;
        format!(
            "M{},{}C{},{} {},{} {},{}",
            num(s.x),
            num(s.y),
            num(s.x),
            num(mid),
            num(t.x),
            num(mid),
            num(t.x),
            num(t.y)
        )
    }
}
