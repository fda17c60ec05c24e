//! Snapshot of the visible tree, ready to draw
//!
//! A [`Frame`] is the end state of a layout pass: one [`NodeVisual`] per
//! visible node and one [`LinkVisual`] per visible parent/child edge. Links
//! are keyed by their target, since every non-root node has exactly one
//! incoming edge.

use crate::geometry::Point;
use crate::layout_tree::{LayoutTree, NodeId};
use crate::style::{self, LabelSide, LabelStyle};
use crate::tidy::{Positions, TidyLayout};
use crate::viewport::Bounds;
use magicmap_common::theme::Rgb;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeVisual {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub name: String,
    pub emoji: Option<String>,
    pub position: Point,
    pub radius: f64,
    pub fill: Rgb,
    pub label: LabelStyle,
    /// Children exist but are hidden
    pub collapsed: bool,
    /// Has children at all (toggle does something)
    pub expandable: bool,
}

impl NodeVisual {
    /// Circle plus approximate label box
    pub fn bounds(&self) -> Bounds {
        let circle = Bounds::new(
            self.position.x - self.radius,
            self.position.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        );

        let width = self.label.approximate_width(&self.name, self.emoji.as_deref());
        let anchor_x = self.position.x + self.label.offset_x();
        let left = match self.label.side {
            LabelSide::Left => anchor_x - width,
            LabelSide::Right => anchor_x,
        };
        let font = self.label.font_size;
        let label = Bounds::new(left, self.position.y - font * 0.8, width, font * 1.2);

        circle.union(&label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkVisual {
    pub source: NodeId,
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    /// Visible nodes in pre-order
    pub nodes: Vec<NodeVisual>,
    /// One link per visible non-root node, same order as `nodes`
    pub links: Vec<LinkVisual>,
}

impl Frame {
    /// Lay out the visible part of `tree`
    pub fn build(tree: &LayoutTree, layout: &TidyLayout) -> Self {
        let positions = layout.layout(tree);
        Self::from_positions(tree, &positions)
    }

    pub fn from_positions(tree: &LayoutTree, positions: &Positions) -> Self {
        let mut nodes = Vec::with_capacity(positions.len());
        let mut links = Vec::with_capacity(positions.len().saturating_sub(1));

        for id in tree.visible_ids() {
            let (Some(node), Some(&position)) = (tree.get(id), positions.get(&id)) else {
                continue;
            };

            nodes.push(NodeVisual {
                id,
                parent: node.parent,
                depth: node.depth,
                name: node.name.clone(),
                emoji: node.emoji.clone(),
                position,
                radius: style::node_radius(node.depth),
                fill: style::node_fill(node.depth, node.is_collapsed()),
                label: LabelStyle::for_node(node.depth, node.has_visible_children()),
                collapsed: node.is_collapsed(),
                expandable: node.has_children(),
            });

            if let Some(parent) = node.parent {
                if let Some(&from) = positions.get(&parent) {
                    links.push(LinkVisual {
                        source: parent,
                        target: id,
                        from,
                        to: position,
                    });
                }
            }
        }

        Self { nodes, links }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeVisual> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Link whose target is `id`
    pub fn link(&self, target: NodeId) -> Option<&LinkVisual> {
        self.links.iter().find(|l| l.target == target)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Union of all node bounds; `None` for an empty frame
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(NodeVisual::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn fill_of(&self, id: NodeId) -> Option<Rgb> {
        self.node(id).map(|n| n.fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicmap_common::TreeNode;

    fn frame_for(root: &TreeNode) -> (LayoutTree, Frame) {
        let tree = LayoutTree::build(root).unwrap();
        let frame = Frame::build(&tree, &TidyLayout::default());
        (tree, frame)
    }

    #[test]
    fn test_links_keyed_by_target() {
        let root = TreeNode::branch("Root", vec![TreeNode::leaf("A"), TreeNode::leaf("B")]);
        let (_, frame) = frame_for(&root);

        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.links.len(), 2);
        let link = frame.link(NodeId(2)).unwrap();
        assert_eq!(link.source, NodeId(0));
        assert_eq!(link.to, frame.node(NodeId(2)).unwrap().position);
        assert!(frame.link(NodeId(0)).is_none());
    }

    #[test]
    fn test_collapsed_node_style() {
        let root = TreeNode::branch(
            "Root",
            vec![TreeNode::branch("A", vec![TreeNode::leaf("A1")])],
        );
        let mut tree = LayoutTree::build(&root).unwrap();
        tree.toggle(NodeId(1)).unwrap();
        let frame = Frame::build(&tree, &TidyLayout::default());

        let a = frame.node(NodeId(1)).unwrap();
        assert!(a.collapsed);
        assert!(a.expandable);
        assert_eq!(a.fill, style::COLLAPSED_FILL);
        assert_eq!(a.label.side, LabelSide::Right);
        assert!(!frame.contains(NodeId(2)));
    }

    #[test]
    fn test_bounds_cover_circles_and_labels() {
        let root = TreeNode::branch("Root", vec![TreeNode::leaf("Leaf")]);
        let (_, frame) = frame_for(&root);
        let bounds = frame.bounds().unwrap();

        // Root label extends left of the root circle, leaf label right of x=200
        assert!(bounds.x < -20.0 - 25.0);
        assert!(bounds.x + bounds.width > 200.0 + 25.0);
        assert!(bounds.y <= -20.0);
        assert!(bounds.y + bounds.height >= 20.0);
    }

    #[test]
    fn test_empty_frame_has_no_bounds() {
        assert!(Frame::default().bounds().is_none());
    }
}
