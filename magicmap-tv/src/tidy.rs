//! Tidy tree layout for the visible part of a [`LayoutTree`]
//!
//! Contour-based Reingold-Tilford placement. Each subtree is laid out on its
//! own, then siblings are pushed apart until no level of the right subtree's
//! left contour comes closer than the separation to the accumulated right
//! contour of the siblings already placed. Parents sit midway between their
//! first and last visible child.
//!
//! Separation is measured in breadth units: 1 between siblings, 2 between
//! nodes with different parents. One breadth unit is [`TidyLayout::breadth_step`]
//! pixels; each depth level is [`TidyLayout::depth_step`] pixels to the right.

use crate::geometry::Point;
use crate::layout_tree::{LayoutTree, NodeId};
use std::collections::BTreeMap;

const SIBLING_SEPARATION: f64 = 1.0;
const COUSIN_SEPARATION: f64 = 2.0;

/// Node box height (60) plus gap (20)
pub const DEFAULT_BREADTH_STEP: f64 = 80.0;

/// Node box width
pub const DEFAULT_DEPTH_STEP: f64 = 200.0;

/// Positions keyed by node id
pub type Positions = BTreeMap<NodeId, Point>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidyLayout {
    pub breadth_step: f64,
    pub depth_step: f64,
}

impl Default for TidyLayout {
    fn default() -> Self {
        Self {
            breadth_step: DEFAULT_BREADTH_STEP,
            depth_step: DEFAULT_DEPTH_STEP,
        }
    }
}

/// Per-level (min, max) breadth extent of a subtree, relative to its root
type Contour = Vec<(f64, f64)>;

impl TidyLayout {
    /// Place every visible node; the root lands at the origin
    pub fn layout(&self, tree: &LayoutTree) -> Positions {
        let mut offsets = vec![0.0; tree.len()];
        self.place_subtree(tree, NodeId::ROOT, &mut offsets);

        let mut positions = Positions::new();
        let mut stack = vec![(NodeId::ROOT, 0.0)];
        while let Some((id, breadth)) = stack.pop() {
            let depth = tree.get(id).map(|n| n.depth).unwrap_or(0);
            positions.insert(
                id,
                Point::new(depth as f64 * self.depth_step, breadth * self.breadth_step),
            );
            for &child in tree.visible_children(id) {
                stack.push((child, breadth + offsets[child.0 as usize]));
            }
        }
        positions
    }

    /// Lay out the subtree under `id`, recording each child's offset from its
    /// parent, and return the subtree contour
    fn place_subtree(&self, tree: &LayoutTree, id: NodeId, offsets: &mut [f64]) -> Contour {
        let children = tree.visible_children(id);
        if children.is_empty() {
            return vec![(0.0, 0.0)];
        }

        let mut merged: Contour = Vec::new();
        let mut placed = Vec::with_capacity(children.len());

        for &child in children {
            let contour = self.place_subtree(tree, child, offsets);

            let shift = if merged.is_empty() {
                0.0
            } else {
                contour
                    .iter()
                    .zip(merged.iter())
                    .enumerate()
                    .map(|(level, (&(left, _), &(_, right)))| {
                        let separation = if level == 0 {
                            SIBLING_SEPARATION
                        } else {
                            COUSIN_SEPARATION
                        };
                        right + separation - left
                    })
                    .fold(f64::NEG_INFINITY, f64::max)
            };
            placed.push(shift);

            for (level, &(left, right)) in contour.iter().enumerate() {
                let (left, right) = (left + shift, right + shift);
                match merged.get_mut(level) {
                    Some(extent) => {
                        extent.0 = extent.0.min(left);
                        extent.1 = extent.1.max(right);
                    }
                    None => merged.push((left, right)),
                }
            }
        }

        let center = (placed[0] + placed[placed.len() - 1]) / 2.0;
        for (&child, shift) in children.iter().zip(placed) {
            offsets[child.0 as usize] = shift - center;
        }

        let mut contour = Vec::with_capacity(merged.len() + 1);
        contour.push((0.0, 0.0));
        contour.extend(merged.into_iter().map(|(l, r)| (l - center, r - center)));
        contour
    }
}
