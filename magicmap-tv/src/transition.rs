//! Enter/update/exit diffs and animated transitions between frames
//!
//! Items are matched by [`NodeId`] only. A node that keeps its id across a
//! toggle is an update even if it moved to a different slot in the pre-order
//! list; a node whose id is new is an enter; an id that disappeared is an exit.
//!
//! Timing:
//! - Initial build: link `i` draws in (dash offset from full length to 0) after
//!   `i * STAGGER_MS`; node `i` grows with [`Easing::ElasticOut`] after
//!   `i * STAGGER_MS + DURATION_MS / 2`; label `i` fades in after
//!   `i * STAGGER_MS + DURATION_MS / 1.5`.
//! - Toggle: entering nodes grow in and their labels fade in, updated nodes and
//!   links move with [`Easing::CubicInOut`], exits are removed immediately.
//!
//! Every phase lasts [`DURATION_MS`].

use crate::frame::{Frame, LinkVisual, NodeVisual};
use crate::geometry::Point;
use crate::layout_tree::NodeId;
use magicmap_common::easing::lerp;
use magicmap_common::theme::Rgb;
use magicmap_common::Easing;
use serde::Serialize;
use std::collections::BTreeSet;

pub const DURATION_MS: f64 = 500.0;
pub const STAGGER_MS: f64 = 50.0;

/// Node growth delay after its link starts drawing
const NODE_DELAY_MS: f64 = DURATION_MS / 2.0;

/// Label fade delay after its link starts drawing
const LABEL_DELAY_MS: f64 = DURATION_MS / 1.5;

/// Items keyed by id that appear, persist, or disappear between two frames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub entered_nodes: BTreeSet<NodeId>,
    pub updated_nodes: BTreeSet<NodeId>,
    pub exited_nodes: BTreeSet<NodeId>,
    /// Links are identified by their target node
    pub entered_links: BTreeSet<NodeId>,
    pub updated_links: BTreeSet<NodeId>,
    pub exited_links: BTreeSet<NodeId>,
}

impl Delta {
    pub fn between(old: &Frame, new: &Frame) -> Self {
        let old_nodes: BTreeSet<NodeId> = old.nodes.iter().map(|n| n.id).collect();
        let new_nodes: BTreeSet<NodeId> = new.nodes.iter().map(|n| n.id).collect();
        let old_links: BTreeSet<NodeId> = old.links.iter().map(|l| l.target).collect();
        let new_links: BTreeSet<NodeId> = new.links.iter().map(|l| l.target).collect();

        Self {
            entered_nodes: new_nodes.difference(&old_nodes).copied().collect(),
            updated_nodes: new_nodes.intersection(&old_nodes).copied().collect(),
            exited_nodes: old_nodes.difference(&new_nodes).copied().collect(),
            entered_links: new_links.difference(&old_links).copied().collect(),
            updated_links: new_links.intersection(&old_links).copied().collect(),
            exited_links: old_links.difference(&new_links).copied().collect(),
        }
    }
}

/// Node as drawn at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub visual: NodeVisual,
    /// Current circle radius (grows from 0 on entry)
    pub radius: f64,
    pub position: Point,
    pub fill: Rgb,
    pub label_opacity: f64,
}

/// Link as drawn at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneLink {
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
    /// Fraction of the path drawn so far (1.0 = complete)
    pub drawn: f64,
}

/// Everything needed to paint one instant of the view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
}

impl Scene {
    /// Fully settled scene of a frame
    pub fn settled(frame: &Frame) -> Self {
        Self {
            nodes: frame.nodes.iter().map(settled_node).collect(),
            links: frame.links.iter().map(settled_link).collect(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.visual.id == id)
    }

    pub fn link(&self, target: NodeId) -> Option<&SceneLink> {
        self.links.iter().find(|l| l.target == target)
    }
}

fn settled_node(visual: &NodeVisual) -> SceneNode {
    SceneNode {
        radius: visual.radius,
        position: visual.position,
        fill: visual.fill,
        label_opacity: 1.0,
        visual: visual.clone(),
    }
}

fn settled_link(link: &LinkVisual) -> SceneLink {
    SceneLink {
        target: link.target,
        from: link.from,
        to: link.to,
        drawn: 1.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    /// First appearance of the whole tree
    Initial,
    /// Change from a previous frame
    Update { from: Frame, delta: Delta },
}

/// Animation from the previous frame (or nothing) to a target frame
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    kind: Kind,
    to: Frame,
}

impl Transition {
    pub fn initial(to: Frame) -> Self {
        Self {
            kind: Kind::Initial,
            to,
        }
    }

    pub fn update(from: Frame, to: Frame) -> Self {
        let delta = Delta::between(&from, &to);
        Self {
            kind: Kind::Update { from, delta },
            to,
        }
    }

    pub fn target(&self) -> &Frame {
        &self.to
    }

    /// `None` for the initial build
    pub fn delta(&self) -> Option<&Delta> {
        match &self.kind {
            Kind::Initial => None,
            Kind::Update { delta, .. } => Some(delta),
        }
    }

    /// Time after which [`Transition::sample`] returns the settled target
    pub fn duration_ms(&self) -> f64 {
        match &self.kind {
            Kind::Initial => {
                let last = self.to.nodes.len().saturating_sub(1) as f64;
                last * STAGGER_MS + LABEL_DELAY_MS + DURATION_MS
            }
            Kind::Update { .. } => DURATION_MS,
        }
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms()
    }

    /// Interpolated scene `elapsed_ms` after the transition started
    pub fn sample(&self, elapsed_ms: f64) -> Scene {
        if self.is_finished(elapsed_ms) {
            return Scene::settled(&self.to);
        }
        match &self.kind {
            Kind::Initial => self.sample_initial(elapsed_ms),
            Kind::Update { from, delta } => self.sample_update(from, delta, elapsed_ms),
        }
    }

    fn sample_initial(&self, elapsed_ms: f64) -> Scene {
        let nodes = self
            .to
            .nodes
            .iter()
            .enumerate()
            .map(|(i, visual)| {
                let stagger = i as f64 * STAGGER_MS;
                let grow = phase(elapsed_ms, stagger + NODE_DELAY_MS, Easing::ElasticOut);
                let fade = phase(elapsed_ms, stagger + LABEL_DELAY_MS, Easing::CubicInOut);
                SceneNode {
                    radius: visual.radius * grow,
                    position: visual.position,
                    fill: visual.fill,
                    label_opacity: fade,
                    visual: visual.clone(),
                }
            })
            .collect();

        let links = self
            .to
            .links
            .iter()
            .enumerate()
            .map(|(i, link)| SceneLink {
                drawn: phase(elapsed_ms, i as f64 * STAGGER_MS, Easing::CubicInOut),
                ..settled_link(link)
            })
            .collect();

        Scene { nodes, links }
    }

    fn sample_update(&self, from: &Frame, delta: &Delta, elapsed_ms: f64) -> Scene {
        let progress = phase(elapsed_ms, 0.0, Easing::CubicInOut);
        let grow = phase(elapsed_ms, 0.0, Easing::ElasticOut);

        let nodes = self
            .to
            .nodes
            .iter()
            .map(|visual| match from.node(visual.id) {
                Some(old) if delta.updated_nodes.contains(&visual.id) => SceneNode {
                    radius: lerp(old.radius, visual.radius, progress),
                    position: old.position.lerp(visual.position, progress),
                    fill: lerp_rgb(old.fill, visual.fill, progress),
                    label_opacity: 1.0,
                    visual: visual.clone(),
                },
                _ => SceneNode {
                    radius: visual.radius * grow,
                    position: visual.position,
                    fill: visual.fill,
                    label_opacity: progress,
                    visual: visual.clone(),
                },
            })
            .collect();

        let links = self
            .to
            .links
            .iter()
            .map(|link| match from.link(link.target) {
                Some(old) if delta.updated_links.contains(&link.target) => SceneLink {
                    target: link.target,
                    from: old.from.lerp(link.from, progress),
                    to: old.to.lerp(link.to, progress),
                    drawn: 1.0,
                },
                _ => SceneLink {
                    drawn: progress,
                    ..settled_link(link)
                },
            })
            .collect();

        Scene { nodes, links }
    }
}

/// Eased progress of a phase that starts at `delay_ms` and lasts [`DURATION_MS`]
fn phase(elapsed_ms: f64, delay_ms: f64, easing: Easing) -> f64 {
    easing.apply((elapsed_ms - delay_ms) / DURATION_MS)
}

fn lerp_rgb(from: Rgb, to: Rgb, progress: f64) -> Rgb {
    let channel = |a: u8, b: u8| lerp(a as f64, b as f64, progress).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(from.r, to.r), channel(from.g, to.g), channel(from.b, to.b))
}
