//! Stateful tree view
//!
//! [`TreeRenderer`] owns everything a rendered tree needs between user
//! actions: the arena with collapse state, the settled frame, the running
//! transition, and the pan/zoom transform. It is either idle (no tree) or
//! holding exactly one built tree.
//!
//! Theme or data changes rebuild from scratch (collapse state is lost).
//! Toggles keep the arena and the user's transform and animate from the old
//! frame to the new one.

use crate::error::{Result, TreeError};
use crate::export;
use crate::frame::Frame;
use crate::geometry::Point;
use crate::layout_tree::{LayoutTree, NodeId, ToggleOutcome};
use crate::svg::{self, SvgOptions};
use crate::tidy::TidyLayout;
use crate::transition::{Scene, Transition};
use crate::viewport::{Transform, Viewport};
use magicmap_common::{Theme, TreeNode};
use std::time::Instant;
use tracing::{debug, info};

struct Built {
    source: TreeNode,
    tree: LayoutTree,
    frame: Frame,
    transition: Transition,
    started: Instant,
    transform: Transform,
}

pub struct TreeRenderer {
    theme: Theme,
    viewport: Viewport,
    layout: TidyLayout,
    built: Option<Built>,
}

impl TreeRenderer {
    pub fn new(theme: Theme, viewport: Viewport) -> Self {
        Self {
            theme,
            viewport,
            layout: TidyLayout::default(),
            built: None,
        }
    }

    /// Replace the rendered tree; `None` returns to idle
    ///
    /// Starts the initial transition and fits the whole tree into the viewport.
    /// On error the renderer is left idle.
    pub fn build(&mut self, root: Option<&TreeNode>) -> Result<()> {
        self.built = None;
        let Some(root) = root else {
            debug!("Tree renderer idle");
            return Ok(());
        };

        let tree = LayoutTree::build(root)?;
        let frame = Frame::build(&tree, &self.layout);
        let transform = frame
            .bounds()
            .map(|b| Transform::fit(&b, &self.viewport))
            .unwrap_or_default();

        info!(
            nodes = tree.len(),
            visible = frame.nodes.len(),
            scale = transform.k,
            theme = self.theme.name(),
            "Built tree view"
        );

        self.built = Some(Built {
            source: root.clone(),
            transition: Transition::initial(frame.clone()),
            tree,
            frame,
            started: Instant::now(),
            transform,
        });
        Ok(())
    }

    /// Switch theme and rebuild the current tree from its data
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        let source = self.built.as_ref().map(|b| b.source.clone());
        self.build(source.as_ref())
    }

    /// Record a new drawing area size; the transform is kept
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Re-center the whole visible tree
    pub fn fit(&mut self) -> Result<Transform> {
        let viewport = self.viewport;
        let built = self.built.as_mut().ok_or(TreeError::NotBuilt)?;
        if let Some(bounds) = built.frame.bounds() {
            built.transform = Transform::fit(&bounds, &viewport);
        }
        Ok(built.transform)
    }

    /// Collapse or expand `id` and animate the change
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome> {
        let built = self.built.as_mut().ok_or(TreeError::NotBuilt)?;
        let outcome = built.tree.toggle(id)?;
        if outcome == ToggleOutcome::Leaf {
            return Ok(outcome);
        }

        let next = Frame::build(&built.tree, &self.layout);
        let previous = std::mem::replace(&mut built.frame, next.clone());
        built.transition = Transition::update(previous, next);
        built.started = Instant::now();
        Ok(outcome)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<Transform> {
        let built = self.built.as_mut().ok_or(TreeError::NotBuilt)?;
        built.transform = built.transform.pan(dx, dy);
        Ok(built.transform)
    }

    /// Zoom by `factor` around `anchor` (viewport center when `None`)
    pub fn zoom(&mut self, factor: f64, anchor: Option<Point>) -> Result<Transform> {
        let anchor = anchor.unwrap_or_else(|| self.viewport.center());
        let built = self.built.as_mut().ok_or(TreeError::NotBuilt)?;
        built.transform = built.transform.zoom(factor, anchor);
        Ok(built.transform)
    }

    pub fn is_idle(&self) -> bool {
        self.built.is_none()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tree(&self) -> Option<&LayoutTree> {
        self.built.as_ref().map(|b| &b.tree)
    }

    /// Settled frame of the current visible state
    pub fn frame(&self) -> Option<&Frame> {
        self.built.as_ref().map(|b| &b.frame)
    }

    pub fn transform(&self) -> Option<Transform> {
        self.built.as_ref().map(|b| b.transform)
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.built.as_ref().map(|b| &b.transition)
    }

    /// Milliseconds since the running transition started
    pub fn elapsed_ms(&self) -> Option<f64> {
        self.built
            .as_ref()
            .map(|b| b.started.elapsed().as_secs_f64() * 1000.0)
    }

    /// Scene `elapsed_ms` into the running transition
    pub fn scene_at(&self, elapsed_ms: f64) -> Option<Scene> {
        self.built.as_ref().map(|b| b.transition.sample(elapsed_ms))
    }

    /// SVG document `elapsed_ms` into the running transition
    ///
    /// An idle renderer draws an empty surface.
    pub fn svg(&self, elapsed_ms: f64) -> String {
        let scene = self.scene_at(elapsed_ms).unwrap_or_default();
        let options = SvgOptions {
            theme: self.theme,
            viewport: self.viewport,
            transform: self.transform().unwrap_or_default(),
            background: true,
        };
        svg::render(&scene, &options)
    }

    /// PNG of the current visible state at the current transform
    pub fn export_png(&self) -> Result<Vec<u8>> {
        let built = self.built.as_ref().ok_or(TreeError::NotBuilt)?;
        export::export_png(
            &Scene::settled(&built.frame),
            &built.transform,
            &self.viewport,
            self.theme,
        )
    }
}
