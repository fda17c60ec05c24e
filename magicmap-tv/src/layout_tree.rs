//! Arena of layout nodes with stable identity and collapse state
//!
//! Every node of the source tree gets a [`NodeId`] equal to its pre-order index
//! at build time. Ids never change for the lifetime of a [`LayoutTree`]; all
//! lookups, diffs, and animations are keyed by them.
//!
//! Collapse state lives in [`Branch`]: a node either shows its children
//! (`Expanded`) or keeps them hidden (`Collapsed`). Toggling moves the same
//! child list between the two states, so the child set itself never changes.

use crate::error::{Result, TreeError};
use magicmap_common::TreeNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Permanent identity of a node within one [`LayoutTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Children of a node together with their visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// Children are shown (a leaf is `Expanded(vec![])`)
    Expanded(Vec<NodeId>),
    /// Children exist but are hidden
    Collapsed(Vec<NodeId>),
}

impl Branch {
    /// All children regardless of visibility
    pub fn ids(&self) -> &[NodeId] {
        match self {
            Branch::Expanded(ids) | Branch::Collapsed(ids) => ids,
        }
    }

    /// Children currently shown
    pub fn visible(&self) -> &[NodeId] {
        match self {
            Branch::Expanded(ids) => ids,
            Branch::Collapsed(_) => &[],
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, Branch::Collapsed(_))
    }
}

/// A source node plus identity, depth, parent link, and collapse state
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub name: String,
    pub emoji: Option<String>,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub branch: Branch,
}

impl LayoutNode {
    /// True if the node has children, shown or hidden
    pub fn has_children(&self) -> bool {
        !self.branch.ids().is_empty()
    }

    /// True if children are currently shown
    pub fn has_visible_children(&self) -> bool {
        !self.branch.visible().is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        self.branch.is_collapsed()
    }
}

/// Result of [`LayoutTree::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Children were hidden
    Collapsed,
    /// Hidden children were shown again
    Expanded,
    /// Node has no children; nothing changed
    Leaf,
}

/// Arena-backed tree; `nodes[id]` is the node with that id
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    /// Build from a decoded tree, failing fast on nodes with a blank name
    pub fn build(root: &TreeNode) -> Result<Self> {
        let mut nodes = Vec::with_capacity(root.node_count());
        push_subtree(&mut nodes, root, 0, None, "root")?;
        debug!(nodes = nodes.len(), "Built layout tree");
        Ok(Self { nodes })
    }

    /// Build from raw JSON
    ///
    /// The whole value is checked before anything is allocated, so a node
    /// without `name` anywhere in the tree yields an error and no partial tree.
    pub fn from_json(value: &Value) -> Result<Self> {
        validate_json(value, "root")?;
        let root: TreeNode =
            serde_json::from_value(value.clone()).map_err(|e| TreeError::Malformed {
                path: "root".to_string(),
                reason: e.to_string(),
            })?;
        Self::build(&root)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    /// Nodes in id (pre-order) sequence
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    /// Children currently shown under `id` (empty for unknown ids)
    pub fn visible_children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.branch.visible()).unwrap_or(&[])
    }

    /// Flip the collapse state of `id`
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;

        let (branch, outcome) = match std::mem::replace(&mut node.branch, Branch::Expanded(Vec::new())) {
            Branch::Expanded(children) if children.is_empty() => {
                (Branch::Expanded(children), ToggleOutcome::Leaf)
            }
            Branch::Expanded(children) => (Branch::Collapsed(children), ToggleOutcome::Collapsed),
            Branch::Collapsed(hidden) => (Branch::Expanded(hidden), ToggleOutcome::Expanded),
        };
        node.branch = branch;

        debug!(node = %id, outcome = ?outcome, "Toggled node");
        Ok(outcome)
    }

    /// Ids reachable through expanded branches, in pre-order
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse so the first child is visited first
            stack.extend(self.visible_children(id).iter().rev().copied());
        }
        out
    }

    /// Ids below at least one collapsed ancestor
    pub fn hidden_ids(&self) -> BTreeSet<NodeId> {
        let mut hidden = BTreeSet::new();
        let mut stack = vec![(NodeId::ROOT, false)];
        while let Some((id, under_collapsed)) = stack.pop() {
            if under_collapsed {
                hidden.insert(id);
            }
            let node = &self.nodes[id.index()];
            let child_hidden = under_collapsed || node.is_collapsed();
            stack.extend(node.branch.ids().iter().map(|&c| (c, child_hidden)));
        }
        hidden
    }

    pub fn all_ids(&self) -> BTreeSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.get(id);
        while let Some(node) = current {
            match node.parent {
                Some(parent) => {
                    let parent = &self.nodes[parent.index()];
                    if parent.is_collapsed() {
                        return false;
                    }
                    current = Some(parent);
                }
                None => return true,
            }
        }
        false
    }
}

fn push_subtree(
    nodes: &mut Vec<LayoutNode>,
    source: &TreeNode,
    depth: usize,
    parent: Option<NodeId>,
    path: &str,
) -> Result<NodeId> {
    if source.name.trim().is_empty() {
        return Err(TreeError::MissingName {
            path: path.to_string(),
        });
    }

    let id = NodeId(nodes.len() as u32);
    nodes.push(LayoutNode {
        id,
        name: source.name.clone(),
        emoji: source.emoji.clone().filter(|e| !e.trim().is_empty()),
        depth,
        parent,
        branch: Branch::Expanded(Vec::new()),
    });

    let mut children = Vec::with_capacity(source.children().len());
    for (i, child) in source.children().iter().enumerate() {
        let child_path = format!("{}.children[{}]", path, i);
        children.push(push_subtree(nodes, child, depth + 1, Some(id), &child_path)?);
    }
    nodes[id.index()].branch = Branch::Expanded(children);

    Ok(id)
}

fn validate_json(value: &Value, path: &str) -> Result<()> {
    let malformed = |reason: &str| TreeError::Malformed {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let object = value.as_object().ok_or_else(|| malformed("expected an object"))?;

    match object.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(Value::String(_)) | None | Some(Value::Null) => {
            return Err(TreeError::MissingName {
                path: path.to_string(),
            })
        }
        Some(_) => return Err(malformed("name must be a string")),
    }

    match object.get("children") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                validate_json(child, &format!("{}.children[{}]", path, i))?;
            }
            Ok(())
        }
        Some(_) => Err(malformed("children must be an array")),
    }
}
