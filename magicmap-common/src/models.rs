//! Map data models
//!
//! The four shapes the AI service can return, one per [`MapType`], plus the
//! [`SavedMap`] layout written to the key-value store.
//!
//! Field names follow the JSON contract exactly (`mapType`, `emoji`, ...), so the
//! same types serve the AI response parser, the persistence shim, and the HTTP API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The closed set of visualization shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapType {
    /// Hierarchical, collapsible tree
    TreeView,
    /// Chronological list of events
    Timeline,
    /// Ordered sequence of scenes
    Storyboard,
    /// Characters and the relationships between them
    CharacterWeb,
}

impl MapType {
    /// Parse a map type tag
    ///
    /// Accepts the canonical tags (`TreeView`, `Timeline`, ...) case-insensitively,
    /// plus the short forms `tree` and `characters`.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "treeview" | "tree" => Some(MapType::TreeView),
            "timeline" => Some(MapType::Timeline),
            "storyboard" => Some(MapType::Storyboard),
            "characterweb" | "characters" => Some(MapType::CharacterWeb),
            _ => None,
        }
    }

    /// Canonical tag, identical to the serialized form
    pub fn as_tag(&self) -> &'static str {
        match self {
            MapType::TreeView => "TreeView",
            MapType::Timeline => "Timeline",
            MapType::Storyboard => "Storyboard",
            MapType::CharacterWeb => "CharacterWeb",
        }
    }

    /// Human-readable label for buttons
    pub fn label(&self) -> &'static str {
        match self {
            MapType::TreeView => "Tree View",
            MapType::Timeline => "Timeline",
            MapType::Storyboard => "Storyboard",
            MapType::CharacterWeb => "Characters",
        }
    }

    /// All map types in display order
    pub fn all_variants() -> &'static [MapType] {
        &[
            MapType::TreeView,
            MapType::Timeline,
            MapType::Storyboard,
            MapType::CharacterWeb,
        ]
    }
}

impl Default for MapType {
    fn default() -> Self {
        MapType::TreeView
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One node of a hierarchical map
///
/// Plain acyclic tree without parent back-references. `children: None` and
/// `children: Some(vec![])` are kept distinct so a saved map round-trips exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Leaf node without emoji
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: None,
            children: None,
        }
    }

    /// Node with the given children
    pub fn branch(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            emoji: None,
            children: Some(children),
        }
    }

    /// Builder-style emoji setter
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Children slice (empty for leaves)
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Number of levels in this subtree (a lone leaf has height 1)
    pub fn height(&self) -> usize {
        1 + self.children().iter().map(TreeNode::height).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardPanel {
    pub scene: i64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterNode {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRelationship {
    pub source: String,
    pub target: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterWeb {
    pub characters: Vec<CharacterNode>,
    pub relationships: Vec<CharacterRelationship>,
}

/// Structured result for one map type
///
/// Serializes as the bare shape (no tag); the tag travels next to it, e.g. in
/// [`SavedMap::map_type`]. Decoding therefore always goes through
/// [`MapData::from_json`] with an explicit [`MapType`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MapData {
    Tree(TreeNode),
    Timeline(Vec<TimelineEvent>),
    Storyboard(Vec<StoryboardPanel>),
    CharacterWeb(CharacterWeb),
}

impl MapData {
    /// Decode a JSON value strictly as the shape selected by `map_type`
    pub fn from_json(map_type: MapType, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match map_type {
            MapType::TreeView => MapData::Tree(serde_json::from_value(value)?),
            MapType::Timeline => MapData::Timeline(serde_json::from_value(value)?),
            MapType::Storyboard => MapData::Storyboard(serde_json::from_value(value)?),
            MapType::CharacterWeb => MapData::CharacterWeb(serde_json::from_value(value)?),
        })
    }

    /// Decode a JSON string strictly as the shape selected by `map_type`
    pub fn from_json_str(map_type: MapType, text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(map_type, value)
    }

    /// Tag of this shape
    pub fn map_type(&self) -> MapType {
        match self {
            MapData::Tree(_) => MapType::TreeView,
            MapData::Timeline(_) => MapType::Timeline,
            MapData::Storyboard(_) => MapType::Storyboard,
            MapData::CharacterWeb(_) => MapType::CharacterWeb,
        }
    }

    /// Root node, if this is a tree
    pub fn as_tree(&self) -> Option<&TreeNode> {
        match self {
            MapData::Tree(root) => Some(root),
            _ => None,
        }
    }
}

/// Persisted layout of the last map: `{ "mapType": ..., "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedMap {
    #[serde(rename = "mapType")]
    pub map_type: MapType,
    pub data: MapData,
}

impl SavedMap {
    pub fn new(data: MapData) -> Self {
        Self {
            map_type: data.map_type(),
            data,
        }
    }
}

impl<'de> Deserialize<'de> for SavedMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawSavedMap {
            #[serde(rename = "mapType", default)]
            map_type: Option<MapType>,
            data: Value,
        }

        let raw = RawSavedMap::deserialize(deserializer)?;
        // Older saves may lack the tag; those were always trees
        let map_type = raw.map_type.unwrap_or_default();
        let data = MapData::from_json(map_type, raw.data).map_err(serde::de::Error::custom)?;
        Ok(SavedMap { map_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_type_tags_round_trip() {
        for map_type in MapType::all_variants() {
            let encoded = serde_json::to_string(map_type).unwrap();
            assert_eq!(encoded, format!("\"{}\"", map_type.as_tag()));
            assert_eq!(MapType::from_tag(map_type.as_tag()), Some(*map_type));
        }
        assert_eq!(MapType::from_tag("characters"), Some(MapType::CharacterWeb));
        assert_eq!(MapType::from_tag("mindmap"), None);
    }

    #[test]
    fn test_tree_from_json_keeps_optional_fields() {
        let value = json!({
            "name": "Photosynthesis",
            "emoji": "🌱",
            "children": [{ "name": "Sunlight", "children": [] }]
        });
        let data = MapData::from_json(MapType::TreeView, value.clone()).unwrap();
        let root = data.as_tree().unwrap();
        assert_eq!(root.node_count(), 2);
        assert_eq!(root.height(), 2);
        assert_eq!(root.children()[0].children, Some(vec![]));
        assert_eq!(serde_json::to_value(&data).unwrap(), value);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let timeline = json!([{ "date": "1492", "title": "Voyage", "description": "Sails" }]);
        assert!(MapData::from_json(MapType::TreeView, timeline.clone()).is_err());
        assert!(MapData::from_json(MapType::Timeline, timeline).is_ok());

        let missing_name = json!({ "emoji": "🌱" });
        assert!(MapData::from_json(MapType::TreeView, missing_name).is_err());
    }

    #[test]
    fn test_storyboard_requires_integer_scene() {
        let panels = json!([{ "scene": "one", "description": "Opening" }]);
        assert!(MapData::from_json(MapType::Storyboard, panels).is_err());
    }

    #[test]
    fn test_saved_map_round_trip() {
        let saved = SavedMap::new(MapData::CharacterWeb(CharacterWeb {
            characters: vec![CharacterNode {
                name: "Romeo".to_string(),
                description: "A Montague".to_string(),
                emoji: Some("🌹".to_string()),
            }],
            relationships: vec![CharacterRelationship {
                source: "Romeo".to_string(),
                target: "Juliet".to_string(),
                description: "In love".to_string(),
            }],
        }));

        let encoded = serde_json::to_string(&saved).unwrap();
        assert!(encoded.contains("\"mapType\":\"CharacterWeb\""));
        let decoded: SavedMap = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, saved);
    }

    #[test]
    fn test_saved_map_without_tag_defaults_to_tree() {
        let decoded: SavedMap =
            serde_json::from_str(r#"{"data":{"name":"Cells","children":[]}}"#).unwrap();
        assert_eq!(decoded.map_type, MapType::TreeView);
    }

    #[test]
    fn test_saved_map_with_wrong_shape_fails() {
        let result: Result<SavedMap, _> =
            serde_json::from_str(r#"{"mapType":"Timeline","data":{"name":"Cells"}}"#);
        assert!(result.is_err());
    }
}
