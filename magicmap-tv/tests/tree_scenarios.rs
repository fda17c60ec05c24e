//! End-to-end renderer scenarios

use magicmap_common::models::MapData;
use magicmap_common::{MapType, Theme, TreeNode};
use magicmap_tv::{NodeId, ToggleOutcome, TreeRenderer, Viewport};
use serde_json::json;

#[test]
fn photosynthesis_tree_fits_viewport() {
    let response = json!({
        "name": "Photosynthesis",
        "emoji": "🌱",
        "children": [{ "name": "Sunlight", "children": [] }]
    });
    let data = MapData::from_json(MapType::TreeView, response).unwrap();

    let viewport = Viewport::new(800.0, 600.0);
    let mut renderer = TreeRenderer::new(Theme::Light, viewport);
    renderer.build(data.as_tree()).unwrap();

    let frame = renderer.frame().unwrap();
    assert_eq!(frame.nodes.len(), 2);
    assert_eq!(frame.nodes[0].depth, 0);
    assert_eq!(frame.nodes[0].name, "Photosynthesis");
    assert_eq!(frame.nodes[1].depth, 1);
    assert_eq!(frame.links.len(), 1);

    let transform = renderer.transform().unwrap();
    let screen = transform.apply_bounds(&frame.bounds().unwrap());
    assert!(screen.x >= 0.0 && screen.y >= 0.0);
    assert!(screen.x + screen.width <= viewport.width);
    assert!(screen.y + screen.height <= viewport.height);
    for node in &frame.nodes {
        let p = transform.apply(node.position);
        assert!(p.x > 0.0 && p.x < viewport.width && p.y > 0.0 && p.y < viewport.height);
    }
}

#[test]
fn toggling_root_of_seven_node_tree() {
    let family = |name: &str| {
        TreeNode::branch(
            name,
            vec![TreeNode::leaf(format!("{name} 1")), TreeNode::leaf(format!("{name} 2"))],
        )
    };
    let root = TreeNode::branch("Root", vec![family("Left"), family("Right")]);

    let mut renderer = TreeRenderer::new(Theme::Jungle, Viewport::default());
    renderer.build(Some(&root)).unwrap();
    assert_eq!(renderer.frame().unwrap().nodes.len(), 7);

    assert_eq!(renderer.toggle(NodeId(0)).unwrap(), ToggleOutcome::Collapsed);
    let tree = renderer.tree().unwrap();
    assert_eq!(tree.visible_ids(), vec![NodeId(0)]);
    assert_eq!(tree.hidden_ids().len(), 6);
    assert_eq!(renderer.frame().unwrap().nodes.len(), 1);
    let delta = renderer.transition().unwrap().delta().unwrap();
    assert_eq!(delta.exited_nodes.len(), 6);

    assert_eq!(renderer.toggle(NodeId(0)).unwrap(), ToggleOutcome::Expanded);
    assert_eq!(renderer.frame().unwrap().nodes.len(), 7);
    assert!(renderer.tree().unwrap().hidden_ids().is_empty());
}

#[test]
fn svg_snapshot_reflects_collapse() {
    let root = TreeNode::branch("Cells", vec![TreeNode::leaf("Nucleus").with_emoji("🧬")]);
    let mut renderer = TreeRenderer::new(Theme::Light, Viewport::default());
    renderer.build(Some(&root)).unwrap();

    let settled = renderer.svg(60_000.0);
    assert_eq!(settled.matches("<circle").count(), 2);
    assert!(settled.contains("Nucleus"));

    renderer.toggle(NodeId(0)).unwrap();
    let collapsed = renderer.svg(60_000.0);
    assert_eq!(collapsed.matches("<circle").count(), 1);
    assert!(!collapsed.contains("Nucleus"));
    assert!(collapsed.contains(r##"fill="#cccccc""##));
}

#[test]
fn export_png_is_double_density() {
    let root = TreeNode::branch("Cells", vec![TreeNode::leaf("Nucleus")]);
    let mut renderer = TreeRenderer::new(Theme::Space, Viewport::new(320.0, 200.0));
    renderer.build(Some(&root)).unwrap();

    let bytes = renderer.export_png().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (640, 400));
}
