//! Map type → view selection

use magicmap_common::MapType;
use serde::Serialize;

/// Which view renders the current map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    /// Nothing generated yet
    Welcome,
    Tree,
    Timeline,
    Storyboard,
    CharacterWeb,
}

/// `None` means nothing has been generated yet
pub fn dispatch(map_type: Option<MapType>) -> View {
    match map_type {
        None => View::Welcome,
        Some(MapType::TreeView) => View::Tree,
        Some(MapType::Timeline) => View::Timeline,
        Some(MapType::Storyboard) => View::Storyboard,
        Some(MapType::CharacterWeb) => View::CharacterWeb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_view() {
        assert_eq!(dispatch(None), View::Welcome);
        let views: Vec<View> = MapType::all_variants()
            .iter()
            .map(|t| dispatch(Some(*t)))
            .collect();
        assert_eq!(
            views,
            vec![View::Tree, View::Timeline, View::Storyboard, View::CharacterWeb]
        );
    }
}
