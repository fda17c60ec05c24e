//! Prompts and response schemas per map type
//!
//! Schemas use the generative API's OpenAPI subset (`OBJECT`, `ARRAY`,
//! `STRING`, `INTEGER`) and mirror the shapes in `magicmap_common::models`.

use magicmap_common::MapType;
use serde_json::{json, Value};

/// Always sent as the system instruction
pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant helping students visualize their notes. \
It is crucial that you respond in the same language as the user's input text. \
Do not translate the content into any other language.";

/// Prepended to the prompt when an image is attached
pub const IMAGE_PROMPT_PREFIX: &str =
    "First, analyze and extract text from the provided image. Then, using the extracted text, follow these instructions: ";

const TREE_PROMPT_RULES: &str = r#"You are an AI assistant that creates hierarchical tree structures from student notes. Follow these rules precisely:

RULE 1: STRICTLY ADHERE TO THE SOURCE TEXT. Your entire output must be based ONLY on the information present in the "TEXT TO ANALYZE" section. Do NOT add any external information, facts, or details that are not explicitly mentioned in the text. Do not invent content to create more branches.

RULE 2: CREATE A DEEP HIERARCHY. Analyze the text to create a tree structure that is 2 to 3 levels deep.
- Level 1: The main topic.
- Level 2: Key sub-topics that are part of the main topic.
- Level 3: Specific details or sub-points that belong to a Level 2 sub-topic.

RULE 3: ACCURACY OVER DEPTH. If the provided text is too short or simple to create a 3-level tree, create the deepest, most detailed tree possible *without violating RULE 1*. It is better to have a 2-level tree that is accurate than a 3-level tree with invented information.

RULE 4: EMOJIS. Assign a single, relevant emoji to every node at every level.

TEXT TO ANALYZE:"#;

/// Instructions for `map_type` wrapped around the user's text
pub fn prompt_for(map_type: MapType, text: &str) -> String {
    match map_type {
        MapType::TreeView => format!("{}\n---\n{}\n---", TREE_PROMPT_RULES, text),
        MapType::Timeline => format!(
            "Analyze the following text and generate a chronological timeline of key events. \
             Extract the date, title, and a short description for each event. \
             Also suggest a relevant emoji. Text: \n---\n{}\n---",
            text
        ),
        MapType::Storyboard => format!(
            "Analyze the following story or process and break it down into a sequence of storyboard panels. \
             Provide a scene number and a description for each panel. \
             Also suggest a relevant emoji. Text: \n---\n{}\n---",
            text
        ),
        MapType::CharacterWeb => format!(
            "Analyze the following text to identify characters and their relationships. \
             List each character with a brief description and suggest an emoji. \
             Then, describe the relationships between them. Text: \n---\n{}\n---",
            text
        ),
    }
}

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn emoji(subject: &str) -> Value {
    string(&format!("A single, relevant emoji for {}.", subject))
}

/// Response schema for `map_type`
pub fn schema_for(map_type: MapType) -> Value {
    match map_type {
        MapType::TreeView => {
            let grandchild = json!({
                "type": "OBJECT",
                "properties": {
                    "name": string("Sub-sub-topic or key detail."),
                    "emoji": emoji("this concept"),
                },
                "required": ["name"]
            });
            let child = json!({
                "type": "OBJECT",
                "properties": {
                    "name": string("Sub-topic or key concept."),
                    "emoji": emoji("this concept"),
                    "children": {
                        "type": "ARRAY",
                        "items": grandchild,
                        "description": "Optional list of sub-sub-topics."
                    }
                },
                "required": ["name"]
            });
            json!({
                "type": "OBJECT",
                "properties": {
                    "name": string("The central theme or main topic."),
                    "emoji": emoji("the main topic"),
                    "children": {
                        "type": "ARRAY",
                        "items": child,
                        "description": "A list of key sub-topics, which may themselves have children. This list should contain at least one item."
                    }
                },
                "required": ["name", "children"]
            })
        }
        MapType::Timeline => json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "date": string("The date or time period of the event."),
                    "title": string("A concise title for the event."),
                    "description": string("A brief description of the event."),
                    "emoji": emoji("the event"),
                },
                "required": ["date", "title", "description"]
            }
        }),
        MapType::Storyboard => json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "scene": { "type": "INTEGER", "description": "The sequential number of the scene." },
                    "description": string("A description of the action or setting in this panel."),
                    "emoji": emoji("the scene"),
                },
                "required": ["scene", "description"]
            }
        }),
        MapType::CharacterWeb => json!({
            "type": "OBJECT",
            "properties": {
                "characters": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": string("The character's name."),
                            "description": string("A brief description of the character."),
                            "emoji": emoji("the character"),
                        },
                        "required": ["name", "description"]
                    }
                },
                "relationships": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "source": string("The name of the first character in the relationship."),
                            "target": string("The name of the second character in the relationship."),
                            "description": string("How the two characters are related."),
                        },
                        "required": ["source", "target", "description"]
                    }
                }
            },
            "required": ["characters", "relationships"]
        }),
    }
}
