//! Services for magicmap-ui
//!
//! - `generator`: the [`MapGenerator`] seam and request types
//! - `gemini_client`: production generator backed by the Gemini API
//! - `prompts`: prompt text and response schema per map type
//! - `connectivity`: online check before a generation
//! - `workflow`: session operations that await I/O

pub mod connectivity;
pub mod gemini_client;
pub mod generator;
pub mod prompts;
pub mod workflow;

pub use connectivity::{ConnectivityProbe, StaticProbe, TcpProbe};
pub use gemini_client::{GeminiClient, GeminiError};
pub use generator::{GenerationError, GenerationRequest, ImageUpload, MapGenerator};
