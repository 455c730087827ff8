//! # User Interface Module
//!
//! Dear ImGui overlay used to draw text over the rendered scene.

pub mod manager;

// Re-export main types
pub use manager::{OverlayText, UiManager};
