//! Terminal UI: palette and glyphs, the generation spinner, and question
//! card rendering.

pub mod render;
pub mod spinner;
pub mod style;
