/// Renderer Utilities
pub mod renderer;
