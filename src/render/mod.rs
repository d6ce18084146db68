//! Render module orchestrator.

mod core;

pub use core::{HtmlRenderer, RendererSettings};
