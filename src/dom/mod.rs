//! Abstract DOM nodes produced by the layout generator.
//!
//! Nodes are plain data: the generator builds them, the HTML renderer
//! serialises them and the client page model mounts them.

mod core;

pub use core::{DomElement, ElementKind};
