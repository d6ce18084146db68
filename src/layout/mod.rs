//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private `core`, `item` and `generator` modules.

mod config;
mod core;
mod generator;
pub mod grid;
mod item;
pub mod minimum;

pub use config::RenderConfig;
pub use core::{DEFAULT_CONTENTS_MARGIN, GridLayout};
pub use generator::{
    CENTER_WRAPPER_CLASS, HORIZONTAL_HANDLE_CLASS, LAYOUT_SCRIPT_KEY, RESIZE_SCRIPT_KEY,
    VERTICAL_HANDLE_CLASS,
};
pub use grid::{Alignment, Cell, Grid, GridError, HAlign, Slot, Track, VAlign};
pub use item::LayoutItem;
