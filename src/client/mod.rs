//! Client-side reflow, run against a host-measured page model.
//!
//! The generator ships each fit-height layout's [`RenderConfig`] as a
//! registration statement. A [`LayoutRegistry`] fed with those statements
//! recomputes row heights whenever the viewport or siblings change, and the
//! [`ResizeController`] turns handle drags into row and column sizes.
//!
//! [`RenderConfig`]: crate::layout::RenderConfig

mod page;
mod reflow;
mod registry;
mod resize;

pub use page::{
    ClientCell, ClientColumn, ClientContainer, ClientContent, ClientRow, ClientTable,
    ColumnWidth, ContentKind, Page, ParentBox,
};
pub use reflow::{AdjustOutcome, ClientLayout};
pub use registry::LayoutRegistry;
pub use resize::{DragTarget, ResizeController};
