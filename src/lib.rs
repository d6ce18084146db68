//! Trellis: a server-side grid layout engine with a client reflow model, plus
//! the axis engine used by its charts.
//!
//! The modules follow a small orchestrator pattern: each `mod.rs` keeps its
//! implementation private and re-exports the types downstream code needs.

pub mod chart;
pub mod client;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod session;
pub mod widget;
pub mod width;

pub use chart::{Axis, AxisScale, ChartContext, ChartModel, StaticContext};
pub use client::{ClientLayout, LayoutRegistry, Page, ResizeController};
pub use dom::{DomElement, ElementKind};
pub use error::{LayoutError, Result};
pub use geometry::{Sides, Size};
pub use layout::{Alignment, Grid, GridError, GridLayout, LayoutItem, RenderConfig};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, ReflowMetrics};
pub use render::{HtmlRenderer, RendererSettings};
pub use session::{Session, SessionConfig, Statement};
pub use widget::{BlockWidget, TextEditWidget, TextWidget, Widget};
pub use width::display_width;
