use std::fmt;
use std::rc::Rc;

use crate::dom::DomElement;
use crate::error::Result;
use crate::layout::GridLayout;
use crate::session::Session;
use crate::widget::Widget;

/// Anything a grid cell can hold: a leaf widget or a nested grid.
pub enum LayoutItem {
    /// Shared with the widget tree, which owns the widget's lifetime.
    Widget(Rc<dyn Widget>),
    Layout(Box<GridLayout>),
}

impl LayoutItem {
    pub fn widget<W>(widget: W) -> Self
    where
        W: Widget + 'static,
    {
        Self::Widget(Rc::new(widget))
    }

    pub fn shared(widget: Rc<dyn Widget>) -> Self {
        Self::Widget(widget)
    }

    /// Nest `layout`; nested layouts leave their outer margins to the parent.
    pub fn layout(mut layout: GridLayout) -> Self {
        layout.set_nested(true);
        Self::Layout(Box::new(layout))
    }

    pub fn key(&self) -> &str {
        match self {
            LayoutItem::Widget(widget) => widget.id(),
            LayoutItem::Layout(layout) => layout.id(),
        }
    }

    pub fn minimum_width(&self) -> i32 {
        match self {
            LayoutItem::Widget(widget) => widget.minimum_size().width,
            LayoutItem::Layout(layout) => layout.minimum_width(),
        }
    }

    pub fn minimum_height(&self) -> i32 {
        match self {
            LayoutItem::Widget(widget) => widget.minimum_size().height,
            LayoutItem::Layout(layout) => layout.minimum_height(),
        }
    }

    pub fn render(
        &mut self,
        fit_width: bool,
        fit_height: bool,
        session: &mut Session,
    ) -> Result<DomElement> {
        match self {
            LayoutItem::Widget(widget) => Ok(widget.render(fit_width, fit_height)),
            LayoutItem::Layout(layout) => layout.create_dom(fit_width, fit_height, session),
        }
    }

    pub fn as_layout(&self) -> Option<&GridLayout> {
        match self {
            LayoutItem::Layout(layout) => Some(layout),
            LayoutItem::Widget(_) => None,
        }
    }

    pub fn as_layout_mut(&mut self) -> Option<&mut GridLayout> {
        match self {
            LayoutItem::Layout(layout) => Some(layout),
            LayoutItem::Widget(_) => None,
        }
    }
}

impl fmt::Debug for LayoutItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutItem::Widget(widget) => f.debug_tuple("Widget").field(&widget.id()).finish(),
            LayoutItem::Layout(layout) => f.debug_tuple("Layout").field(&layout.id()).finish(),
        }
    }
}
