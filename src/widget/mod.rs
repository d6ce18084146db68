//! Leaf widgets placed into grid cells.
//!
//! The layout engine only needs three things from a widget: an identity, a
//! minimum size and a rendered element. Everything else about widgets lives in
//! the surrounding toolkit.

use crate::dom::{DomElement, ElementKind};
use crate::geometry::{Size, px};
use crate::width::{LINE_HEIGHT_PX, text_extent};

pub const TEXT_EDIT_WRAPPER_CLASS: &str = "text-edit-wrapper";

/// Contract between the grid and anything it can lay out.
pub trait Widget {
    fn id(&self) -> &str;

    fn minimum_size(&self) -> Size;

    /// Render the widget. `fit_width`/`fit_height` tell the widget whether the
    /// cell will size it on that axis.
    fn render(&self, fit_width: bool, fit_height: bool) -> DomElement;
}

/// Inline text label.
#[derive(Debug, Clone)]
pub struct TextWidget {
    id: String,
    text: String,
}

impl TextWidget {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl Widget for TextWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn minimum_size(&self) -> Size {
        text_extent(&self.text)
    }

    fn render(&self, _fit_width: bool, _fit_height: bool) -> DomElement {
        DomElement::new(ElementKind::Span)
            .with_id(self.id.clone())
            .with_text(self.text.clone())
    }
}

/// Block container with a fixed minimum size.
#[derive(Debug, Clone)]
pub struct BlockWidget {
    id: String,
    minimum: Size,
    width: Option<i32>,
    resizable: bool,
}

impl BlockWidget {
    pub fn new(id: impl Into<String>, minimum: Size) -> Self {
        Self {
            id: id.into(),
            minimum,
            width: None,
            resizable: false,
        }
    }

    /// Give the block an explicit pixel width.
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Let the reflow engine hand the block its content box through `resize`.
    pub fn with_resize(mut self) -> Self {
        self.resizable = true;
        self
    }
}

impl Widget for BlockWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn minimum_size(&self) -> Size {
        self.minimum
    }

    fn render(&self, _fit_width: bool, _fit_height: bool) -> DomElement {
        let mut el = DomElement::new(ElementKind::Div).with_id(self.id.clone());
        if let Some(width) = self.width {
            el.set_style("width", px(width));
        }
        el.set_resizable(self.resizable);
        el
    }
}

/// Multi-line text editor wrapped in a block so it can be sized vertically.
#[derive(Debug, Clone)]
pub struct TextEditWidget {
    id: String,
    rows: i32,
    columns: i32,
    bottom_margin: i32,
}

impl TextEditWidget {
    pub fn new(id: impl Into<String>, rows: i32, columns: i32) -> Self {
        Self {
            id: id.into(),
            rows: rows.max(1),
            columns: columns.max(1),
            bottom_margin: 0,
        }
    }

    pub fn with_bottom_margin(mut self, margin: i32) -> Self {
        self.bottom_margin = margin.max(0);
        self
    }
}

impl Widget for TextEditWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn minimum_size(&self) -> Size {
        Size::new(
            self.columns * crate::width::GLYPH_WIDTH_PX,
            self.rows * LINE_HEIGHT_PX + self.bottom_margin,
        )
    }

    fn render(&self, _fit_width: bool, _fit_height: bool) -> DomElement {
        let mut wrapper = DomElement::new(ElementKind::Div)
            .with_id(self.id.clone())
            .with_class(TEXT_EDIT_WRAPPER_CLASS);
        if self.bottom_margin > 0 {
            wrapper.set_style("margin-bottom", px(self.bottom_margin));
        }
        let mut area = DomElement::new(ElementKind::TextArea);
        area.set_attribute("rows", self.rows.to_string());
        area.set_attribute("cols", self.columns.to_string());
        wrapper.add_child(area);
        wrapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::GLYPH_WIDTH_PX;

    #[test]
    fn text_widget_renders_inline_span() {
        let label = TextWidget::new("title", "Hello");
        let el = label.render(true, true);
        assert_eq!(el.kind(), ElementKind::Span);
        assert!(el.is_default_inline());
        assert_eq!(label.minimum_size().width, 5 * GLYPH_WIDTH_PX);
    }

    #[test]
    fn block_widget_carries_width_and_resize_capability() {
        let el = BlockWidget::new("panel", Size::new(40, 30))
            .with_width(120)
            .with_resize()
            .render(false, false);
        assert_eq!(el.style("width"), Some("120px"));
        assert!(el.is_resizable());
        assert!(!el.is_default_inline());
    }

    #[test]
    fn text_edit_wraps_a_textarea() {
        let edit = TextEditWidget::new("notes", 3, 20).with_bottom_margin(4);
        let el = edit.render(true, true);
        assert!(el.has_class(TEXT_EDIT_WRAPPER_CLASS));
        assert_eq!(el.first_child().map(|c| c.kind()), Some(ElementKind::TextArea));
        assert_eq!(edit.minimum_size().height, 3 * LINE_HEIGHT_PX + 4);
    }
}
