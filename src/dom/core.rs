/// Semantic element kinds the layout engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Div,
    Span,
    Table,
    TBody,
    ColGroup,
    Col,
    Tr,
    Td,
    TextArea,
}

impl ElementKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Div => "div",
            ElementKind::Span => "span",
            ElementKind::Table => "table",
            ElementKind::TBody => "tbody",
            ElementKind::ColGroup => "colgroup",
            ElementKind::Col => "col",
            ElementKind::Tr => "tr",
            ElementKind::Td => "td",
            ElementKind::TextArea => "textarea",
        }
    }

    /// Elements that flow inline unless styled otherwise.
    pub fn is_inline(&self) -> bool {
        matches!(self, ElementKind::Span)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ElementKind::Col)
    }
}

/// A single element with ordered style declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    kind: ElementKind,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    children: Vec<DomElement>,
    text: Option<String>,
    default_inline: bool,
    resizable: bool,
}

impl DomElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            children: Vec::new(),
            text: None,
            default_inline: kind.is_inline(),
            resizable: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets a style property, keeping its original position when it already exists.
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.style.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.style.push((name.to_string(), value)),
        }
    }

    pub fn remove_style(&mut self, name: &str) {
        self.style.retain(|(n, _)| n != name);
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.style
    }

    /// Serialised `style` attribute value, or `None` when no property is set.
    pub fn style_text(&self) -> Option<String> {
        if self.style.is_empty() {
            return None;
        }
        let text = self
            .style
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(text)
    }

    pub fn add_child(&mut self, child: DomElement) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[DomElement] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&DomElement> {
        self.children.first()
    }

    pub fn children_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &DomElement> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn is_default_inline(&self) -> bool {
        self.default_inline
    }

    pub fn set_default_inline(&mut self, inline: bool) {
        self.default_inline = inline;
    }

    /// Whether the element accepts a `resize(width, height)` call from the reflow engine.
    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    /// Depth-first search by element id.
    pub fn find_by_id(&self, id: &str) -> Option<&DomElement> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }
}
