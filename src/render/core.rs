use std::io::Write;

use crate::dom::DomElement;
use crate::error::Result;

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    /// Indent nested elements by this many spaces, one element per line.
    pub indent: Option<usize>,
}

/// Serialises abstract DOM trees as HTML markup.
pub struct HtmlRenderer {
    settings: RendererSettings,
}

impl HtmlRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&self, writer: &mut impl Write, root: &DomElement) -> Result<()> {
        self.render_element(writer, root, 0)?;
        writer.flush()?;
        Ok(())
    }

    pub fn render_to_string(&self, root: &DomElement) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer, root)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn render_element(&self, writer: &mut impl Write, el: &DomElement, depth: usize) -> Result<()> {
        self.write_indent(writer, depth)?;
        let tag = el.kind().tag();
        write!(writer, "<{tag}")?;
        if let Some(id) = el.id() {
            write!(writer, " id=\"{}\"", escape(id))?;
        }
        if !el.classes().is_empty() {
            write!(writer, " class=\"{}\"", escape(&el.classes().join(" ")))?;
        }
        for (name, value) in el.attributes() {
            write!(writer, " {name}=\"{}\"", escape(value))?;
        }
        if let Some(style) = el.style_text() {
            write!(writer, " style=\"{}\"", escape(&style))?;
        }
        write!(writer, ">")?;

        if el.kind().is_void() {
            return self.write_newline(writer);
        }

        if let Some(text) = el.text() {
            write!(writer, "{}", escape(text))?;
        }

        if !el.children().is_empty() {
            self.write_newline(writer)?;
            for child in el.children() {
                self.render_element(writer, child, depth + 1)?;
            }
            self.write_indent(writer, depth)?;
        }

        write!(writer, "</{tag}>")?;
        self.write_newline(writer)
    }

    fn write_indent(&self, writer: &mut impl Write, depth: usize) -> Result<()> {
        if let Some(width) = self.settings.indent {
            write!(writer, "{:1$}", "", width * depth)?;
        }
        Ok(())
    }

    fn write_newline(&self, writer: &mut impl Write) -> Result<()> {
        if self.settings.indent.is_some() {
            writeln!(writer)?;
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementKind;

    #[test]
    fn renders_attributes_and_styles_in_order() {
        let mut td = DomElement::new(ElementKind::Td).with_style("padding", "4px");
        td.set_attribute("colspan", "2");
        td.add_child(DomElement::new(ElementKind::Span).with_text("a < b"));
        let mut tr = DomElement::new(ElementKind::Tr).with_class("row");
        tr.add_child(td);

        let html = HtmlRenderer::with_default().render_to_string(&tr).unwrap();
        assert_eq!(
            html,
            "<tr class=\"row\"><td colspan=\"2\" style=\"padding: 4px\"><span>a &lt; b</span></td></tr>"
        );
    }

    #[test]
    fn col_elements_are_void() {
        let mut group = DomElement::new(ElementKind::ColGroup);
        group.add_child(DomElement::new(ElementKind::Col).with_style("width", "50%"));
        let html = HtmlRenderer::with_default().render_to_string(&group).unwrap();
        assert_eq!(html, "<colgroup><col style=\"width: 50%\"></colgroup>");
    }

    #[test]
    fn indent_setting_puts_elements_on_their_own_lines() {
        let mut div = DomElement::new(ElementKind::Div).with_id("c");
        div.add_child(DomElement::new(ElementKind::Table));
        let renderer = HtmlRenderer::new(RendererSettings { indent: Some(2) });
        let html = renderer.render_to_string(&div).unwrap();
        assert_eq!(html, "<div id=\"c\">\n  <table></table>\n</div>\n");
    }
}
