//! HTML serialization of document subtrees.

use crate::document::Dom;
use crate::node::{is_void_element, NodeId, NodeKind};

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

struct Writer<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Writer<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

pub(crate) fn outer_html(dom: &Dom, node: NodeId, options: &HtmlOptions) -> String {
    let mut writer = Writer::new(options);
    write_node(dom, node, &mut writer);
    let output = writer.get_output();
    if options.pretty {
        output.trim_end().to_string()
    } else {
        output
    }
}

pub(crate) fn inner_html(dom: &Dom, node: NodeId, options: &HtmlOptions) -> String {
    let mut writer = Writer::new(options);
    for child in dom.child_ids(node) {
        write_node(dom, *child, &mut writer);
    }
    let output = writer.get_output();
    if options.pretty {
        output.trim_end().to_string()
    } else {
        output
    }
}

fn write_node(dom: &Dom, node: NodeId, writer: &mut Writer<'_>) {
    let Some(entry) = dom.get(node) else {
        return;
    };

    match &entry.kind {
        NodeKind::Document => {
            writer.add("<!DOCTYPE html>");
            writer.newline();
            for child in &entry.children {
                write_node(dom, *child, writer);
            }
        }
        NodeKind::Text(text) => {
            writer.add_indent();
            writer.add(&escape_html(text));
            writer.newline();
        }
        NodeKind::Element(element) => {
            writer.add_indent();
            writer.add("<");
            writer.add(&element.tag);
            for (name, value) in &element.attributes {
                writer.add(" ");
                writer.add(name);
                writer.add("=\"");
                writer.add(&escape_html(value));
                writer.add("\"");
            }
            writer.add(">");

            if is_void_element(&element.tag) {
                writer.newline();
                return;
            }

            let inline = entry
                .children
                .iter()
                .all(|child| matches!(dom.get(*child).map(|n| &n.kind), Some(NodeKind::Text(_))));

            if inline {
                for child in &entry.children {
                    if let Some(NodeKind::Text(text)) = dom.get(*child).map(|n| &n.kind) {
                        writer.add(&escape_html(text));
                    }
                }
            } else {
                writer.newline();
                writer.indent();
                for child in &entry.children {
                    write_node(dom, *child, writer);
                }
                writer.dedent();
                writer.add_indent();
            }

            writer.add("</");
            writer.add(&element.tag);
            writer.add(">");
            writer.newline();
        }
    }
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
