use std::fmt::Write;

use crate::dom::{Document, Node};

const INDENT_STEP: &str = "  ";

impl Document {
    /// Human-readable tree dump, one node per line, children indented.
    ///
    /// ```text
    /// #document
    ///   <p class="intro">
    ///     "Hi "
    ///     &amp;
    /// ```
    pub fn outline(&self) -> String {
        let mut out = String::from("#document\n");
        let mut stack: Vec<(&Node, usize)> =
            self.children.iter().rev().map(|child| (child, 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str(INDENT_STEP);
            }
            match node {
                Node::Element(element) => {
                    out.push('<');
                    out.push_str(&element.name);
                    for (name, value) in &element.attributes {
                        out.push(' ');
                        out.push_str(name);
                        if let Some(value) = value {
                            let _ = write!(out, "={value:?}");
                        }
                    }
                    out.push('>');
                    stack.extend(
                        element
                            .children
                            .iter()
                            .rev()
                            .map(|child| (child, depth + 1)),
                    );
                }
                Node::Text { text } => {
                    let _ = write!(out, "{text:?}");
                }
                Node::EntityRef { name } => {
                    let _ = write!(out, "&{name};");
                }
            }
            out.push('\n');
        }
        out
    }
}
