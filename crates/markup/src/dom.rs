//! Owned document tree.
//!
//! Containers (`Document`, `Element`) own their children by value, so a
//! finished tree has no back-pointers and no way to share a node between two
//! parents. Parent links only exist inside the tree builder's arena while a
//! document is being parsed.

use std::io::{self, Write};

use crate::render::{Escape, RenderConfig, write_text};

/// Elements that never carry content and render self-closing when empty.
pub const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "basefont", "frame",
    "isindex", "param",
];

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "basefont"
            | "frame"
            | "isindex"
            | "param"
    )
}

/// Attribute `(name, value)`; `None` for a bare attribute like `disabled`.
pub type Attribute = (String, Option<String>);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Decoded character data.
    Text { text: String },
    /// Unresolved named entity, rendered back as `&name;`.
    EntityRef { name: String },
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Write the document using the default (raw) output configuration.
    pub fn render<W: Write + ?Sized, C: ?Sized>(&self, out: &mut W, ctx: &C) -> io::Result<()> {
        self.render_with(out, ctx, &RenderConfig::default())
    }

    pub fn render_with<W: Write + ?Sized, C: ?Sized>(
        &self,
        out: &mut W,
        ctx: &C,
        config: &RenderConfig,
    ) -> io::Result<()> {
        for child in &self.children {
            child.render_with(out, ctx, config)?;
        }
        Ok(())
    }

    /// Serialize into a `String` with `config`.
    pub fn to_markup(&self, config: &RenderConfig) -> String {
        let mut out = Vec::new();
        self.render_with(&mut out, &(), config)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into())
    }
}

impl Element {
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// First value recorded for `name`; bare attributes yield `Some(None)`.
    pub fn attribute(&self, name: &str) -> Option<Option<&str>> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    pub fn render<W: Write + ?Sized, C: ?Sized>(&self, out: &mut W, ctx: &C) -> io::Result<()> {
        self.render_with(out, ctx, &RenderConfig::default())
    }

    pub fn render_with<W: Write + ?Sized, C: ?Sized>(
        &self,
        out: &mut W,
        ctx: &C,
        config: &RenderConfig,
    ) -> io::Result<()> {
        // An empty void element is the only self-closing form; a void element
        // that was handed children still gets an explicit close tag.
        if self.children.is_empty() && self.is_void() {
            out.write_all(b"<")?;
            out.write_all(self.name.as_bytes())?;
            self.write_attributes(out, config.escape)?;
            return out.write_all(b" />");
        }

        out.write_all(b"<")?;
        out.write_all(self.name.as_bytes())?;
        self.write_attributes(out, config.escape)?;
        out.write_all(b">")?;
        for child in &self.children {
            child.render_with(out, ctx, config)?;
        }
        out.write_all(b"</")?;
        out.write_all(self.name.as_bytes())?;
        out.write_all(b">")
    }

    fn write_attributes<W: Write + ?Sized>(&self, out: &mut W, escape: Escape) -> io::Result<()> {
        for (name, value) in &self.attributes {
            out.write_all(b" ")?;
            out.write_all(name.as_bytes())?;
            if let Some(value) = value {
                out.write_all(b"=\"")?;
                write_text(out, value, escape)?;
                out.write_all(b"\"")?;
            }
        }
        Ok(())
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn entity_ref(name: impl Into<String>) -> Self {
        Node::EntityRef { name: name.into() }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text { .. } | Node::EntityRef { .. } => &[],
        }
    }

    pub fn render<W: Write + ?Sized, C: ?Sized>(&self, out: &mut W, ctx: &C) -> io::Result<()> {
        self.render_with(out, ctx, &RenderConfig::default())
    }

    pub fn render_with<W: Write + ?Sized, C: ?Sized>(
        &self,
        out: &mut W,
        ctx: &C,
        config: &RenderConfig,
    ) -> io::Result<()> {
        match self {
            Node::Element(element) => element.render_with(out, ctx, config),
            Node::Text { text } => write_text(out, text, config.escape),
            Node::EntityRef { name } => {
                out.write_all(b"&")?;
                out.write_all(name.as_bytes())?;
                out.write_all(b";")
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
