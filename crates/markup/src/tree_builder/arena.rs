//! Build-time node storage.
//!
//! Nodes are appended to a flat `Vec` and refer to each other by index.
//! Elements remember their parent index so the builder can pop its cursor
//! without owning back-pointers; the index links disappear when the arena is
//! converted into an owned [`Document`].

use crate::dom::{Attribute, Document, Element, Node};

/// Index of the document root; always the first arena slot.
pub(super) const ROOT: usize = 0;

#[derive(Debug)]
enum ArenaNode {
    Document {
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Vec<Attribute>,
        parent: usize,
        children: Vec<usize>,
    },
    Text {
        text: String,
    },
    EntityRef {
        name: String,
    },
}

impl ArenaNode {
    fn children(&self) -> Option<&[usize]> {
        match self {
            ArenaNode::Document { children } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::EntityRef { .. } => None,
        }
    }
}

#[derive(Debug)]
pub(super) struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    pub(super) fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::Document {
                children: Vec::new(),
            }],
        }
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    fn add_child(&mut self, parent: usize, child: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(child);
        match &mut self.nodes[parent] {
            ArenaNode::Document { children } | ArenaNode::Element { children, .. } => {
                children.push(index);
            }
            _ => unreachable!("tree builder cursor is always a container"),
        }
        index
    }

    pub(super) fn add_element(
        &mut self,
        parent: usize,
        name: String,
        attributes: Vec<Attribute>,
    ) -> usize {
        self.add_child(
            parent,
            ArenaNode::Element {
                name,
                attributes,
                parent,
                children: Vec::new(),
            },
        )
    }

    pub(super) fn add_text(&mut self, parent: usize, text: String) {
        self.add_child(parent, ArenaNode::Text { text });
    }

    pub(super) fn add_entity_ref(&mut self, parent: usize, name: String) {
        self.add_child(parent, ArenaNode::EntityRef { name });
    }

    /// Name and parent of the element at `index`; `None` for the root.
    pub(super) fn open_element(&self, index: usize) -> Option<(&str, usize)> {
        match &self.nodes[index] {
            ArenaNode::Element { name, parent, .. } => Some((name, *parent)),
            _ => None,
        }
    }

    /// Convert into an owned tree.
    ///
    /// Iterative postorder over the arena, so nesting depth is bounded by heap
    /// and not by the call stack. When a container is visited the second
    /// time, its direct children are the last `child_count` entries of
    /// `built`, in source order.
    pub(super) fn into_document(self) -> Document {
        let mut nodes = self.nodes;
        let mut built: Vec<Node> = Vec::with_capacity(nodes.len());
        let mut stack: Vec<(usize, bool)> = Vec::new();

        if let Some(children) = nodes[ROOT].children() {
            stack.extend(children.iter().rev().map(|&child| (child, false)));
        }

        while let Some((index, visited)) = stack.pop() {
            if !visited {
                stack.push((index, true));
                if let Some(children) = nodes[index].children() {
                    stack.extend(children.iter().rev().map(|&child| (child, false)));
                }
                continue;
            }

            let node = match &mut nodes[index] {
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                    ..
                } => {
                    let first_child = built.len() - children.len();
                    Node::Element(Element {
                        name: std::mem::take(name),
                        attributes: std::mem::take(attributes),
                        children: built.split_off(first_child),
                    })
                }
                ArenaNode::Text { text } => Node::Text {
                    text: std::mem::take(text),
                },
                ArenaNode::EntityRef { name } => Node::EntityRef {
                    name: std::mem::take(name),
                },
                ArenaNode::Document { .. } => unreachable!("document root is never a child"),
            };
            built.push(node);
        }

        Document { children: built }
    }
}
