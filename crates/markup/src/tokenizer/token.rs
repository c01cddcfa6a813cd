//! Tokenizer events consumed by the tree builder.

use crate::dom::Attribute;

/// One lexical event, in source order.
///
/// Names are ASCII-lowercased. Text is emitted in runs whose boundaries depend
/// on chunking; consumers must treat consecutive `Text` tokens as one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        /// Encounter order, duplicates kept, values already reference-decoded.
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    /// Raw payload of `&#...;` without the `&#` and terminator, e.g. `x26`.
    NumericRef(String),
    /// Name of `&name;`.
    EntityRef(String),
    Comment(String),
    Doctype(String),
    ProcessingInstruction(String),
}
