//! Tree builder: applies tokenizer events to a document under construction.
//!
//! The builder keeps a cursor (the open container new nodes are appended to)
//! and a text buffer. Character data and decoded numeric references
//! accumulate in the buffer and only become a `Text` node at a structural
//! boundary (a start tag, an end tag that closes an element, a named entity
//! or the end of input), so the finished tree never holds two adjacent `Text`
//! nodes or an empty one. Ignored end tags do not flush.
//!
//! Comments, doctypes and processing instructions are not structural: they
//! are dropped without flushing, so the text on both sides coalesces.

use crate::dom::{Document, is_void_element};
use crate::entities::decode_numeric_reference;
use crate::error::ParseError;
use crate::parser::ParserConfig;
use crate::tokenizer::Token;

use arena::{NodeArena, ROOT};

mod arena;

#[derive(Debug)]
pub struct TreeBuilder {
    config: ParserConfig,
    arena: NodeArena,
    cursor: usize,
    text_buffer: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl TreeBuilder {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            arena: NodeArena::new(),
            cursor: ROOT,
            text_buffer: String::new(),
        }
    }

    /// Number of nodes created so far, the document root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of elements between the cursor and the document root.
    pub fn open_depth(&self) -> usize {
        let mut depth = 0;
        let mut index = self.cursor;
        while let Some((_, parent)) = self.arena.open_element(index) {
            depth += 1;
            index = parent;
        }
        depth
    }

    pub fn push_token(&mut self, token: Token) -> Result<(), ParseError> {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                self.flush_text();
                // Void and self-closing tags never open a scope.
                let opens_scope = !self_closing && !is_void_element(&name);
                let index = self.arena.add_element(self.cursor, name, attributes);
                if opens_scope {
                    self.cursor = index;
                }
            }
            Token::EndTag { name } => self.close_element(&name)?,
            Token::Text(text) => self.text_buffer.push_str(&text),
            Token::NumericRef(payload) => match decode_numeric_reference(&payload) {
                Some(ch) => self.text_buffer.push(ch),
                None => return Err(ParseError::MalformedReference { payload }),
            },
            Token::EntityRef(name) => {
                self.flush_text();
                self.arena.add_entity_ref(self.cursor, name);
            }
            Token::Comment(_) | Token::Doctype(_) | Token::ProcessingInstruction(_) => {
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(target: "markup.tree_builder", "skipping {token:?}");
            }
        }
        Ok(())
    }

    /// Flush pending text and hand out the finished document.
    ///
    /// In lenient mode the whole tree is returned no matter how many elements
    /// are still open.
    pub fn finish(mut self) -> Result<Document, ParseError> {
        self.flush_text();
        if let Some((name, _)) = self.arena.open_element(self.cursor) {
            if self.config.strict {
                return Err(ParseError::UnclosedElement {
                    name: name.to_string(),
                });
            }
            log::debug!(
                target: "markup.tree_builder",
                "input ended with <{name}> and {} more element(s) open",
                self.open_depth() - 1
            );
        }
        Ok(self.arena.into_document())
    }

    fn flush_text(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text_buffer);
        self.arena.add_text(self.cursor, text);
    }

    fn close_element(&mut self, name: &str) -> Result<(), ParseError> {
        if is_void_element(name) {
            // The matching start tag never moved the cursor.
            return Ok(());
        }
        let Some((open, parent)) = self.arena.open_element(self.cursor) else {
            if self.config.strict {
                return Err(ParseError::UnexpectedEndTag {
                    name: name.to_string(),
                });
            }
            log::debug!(target: "markup.tree_builder", "ignoring stray </{name}> at document level");
            return Ok(());
        };
        if self.config.strict && open != name {
            return Err(ParseError::MismatchedEndTag {
                expected: open.to_string(),
                found: name.to_string(),
            });
        }
        self.flush_text();
        self.cursor = parent;
        Ok(())
    }
}
