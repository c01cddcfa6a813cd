pub mod perf_fixtures;
#[cfg(test)]
mod streaming_parity;
#[cfg(test)]
pub mod test_harness;

mod debug;
mod dom;
mod entities;
mod error;
mod parser;
mod render;
mod tokenizer;
mod tree_builder;

pub use crate::dom::{Attribute, Document, Element, Node, VOID_ELEMENTS, is_void_element};
pub use crate::error::ParseError;
pub use crate::parser::{IncrementalParser, ParserConfig, parse};
pub use crate::render::{Escape, RenderConfig};
pub use crate::tokenizer::{Token, TokenizeResult, Tokenizer, TokenizerStats, tokenize};
pub use crate::tree_builder::TreeBuilder;
