//! Incremental parser: tokenizer and tree builder driven chunk by chunk.

use tools::utf8::Utf8ChunkDecoder;

use crate::dom::Document;
use crate::error::ParseError;
use crate::tokenizer::Tokenizer;
use crate::tree_builder::TreeBuilder;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Fail on end tags that do not match the open element and on elements
    /// left open at end of input. Off by default: end tags simply pop.
    pub strict: bool,
}

/// Accepts markup in arbitrary chunks and produces one [`Document`].
///
/// Tokens are applied to the tree as soon as a chunk makes them complete;
/// nothing but the unfinished tail of the input is buffered.
#[derive(Debug, Default)]
pub struct IncrementalParser {
    tokenizer: Tokenizer,
    builder: TreeBuilder,
    decoder: Utf8ChunkDecoder,
}

impl IncrementalParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            builder: TreeBuilder::new(config),
            decoder: Utf8ChunkDecoder::new(),
        }
    }

    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        self.flush_decoder();
        self.tokenizer.push_str(chunk);
        self.drain()
    }

    /// Feed raw bytes. A multi-byte character may be split across calls;
    /// invalid sequences decode to U+FFFD.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        let text = self.decoder.decode(chunk);
        if !text.is_empty() {
            self.tokenizer.push_str(&text);
        }
        self.drain()
    }

    /// End of input: flush everything and return the document root.
    pub fn close(mut self) -> Result<Document, ParseError> {
        self.flush_decoder();
        self.tokenizer.finish();
        self.drain()?;
        let doc = self.builder.finish()?;
        log::trace!(
            target: "markup.tree_builder",
            "closed document with {} top-level node(s)",
            doc.children.len()
        );
        Ok(doc)
    }

    fn flush_decoder(&mut self) {
        if self.decoder.pending().is_empty() {
            return;
        }
        let mut tail = String::new();
        self.decoder.finish_into(&mut tail);
        self.tokenizer.push_str(&tail);
    }

    fn drain(&mut self) -> Result<(), ParseError> {
        for token in self.tokenizer.next_batch() {
            self.builder.push_token(token)?;
        }
        Ok(())
    }
}

/// Parse a complete string with the default configuration.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    let mut parser = IncrementalParser::new();
    parser.feed(input)?;
    parser.close()
}
