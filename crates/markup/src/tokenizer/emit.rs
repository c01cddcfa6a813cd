//! Token emission helpers.

use crate::tokenizer::{Token, Tokenizer};

impl Tokenizer {
    pub(super) fn emit_token(&mut self, token: Token) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markup.tokenizer", "emit token: {token:?}");
        self.tokens.push(token);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    /// Emit `buffer[start..end]` as text; empty ranges emit nothing.
    pub(super) fn emit_text_range(&mut self, start: usize, end: usize) {
        if start == end {
            return;
        }
        debug_assert!(
            self.buffer.is_char_boundary(start) && self.buffer.is_char_boundary(end),
            "text range must be on UTF-8 boundaries"
        );
        let text = self.buffer[start..end].to_string();
        self.emit_token(Token::Text(text));
    }

    pub(super) fn emit_text_owned(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.emit_token(Token::Text(text.to_string()));
    }
}
