//! Streaming markup tokenizer.
//!
//! The tokenizer owns a small buffer of not-yet-consumed input and is
//! resumable at any chunk boundary: a construct that is cut off (a tag, a
//! comment, a character or entity reference) stays buffered until the chunk
//! that completes it arrives.
//!
//! Invariants:
//! - Chunk-equivalence: feeding input in one chunk or many chunks yields the
//!   same token sequence, modulo how `Text` runs are split.
//! - Only the unconsumed suffix is retained between pushes.
//! - A construct still waiting for its terminator is not rescanned: the
//!   search resumes where the previous push stopped.
//! - `finish()` emits any incomplete trailing construct as literal text.
//!
//! Known limitations (intentional):
//! - Not an HTML5 tokenizer: no parse-error recovery states, no RCDATA for
//!   `<title>`/`<textarea>`.
//! - Comments, declarations and processing instructions are recognized so
//!   they can be skipped, not preserved.

use memchr::{memchr2, memmem};

use input::{
    MatchResult, RawTextClose, TagEndScan, entity_name_len, find_rawtext_close_tag,
    match_ascii_prefix, starts_with_ignore_ascii_case, tag_name_len,
};
use states::{RawTextKind, TokenizerState};
use tag::parse_start_tag_tail;

mod emit;
mod input;
mod states;
mod tag;
mod token;

pub use token::Token;

/// Streaming tokenizer result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizeResult {
    /// Input was consumed or tokens were produced.
    Progress,
    /// Nothing could be consumed; the buffered suffix needs more input.
    NeedMoreInput,
    /// `finish()` has run; no further input is accepted.
    Finished,
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Progress,
    NeedMoreInput,
}

#[derive(Debug)]
pub struct Tokenizer {
    state: TokenizerState,
    buffer: String,
    cursor: usize,
    tokens: Vec<Token>,
    end_of_stream: bool,
    stats: TokenizerStats,
    /// Bytes past the cursor already searched for a terminator.
    scanned: usize,
    tag_scan: TagEndScan,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: TokenizerState::Data,
            buffer: String::new(),
            cursor: 0,
            tokens: Vec::new(),
            end_of_stream: false,
            stats: TokenizerStats::default(),
            scanned: 0,
            tag_scan: TagEndScan::default(),
        }
    }

    /// Append a chunk and tokenize as far as the buffered input allows.
    ///
    /// Tokens accumulate until drained with [`Tokenizer::next_batch`].
    pub fn push_str(&mut self, chunk: &str) -> TokenizeResult {
        assert!(
            !self.end_of_stream,
            "Tokenizer::push_str called after finish(); this violates end-of-stream contract"
        );
        self.compact();
        self.buffer.push_str(chunk);
        self.run()
    }

    /// Mark end of input. Whatever is still buffered could not be completed
    /// and is emitted as literal text.
    pub fn finish(&mut self) -> TokenizeResult {
        if self.end_of_stream {
            return TokenizeResult::Finished;
        }
        self.end_of_stream = true;
        let end = self.buffer.len();
        if self.cursor < end {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "markup.tokenizer",
                "finish with {} unconsumed bytes in state {:?}",
                end - self.cursor,
                self.state
            );
            self.emit_text_range(self.cursor, end);
            self.cursor = end;
        }
        TokenizeResult::Finished
    }

    /// Drain the tokens produced so far.
    pub fn next_batch(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.tokens)
    }

    /// Bytes buffered but not yet consumed.
    pub fn pending_len(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    fn compact(&mut self) {
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    fn run(&mut self) -> TokenizeResult {
        let initial_cursor = self.cursor;
        let initial_tokens = self.tokens.len();
        loop {
            self.stats.steps = self.stats.steps.saturating_add(1);
            match self.step() {
                Step::Progress => {}
                Step::NeedMoreInput => break,
            }
        }
        if self.cursor != initial_cursor || self.tokens.len() != initial_tokens {
            TokenizeResult::Progress
        } else {
            TokenizeResult::NeedMoreInput
        }
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "markup.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.cursor
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn rest(&self) -> &[u8] {
        &self.buffer.as_bytes()[self.cursor..]
    }

    fn step(&mut self) -> Step {
        let before = self.cursor;
        let step = match self.state {
            TokenizerState::Data => self.step_data(),
            TokenizerState::RawText(kind) => self.step_rawtext(kind),
        };
        if self.cursor != before {
            self.scanned = 0;
            self.tag_scan = TagEndScan::default();
        }
        step
    }

    /// Offset of `needle` in the construct at the cursor, searching from
    /// `from` or from where the previous push stopped.
    fn find_terminator(&mut self, from: usize, needle: &[u8]) -> Option<usize> {
        let rest = &self.buffer.as_bytes()[self.cursor..];
        // Back up far enough to catch a needle split across pushes.
        let start = from.max(self.scanned.saturating_sub(needle.len() - 1));
        match memmem::find(&rest[start..], needle) {
            Some(rel) => Some(start + rel),
            None => {
                self.scanned = rest.len();
                None
            }
        }
    }

    fn step_data(&mut self) -> Step {
        let rest = self.rest();
        if rest.is_empty() {
            return Step::NeedMoreInput;
        }
        match memchr2(b'<', b'&', rest) {
            Some(0) if rest[0] == b'<' => self.step_markup(),
            Some(0) => self.step_reference(),
            Some(run) => {
                self.emit_text_range(self.cursor, self.cursor + run);
                self.cursor += run;
                Step::Progress
            }
            None => {
                let end = self.buffer.len();
                self.emit_text_range(self.cursor, end);
                self.cursor = end;
                Step::Progress
            }
        }
    }

    /// Cursor is on `<`.
    fn step_markup(&mut self) -> Step {
        // Prefix-first dispatch keeps chunk-boundary behavior deterministic.
        let dispatch: [(&[u8], fn(&mut Self) -> Step); 4] = [
            (b"</", Self::step_end_tag),
            (b"<!--", Self::step_comment),
            (b"<!", Self::step_declaration),
            (b"<?", Self::step_processing_instruction),
        ];
        for (prefix, handler) in dispatch {
            match match_ascii_prefix(self.rest(), prefix) {
                MatchResult::Matched => return handler(self),
                MatchResult::NeedMoreInput => return Step::NeedMoreInput,
                MatchResult::NoMatch => {}
            }
        }

        match self.rest().get(1) {
            None => Step::NeedMoreInput,
            Some(b) if b.is_ascii_alphabetic() => self.step_start_tag(),
            Some(_) => {
                // Not a tag opener: `<` is text.
                self.emit_text_owned("<");
                self.cursor += 1;
                Step::Progress
            }
        }
    }

    fn step_start_tag(&mut self) -> Step {
        let rest = &self.buffer.as_bytes()[self.cursor..];
        let name_end = 1 + tag_name_len(&rest[1..]);
        let Some(gt) = self.tag_scan.find(rest, name_end) else {
            return Step::NeedMoreInput;
        };

        let start = self.cursor;
        let name = self.buffer[start + 1..start + name_end].to_ascii_lowercase();
        let (attributes, self_closing) =
            parse_start_tag_tail(&self.buffer[start + name_end..start + gt]);
        self.cursor = start + gt + 1;

        let raw_text = if self_closing {
            None
        } else {
            RawTextKind::for_tag(&name)
        };
        self.emit_token(Token::StartTag {
            name,
            attributes,
            self_closing,
        });
        if let Some(kind) = raw_text {
            self.transition_to(TokenizerState::RawText(kind));
        }
        Step::Progress
    }

    fn step_end_tag(&mut self) -> Step {
        let Some(gt) = self.find_terminator(2, b">") else {
            return Step::NeedMoreInput;
        };
        let name_len = tag_name_len(&self.rest()[2..gt]);
        let start = self.cursor;
        self.cursor = start + gt + 1;
        if name_len == 0 {
            // `</>` and `</ junk>` carry no tag name and are dropped.
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "markup.tokenizer", "dropping nameless end tag @{start}");
            return Step::Progress;
        }
        let name = self.buffer[start + 2..start + 2 + name_len].to_ascii_lowercase();
        self.emit_token(Token::EndTag { name });
        Step::Progress
    }

    fn step_comment(&mut self) -> Step {
        const OPEN: usize = b"<!--".len();
        let Some(close) = self.find_terminator(OPEN, b"-->") else {
            return Step::NeedMoreInput;
        };
        let start = self.cursor;
        let text = self.buffer[start + OPEN..start + close].to_string();
        self.cursor = start + close + b"-->".len();
        self.emit_token(Token::Comment(text));
        Step::Progress
    }

    fn step_declaration(&mut self) -> Step {
        const OPEN: usize = b"<!".len();
        let Some(gt) = self.find_terminator(OPEN, b">") else {
            return Step::NeedMoreInput;
        };
        let start = self.cursor;
        let body = &self.buffer[start + OPEN..start + gt];
        let token = if starts_with_ignore_ascii_case(body.as_bytes(), b"doctype") {
            Token::Doctype(body["doctype".len()..].trim().to_string())
        } else {
            // Any other `<!...>` is a bogus comment.
            Token::Comment(body.to_string())
        };
        self.cursor = start + gt + 1;
        self.emit_token(token);
        Step::Progress
    }

    fn step_processing_instruction(&mut self) -> Step {
        const OPEN: usize = b"<?".len();
        let Some(gt) = self.find_terminator(OPEN, b">") else {
            return Step::NeedMoreInput;
        };
        let start = self.cursor;
        let body = self.buffer[start + OPEN..start + gt].to_string();
        self.cursor = start + gt + 1;
        self.emit_token(Token::ProcessingInstruction(body));
        Step::Progress
    }

    /// Cursor is on `&`.
    ///
    /// References end at `;` (consumed) or at the first byte that cannot
    /// continue them (not consumed). Reaching the end of the buffer means the
    /// reference may still continue, so the tokenizer waits.
    fn step_reference(&mut self) -> Step {
        let rest = self.rest();
        let (payload_start, payload_len, numeric) = match rest.get(1) {
            None => return Step::NeedMoreInput,
            Some(b'#') => {
                let len = rest[2..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric())
                    .count();
                (2, len, true)
            }
            Some(_) => (1, entity_name_len(&rest[1..]), false),
        };
        let payload_end = payload_start + payload_len;
        if payload_end == rest.len() {
            return Step::NeedMoreInput;
        }
        if payload_len == 0 {
            // Not a reference: `&` is text.
            self.emit_text_owned("&");
            self.cursor += 1;
            return Step::Progress;
        }

        let consumed = if rest[payload_end] == b';' {
            payload_end + 1
        } else {
            payload_end
        };
        let start = self.cursor;
        let payload = self.buffer[start + payload_start..start + payload_end].to_string();
        self.cursor = start + consumed;
        self.emit_token(if numeric {
            Token::NumericRef(payload)
        } else {
            Token::EntityRef(payload)
        });
        Step::Progress
    }

    fn step_rawtext(&mut self, kind: RawTextKind) -> Step {
        let start = self.cursor;
        if start == self.buffer.len() {
            return Step::NeedMoreInput;
        }
        match find_rawtext_close_tag(self.rest(), kind.close_tag()) {
            RawTextClose::Found { start: close, end } => {
                self.emit_text_range(start, start + close);
                self.emit_token(Token::EndTag {
                    name: kind.name().to_string(),
                });
                self.cursor = start + end;
                self.transition_to(TokenizerState::Data);
                Step::Progress
            }
            RawTextClose::Pending { safe: 0 } => Step::NeedMoreInput,
            RawTextClose::Pending { safe } => {
                self.emit_text_range(start, start + safe);
                self.cursor = start + safe;
                Step::Progress
            }
        }
    }
}

/// Tokenize a complete string in one push.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.push_str(input);
    tokenizer.finish();
    tokenizer.next_batch()
}

#[cfg(test)]
mod tests;
