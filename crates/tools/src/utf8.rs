//! Incremental UTF-8 decoding for page sources that hand out raw byte chunks.
//!
//! Chunk boundaries are arbitrary, so a multi-byte sequence may straddle two
//! chunks. The decoder keeps the incomplete suffix until the next chunk
//! arrives and replaces invalid sequences with U+FFFD so decoding always
//! makes progress.

/// Streaming UTF-8 decoder.
///
/// Invariant: `carry` only ever holds an incomplete prefix of one UTF-8
/// sequence, so it is at most 3 bytes long.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    carry: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back from the last chunk.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Decode `bytes` and append the complete characters to `out`.
    pub fn decode_into(&mut self, out: &mut String, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let mut remaining = bytes;
        while !self.carry.is_empty() && !remaining.is_empty() {
            let expected = utf8_seq_len(self.carry[0]);
            if expected == 0 {
                out.push('\u{FFFD}');
                self.carry.clear();
                break;
            }

            let needed = expected.saturating_sub(self.carry.len());
            if remaining.len() < needed {
                self.carry.extend_from_slice(remaining);
                return;
            }

            // Complete the carried sequence with at most 3 bytes of this chunk.
            let mut scratch = [0u8; 4];
            let held = self.carry.len();
            scratch[..held].copy_from_slice(&self.carry);
            scratch[held..held + needed].copy_from_slice(&remaining[..needed]);
            self.carry.clear();
            self.decode_run(out, &scratch[..held + needed]);
            remaining = &remaining[needed..];
        }

        if !remaining.is_empty() {
            self.decode_run(out, remaining);
        }
    }

    /// Convenience wrapper returning the decoded text of one chunk.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        self.decode_into(&mut out, bytes);
        out
    }

    /// Flush whatever is still carried (lossy) so the stream is never
    /// silently truncated at end of input.
    pub fn finish_into(&mut self, out: &mut String) {
        if self.carry.is_empty() {
            return;
        }
        out.push_str(&String::from_utf8_lossy(&self.carry));
        self.carry.clear();
    }

    fn decode_run(&mut self, out: &mut String, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match std::str::from_utf8(bytes) {
                Ok(s) => {
                    out.push_str(s);
                    return;
                }
                Err(e) => {
                    let (valid, rest) = bytes.split_at(e.valid_up_to());
                    if let Ok(prefix) = std::str::from_utf8(valid) {
                        out.push_str(prefix);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push('\u{FFFD}');
                            bytes = &rest[len..];
                        }
                        None => {
                            self.carry.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
