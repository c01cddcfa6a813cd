//! Byte-level scanning helpers over the tokenizer buffer.
//!
//! Every helper only splits at ASCII bytes, and ASCII bytes never occur inside
//! a multi-byte UTF-8 sequence, so returned offsets are char boundaries.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MatchResult {
    Matched,
    /// `hay` is a strict prefix of `needle`; more input decides.
    NeedMoreInput,
    NoMatch,
}

pub(super) fn match_ascii_prefix(hay: &[u8], needle: &[u8]) -> MatchResult {
    if hay.len() >= needle.len() {
        if &hay[..needle.len()] == needle {
            MatchResult::Matched
        } else {
            MatchResult::NoMatch
        }
    } else if needle.starts_with(hay) {
        MatchResult::NeedMoreInput
    } else {
        MatchResult::NoMatch
    }
}

pub(super) fn starts_with_ignore_ascii_case(hay: &[u8], needle: &[u8]) -> bool {
    hay.len() >= needle.len() && hay[..needle.len()].eq_ignore_ascii_case(needle)
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b':' | b'_')
}

/// Length of the tag name at the start of `bytes` (`[A-Za-z][-.A-Za-z0-9:_]*`).
pub(super) fn tag_name_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() => {
            1 + bytes[1..].iter().take_while(|b| is_tag_name_byte(**b)).count()
        }
        _ => 0,
    }
}

/// Length of an entity name at the start of `bytes` (`[A-Za-z][-.A-Za-z0-9]*`).
pub(super) fn entity_name_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() => {
            1 + bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || matches!(**b, b'-' | b'.'))
                .count()
        }
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum TagScanState {
    #[default]
    Between,
    AfterEquals,
    Quoted(u8),
    Unquoted,
}

/// Search for the `>` closing a start tag, resumable across pushes.
///
/// Quotes only count in attribute-value position (right after `=`), which
/// keeps this scan in agreement with the attribute parser: `it's` as an
/// unquoted value does not open a quoted run. Offsets are relative to the
/// `<` of the tag, so they stay valid when the buffer is compacted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct TagEndScan {
    pos: usize,
    state: TagScanState,
}

impl TagEndScan {
    /// Offset of the closing `>`, scanning attributes from `from` on or from
    /// wherever the previous call stopped.
    pub(super) fn find(&mut self, bytes: &[u8], from: usize) -> Option<usize> {
        let start = self.pos.max(from);
        let mut state = self.state;
        for (i, &b) in bytes.iter().enumerate().skip(start) {
            state = match state {
                TagScanState::Between => match b {
                    b'>' => return Some(i),
                    b'=' => TagScanState::AfterEquals,
                    _ => TagScanState::Between,
                },
                TagScanState::AfterEquals => match b {
                    b'>' => return Some(i),
                    b'"' | b'\'' => TagScanState::Quoted(b),
                    _ if b.is_ascii_whitespace() => TagScanState::AfterEquals,
                    _ => TagScanState::Unquoted,
                },
                TagScanState::Quoted(quote) if b == quote => TagScanState::Between,
                TagScanState::Quoted(quote) => TagScanState::Quoted(quote),
                TagScanState::Unquoted => match b {
                    b'>' => return Some(i),
                    _ if b.is_ascii_whitespace() => TagScanState::Between,
                    _ => TagScanState::Unquoted,
                },
            };
        }
        self.pos = bytes.len().max(start);
        self.state = state;
        None
    }
}

/// Outcome of looking for a raw-text close tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum RawTextClose {
    /// Close tag spans `start..end` (end is past `>`).
    Found { start: usize, end: usize },
    /// No close tag yet; `hay[..safe]` can never be part of one.
    Pending { safe: usize },
}

/// Scan for `close_tag` (e.g. `</script`) followed by optional ASCII
/// whitespace and `>`, case-insensitively.
pub(super) fn find_rawtext_close_tag(hay: &[u8], close_tag: &[u8]) -> RawTextClose {
    debug_assert!(close_tag.starts_with(b"</") && close_tag.is_ascii());
    let n = close_tag.len();
    let mut last_lt = None;
    let mut i = 0;
    while let Some(rel) = memchr::memchr(b'<', &hay[i..]) {
        let at = i + rel;
        last_lt = Some(at);
        if starts_with_ignore_ascii_case(&hay[at..], close_tag) {
            let mut k = at + n;
            while k < hay.len() && hay[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < hay.len() && hay[k] == b'>' {
                return RawTextClose::Found {
                    start: at,
                    end: k + 1,
                };
            }
        }
        i = at + 1;
    }

    // Only a trailing `<` run that may still grow into the close tag is held back.
    let safe = match last_lt {
        Some(at) if could_complete_close_tag(&hay[at..], close_tag) => at,
        _ => hay.len(),
    };
    RawTextClose::Pending { safe }
}

fn could_complete_close_tag(tail: &[u8], close_tag: &[u8]) -> bool {
    if tail.len() < close_tag.len() {
        return close_tag[..tail.len()].eq_ignore_ascii_case(tail);
    }
    starts_with_ignore_ascii_case(tail, close_tag)
        && tail[close_tag.len()..]
            .iter()
            .all(|b| b.is_ascii_whitespace())
}
