//! Start-tag attribute parsing.

use crate::dom::Attribute;
use crate::entities::decode_attribute_value;

/// Parse everything between the tag name and the closing `>`.
///
/// Returns the attributes in encounter order and whether the tag ended in
/// `/` (as in `<br/>`). Names are ASCII-lowercased; values may be double-,
/// single- or unquoted and are reference-decoded. A name without `=` yields
/// `None`, `name=` with nothing after it yields `Some("")`.
pub(super) fn parse_start_tag_tail(tail: &str) -> (Vec<Attribute>, bool) {
    let bytes = tail.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut self_closing = false;
    let mut i = 0usize;

    let skip_whitespace = |i: &mut usize| {
        while *i < len && bytes[*i].is_ascii_whitespace() {
            *i += 1;
        }
    };

    loop {
        skip_whitespace(&mut i);
        if i >= len {
            break;
        }

        if bytes[i] == b'/' {
            i += 1;
            // Only a trailing slash marks the tag self-closing.
            self_closing = tail[i..].trim_ascii().is_empty();
            continue;
        }
        self_closing = false;

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/'
        {
            i += 1;
        }
        if name_start == i {
            // Stray `=`: skip it.
            i += 1;
            continue;
        }
        let name = tail[name_start..i].to_ascii_lowercase();

        skip_whitespace(&mut i);
        let mut value = None;
        if i < len && bytes[i] == b'=' {
            i += 1;
            skip_whitespace(&mut i);
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                value = Some(decode_attribute_value(&tail[value_start..i]));
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = Some(decode_attribute_value(&tail[value_start..i]));
            }
        }

        attributes.push((name, value));
    }

    (attributes, self_closing)
}
