//! Character reference decoding for text and attribute values.
//!
//! Numeric references in text are decoded by the tree builder; named
//! references stay as `EntityRef` nodes. Attribute values decode both.

/// Decode the payload of a numeric character reference (`&#...;`).
///
/// `payload` is everything between `&#` and the terminator: `65`, `x41` or
/// `X41`. Returns `None` when the digits are missing, not numeric for their
/// base, overflow `u32`, or do not name a Unicode scalar value.
pub(crate) fn decode_numeric_reference(payload: &str) -> Option<char> {
    let (digits, radix) = match payload.as_bytes().first() {
        Some(b'x' | b'X') => (&payload[1..], 16),
        Some(_) => (payload, 10),
        None => return None,
    };
    let valid = !digits.is_empty()
        && digits.bytes().all(|b| {
            if radix == 16 {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        });
    if !valid {
        return None;
    }
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
}

/// Decode references inside an attribute value.
///
/// Contract:
/// - Named references decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric references decoded when semicolon-terminated and valid:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex).
/// - Anything else (unknown names, missing semicolons, invalid scalars) is
///   left unchanged.
///
/// Text content does not go through here: the tree builder keeps named
/// references as `EntityRef` nodes and fails on malformed numeric ones.
pub(crate) fn decode_attribute_value(s: &str) -> String {
    const NAMED: [(&[u8], char); 6] = [
        (b"&amp;", '&'),
        (b"&lt;", '<'),
        (b"&gt;", '>'),
        (b"&quot;", '"'),
        (b"&apos;", '\''),
        (b"&nbsp;", '\u{00A0}'),
    ];

    let bytes = s.as_bytes();
    if memchr::memchr(b'&', bytes).is_none() {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copy_start = 0;

    'scan: while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }

        // Flush bytes up to '&' unchanged (preserves UTF-8).
        out.push_str(&s[copy_start..i]);

        for (pattern, ch) in NAMED {
            if bytes[i..].starts_with(pattern) {
                out.push(ch);
                i += pattern.len();
                copy_start = i;
                continue 'scan;
            }
        }

        if bytes[i..].starts_with(b"&#")
            && let Some(rel) = memchr::memchr(b';', &bytes[i + 2..])
        {
            let end = i + 2 + rel;
            if let Some(ch) = decode_numeric_reference(&s[i + 2..end]) {
                out.push(ch);
                i = end + 1;
                copy_start = i;
                continue;
            }
        }

        // Keep '&' as-is.
        out.push('&');
        i += 1;
        copy_start = i;
    }

    out.push_str(&s[copy_start..]);
    out
}
