//! Output configuration and low-level writers shared by the node `render`
//! implementations.

use std::io::{self, Write};

/// How text and attribute values are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Escape {
    /// Write decoded text verbatim. A text node containing `<` or `&` will
    /// corrupt the output; this matches how pages were always served.
    #[default]
    None,
    /// Escape `&`, `<`, `>` and `"` in text and attribute values.
    Minimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub escape: Escape,
}

impl RenderConfig {
    pub fn escaped() -> Self {
        Self {
            escape: Escape::Minimal,
        }
    }
}

pub(crate) fn write_text<W: Write + ?Sized>(
    out: &mut W,
    text: &str,
    escape: Escape,
) -> io::Result<()> {
    match escape {
        Escape::None => out.write_all(text.as_bytes()),
        Escape::Minimal => write_escaped(out, text),
    }
}

fn write_escaped<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    let bytes = text.as_bytes();
    let mut copy_start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let replacement: &[u8] = match b {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'"' => b"&quot;",
            _ => continue,
        };
        // Only ASCII bytes are replaced, so `i` is always a char boundary.
        out.write_all(&bytes[copy_start..i])?;
        out.write_all(replacement)?;
        copy_start = i + 1;
    }
    out.write_all(&bytes[copy_start..])
}
