//! Parse failures surfaced by the tree builder.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// `&#...;` whose payload is not a decimal/hex number naming a Unicode
    /// scalar value.
    #[error("malformed character reference `&#{payload};`")]
    MalformedReference { payload: String },

    /// Strict mode only: an end tag that does not name the open element.
    #[error("end tag `</{found}>` does not close open element `<{expected}>`")]
    MismatchedEndTag { expected: String, found: String },

    /// Strict mode only: an end tag with no element left to close.
    #[error("end tag `</{name}>` has no open element")]
    UnexpectedEndTag { name: String },

    /// Strict mode only: input ended while an element was still open.
    #[error("element `<{name}>` is still open at end of input")]
    UnclosedElement { name: String },
}
