//! Tokenizer state machine definitions.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    /// Markup, text and references.
    Data,
    /// Unparsed content of `<script>`/`<style>` up to the matching close tag.
    RawText(RawTextKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RawTextKind {
    Script,
    Style,
}

impl RawTextKind {
    pub(crate) fn for_tag(name: &str) -> Option<Self> {
        match name {
            "script" => Some(Self::Script),
            "style" => Some(Self::Style),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
        }
    }

    pub(crate) fn close_tag(self) -> &'static [u8] {
        match self {
            Self::Script => b"</script",
            Self::Style => b"</style",
        }
    }
}
