//! Scoped ownership of a page source.

use std::io;

use crate::resolver::PageSource;

/// Releases the wrapped source exactly once: explicitly through
/// [`SourceGuard::release`], or on drop when the load bailed out early.
pub(crate) struct SourceGuard {
    page: String,
    source: Option<Box<dyn PageSource>>,
}

impl SourceGuard {
    pub(crate) fn new(page: &str, source: Box<dyn PageSource>) -> Self {
        Self {
            page: page.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.source.as_mut() {
            Some(source) => source.next_chunk(),
            None => Ok(None),
        }
    }

    pub(crate) fn release(mut self) -> io::Result<()> {
        match self.source.take() {
            Some(mut source) => source.release(),
            None => Ok(()),
        }
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        let Some(mut source) = self.source.take() else {
            return;
        };
        // The load already failed; that error wins over this one.
        if let Err(err) = source.release() {
            log::warn!(
                target: "pages.cache",
                "failed to release source of page `{}`: {err}",
                self.page
            );
        }
    }
}
