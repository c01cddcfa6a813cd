//! Hooks that turn a cached document into output.

use std::io::{self, Write};

use markup::{Document, RenderConfig};

/// Writes a page for one request.
///
/// `ctx` is whatever the caller passes to [`crate::Pages::render_page`]; the
/// cache never looks at it.
pub trait PageRender<C: ?Sized> {
    fn render(&self, doc: &Document, out: &mut dyn Write, ctx: &C) -> io::Result<()>;
}

/// Writes nothing. Template substitution plugs in here.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRender;

impl<C: ?Sized> PageRender<C> for NoopRender {
    fn render(&self, _doc: &Document, _out: &mut dyn Write, _ctx: &C) -> io::Result<()> {
        Ok(())
    }
}

/// Serializes the document as markup.
#[derive(Clone, Debug, Default)]
pub struct MarkupRender {
    pub config: RenderConfig,
}

impl MarkupRender {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl<C: ?Sized> PageRender<C> for MarkupRender {
    fn render(&self, doc: &Document, out: &mut dyn Write, ctx: &C) -> io::Result<()> {
        doc.render_with(out, ctx, &self.config)
    }
}

impl<C: ?Sized, F> PageRender<C> for F
where
    F: Fn(&Document, &mut dyn Write, &C) -> io::Result<()>,
{
    fn render(&self, doc: &Document, out: &mut dyn Write, ctx: &C) -> io::Result<()> {
        self(doc, out, ctx)
    }
}
