//! Page serving on top of the `markup` parser.
//!
//! [`Pages`] is the entry point: it looks a page up in its [`PageCache`]
//! (parsing it through the injected [`PageResolver`] on first use) and hands
//! the shared document to a [`PageRender`] hook together with the caller's
//! output sink and request context.

mod cache;
mod error;
mod guard;
mod render;
mod resolver;

use std::io::Write;
use std::sync::Arc;

pub use cache::PageCache;
pub use error::PageError;
pub use render::{MarkupRender, NoopRender, PageRender};
pub use resolver::{DirResolver, PageResolver, PageSource, StaticResolver};

#[derive(Debug)]
pub struct Pages<H = NoopRender> {
    cache: PageCache,
    hook: H,
}

impl Pages<NoopRender> {
    pub fn new(resolver: Arc<dyn PageResolver>) -> Self {
        Self::from_cache(PageCache::new(resolver))
    }

    pub fn from_cache(cache: PageCache) -> Self {
        Self {
            cache,
            hook: NoopRender,
        }
    }
}

impl<H> Pages<H> {
    /// Replace the render hook, keeping the cache.
    pub fn with_hook<R>(self, hook: R) -> Pages<R> {
        Pages {
            cache: self.cache,
            hook,
        }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Render page `name` into `out` for a request described by `ctx`.
    pub fn render_page<W, C>(&self, name: &str, out: &mut W, ctx: &C) -> Result<(), PageError>
    where
        W: Write,
        C: ?Sized,
        H: PageRender<C>,
    {
        let Some(doc) = self.cache.get(name)? else {
            return Err(PageError::NotFound {
                page: name.to_string(),
            });
        };
        self.hook.render(&doc, out, ctx).map_err(PageError::Render)
    }
}
