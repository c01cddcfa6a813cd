//! Parsed-page cache.
//!
//! Each page name owns a slot: an `Arc<Mutex<Option<Arc<Document>>>>`. A miss
//! holds the slot's lock while the page is resolved and parsed, so concurrent
//! requests for the same page wait for that one parse while other pages load
//! in parallel. The map lock is only held long enough to find or create a
//! slot.
//!
//! A parsed page is stored once and never replaced or evicted. Missing pages
//! and failed parses are not remembered; the next request tries again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use markup::{Document, IncrementalParser, ParserConfig};

use crate::error::PageError;
use crate::guard::SourceGuard;
use crate::resolver::PageResolver;

type Slot = Arc<Mutex<Option<Arc<Document>>>>;

pub struct PageCache {
    resolver: Arc<dyn PageResolver>,
    parser_config: ParserConfig,
    slots: Mutex<HashMap<String, Slot>>,
    ready: AtomicUsize,
}

impl PageCache {
    pub fn new(resolver: Arc<dyn PageResolver>) -> Self {
        Self {
            resolver,
            parser_config: ParserConfig::default(),
            slots: Mutex::new(HashMap::new()),
            ready: AtomicUsize::new(0),
        }
    }

    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// The cached document for `name`, loading it on first use.
    pub fn get(&self, name: &str) -> Result<Option<Arc<Document>>, PageError> {
        let slot = self.slot(name);
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(doc) = entry.as_ref() {
            log::trace!(target: "pages.cache", "hit `{name}`");
            return Ok(Some(Arc::clone(doc)));
        }

        log::debug!(target: "pages.cache", "miss `{name}`, loading");
        match self.load(name) {
            Ok(Some(doc)) => {
                let doc = Arc::new(doc);
                *entry = Some(Arc::clone(&doc));
                self.ready.fetch_add(1, Ordering::Relaxed);
                Ok(Some(doc))
            }
            other => {
                drop(entry);
                self.forget_slot(name, &slot);
                other.map(|_| None)
            }
        }
    }

    /// Resolve and parse `name` without touching the cache.
    ///
    /// The page source is released exactly once whether parsing succeeds or
    /// not. A release failure after a successful parse is reported as
    /// [`PageError::Release`]; after a failed parse it is logged and the
    /// parse error is returned.
    pub fn load(&self, name: &str) -> Result<Option<Document>, PageError> {
        let read_error = |source| PageError::Read {
            page: name.to_string(),
            source,
        };

        let Some(source) = self.resolver.resolve(name).map_err(read_error)? else {
            log::debug!(target: "pages.cache", "page `{name}` not found");
            return Ok(None);
        };
        let mut guard = SourceGuard::new(name, source);

        let mut parser = IncrementalParser::with_config(self.parser_config);
        let mut chunks = 0usize;
        while let Some(chunk) = guard.next_chunk().map_err(read_error)? {
            parser.feed_bytes(&chunk)?;
            chunks += 1;
        }
        let doc = parser.close()?;

        guard.release().map_err(|source| PageError::Release {
            page: name.to_string(),
            source,
        })?;
        log::debug!(
            target: "pages.cache",
            "parsed `{name}` from {chunks} chunk(s) into {} top-level node(s)",
            doc.children.len()
        );
        Ok(Some(doc))
    }

    /// Whether `name` is parsed and stored. A page still loading is not.
    pub fn contains(&self, name: &str) -> bool {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(name) {
                Some(slot) => Arc::clone(slot),
                None => return false,
            }
        };
        match slot.try_lock() {
            Ok(entry) => entry.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => false,
        }
    }

    /// Number of stored pages.
    pub fn len(&self) -> usize {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, name: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(name.to_string()).or_default())
    }

    /// Drop an empty slot nobody else is waiting on.
    fn forget_slot(&self, name: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only handed out under the map lock: two references mean
        // the map's and ours.
        if let Some(current) = slots.get(name)
            && Arc::ptr_eq(current, slot)
            && Arc::strong_count(slot) == 2
        {
            slots.remove(name);
        }
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("parser_config", &self.parser_config)
            .field("ready", &self.len())
            .finish_non_exhaustive()
    }
}
