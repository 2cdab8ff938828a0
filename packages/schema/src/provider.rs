use crate::cache::SchemaCache;
use crate::document::SchemaDocument;
use crate::error::SchemaResult;
use crate::loader::SchemaLoader;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads schemas through a [`SchemaLoader`], memoized in a [`SchemaCache`]
pub struct SchemaProvider {
    loader: Box<dyn SchemaLoader>,
    cache: SchemaCache,
}

impl SchemaProvider {
    pub fn new(loader: impl SchemaLoader + 'static) -> Self {
        Self::with_cache(loader, SchemaCache::new())
    }

    pub fn with_cache(loader: impl SchemaLoader + 'static, cache: SchemaCache) -> Self {
        Self {
            loader: Box::new(loader),
            cache,
        }
    }

    /// The schema at `url`, fetched at most once until reloaded
    pub fn load_schema(&mut self, url: &str) -> SchemaResult<Arc<SchemaDocument>> {
        if let Some(document) = self.cache.get(url) {
            debug!(url, "Schema cache hit");
            return Ok(document);
        }
        self.fetch(url)
    }

    /// Drop any cached copy and fetch `url` again
    ///
    /// A failed reload leaves the cache without an entry for `url`.
    pub fn reload(&mut self, url: &str) -> SchemaResult<Arc<SchemaDocument>> {
        self.cache.evict(url);
        self.fetch(url)
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut SchemaCache {
        &mut self.cache
    }

    fn fetch(&mut self, url: &str) -> SchemaResult<Arc<SchemaDocument>> {
        let text = self.loader.fetch(url)?;
        let document = SchemaDocument::from_text(url, &text)?;
        info!(url, title = document.title().unwrap_or_default(), "Schema loaded");
        Ok(self.cache.put(document))
    }
}
