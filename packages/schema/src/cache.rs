use crate::document::SchemaDocument;
use std::collections::HashMap;
use std::sync::Arc;

/// Loaded schemas by URL
///
/// Entries live until explicitly evicted or cleared; there is no expiry.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<String, Arc<SchemaDocument>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<SchemaDocument>> {
        self.entries.get(url).cloned()
    }

    pub fn put(&mut self, document: SchemaDocument) -> Arc<SchemaDocument> {
        let document = Arc::new(document);
        self.entries
            .insert(document.url.clone(), Arc::clone(&document));
        document
    }

    pub fn evict(&mut self, url: &str) -> Option<Arc<SchemaDocument>> {
        self.entries.remove(url)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
