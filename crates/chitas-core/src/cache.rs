use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::client::TextSource;
use crate::error::ContentError;
use crate::text::TextResponse;

/// Session-scoped memo of text lookups, keyed by the exact reference string.
///
/// Entries are never evicted. Two concurrent misses for the same reference
/// both go to the network; whichever finishes last wins the slot. Clones
/// share the same map, so a clone can be moved into a spawned task.
#[derive(Clone)]
pub struct TextCache {
    source: Arc<dyn TextSource>,
    entries: Arc<Mutex<HashMap<String, TextResponse>>>,
}

impl TextCache {
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get_or_fetch(&self, reference: &str) -> Result<TextResponse, ContentError> {
        if let Some(hit) = self.get(reference) {
            debug!(reference, "text cache hit");
            return Ok(hit);
        }

        let response = self.source.fetch_text(reference).await?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reference.to_string(), response.clone());
        Ok(response)
    }

    pub fn get(&self, reference: &str) -> Option<TextResponse> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .cloned()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
