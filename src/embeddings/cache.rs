//! In-process query embedding cache

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::preprocess_text_for_embedding;
use crate::discovery::EmbeddingProvider;
use crate::errors::Result;

/// Memoizes embeddings by normalized text.
///
/// Embeddings are a pure function of text for a fixed model, so a hit is
/// indistinguishable from a fresh provider call. When the cache is full an
/// arbitrary entry is evicted.
///
/// `capacity` is a soft bound: concurrent misses may overshoot it briefly,
/// and the next insert evicts back down to it.
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: DashMap<String, Arc<Vec<f32>>>,
    capacity: usize,
}

impl CachedEmbeddingProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, capacity: usize) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn insert(&self, key: String, embedding: Arc<Vec<f32>>) {
        while self.cache.len() >= self.capacity {
            // Clone the key out first; removing while holding an iterator guard deadlocks
            let victim = self.cache.iter().next().map(|entry| entry.key().clone());
            match victim {
                Some(victim) => {
                    self.cache.remove(&victim);
                }
                None => break,
            }
        }
        self.cache.insert(key, embedding);
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let key = preprocess_text_for_embedding(text)?;

        if let Some(hit) = self.cache.get(&key) {
            debug!("Embedding cache hit ({} entries)", self.cache.len());
            return Ok(hit.value().as_ref().clone());
        }

        let embedding = self.inner.embed(&key).await?;
        self.insert(key, Arc::new(embedding.clone()));
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
