//! Cached file-corpus retriever.

use crate::Corpus;
use async_trait::async_trait;
use promptweave_error::PromptweaveResult;
use promptweave_interface::ExampleRetriever;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Retrieves examples from directories of text files.
///
/// Each source directory is loaded at most once per retriever; the cache is
/// owned by the retriever and lives exactly as long as it does.
///
/// # Examples
///
/// ```no_run
/// use promptweave_interface::ExampleRetriever;
/// use promptweave_retrieval::FileCorpusRetriever;
///
/// # async fn run() -> promptweave_error::PromptweaveResult<()> {
/// let retriever = FileCorpusRetriever::new();
/// let examples = retriever.retrieve("robot stories", 3, "corpus/").await?;
/// for example in examples {
///     println!("{example}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FileCorpusRetriever {
    cache: RwLock<HashMap<PathBuf, Arc<Corpus>>>,
}

impl FileCorpusRetriever {
    /// Create a retriever with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The corpus for `source`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns error if the corpus cannot be loaded.
    pub async fn corpus(&self, source: &Path) -> PromptweaveResult<Arc<Corpus>> {
        if let Some(corpus) = self.cache.read().await.get(source) {
            tracing::trace!(source = %source.display(), "Corpus cache hit");
            return Ok(Arc::clone(corpus));
        }

        let mut cache = self.cache.write().await;
        if let Some(corpus) = cache.get(source) {
            return Ok(Arc::clone(corpus));
        }
        let corpus = Arc::new(Corpus::load(source).await?);
        cache.insert(source.to_path_buf(), Arc::clone(&corpus));
        Ok(corpus)
    }

    /// Drop the cached corpus for `source`; returns whether one was cached.
    pub async fn evict(&self, source: impl AsRef<Path>) -> bool {
        self.cache.write().await.remove(source.as_ref()).is_some()
    }

    /// Drop every cached corpus.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    /// Source directories currently cached.
    pub async fn cached_sources(&self) -> Vec<PathBuf> {
        let mut sources: Vec<_> = self.cache.read().await.keys().cloned().collect();
        sources.sort();
        sources
    }
}

#[async_trait]
impl ExampleRetriever for FileCorpusRetriever {
    #[tracing::instrument(skip(self))]
    async fn retrieve(
        &self,
        query: &str,
        count: usize,
        source: &str,
    ) -> PromptweaveResult<Vec<String>> {
        let corpus = self.corpus(Path::new(source)).await?;
        let examples: Vec<String> = corpus
            .search(query, count)
            .into_iter()
            .map(|doc| doc.text().clone())
            .collect();
        tracing::debug!(found = examples.len(), "Retrieved examples");
        Ok(examples)
    }
}
