//! In-memory corpus and similarity ranking.

use promptweave_error::{PromptweaveResult, RetrievalError, RetrievalErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File extensions that are loaded into a corpus.
const EXTENSIONS: &[&str] = &["txt", "md"];

/// One example document.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Document {
    /// Source file
    path: PathBuf,
    /// Full text
    text: String,
    #[getter(skip)]
    terms: HashMap<String, f64>,
    #[getter(skip)]
    norm: f64,
}

impl Document {
    /// Index `text` for similarity search.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let terms = term_frequencies(&text);
        let norm = magnitude(&terms);
        Self {
            path: path.into(),
            text,
            terms,
            norm,
        }
    }

    /// Cosine similarity against a query's term frequencies.
    fn similarity(&self, query: &HashMap<String, f64>, query_norm: f64) -> f64 {
        if self.norm == 0.0 || query_norm == 0.0 {
            return 0.0;
        }
        let dot: f64 = query
            .iter()
            .filter_map(|(term, weight)| self.terms.get(term).map(|w| w * weight))
            .sum();
        dot / (self.norm * query_norm)
    }
}

/// The documents of one source directory, in file-name order.
#[derive(Debug, Clone, Default, PartialEq, derive_getters::Getters)]
pub struct Corpus {
    /// Indexed documents
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from already-loaded documents.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Load every `.txt`/`.md` file directly under `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory does not exist or a file cannot be
    /// read.
    #[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
    pub async fn load(dir: &Path) -> PromptweaveResult<Self> {
        let io_error = |path: &Path, e: std::io::Error| {
            RetrievalError::new(RetrievalErrorKind::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        };

        if !tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
            return Err(RetrievalError::new(RetrievalErrorKind::CorpusNotFound(
                dir.display().to_string(),
            ))
            .into());
        }

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| io_error(dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
            let path = entry.path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if wanted && is_file {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| io_error(&path, e))?;
            documents.push(Document::new(path, text));
        }

        tracing::debug!(documents = documents.len(), "Loaded corpus");
        Ok(Self { documents })
    }

    /// Up to `count` documents most similar to `query`, best first.
    ///
    /// Documents sharing no words with the query are never returned; equal
    /// scores keep corpus order.
    pub fn search(&self, query: &str, count: usize) -> Vec<&Document> {
        let terms = term_frequencies(query);
        let norm = magnitude(&terms);

        let mut scored: Vec<(f64, &Document)> = self
            .documents
            .iter()
            .map(|doc| (doc.similarity(&terms, norm), doc))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(count).map(|(_, doc)| doc).collect()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut terms = HashMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        *terms.entry(word.to_lowercase()).or_insert(0.0) += 1.0;
    }
    terms
}

fn magnitude(terms: &HashMap<String, f64>) -> f64 {
    terms.values().map(|w| w * w).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[&str]) -> Corpus {
        Corpus::from_documents(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Document::new(format!("{i}.txt"), *t))
                .collect(),
        )
    }

    #[test]
    fn ranks_by_similarity() {
        let corpus = corpus(&["the cat sat", "robots build robots", "a robot and a cat"]);
        let hits: Vec<_> = corpus.search("robots", 3).iter().map(|d| d.text().as_str()).collect();
        assert_eq!(hits, ["robots build robots"]);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let corpus = corpus(&["cat one", "cat two", "dog"]);
        let hits: Vec<_> = corpus.search("CAT", 5).iter().map(|d| d.path().clone()).collect();
        assert_eq!(hits, [PathBuf::from("0.txt"), PathBuf::from("1.txt")]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let corpus = corpus(&["anything"]);
        assert!(corpus.search("  ", 3).is_empty());
    }
}
