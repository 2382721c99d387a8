use promptweave_error::{PromptweaveErrorKind, RetrievalErrorKind};
use promptweave_interface::ExampleRetriever;
use promptweave_retrieval::FileCorpusRetriever;
use std::fs;

fn write_corpus() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "A robot learns to paint.").unwrap();
    fs::write(dir.path().join("b.md"), "The robot and the robot dog.").unwrap();
    fs::write(dir.path().join("c.txt"), "A quiet story about the sea.").unwrap();
    fs::write(dir.path().join("ignored.json"), "robot robot robot").unwrap();
    dir
}

#[tokio::test]
async fn retrieves_most_similar_first() {
    let dir = write_corpus();
    let retriever = FileCorpusRetriever::new();
    let source = dir.path().to_str().unwrap();

    let examples = retriever.retrieve("robot", 5, source).await.unwrap();

    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0], "The robot and the robot dog.");
    assert_eq!(examples[1], "A robot learns to paint.");
}

#[tokio::test]
async fn count_limits_results() {
    let dir = write_corpus();
    let retriever = FileCorpusRetriever::new();
    let examples = retriever
        .retrieve("robot", 1, dir.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(examples.len(), 1);
}

#[tokio::test]
async fn corpus_is_loaded_once_until_evicted() {
    let dir = write_corpus();
    let retriever = FileCorpusRetriever::new();
    let source = dir.path().to_str().unwrap();

    retriever.retrieve("sea", 3, source).await.unwrap();
    fs::write(dir.path().join("d.txt"), "Another sea tale.").unwrap();

    let cached = retriever.retrieve("sea", 3, source).await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(retriever.cached_sources().await, vec![dir.path().to_path_buf()]);

    assert!(retriever.evict(dir.path()).await);
    let reloaded = retriever.retrieve("sea", 3, source).await.unwrap();
    assert_eq!(reloaded.len(), 2);

    retriever.clear().await;
    assert!(retriever.cached_sources().await.is_empty());
}

#[tokio::test]
async fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let retriever = FileCorpusRetriever::new();

    let err = retriever
        .retrieve("x", 3, missing.to_str().unwrap())
        .await
        .unwrap_err();

    match err.kind() {
        PromptweaveErrorKind::Retrieval(e) => {
            assert!(matches!(e.kind, RetrievalErrorKind::CorpusNotFound(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}
