//! Example retrieval for the `examples` directive.
//!
//! [`FileCorpusRetriever`] treats a directory of `.txt`/`.md` files as a
//! corpus and ranks its documents against a query by word-frequency cosine
//! similarity. Corpora are loaded once per source directory and cached in
//! the retriever until evicted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod corpus;
mod retriever;

pub use corpus::{Corpus, Document};
pub use retriever::FileCorpusRetriever;
