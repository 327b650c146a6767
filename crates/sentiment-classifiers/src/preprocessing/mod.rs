//! Text preprocessing: tokenization and bag-of-words vectorization.
//!
//! `Tokenizer` turns a document into (optionally lowercased) word n-grams and
//! `CountVectorizer` learns a vocabulary from a corpus and maps documents to
//! rows of a `CountMatrix`.
pub mod count_vectorizer;
pub mod tokenizer;

pub use count_vectorizer::{CountVectorizer, Vocabulary};
pub use tokenizer::Tokenizer;
