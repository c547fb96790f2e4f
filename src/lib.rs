// Re-export main components
pub mod api;
pub mod classifier;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod model;
pub mod similarity;
pub mod stopwords;
pub mod tokenizer;

// Re-export commonly used types
pub use classifier::{Classifier, ScoreMap, ScoredDocument};
pub use document::{Document, DocumentCollection};
pub use engine::{Classification, EsaEngine};
pub use error::{EsaError, EsaResult};
pub use model::{IdfTable, TermFrequencyVector, TfIdf, TfIdfModel, VectorSpaceModel};
pub use similarity::{Cosine, SimilarityMetric};
pub use tokenizer::{Language, PreprocessOptions, Preprocessor, Tokenizer, WhitespaceTokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() -> EsaResult<()> {
        let collection: DocumentCollection = vec![
            Document::new("A", "gato cachorro"),
            Document::new("B", "gato peixe"),
            Document::new("Q", "gato cachorro"),
        ]
        .into_iter()
        .collect();

        let model = TfIdf::default().fit(&collection)?;
        let label = Classifier::cosine().classify(&model, collection.ids(), "Q")?;

        assert_eq!(label, "A");
        Ok(())
    }
}
