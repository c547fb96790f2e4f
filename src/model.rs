//! TF-IDF vector-space model.
//!
//! Term frequency is a raw count per document, optionally divided by the number
//! of *distinct* terms in that document (not by the token count). Inverse
//! document frequency is `ln(N / df)`. No L2 normalization is applied to the
//! resulting vectors; comparing magnitudes is left to the similarity metric.

use crate::document::DocumentCollection;
use crate::error::{EsaError, EsaResult};
use crate::tokenizer::{Tokenizer, WhitespaceTokenizer};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Per-document term weights before IDF scaling
pub type TermFrequencyVector = HashMap<String, f64>;

/// Corpus-wide inverse document frequency per term
pub type IdfTable = BTreeMap<String, f64>;

/// Builds a [`TfIdfModel`] from a document collection
pub trait VectorSpaceModel {
    fn fit(&self, collection: &DocumentCollection) -> EsaResult<TfIdfModel>;
}

/// TF-IDF weighting over a tokenizer
#[derive(Clone)]
pub struct TfIdf {
    normalize: bool,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for TfIdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdf")
            .field("normalize", &self.normalize)
            .finish()
    }
}

impl Default for TfIdf {
    fn default() -> Self {
        Self {
            normalize: true,
            tokenizer: Arc::new(WhitespaceTokenizer),
        }
    }
}

impl TfIdf {
    pub fn new(normalize: bool) -> Self {
        Self {
            normalize,
            ..Default::default()
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// Count each distinct term of `text`, dividing by the number of distinct terms
    /// when normalization is on
    pub fn term_frequency(&self, text: &str) -> TermFrequencyVector {
        let mut counts = TermFrequencyVector::new();
        for token in self.tokenizer.tokenize(text) {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }

        if self.normalize && !counts.is_empty() {
            let distinct = counts.len() as f64;
            for weight in counts.values_mut() {
                *weight /= distinct;
            }
        }

        counts
    }
}

/// `ln(N / occurrences(t))` for every term present in at least one document
pub fn inverse_document_frequency<'a, I>(term_frequencies: I) -> EsaResult<IdfTable>
where
    I: IntoIterator<Item = &'a TermFrequencyVector>,
    I::IntoIter: Clone,
{
    let documents = term_frequencies.into_iter();
    let total = documents.clone().count();
    if total == 0 {
        return Err(EsaError::EmptyCorpus);
    }

    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    for tf in documents {
        for term in tf.keys() {
            *occurrences.entry(term.clone()).or_insert(0) += 1;
        }
    }

    occurrences
        .into_iter()
        .map(|(term, count)| {
            if count == 0 {
                return Err(EsaError::UndefinedIdf { term });
            }
            let idf = (total as f64 / count as f64).ln();
            Ok((term, idf))
        })
        .collect()
}

impl VectorSpaceModel for TfIdf {
    fn fit(&self, collection: &DocumentCollection) -> EsaResult<TfIdfModel> {
        if collection.is_empty() {
            return Err(EsaError::EmptyCorpus);
        }

        let term_frequencies: BTreeMap<String, TermFrequencyVector> = collection
            .iter()
            .map(|(id, text)| (id.to_string(), self.term_frequency(text)))
            .collect();

        let idf = inverse_document_frequency(term_frequencies.values())?;

        let vocabulary: Vec<String> = idf.keys().cloned().collect();
        let positions: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let mut vectors = BTreeMap::new();
        for (id, tf) in &term_frequencies {
            let mut weights = vec![0.0; vocabulary.len()];
            for (term, freq) in tf {
                let idf_weight = idf.get(term).copied().ok_or_else(|| EsaError::UndefinedIdf {
                    term: term.clone(),
                })?;
                weights[positions[term]] = idf_weight * freq;
            }
            vectors.insert(id.clone(), weights);
        }

        tracing::debug!(
            documents = collection.len(),
            vocabulary = vocabulary.len(),
            "fitted tf-idf model"
        );

        Ok(TfIdfModel {
            vocabulary,
            positions,
            idf,
            term_frequencies,
            vectors,
        })
    }
}

/// Fitted TF-IDF weights: one dense vector per document, aligned to a shared,
/// sorted vocabulary. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct TfIdfModel {
    vocabulary: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
    idf: IdfTable,
    term_frequencies: BTreeMap<String, TermFrequencyVector>,
    vectors: BTreeMap<String, Vec<f64>>,
}

impl TfIdfModel {
    /// Dense weight vector of a document, ordered like [`TfIdfModel::vocabulary`]
    pub fn vector(&self, id: &str) -> EsaResult<&[f64]> {
        self.vectors
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| EsaError::key_not_found(id))
    }

    /// Weight of `term` in document `id`; zero for vocabulary terms the document lacks
    /// and for terms outside the vocabulary
    pub fn weight(&self, id: &str, term: &str) -> EsaResult<f64> {
        let vector = self.vector(id)?;
        Ok(self
            .positions
            .get(term)
            .map(|&i| vector[i])
            .unwrap_or(0.0))
    }

    /// Term to weight mapping of a document, with explicit zeros
    pub fn weights(&self, id: &str) -> EsaResult<BTreeMap<&str, f64>> {
        let vector = self.vector(id)?;
        Ok(self
            .vocabulary
            .iter()
            .map(String::as_str)
            .zip(vector.iter().copied())
            .collect())
    }

    pub fn term_frequencies(&self, id: &str) -> EsaResult<&TermFrequencyVector> {
        self.term_frequencies
            .get(id)
            .ok_or_else(|| EsaError::key_not_found(id))
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn idf_table(&self) -> &IdfTable {
        &self.idf
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vectors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
