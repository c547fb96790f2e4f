use crate::classifier::{Classifier, ScoreMap};
use crate::corpus;
use crate::document::DocumentCollection;
use crate::error::{EsaError, EsaResult};
use crate::model::{TfIdf, VectorSpaceModel};
use crate::tokenizer::{PreprocessOptions, Preprocessor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of classifying one text against the concept corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub text: String,
    pub concept: String,
    pub scores: ScoreMap,
}

/// Preprocesses, fits and classifies texts against a set of concept documents
#[derive(Debug)]
pub struct EsaEngine {
    preprocessor: Preprocessor,
    model: TfIdf,
    classifier: Classifier,
}

impl EsaEngine {
    pub fn new(options: PreprocessOptions) -> EsaResult<Self> {
        Ok(Self {
            preprocessor: Preprocessor::new(options)?,
            model: TfIdf::default(),
            classifier: Classifier::cosine(),
        })
    }

    pub fn with_model(mut self, model: TfIdf) -> Self {
        self.model = model;
        self
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Fit a model over the concepts plus this one text and pick the closest concept.
    ///
    /// The concept collection is left as it was.
    pub fn classify_text(
        &self,
        concepts: &DocumentCollection,
        text_id: &str,
        text: &str,
    ) -> EsaResult<Classification> {
        if concepts.contains(text_id) {
            return Err(EsaError::configuration(format!(
                "text '{}' has the same id as a concept",
                text_id
            )));
        }

        let mut collection = concepts.clone();
        collection.insert(text_id, text);
        let collection = self.preprocessor.process_collection(&collection);

        let model = self.model.fit(&collection)?;
        let ranked = self.classifier.rank(&model, concepts.ids(), text_id)?;
        let concept = ranked
            .first()
            .map(|best| best.doc_id.clone())
            .ok_or_else(|| EsaError::EmptyCandidateSet {
                query: text_id.to_string(),
            })?;
        let scores: ScoreMap = ranked
            .into_iter()
            .map(|scored| (scored.doc_id, scored.score))
            .collect();

        tracing::debug!(text = text_id, concept = %concept, "classified text");

        Ok(Classification {
            text: text_id.to_string(),
            concept,
            scores,
        })
    }

    /// Classify every text, fitting one model per text
    pub fn run(
        &self,
        concepts: &DocumentCollection,
        texts: &DocumentCollection,
    ) -> EsaResult<BTreeMap<String, Classification>> {
        tracing::info!(
            concepts = concepts.len(),
            texts = texts.len(),
            "starting classification"
        );

        let mut results = BTreeMap::new();
        for (text_id, text) in texts.iter() {
            tracing::info!("Processing {}", text_id);
            let classification = self.classify_text(concepts, text_id, text)?;
            results.insert(text_id.to_string(), classification);
        }

        Ok(results)
    }

    pub fn run_directories<P, Q>(
        &self,
        concept_dir: P,
        text_dir: Q,
    ) -> EsaResult<BTreeMap<String, Classification>>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let concepts = corpus::load_directory(concept_dir)?;
        let texts = corpus::load_directory(text_dir)?;
        self.run(&concepts, &texts)
    }
}
