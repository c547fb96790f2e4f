use crate::error::{EsaError, EsaResult};
use crate::model::TfIdfModel;
use crate::similarity::{Cosine, SimilarityMetric};
use serde::Serialize;
use std::collections::BTreeMap;

/// Similarity of the query to each candidate, keyed by candidate id
pub type ScoreMap = BTreeMap<String, f64>;

/// A candidate together with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub doc_id: String,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(doc_id: String, score: f64) -> Self {
        Self { doc_id, score }
    }
}

/// Single-label classifier: the query gets the label of its most similar candidate
#[derive(Debug, Clone, Default)]
pub struct Classifier<M = Cosine> {
    metric: M,
}

impl Classifier<Cosine> {
    pub fn cosine() -> Self {
        Self { metric: Cosine }
    }
}

impl<M: SimilarityMetric> Classifier<M> {
    pub fn new(metric: M) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Score the query against every candidate, the query itself included if listed
    pub fn similarities<I, S>(
        &self,
        model: &TfIdfModel,
        candidates: I,
        query: &str,
    ) -> EsaResult<ScoreMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query_vector = model.vector(query)?;
        candidates
            .into_iter()
            .map(|candidate| {
                let candidate = candidate.as_ref();
                let score = self.metric.similarity(query_vector, model.vector(candidate)?);
                Ok((candidate.to_string(), score))
            })
            .collect()
    }

    /// Scores of every candidate except the query itself
    fn eligible_scores<I, S>(
        &self,
        model: &TfIdfModel,
        candidates: I,
        query: &str,
    ) -> EsaResult<ScoreMap>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        model.vector(query)?;

        let eligible: Vec<S> = candidates
            .into_iter()
            .filter(|c| c.as_ref() != query)
            .collect();

        if eligible.is_empty() {
            return Err(EsaError::EmptyCandidateSet {
                query: query.to_string(),
            });
        }

        self.similarities(model, eligible, query)
    }

    /// Pick the candidate most similar to the query, never the query itself.
    ///
    /// Ties go to the lexicographically smallest candidate id.
    pub fn classify<I, S>(&self, model: &TfIdfModel, candidates: I, query: &str) -> EsaResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scores = self.eligible_scores(model, candidates, query)?;

        let mut best: Option<(&String, f64)> = None;
        for (id, &score) in &scores {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((id, score)),
            }
        }

        best.map(|(id, _)| id.clone())
            .ok_or_else(|| EsaError::EmptyCandidateSet {
                query: query.to_string(),
            })
    }

    /// Every candidate except the query, by descending score then ascending id
    pub fn rank<I, S>(
        &self,
        model: &TfIdfModel,
        candidates: I,
        query: &str,
    ) -> EsaResult<Vec<ScoredDocument>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scored: Vec<ScoredDocument> = self
            .eligible_scores(model, candidates, query)?
            .into_iter()
            .map(|(id, score)| ScoredDocument::new(id, score))
            .collect();

        // Stable sort keeps the id order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentCollection;
    use crate::model::{TfIdf, VectorSpaceModel};

    fn fit(docs: Vec<(&str, &str)>) -> TfIdfModel {
        let collection: DocumentCollection = docs.into_iter().collect();
        TfIdf::default().fit(&collection).unwrap()
    }

    fn animals() -> TfIdfModel {
        fit(vec![
            ("A", "gato cachorro"),
            ("B", "gato peixe"),
            ("Q", "gato cachorro"),
        ])
    }

    #[test]
    fn test_classify_picks_shared_rare_term() -> EsaResult<()> {
        let model = animals();
        let label = Classifier::cosine().classify(&model, ["A", "B"], "Q")?;
        assert_eq!(label, "A");
        Ok(())
    }

    #[test]
    fn test_classify_excludes_query() -> EsaResult<()> {
        let model = animals();
        let candidates = vec!["A".to_string(), "B".to_string(), "Q".to_string()];
        let label = Classifier::cosine().classify(&model, &candidates, "Q")?;
        assert_eq!(label, "A");
        // caller's candidates are untouched
        assert_eq!(candidates.len(), 3);
        Ok(())
    }

    #[test]
    fn test_classify_only_self_is_empty_candidate_set() {
        let model = animals();
        let err = Classifier::cosine().classify(&model, ["Q"], "Q").unwrap_err();
        assert!(matches!(err, EsaError::EmptyCandidateSet { .. }));

        let none: [&str; 0] = [];
        assert!(matches!(
            Classifier::cosine().classify(&model, none, "Q"),
            Err(EsaError::EmptyCandidateSet { .. })
        ));
    }

    #[test]
    fn test_similarities_includes_self() -> EsaResult<()> {
        let model = animals();
        let scores = Classifier::cosine().similarities(&model, ["A", "B", "Q"], "Q")?;
        assert_eq!(scores.len(), 3);
        assert!((scores["Q"] - 1.0).abs() < 1e-12);
        assert!((scores["A"] - 1.0).abs() < 1e-12);
        assert_eq!(scores["B"], 0.0);
        Ok(())
    }

    #[test]
    fn test_unknown_ids_are_key_not_found() {
        let model = animals();
        let classifier = Classifier::cosine();
        assert!(matches!(
            classifier.similarities(&model, ["A"], "missing"),
            Err(EsaError::KeyNotFound { .. })
        ));
        assert!(matches!(
            classifier.classify(&model, ["A", "nope"], "Q"),
            Err(EsaError::KeyNotFound { ref id }) if id == "nope"
        ));
    }

    #[test]
    fn test_unknown_query_listed_as_only_candidate() {
        let model = animals();
        let classifier = Classifier::cosine();
        assert!(matches!(
            classifier.classify(&model, ["X"], "X"),
            Err(EsaError::KeyNotFound { ref id }) if id == "X"
        ));
        assert!(matches!(
            classifier.rank(&model, ["X"], "X"),
            Err(EsaError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_tie_goes_to_smallest_id() -> EsaResult<()> {
        // "zeta" and "alpha" have identical vectors
        let model = fit(vec![
            ("zeta", "sol lua"),
            ("alpha", "sol lua"),
            ("mid", "mar"),
            ("q", "sol lua"),
        ]);
        let classifier = Classifier::cosine();
        assert_eq!(classifier.classify(&model, ["zeta", "alpha", "mid"], "q")?, "alpha");
        assert_eq!(classifier.classify(&model, ["alpha", "zeta", "mid"], "q")?, "alpha");
        Ok(())
    }

    #[test]
    fn test_all_zero_scores_still_classify() -> EsaResult<()> {
        let model = fit(vec![("b", "x"), ("a", "y"), ("q", "z")]);
        assert_eq!(Classifier::cosine().classify(&model, ["b", "a"], "q")?, "a");
        Ok(())
    }

    #[test]
    fn test_rank_orders_by_score() -> EsaResult<()> {
        let model = animals();
        let ranked = Classifier::cosine().rank(&model, ["B", "A", "Q"], "Q")?;
        let ids: Vec<&str> = ranked.iter().map(|s| s.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(ranked[0].score >= ranked[1].score);
        Ok(())
    }

    #[test]
    fn test_classify_is_deterministic() -> EsaResult<()> {
        let model = animals();
        let classifier = Classifier::cosine();
        let first = classifier.classify(&model, ["A", "B"], "Q")?;
        let second = classifier.classify(&model, ["A", "B"], "Q")?;
        assert_eq!(first, second);
        Ok(())
    }
}
