use rsesa::{
    Classifier, DocumentCollection, EsaEngine, EsaError, PreprocessOptions, SimilarityMetric,
    TfIdf, VectorSpaceModel,
};
use std::fs;

fn animals() -> DocumentCollection {
    vec![
        ("A", "gato cachorro"),
        ("B", "gato peixe"),
        ("Q", "gato cachorro"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn shared_rare_term_decides_the_label() {
    let model = TfIdf::default().fit(&animals()).unwrap();

    assert_eq!(model.idf("gato"), Some(0.0));
    assert!((model.idf("cachorro").unwrap() - 1.5f64.ln()).abs() < 1e-12);
    assert!((model.idf("peixe").unwrap() - 3.0f64.ln()).abs() < 1e-12);

    let label = Classifier::cosine().classify(&model, ["A", "B"], "Q").unwrap();
    assert_eq!(label, "A");
}

#[test]
fn single_document_corpus_has_zero_weights() {
    let collection: DocumentCollection = vec![("A", "x y")].into_iter().collect();
    let model = TfIdf::default().fit(&collection).unwrap();

    let vector = model.vector("A").unwrap();
    assert!(vector.iter().all(|&w| w == 0.0));

    let similarity = rsesa::Cosine.similarity(vector, vector);
    assert_eq!(similarity, 0.0);
}

#[test]
fn repeated_runs_are_identical() {
    let collection = animals();
    let classifier = Classifier::cosine();

    let first = {
        let model = TfIdf::default().fit(&collection).unwrap();
        (
            classifier.similarities(&model, ["A", "B"], "Q").unwrap(),
            classifier.classify(&model, ["A", "B", "Q"], "Q").unwrap(),
        )
    };
    let second = {
        let model = TfIdf::default().fit(&collection).unwrap();
        (
            classifier.similarities(&model, ["A", "B"], "Q").unwrap(),
            classifier.classify(&model, ["A", "B", "Q"], "Q").unwrap(),
        )
    };

    assert_eq!(first, second);
}

#[test]
fn model_can_be_shared_across_threads() {
    let model = std::sync::Arc::new(TfIdf::default().fit(&animals()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = model.clone();
            std::thread::spawn(move || Classifier::cosine().classify(&model, ["A", "B"], "Q"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "A");
    }
}

#[test]
fn classifies_directories() {
    let concepts = tempfile::tempdir().unwrap();
    let texts = tempfile::tempdir().unwrap();

    fs::write(
        concepts.path().join("astronomy.txt"),
        "The planets orbit the sun while telescopes observe distant galaxies and stars.",
    )
    .unwrap();
    fs::write(
        concepts.path().join("cooking.txt"),
        "Bake the bread with flour, butter and sugar in a hot oven.",
    )
    .unwrap();
    fs::write(
        texts.path().join("question.txt"),
        "Which telescope shows the most galaxies and stars?",
    )
    .unwrap();

    let options = PreprocessOptions {
        language: "english".to_string(),
        ..Default::default()
    };
    let engine = EsaEngine::new(options).unwrap();
    let results = engine
        .run_directories(concepts.path(), texts.path())
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results["question.txt"].concept, "astronomy.txt");
    assert!(results["question.txt"].scores["cooking.txt"] < results["question.txt"].scores["astronomy.txt"]);
}

#[test]
fn missing_directory_is_io_error() {
    let engine = EsaEngine::new(PreprocessOptions::default()).unwrap();
    let err = engine
        .run_directories("/nonexistent/concepts", "/nonexistent/texts")
        .unwrap_err();
    assert!(matches!(err, EsaError::Io { .. }));
}
