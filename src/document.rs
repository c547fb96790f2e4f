use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document is a single labeled text, either a concept or a text to classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Ordered mapping from document identifier to document text.
///
/// Iteration follows identifier order, so every model fitted from the same
/// collection sees the documents in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCollection {
    documents: BTreeMap<String, String>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    /// Insert a document, replacing the text of an existing identifier.
    /// Returns the previous text if there was one.
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.documents.insert(id.into(), text.into())
    }

    pub fn add(&mut self, doc: Document) -> Option<String> {
        self.insert(doc.id, doc.text)
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.documents.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build a new collection with every text passed through `f`
    pub fn map_texts<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        Self {
            documents: self
                .documents
                .iter()
                .map(|(id, text)| (id.clone(), f(text)))
                .collect(),
        }
    }
}

impl<I, T> FromIterator<(I, T)> for DocumentCollection
where
    I: Into<String>,
    T: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (I, T)>>(iter: It) -> Self {
        Self {
            documents: iter
                .into_iter()
                .map(|(id, text)| (id.into(), text.into()))
                .collect(),
        }
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<It: IntoIterator<Item = Document>>(iter: It) -> Self {
        iter.into_iter().map(|doc| (doc.id, doc.text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_and_remove() {
        let mut collection = DocumentCollection::new();
        assert!(collection.insert("a", "first").is_none());
        assert_eq!(collection.insert("a", "second").as_deref(), Some("first"));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("a"), Some("second"));

        assert_eq!(collection.remove("a").as_deref(), Some("second"));
        assert!(collection.is_empty());
        assert!(collection.remove("a").is_none());
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let collection: DocumentCollection =
            vec![("c", "3"), ("a", "1"), ("b", "2")].into_iter().collect();
        let ids: Vec<&str> = collection.ids().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_map_texts_leaves_source_untouched() {
        let collection: DocumentCollection =
            vec![Document::new("x", "Hello")].into_iter().collect();
        let upper = collection.map_texts(|t| t.to_uppercase());
        assert_eq!(upper.get("x"), Some("HELLO"));
        assert_eq!(collection.get("x"), Some("Hello"));
    }
}
