//! Word-token bag-of-words vectorization.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token → column index map fitted on training texts.
///
/// Indices are assigned in encounter order and serialized with the
/// classifier, so a persisted model keeps the column layout it was
/// trained against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    /// Build the vocabulary from whitespace-tokenized training texts.
    pub fn fit<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = BTreeMap::new();
        let mut next = 0;
        for text in texts {
            for token in text.split_whitespace() {
                if !index.contains_key(token) {
                    index.insert(token.to_string(), next);
                    next += 1;
                }
            }
        }
        Vocabulary { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Tokens in the vocabulary, in lexical order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Occurrence counts for one text. Tokens outside the vocabulary are
    /// ignored.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut row = Array1::zeros(self.len());
        for token in text.split_whitespace() {
            if let Some(&i) = self.index.get(token) {
                row[i] += 1.0;
            }
        }
        row
    }

    /// Design matrix for a batch of texts, one row per text.
    pub fn transform_batch(&self, texts: &[String]) -> Array2<f64> {
        let mut matrix = Array2::zeros((texts.len(), self.len()));
        for (r, text) in texts.iter().enumerate() {
            for token in text.split_whitespace() {
                if let Some(&c) = self.index.get(token) {
                    matrix[[r, c]] += 1.0;
                }
            }
        }
        matrix
    }
}
