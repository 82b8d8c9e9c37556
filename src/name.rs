//! Vietnamese full-name splitting.
//!
//! Names are written family-first: `Nguyễn Thị Hoa` is family `nguyễn`,
//! middle `thị`, given `hoa`. The given and middle names carry the gender
//! signal; the family name does not.

use crate::{Error, Result};

/// A normalized Vietnamese full name, split into positional components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    /// First token, absent for single-token input.
    pub family: Option<String>,
    /// Everything between the family and given names.
    pub middle: Vec<String>,
    /// Last token.
    pub given: String,
}

impl FullName {
    /// Parse free-form input: lower-case, replace every non-alphabetic
    /// character with a space, split on whitespace, assign components by
    /// position. Fails with [`Error::EmptyName`] when nothing is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let lowered = raw.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if c.is_alphabetic() { c } else { ' ' })
            .collect();
        let mut tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();

        let given = tokens.pop().ok_or(Error::EmptyName)?;
        let family = if tokens.is_empty() {
            None
        } else {
            Some(tokens.remove(0))
        };

        Ok(FullName {
            family,
            middle: tokens,
            given,
        })
    }

    /// The substring handed to the vectorizer: middle names followed by the
    /// given name, space-joined.
    pub fn classifier_text(&self) -> String {
        let mut parts = self.middle.clone();
        parts.push(self.given.clone());
        parts.join(" ")
    }
}
