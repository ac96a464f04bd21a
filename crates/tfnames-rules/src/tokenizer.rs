//! Identifier tokenization.

/// Separator between words of a Terraform identifier.
pub const SEPARATOR: &str = "_";

/// Lowercase word tokens of an identifier, in their original order.
///
/// No token is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TokenSequence(Vec<String>);

impl TokenSequence {
    /// Returns the tokens as a slice.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the identifier held no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl std::fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(SEPARATOR))
    }
}

/// Lower-cases `identifier` and splits it on [`SEPARATOR`].
///
/// Empty segments (from leading, trailing or repeated separators) are
/// dropped, so `""` yields an empty sequence.
#[must_use]
pub fn tokenize(identifier: &str) -> TokenSequence {
    TokenSequence(
        identifier
            .to_lowercase()
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}
