use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier read from an RFID tag.
///
/// The reader emits digits and hex letters, but no structure is assumed:
/// a token is whatever sat between the frame markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Token(raw.into())
    }

    /// Get the raw characters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the reader produced an empty frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the token and return the raw string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Token::new(raw)
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Token(raw)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Human readable label of the person a token belongs to.
///
/// Multi-word labels are stored with single spaces between words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Build a label from whitespace separated words.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_core::Identity;
    ///
    /// let identity = Identity::from_words(["Ada", "King"]);
    /// assert_eq!(identity.as_str(), "Ada King");
    /// ```
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Identity(words.into_iter().collect::<Vec<_>>().join(" "))
    }

    /// Wrap a label verbatim.
    pub fn new(label: impl Into<String>) -> Self {
        Identity(label.into())
    }

    /// Get the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(label: &str) -> Self {
        Identity::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[test]
    fn test_token_display_is_raw() {
        let token = Token::new("A1B2C3");
        assert_eq!(token.to_string(), "A1B2C3");
        assert_eq!(token.as_str(), "A1B2C3");
    }

    #[test]
    fn test_token_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Token::new("A1B2C3"), 1);
        assert_eq!(map.get("A1B2C3"), Some(&1));
    }

    #[test]
    fn test_empty_token() {
        assert!(Token::new("").is_empty());
        assert!(!Token::new("0").is_empty());
    }

    #[rstest]
    #[case(vec!["Alice"], "Alice")]
    #[case(vec!["Ada", "King"], "Ada King")]
    #[case(vec!["Grace", "Brewster", "Hopper"], "Grace Brewster Hopper")]
    fn test_identity_from_words(#[case] words: Vec<&str>, #[case] expected: &str) {
        assert_eq!(Identity::from_words(words).as_str(), expected);
    }

    #[test]
    fn test_token_serializes_transparently() {
        let json = serde_json::to_string(&Token::new("0A1B")).unwrap();
        assert_eq!(json, "\"0A1B\"");
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Token::new("0A1B"));
    }
}
