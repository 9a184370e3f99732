//! Lexicon: assigning categories to words.
//!
//! The recognizer itself works on category sequences; the lexicon is the
//! thin layer that turns a sentence into one.
//!
//! # Example
//!
//! ```rust
//! use compositional_ccg::{dparse, Category, Lexicon};
//!
//! let lexicon = Lexicon::english_basic();
//! let cats = lexicon.categorize(&["Alice", "loves", "Bob"]).unwrap();
//!
//! let results: Vec<Category> = dparse(&cats).collect();
//! assert!(results.contains(&Category::atomic("s")));
//! ```

use crate::category::{Category, VarSupply};
use crate::notation::parse_category;
use crate::CcgError;
use std::collections::HashMap;

/// Word to category map.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Category>,
    // Tokens for variables written in entries; renamed apart on lookup.
    supply: VarSupply,
}

impl Lexicon {
    /// Create a new empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lexicon with a basic English vocabulary over `np`, `n`
    /// and `s`.
    pub fn english_basic() -> Self {
        let np = Category::atomic("np");
        let n = Category::atomic("n");
        let s = Category::atomic("s");

        let mut lexicon = Self::new();

        // Proper nouns
        for name in ["Alice", "Bob", "Charlie", "Eve"] {
            lexicon.add_word(name, np.clone());
        }

        // Common nouns
        for noun in ["dog", "cat", "man", "woman", "book", "table", "mouse"] {
            lexicon.add_word(noun, n.clone());
        }

        // Determiners: np<n
        for det in ["the", "a", "an", "every", "some"] {
            lexicon.add_word(det, &np << &n);
        }

        // Adjectives: n<n
        for adj in ["big", "small", "red", "blue", "happy", "sad"] {
            lexicon.add_word(adj, &n << &n);
        }

        // Intransitive verbs: np>s
        for verb in ["runs", "sleeps", "walks", "jumps", "falls"] {
            lexicon.add_word(verb, &np >> &s);
        }

        // Transitive verbs: (np>s)<np
        for verb in ["loves", "hates", "sees", "knows", "chases", "adores", "bites"] {
            lexicon.add_word(verb, (&np >> &s) << np.clone());
        }

        // Sentence complement verbs: (np>s)<s
        for verb in ["thinks", "believes", "says"] {
            lexicon.add_word(verb, (&np >> &s) << s.clone());
        }

        lexicon
    }

    /// Add a word to the lexicon, replacing any previous entry.
    pub fn add_word(&mut self, word: &str, cat: Category) {
        self.entries.insert(word.to_string(), cat);
    }

    /// Add a word whose category is given in notation.
    pub fn add_entry(&mut self, word: &str, notation: &str) -> Result<(), CcgError> {
        let cat = parse_category(notation, &mut self.supply)?;
        self.add_word(word, cat);
        Ok(())
    }

    /// Get the category of a word (if in lexicon).
    pub fn get(&self, word: &str) -> Option<&Category> {
        self.entries.get(word)
    }

    /// Check if a word is in the lexicon.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up every word of a sentence.
    ///
    /// Each looked-up category gets its own variables, so repeated words
    /// never share them.
    pub fn categorize(&self, words: &[&str]) -> Result<Vec<Category>, CcgError> {
        if words.is_empty() {
            return Err(CcgError::EmptySentence);
        }
        let mut supply = VarSupply::new();
        words
            .iter()
            .map(|word| {
                let cat = self
                    .entries
                    .get(*word)
                    .ok_or_else(|| CcgError::UnknownWord {
                        word: word.to_string(),
                    })?;
                cat.freshen(&mut supply)
                    .ok_or(CcgError::VariablesExhausted)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let lexicon = Lexicon::english_basic();
        assert_eq!(lexicon.get("Alice"), Some(&Category::atomic("np")));
        assert_eq!(lexicon.get("runs").unwrap().to_string(), "np>s");
        assert_eq!(lexicon.get("loves").unwrap().to_string(), "(np>s)<np");
        assert!(lexicon.get("fnords").is_none());
    }

    #[test]
    fn test_unknown_word() {
        let lexicon = Lexicon::english_basic();
        let result = lexicon.categorize(&["Alice", "fnords", "Bob"]);
        assert_eq!(
            result,
            Err(CcgError::UnknownWord {
                word: "fnords".to_string()
            })
        );
    }

    #[test]
    fn test_empty_sentence() {
        let lexicon = Lexicon::english_basic();
        assert_eq!(lexicon.categorize(&[]), Err(CcgError::EmptySentence));
    }

    #[test]
    fn test_add_entry_from_notation() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry("and", "($x>$x)<$x").unwrap();
        assert!(lexicon.contains("and"));
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.add_entry("bad", "(x").is_err());
    }

    #[test]
    fn test_repeated_words_do_not_share_variables() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry("it", "$t<($t>s)").unwrap();
        let cats = lexicon.categorize(&["it", "it"]).unwrap();
        assert!(cats[0].alpha_eq(&cats[1]));
        assert!(cats[0].variables().is_disjoint(&cats[1].variables()));
    }
}
