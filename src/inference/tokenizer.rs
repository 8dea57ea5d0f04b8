//! Rule-based word tokenizer.

use crate::error::{Error, Result};
use crate::inference::Lang;
use regex::Regex;

/// A token and its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Whether the token is made of letters or digits.
    pub fn is_word(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_alphanumeric)
    }

    /// Whether the token starts with an uppercase letter.
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Whether the token ends a sentence.
    pub fn is_sentence_end(&self) -> bool {
        matches!(self.text, "." | "!" | "?" | "…")
    }
}

const WORD_PATTERN: &str = r"[\p{L}\p{M}\p{N}]+(?:[-'’.][\p{L}\p{M}\p{N}]+)*|[^\s\p{L}\p{M}\p{N}]";

// Clitics split off the end of English words: "don't" -> "do" "n't".
const ENGLISH_CLITICS: &[&str] = &["n't", "n’t", "'s", "’s", "'re", "’re", "'ve", "’ve", "'ll", "’ll", "'d", "’d", "'m", "’m"];

/// Splits text into words and punctuation marks.
///
/// French elided articles and pronouns (`l'`, `qu'`...) and English clitics
/// become tokens of their own.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    lang: Lang,
    words: Regex,
    elision: Regex,
}

impl WordTokenizer {
    /// Tokenizer for `lang`.
    pub fn new(lang: Lang) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::Internal {
                message: format!("invalid tokenizer pattern: {e}"),
            })
        };

        Ok(Self {
            lang,
            words: compile(WORD_PATTERN)?,
            elision: compile(r"^(?i:qu|[cdjlmnst])['’]")?,
        })
    }

    /// Language of the tokenizer.
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Tokens of `text` with their spans.
    pub fn tokens<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        for m in self.words.find_iter(text) {
            let (start, end) = (m.start(), m.end());
            let split = match self.lang {
                Lang::Fr => self
                    .elision
                    .find(m.as_str())
                    .map(|prefix| start + prefix.end())
                    .filter(|&split| split < end),
                Lang::En => ENGLISH_CLITICS
                    .iter()
                    .find(|clitic| {
                        m.as_str().len() > clitic.len()
                            && m.as_str().to_lowercase().ends_with(*clitic)
                    })
                    .map(|clitic| end - clitic.len()),
                Lang::De => None,
            };

            match split {
                Some(split) if text.is_char_boundary(split) => {
                    tokens.push(token(text, start, split));
                    tokens.push(token(text, split, end));
                }
                _ => tokens.push(token(text, start, end)),
            }
        }

        tokens
    }

    /// Token strings of `text`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .into_iter()
            .map(|t| t.text.to_string())
            .collect()
    }
}

fn token(text: &str, start: usize, end: usize) -> Token<'_> {
    Token {
        text: &text[start..end],
        start,
        end,
    }
}
