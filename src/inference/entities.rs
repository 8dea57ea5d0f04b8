//! Rule-based named entity recognizer.

use crate::error::Result;
use crate::inference::gazetteer::{
    CONNECTORS, GIVEN_NAMES, ORGANIZATION_HEADS, ORGANIZATION_WORDS, PLACES, STOPWORDS, TITLES,
};
use crate::inference::tokenizer::Token;
use crate::inference::{Entity, EntityBackend, Lang, WordTokenizer};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Person,
    Place,
    Organization,
    Misc,
}

impl Kind {
    fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Self::Person, Lang::En) => "PERSON",
            (Self::Person, _) => "PER",
            (Self::Place, Lang::En) => "GPE",
            (Self::Place, _) => "LOC",
            (Self::Organization, _) => "ORG",
            (Self::Misc, _) => "MISC",
        }
    }
}

/// Finds runs of capitalized words and labels them with word lists.
///
/// Labels follow the usual schemes: `PERSON`, `GPE`, `ORG` and `MISC` for
/// English, `PER`, `LOC`, `ORG` and `MISC` for German and French.
#[derive(Debug, Clone)]
pub struct RuleBasedRecognizer {
    lang: Lang,
    tokenizer: WordTokenizer,
    places: HashSet<&'static str>,
    organization_words: HashSet<&'static str>,
    organization_heads: HashSet<&'static str>,
    titles: HashSet<&'static str>,
    given_names: HashSet<&'static str>,
    stopwords: HashSet<&'static str>,
    connectors: HashSet<&'static str>,
}

impl RuleBasedRecognizer {
    /// Recognizer for `lang`.
    pub fn new(lang: Lang) -> Result<Self> {
        let set = |words: &[&'static str]| words.iter().copied().collect::<HashSet<_>>();

        Ok(Self {
            lang,
            tokenizer: WordTokenizer::new(lang)?,
            places: set(PLACES),
            organization_words: set(ORGANIZATION_WORDS),
            organization_heads: set(ORGANIZATION_HEADS),
            titles: set(TITLES),
            given_names: set(GIVEN_NAMES),
            stopwords: set(STOPWORDS),
            connectors: set(CONNECTORS),
        })
    }

    fn is_connector(&self, token: &Token<'_>) -> bool {
        !token.is_capitalized() && self.connectors.contains(token.text)
    }

    fn opens_name(&self, lower: &str, first_lower: &str, last_lower: &str) -> bool {
        self.places.contains(lower)
            || self.given_names.contains(first_lower)
            || self.organization_heads.contains(first_lower)
            || self.organization_words.contains(last_lower)
            || self.places.iter().any(|place| {
                place
                    .strip_prefix(first_lower)
                    .is_some_and(|rest| rest.starts_with(' '))
            })
    }

    fn classify(&self, text: &str, span: &[Token<'_>], sentence_start: bool) -> Option<Entity> {
        let mut span = span;
        let mut titled = false;
        let mut sentence_start = sentence_start;

        while let Some((first, rest)) = span.split_first() {
            let lower = first.text.to_lowercase();
            if self.titles.contains(lower.as_str()) && !rest.is_empty() {
                titled = true;
            } else if !self.stopwords.contains(lower.as_str()) {
                break;
            }
            span = rest;
            sentence_start = false;
        }

        let (first, last) = (span.first()?, span.last()?);
        let surface = &text[first.start..last.end];
        let lower = surface.to_lowercase();
        let first_lower = first.text.to_lowercase();
        let last_lower = last.text.to_lowercase();

        // An ordinary capitalized word opening a sentence is not part of the name.
        if sentence_start && span.len() > 1 && !self.opens_name(&lower, &first_lower, &last_lower)
        {
            let rest = span.get(1..)?;
            let skip = rest.iter().position(Token::is_capitalized)?;
            return self.classify(text, rest.get(skip..)?, false);
        }

        let kind = if self.places.contains(lower.as_str()) {
            Kind::Place
        } else if (span.len() > 1
            && (self.organization_words.contains(last_lower.as_str())
                || self.organization_heads.contains(first_lower.as_str())))
            || is_acronym(span)
        {
            Kind::Organization
        } else if titled || self.given_names.contains(first_lower.as_str()) {
            Kind::Person
        } else if span.len() > 1 && span.iter().all(Token::is_capitalized) {
            Kind::Person
        } else if span.len() > 1 {
            Kind::Misc
        } else if sentence_start || self.lang == Lang::De {
            // A lone capitalized word here is more likely an ordinary word.
            return None;
        } else {
            Kind::Misc
        };

        Some(Entity {
            text: surface.to_string(),
            label: kind.label(self.lang).to_string(),
        })
    }
}

impl EntityBackend for RuleBasedRecognizer {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let tokens = self.tokenizer.tokens(text);
        let is_name = |token: &Token<'_>| token.is_word() && token.is_capitalized();

        let mut entities = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if !is_name(&tokens[i]) {
                i += 1;
                continue;
            }

            let sentence_start = i == 0 || tokens[i - 1].is_sentence_end();
            let mut end = i + 1;
            loop {
                if end < tokens.len() && is_name(&tokens[end]) {
                    end += 1;
                } else if end + 1 < tokens.len()
                    && self.is_connector(&tokens[end])
                    && is_name(&tokens[end + 1])
                {
                    end += 2;
                } else {
                    break;
                }
            }

            if let Some(entity) = self.classify(text, &tokens[i..end], sentence_start) {
                entities.push(entity);
            }
            i = end;
        }

        Ok(entities)
    }
}

fn is_acronym(span: &[Token<'_>]) -> bool {
    match span {
        [token] => {
            token.text.chars().count() >= 2
                && token.text.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}
