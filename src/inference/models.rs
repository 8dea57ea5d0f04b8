//! Languages, model sizes and model names.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Languages with entity, tokenizer and embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    /// German.
    De,
    /// English.
    En,
    /// French.
    Fr,
}

impl Lang {
    /// Accepted codes.
    pub const CHOICES: &'static [&'static str] = &["de", "en", "fr"];

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Genre of the entity model trained for this language.
    fn model_genre(self) -> &'static str {
        match self {
            Self::En => "web",
            Self::De | Self::Fr => "news",
        }
    }

    /// Name of the sentence-transformers model for this language.
    pub fn sentence_transformers_model(self) -> &'static str {
        match self {
            Self::De => "paraphrase-multilingual-MiniLM-L12-v2",
            Self::En => "all-MiniLM-L6-v2",
            Self::Fr => "Lajavaness/sentence-flaubert-base",
        }
    }

    /// Embedding dimension of the sentence-transformers model.
    pub fn embedding_dimension(self) -> usize {
        match self {
            Self::De | Self::En => 384,
            Self::Fr => 768,
        }
    }
}

impl FromStr for Lang {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err(Error::argument("-l/--lang", format!("unsupported language '{s}'"))),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Size of the entity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    /// Small.
    Sm,
    /// Medium.
    Md,
    /// Large.
    Lg,
    /// Transformer based.
    Trf,
}

impl ModelSize {
    /// Accepted sizes.
    pub const CHOICES: &'static [&'static str] = &["sm", "md", "lg", "trf"];

    /// Short name.
    pub fn code(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Trf => "trf",
        }
    }
}

impl FromStr for ModelSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sm" => Ok(Self::Sm),
            "md" => Ok(Self::Md),
            "lg" => Ok(Self::Lg),
            "trf" => Ok(Self::Trf),
            _ => Err(Error::argument(
                "-M/--model-size",
                format!("unsupported model size '{s}'"),
            )),
        }
    }
}

/// Handle of the spaCy-style entity model for `lang` and `size`.
///
/// Transformer models of German and French only ship a dependency pipeline.
pub fn entity_model_handle(lang: Lang, size: ModelSize) -> String {
    let core = if size == ModelSize::Trf && matches!(lang, Lang::De | Lang::Fr) {
        "dep"
    } else {
        "core"
    };
    format!("{}_{core}_{}_{}", lang.code(), lang.model_genre(), size.code())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_model_handles() {
        assert_eq!(entity_model_handle(Lang::En, ModelSize::Sm), "en_core_web_sm");
        assert_eq!(entity_model_handle(Lang::En, ModelSize::Trf), "en_core_web_trf");
        assert_eq!(entity_model_handle(Lang::Fr, ModelSize::Md), "fr_core_news_md");
        assert_eq!(entity_model_handle(Lang::De, ModelSize::Trf), "de_dep_news_trf");
        assert_eq!(entity_model_handle(Lang::Fr, ModelSize::Trf), "fr_dep_news_trf");
    }

    #[test]
    fn test_parse_choices() {
        for code in Lang::CHOICES {
            assert_eq!(code.parse::<Lang>().unwrap().code(), *code);
        }
        for code in ModelSize::CHOICES {
            assert_eq!(code.parse::<ModelSize>().unwrap().code(), *code);
        }
        assert!("es".parse::<Lang>().is_err());
    }

    #[test]
    fn test_embedding_dimensions() {
        assert_eq!(Lang::En.embedding_dimension(), 384);
        assert_eq!(Lang::De.embedding_dimension(), 384);
        assert_eq!(Lang::Fr.embedding_dimension(), 768);
        assert_eq!(Lang::Fr.sentence_transformers_model(), "Lajavaness/sentence-flaubert-base");
    }
}
