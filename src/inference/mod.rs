//! Text models: entity recognition, tokenization and sentence embeddings.

mod embedding;
mod entities;
mod gazetteer;
mod models;
mod tokenizer;

pub use embedding::HashingEmbedder;
#[cfg(feature = "fastembed")]
pub use embedding::FastEmbedBackend;
pub use entities::RuleBasedRecognizer;
pub use models::{Lang, ModelSize, entity_model_handle};
pub use tokenizer::{Token, WordTokenizer};

use crate::error::Result;
use tracing::{debug, info};

/// A named entity found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Surface text as it appears in the document.
    pub text: String,
    /// Entity label, e.g. `PERSON` or `GPE`.
    pub label: String,
}

/// Extracts named entities from documents.
///
/// Shared by the worker threads of the ordered pool.
pub trait EntityBackend: Send + Sync {
    /// Entities of `text`, in document order.
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Turns documents into fixed-size vectors.
pub trait EmbeddingBackend {
    /// Length of every produced vector.
    fn embed_dimension(&self) -> usize;

    /// One vector per text, in order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Load the entity model for `lang` and `size`.
pub fn load_entity_backend(lang: Lang, size: ModelSize) -> Result<Box<dyn EntityBackend>> {
    let handle = entity_model_handle(lang, size);
    info!("Loading entity model {handle}");
    Ok(Box::new(RuleBasedRecognizer::new(lang)?))
}

/// Load the sentence embedding model for `lang`.
pub fn load_embedding_backend(lang: Lang) -> Result<Box<dyn EmbeddingBackend>> {
    info!(
        "Loading embedding model {}",
        lang.sentence_transformers_model()
    );

    #[cfg(feature = "fastembed")]
    {
        match FastEmbedBackend::new(lang) {
            Ok(backend) => return Ok(Box::new(backend)),
            Err(e) => tracing::warn!("{e}; falling back to hashed embeddings"),
        }
    }

    let backend = HashingEmbedder::new(lang)?;
    debug!("Using hashed embeddings of dimension {}", backend.embed_dimension());
    Ok(Box::new(backend))
}
