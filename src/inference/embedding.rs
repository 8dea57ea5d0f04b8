//! Sentence embedding backends.

use crate::error::Result;
use crate::inference::{EmbeddingBackend, Lang, WordTokenizer};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

// Weight of a character trigram relative to a whole word.
const TRIGRAM_WEIGHT: f32 = 0.5;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET;
    for b in bytes {
        h ^= u64::from(*b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Embeds text by hashing words and character trigrams into a fixed number
/// of signed buckets.
///
/// Vectors are L2-normalized, so texts sharing words have a positive cosine
/// similarity. The output has the dimension of the sentence-transformers
/// model of the language, which keeps files interchangeable column-wise.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    tokenizer: WordTokenizer,
    dimension: usize,
}

impl HashingEmbedder {
    /// Embedder for `lang`.
    pub fn new(lang: Lang) -> Result<Self> {
        Ok(Self {
            tokenizer: WordTokenizer::new(lang)?,
            dimension: lang.embedding_dimension(),
        })
    }

    fn add(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = fnv1a(feature.as_bytes());
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (h % self.dimension as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in self.tokenizer.tokens(text) {
            if !token.is_word() {
                continue;
            }
            let word = token.text.to_lowercase();
            self.add(&mut vector, &word, 1.0);

            let padded: Vec<char> = format!("<{word}>").chars().collect();
            for trigram in padded.windows(3) {
                let trigram: String = trigram.iter().collect();
                self.add(&mut vector, &trigram, TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl EmbeddingBackend for HashingEmbedder {
    fn embed_dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(feature = "fastembed")]
pub use onnx::FastEmbedBackend;

#[cfg(feature = "fastembed")]
mod onnx {
    use crate::error::{Error, Result};
    use crate::inference::{EmbeddingBackend, Lang};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    /// Sentence-transformers models run through ONNX Runtime.
    pub struct FastEmbedBackend {
        model: TextEmbedding,
        dimension: usize,
    }

    impl FastEmbedBackend {
        /// Load the model for `lang`, downloading it on first use.
        pub fn new(lang: Lang) -> Result<Self> {
            let model = match lang {
                Lang::En => EmbeddingModel::AllMiniLML6V2,
                Lang::De => EmbeddingModel::ParaphraseMLMiniLML12V2,
                Lang::Fr => EmbeddingModel::ParaphraseMLMpnetBaseV2,
            };
            let options = InitOptions::new(model).with_show_download_progress(false);
            let model = TextEmbedding::try_new(options).map_err(|e| Error::Backend {
                reason: format!("failed to load embedding model: {e}"),
            })?;

            Ok(Self {
                model,
                dimension: lang.embedding_dimension(),
            })
        }
    }

    impl EmbeddingBackend for FastEmbedBackend {
        fn embed_dimension(&self) -> usize {
            self.dimension
        }

        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.model
                .embed(texts.to_vec(), Some(texts.len().max(1)))
                .map_err(|e| Error::Backend {
                    reason: format!("embedding failed: {e}"),
                })
        }
    }
}
