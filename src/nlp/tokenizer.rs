use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::{
    errors::{G2pError, Result},
    nlp::PUNCTUATIONS,
};

/// One tokenizer piece with its continuation marker already removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubwordPiece {
    pub text: String,
    pub is_continuation: bool,
}

impl SubwordPiece {
    pub fn head(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_continuation: false,
        }
    }

    pub fn continuation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_continuation: true,
        }
    }

    /// Classifies a raw token by its continuation prefix and strips it.
    pub fn from_token(token: &str, continuation_prefix: &str) -> Self {
        match token.strip_prefix(continuation_prefix) {
            Some(rest) if !continuation_prefix.is_empty() => Self::continuation(rest),
            _ => Self::head(token),
        }
    }
}

pub trait SubwordTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<SubwordPiece>>;
}

/// Word-piece tokenizer backed by a HuggingFace `tokenizer.json`.
pub struct HfSubwordTokenizer {
    tokenizer: Tokenizer,
    continuation_prefix: String,
}

impl HfSubwordTokenizer {
    pub fn new(tokenizer: Tokenizer, continuation_prefix: impl Into<String>) -> Self {
        Self {
            tokenizer,
            continuation_prefix: continuation_prefix.into(),
        }
    }

    pub fn from_file(path: &Path, continuation_prefix: impl Into<String>) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            G2pError::Tokenizer(format!(
                "failed to load tokenizer from {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(tokenizer, continuation_prefix))
    }
}

impl SubwordTokenizer for HfSubwordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<SubwordPiece>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| G2pError::Tokenizer(format!("failed to tokenize '{text}': {e}")))?;
        Ok(encoding
            .get_tokens()
            .iter()
            .map(|token| SubwordPiece::from_token(token, &self.continuation_prefix))
            .collect())
    }
}

static WORD_OR_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    let punct = PUNCTUATIONS
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("");
    Regex::new(&format!(r"[^\s{punct}]+|[{punct}]")).expect("word regex")
});

/// Splits on whitespace and punctuation; every piece is a head piece. Used when
/// no pretrained tokenizer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl SubwordTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<SubwordPiece>> {
        Ok(WORD_OR_PUNCTUATION
            .find_iter(text)
            .map(|m| SubwordPiece::head(m.as_str()))
            .collect())
    }
}
