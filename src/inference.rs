use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::{
    config::G2pConfig,
    constants::Language,
    model::ModelInputs,
    nlp::{
        tokenizer::{HfSubwordTokenizer, SubwordTokenizer, WhitespaceTokenizer},
        transcriber::{LexiconTranscriber, Transcriber},
        vietnamese::{
            g2p::{Alignment, AlignmentDiagnostics, G2p},
            normalizer::normalize_text,
        },
    },
};

#[derive(Clone)]
pub struct Frontend {
    g2p: Arc<G2p>,
    add_blank: bool,
}

pub struct FrontendInput {
    pub text: String,
    /// Skip normalization when the caller already normalized the text.
    pub normalize: bool,
}

impl FrontendInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontendTimings {
    pub total_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontendResult {
    pub normalized: String,
    pub phones: Vec<String>,
    pub tones: Vec<i32>,
    pub word2ph: Vec<usize>,
    pub inputs: ModelInputs,
    /// Word whose transcription failed, when the utterance degraded to `UNK`.
    pub fallback: Option<String>,
    pub diagnostics: AlignmentDiagnostics,
    pub timings: FrontendTimings,
}

impl Frontend {
    pub fn new(g2p: G2p, add_blank: bool) -> Self {
        Self {
            g2p: Arc::new(g2p),
            add_blank,
        }
    }

    pub fn from_config(config: &G2pConfig) -> Result<Self> {
        let tokenizer: Box<dyn SubwordTokenizer> = match &config.tokenizer {
            Some(path) => {
                info!("loading subword tokenizer from {}", path.display());
                Box::new(HfSubwordTokenizer::from_file(
                    path,
                    config.continuation_prefix.clone(),
                )?)
            }
            None => {
                info!("no tokenizer configured, splitting on whitespace");
                Box::new(WhitespaceTokenizer)
            }
        };
        let transcriber: Box<dyn Transcriber> = match &config.lexicon {
            Some(path) => {
                let lexicon = LexiconTranscriber::load_from_file(path)
                    .with_context(|| format!("failed to load lexicon {}", path.display()))?;
                info!("loaded {} lexicon entries from {}", lexicon.len(), path.display());
                Box::new(lexicon)
            }
            None => Box::new(LexiconTranscriber::builtin()),
        };
        let g2p = G2p::new(tokenizer, transcriber).with_policy(config.fallback);
        Ok(Self::new(g2p, config.add_blank))
    }

    pub fn process(&self, input: &FrontendInput) -> Result<FrontendResult> {
        if input.text.trim().is_empty() {
            bail!("text input must not be empty");
        }

        let start = Instant::now();
        let normalized = if input.normalize {
            normalize_text(&input.text)
        } else {
            input.text.clone()
        };

        let alignment = self
            .g2p
            .g2p(&normalized)
            .with_context(|| format!("failed to align '{normalized}'"))?;
        let (fallback, diagnostics) = match &alignment {
            Alignment::Aligned { diagnostics, .. } => (None, *diagnostics),
            Alignment::Fallback(fallback) => {
                (Some(fallback.word.clone()), AlignmentDiagnostics::default())
            }
        };
        let alignment = alignment.into_alignment();
        let inputs = ModelInputs::build(&alignment, Language::Vi, self.add_blank)
            .context("failed to build model inputs")?;
        let (phones, tones, word2ph) = alignment.into_parts();

        Ok(FrontendResult {
            normalized,
            phones,
            tones,
            word2ph,
            inputs,
            fallback,
            diagnostics,
            timings: FrontendTimings {
                total_ms: start.elapsed().as_millis(),
            },
        })
    }

    /// Processes independent utterances in parallel; results keep input order.
    pub fn process_batch(&self, inputs: &[FrontendInput]) -> Vec<Result<FrontendResult>> {
        inputs.par_iter().map(|input| self.process(input)).collect()
    }
}
