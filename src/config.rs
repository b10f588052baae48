use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::{constants::DEFAULT_CONTINUATION_PREFIX, nlp::vietnamese::g2p::FallbackPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct G2pConfig {
    /// HuggingFace `tokenizer.json`; the whitespace tokenizer is used when absent.
    #[serde(default)]
    pub tokenizer: Option<PathBuf>,
    #[serde(default = "default_continuation_prefix")]
    pub continuation_prefix: String,
    /// `word<TAB>ipa` lexicon; the built-in lexicon is used when absent.
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    #[serde(default = "default_add_blank")]
    pub add_blank: bool,
}

fn default_continuation_prefix() -> String {
    DEFAULT_CONTINUATION_PREFIX.to_string()
}

const fn default_add_blank() -> bool {
    true
}

impl Default for G2pConfig {
    fn default() -> Self {
        Self {
            tokenizer: None,
            continuation_prefix: default_continuation_prefix(),
            lexicon: None,
            fallback: FallbackPolicy::default(),
            add_blank: default_add_blank(),
        }
    }
}

impl G2pConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let buf = fs::read_to_string(&path).with_context(|| {
            format!("failed to read G2P config from {}", path.as_ref().display())
        })?;
        let mut config: G2pConfig = serde_json::from_str(&buf).with_context(|| {
            format!("failed to parse G2P config JSON at {}", path.as_ref().display())
        })?;
        // Relative asset paths are resolved against the config file's directory.
        if let Some(base) = path.as_ref().parent() {
            config.tokenizer = config.tokenizer.map(|p| base.join(p));
            config.lexicon = config.lexicon.map(|p| base.join(p));
        }
        Ok(config)
    }
}
