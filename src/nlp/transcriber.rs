use std::{collections::HashMap, fs, path::Path};

use once_cell::sync::Lazy;

use crate::errors::{G2pError, Result, TranscriptionError};

/// Converts one word (no internal whitespace) into an IPA string whose
/// syllables are separated by spaces and optionally end in a tone digit.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, word: &str) -> std::result::Result<String, TranscriptionError>;
}

static BUILTIN_LEXICON: Lazy<LexiconTranscriber> = Lazy::new(|| {
    LexiconTranscriber::parse(include_str!("../../resources/vi-lexicon.tsv"))
        .expect("built-in lexicon is well formed")
});

/// Dictionary transcriber reading `word<TAB>ipa` lines.
#[derive(Debug, Clone, Default)]
pub struct LexiconTranscriber {
    entries: HashMap<String, String>,
}

impl LexiconTranscriber {
    pub fn builtin() -> Self {
        BUILTIN_LEXICON.clone()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(&path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for (idx, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, ipa) = line.split_once('\t').ok_or_else(|| G2pError::Lexicon {
                line: idx + 1,
                message: "expected `word<TAB>ipa`".to_string(),
            })?;
            let word = word.trim();
            if word.is_empty() {
                return Err(G2pError::Lexicon {
                    line: idx + 1,
                    message: "empty word".to_string(),
                });
            }
            entries.insert(word.to_lowercase(), ipa.trim().to_string());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Transcriber for LexiconTranscriber {
    fn transcribe(&self, word: &str) -> std::result::Result<String, TranscriptionError> {
        self.entries
            .get(&word.to_lowercase())
            .cloned()
            .ok_or_else(|| TranscriptionError::UnknownWord(word.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lexicon_covers_greeting() {
        let lexicon = LexiconTranscriber::builtin();
        assert!(!lexicon.is_empty());
        assert_eq!(lexicon.transcribe("Xin").as_deref(), Ok("sin1"));
        assert_eq!(lexicon.transcribe("chào").as_deref(), Ok("cau2"));
    }

    #[test]
    fn unknown_word_is_an_error() {
        let lexicon = LexiconTranscriber::builtin();
        assert_eq!(
            lexicon.transcribe("qwerty"),
            Err(TranscriptionError::UnknownWord("qwerty".to_string()))
        );
    }

    #[test]
    fn parse_skips_comments_and_reports_bad_lines() {
        let lexicon = LexiconTranscriber::parse("# header\n\nba\tba1\n").expect("parse");
        assert_eq!(lexicon.len(), 1);

        let err = LexiconTranscriber::parse("ba\tba1\nbroken line\n").unwrap_err();
        assert!(matches!(err, G2pError::Lexicon { line: 2, .. }));
    }
}
