use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{DEFAULT_TONE, UNK},
    errors::{Result, TranscriptionError},
    nlp::{
        PAD, is_punctuation,
        tokenizer::{SubwordPiece, SubwordTokenizer},
        transcriber::Transcriber,
    },
};

use super::{distribute::distribute_phone, segmenter::segment_transcription};

/// What to do when the transcription engine fails on a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Discard the whole utterance and report a single `UNK`.
    #[default]
    Utterance,
    /// Replace only the failing word with `UNK` and keep going.
    Word,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhoneAlignment {
    pub phones: Vec<String>,
    pub tones: Vec<i32>,
    pub word2ph: Vec<usize>,
}

impl PhoneAlignment {
    /// `tones` matches `phones` one to one and `word2ph` accounts for every phone.
    pub fn is_consistent(&self) -> bool {
        self.phones.len() == self.tones.len()
            && self.word2ph.iter().sum::<usize>() == self.phones.len()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<i32>, Vec<usize>) {
        (self.phones, self.tones, self.word2ph)
    }

    fn push_punctuation(&mut self, symbol: &str) {
        self.phones.push(symbol.to_string());
        self.tones.push(0);
        self.word2ph.push(1);
    }

    fn push_word(&mut self, phones: Vec<String>, tones: Vec<i32>, n_pieces: usize) {
        self.word2ph.extend(distribute_phone(phones.len(), n_pieces));
        self.phones.extend(phones);
        self.tones.extend(tones);
    }

    fn wrap_with_pad(mut self) -> Self {
        self.phones.insert(0, PAD.to_string());
        self.phones.push(PAD.to_string());
        self.tones.insert(0, 0);
        self.tones.push(0);
        self.word2ph.insert(0, 1);
        self.word2ph.push(1);
        self
    }
}

/// Counters for the inputs that were silently dropped during alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentDiagnostics {
    pub skipped_chars: usize,
    pub dropped_groups: usize,
    pub unk_words: usize,
}

/// Degraded result when a word could not be transcribed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub word: String,
    pub error: TranscriptionError,
}

impl Fallback {
    /// The degraded triple: `(["UNK"], [1], [1])`.
    pub fn into_alignment(self) -> PhoneAlignment {
        PhoneAlignment {
            phones: vec![UNK.to_string()],
            tones: vec![DEFAULT_TONE],
            word2ph: vec![1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    Aligned {
        alignment: PhoneAlignment,
        diagnostics: AlignmentDiagnostics,
    },
    Fallback(Fallback),
}

impl Alignment {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Alignment::Fallback(_))
    }

    pub fn into_alignment(self) -> PhoneAlignment {
        match self {
            Alignment::Aligned { alignment, .. } => alignment,
            Alignment::Fallback(fallback) => fallback.into_alignment(),
        }
    }
}

/// Groups pieces into words: a head piece opens a group, continuation pieces
/// join the current one. A continuation with no open group opens its own.
pub fn group_pieces(pieces: &[SubwordPiece]) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    for piece in pieces {
        match groups.last_mut() {
            Some(group) if piece.is_continuation => group.push(piece.text.clone()),
            _ => groups.push(vec![piece.text.clone()]),
        }
    }
    groups
}

pub fn align(
    pieces: &[SubwordPiece],
    transcriber: &dyn Transcriber,
    policy: FallbackPolicy,
) -> Alignment {
    let mut alignment = PhoneAlignment::default();
    let mut diagnostics = AlignmentDiagnostics::default();

    for group in group_pieces(pieces) {
        let text = group.concat();

        if is_punctuation(&text) {
            alignment.push_punctuation(&text);
            continue;
        }

        let ipa = match transcriber.transcribe(&text) {
            Ok(ipa) => ipa,
            Err(error) => match policy {
                FallbackPolicy::Utterance => {
                    debug!("transcription failed for '{text}', degrading utterance: {error}");
                    return Alignment::Fallback(Fallback { word: text, error });
                }
                FallbackPolicy::Word => {
                    debug!("transcription failed for '{text}', substituting {UNK}: {error}");
                    diagnostics.unk_words += 1;
                    alignment.push_word(vec![UNK.to_string()], vec![DEFAULT_TONE], group.len());
                    continue;
                }
            },
        };

        let segmentation = segment_transcription(&ipa);
        diagnostics.skipped_chars += segmentation.skipped;
        if segmentation.is_empty() {
            debug!("no known phones in '{ipa}' for '{text}', dropping word");
            diagnostics.dropped_groups += 1;
            continue;
        }
        alignment.push_word(segmentation.phones, segmentation.tones, group.len());
    }

    Alignment::Aligned {
        alignment: alignment.wrap_with_pad(),
        diagnostics,
    }
}

/// Grapheme-to-phoneme front end over injected tokenizer and transcriber.
pub struct G2p {
    tokenizer: Box<dyn SubwordTokenizer>,
    transcriber: Box<dyn Transcriber>,
    policy: FallbackPolicy,
}

impl G2p {
    pub fn new(tokenizer: Box<dyn SubwordTokenizer>, transcriber: Box<dyn Transcriber>) -> Self {
        Self {
            tokenizer,
            transcriber,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn g2p(&self, norm_text: &str) -> Result<Alignment> {
        let pieces = self.tokenizer.tokenize(norm_text)?;
        Ok(align(&pieces, self.transcriber.as_ref(), self.policy))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::nlp::{
        tokenizer::WhitespaceTokenizer, transcriber::LexiconTranscriber,
        vietnamese::normalizer::normalize_text,
    };

    struct StubTranscriber(HashMap<&'static str, &'static str>);

    impl Transcriber for StubTranscriber {
        fn transcribe(&self, word: &str) -> std::result::Result<String, TranscriptionError> {
            self.0
                .get(word)
                .map(|s| s.to_string())
                .ok_or_else(|| TranscriptionError::Engine {
                    word: word.to_string(),
                    message: "stub failure".to_string(),
                })
        }
    }

    struct StubTokenizer(Vec<SubwordPiece>);

    impl SubwordTokenizer for StubTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<SubwordPiece>> {
            Ok(self.0.clone())
        }
    }

    fn stub() -> StubTranscriber {
        StubTranscriber(HashMap::from([
            ("Xin", "sin1"),
            ("người", "ŋươi2"),
            ("kha", "kʰa"),
            ("zzz", "zzj3"),
        ]))
    }

    fn heads(words: &[&str]) -> Vec<SubwordPiece> {
        words.iter().map(|w| SubwordPiece::head(*w)).collect()
    }

    fn aligned(alignment: Alignment) -> (PhoneAlignment, AlignmentDiagnostics) {
        match alignment {
            Alignment::Aligned {
                alignment,
                diagnostics,
            } => (alignment, diagnostics),
            Alignment::Fallback(fallback) => panic!("unexpected fallback: {fallback:?}"),
        }
    }

    #[test]
    fn greeting_is_aligned_and_padded() {
        let pieces = heads(&["Xin", "chào", ",", "thế", "giới", "!"]);
        let lexicon = LexiconTranscriber::builtin();
        let (result, diagnostics) = aligned(align(&pieces, &lexicon, FallbackPolicy::Utterance));

        assert_eq!(
            result.phones,
            vec!["_", "s", "i", "n", "c", "a", "u", ",", "tʰ", "ê", "d", "ơ", "i", "!", "_"]
        );
        assert_eq!(
            result.tones,
            vec![0, 1, 1, 1, 2, 2, 2, 0, 5, 5, 5, 5, 5, 0, 0]
        );
        assert_eq!(result.word2ph, vec![1, 3, 3, 1, 2, 3, 1, 1]);
        assert!(result.is_consistent());
        assert_eq!(diagnostics, AlignmentDiagnostics::default());
    }

    #[test]
    fn continuation_pieces_share_the_word_phones() {
        let pieces = vec![SubwordPiece::head("ng"), SubwordPiece::continuation("ười")];
        let (result, _) = aligned(align(&pieces, &stub(), FallbackPolicy::Utterance));
        assert_eq!(result.phones, vec!["_", "ŋ", "ươ", "i", "_"]);
        assert_eq!(result.tones, vec![0, 2, 2, 2, 0]);
        assert_eq!(result.word2ph, vec![1, 2, 1, 1]);
    }

    #[test]
    fn punctuation_passes_through_without_transcription() {
        let pieces = heads(&["!"]);
        let (result, _) = aligned(align(&pieces, &stub(), FallbackPolicy::Utterance));
        assert_eq!(result.phones, vec!["_", "!", "_"]);
        assert_eq!(result.tones, vec![0, 0, 0]);
        assert_eq!(result.word2ph, vec![1, 1, 1]);
    }

    #[test]
    fn aspirated_consonant_and_default_tone() {
        let (result, _) = aligned(align(&heads(&["kha"]), &stub(), FallbackPolicy::Utterance));
        assert_eq!(result.phones, vec!["_", "kʰ", "a", "_"]);
        assert_eq!(result.tones, vec![0, 1, 1, 0]);
    }

    #[test]
    fn empty_segmentation_drops_the_group() {
        let pieces = heads(&["Xin", "zzz", "!"]);
        let (result, diagnostics) = aligned(align(&pieces, &stub(), FallbackPolicy::Utterance));
        assert_eq!(result.word2ph, vec![1, 3, 1, 1]);
        assert!(result.is_consistent());
        assert_eq!(diagnostics.dropped_groups, 1);
        assert_eq!(diagnostics.skipped_chars, 3);
    }

    #[test]
    fn transcription_failure_degrades_whole_utterance() {
        let pieces = heads(&["Xin", "lỗi", "!"]);
        let result = align(&pieces, &stub(), FallbackPolicy::Utterance);
        assert!(result.is_fallback());
        let Alignment::Fallback(ref fallback) = result else {
            unreachable!()
        };
        assert_eq!(fallback.word, "lỗi");

        let (phones, tones, word2ph) = result.into_alignment().into_parts();
        assert_eq!(phones, vec!["UNK"]);
        assert_eq!(tones, vec![1]);
        assert_eq!(word2ph.iter().sum::<usize>(), phones.len());
    }

    #[test]
    fn word_policy_substitutes_unk_for_the_failing_word() {
        let pieces = vec![
            SubwordPiece::head("Xin"),
            SubwordPiece::head("lỗ"),
            SubwordPiece::continuation("i"),
        ];
        let (result, diagnostics) = aligned(align(&pieces, &stub(), FallbackPolicy::Word));
        assert_eq!(result.phones, vec!["_", "s", "i", "n", "UNK", "_"]);
        assert_eq!(result.tones, vec![0, 1, 1, 1, 1, 0]);
        assert_eq!(result.word2ph, vec![1, 3, 1, 0, 1]);
        assert!(result.is_consistent());
        assert_eq!(diagnostics.unk_words, 1);
    }

    #[test]
    fn empty_input_is_just_boundaries() {
        let (result, _) = aligned(align(&[], &stub(), FallbackPolicy::Utterance));
        assert_eq!(result.phones, vec!["_", "_"]);
        assert_eq!(result.tones, vec![0, 0]);
        assert_eq!(result.word2ph, vec![1, 1]);
    }

    #[test]
    fn leading_continuation_opens_a_group() {
        let pieces = vec![SubwordPiece::continuation("ab"), SubwordPiece::continuation("c")];
        assert_eq!(group_pieces(&pieces), vec![vec!["ab".to_string(), "c".to_string()]]);
    }

    #[test]
    fn g2p_uses_the_injected_tokenizer() {
        let tokenizer = StubTokenizer(vec![
            SubwordPiece::head("ng"),
            SubwordPiece::continuation("ười"),
            SubwordPiece::head("!"),
        ]);
        let g2p = G2p::new(Box::new(tokenizer), Box::new(stub()));
        let result = g2p.g2p("người!").expect("g2p").into_alignment();
        assert_eq!(result.word2ph, vec![1, 2, 1, 1, 1]);
        assert!(result.is_consistent());
    }

    #[test]
    fn invariant_holds_for_normalized_sentences() {
        let g2p = G2p::new(
            Box::new(WhitespaceTokenizer),
            Box::new(LexiconTranscriber::builtin()),
        );
        let sentences = [
            "Xin   chào,thế giới!",
            "Tôi là người Việt Nam.",
            "Cảm ơn bạn ; rất vui !",
            "Hà Nội… Sài Gòn",
        ];
        for sentence in sentences {
            let normalized = normalize_text(sentence);
            let result = g2p.g2p(&normalized).expect("g2p");
            assert!(!result.is_fallback(), "fallback for {normalized:?}");
            let result = result.into_alignment();
            assert!(result.is_consistent(), "{normalized:?}: {result:?}");
            assert_eq!(result.phones.first().map(String::as_str), Some(PAD));
            assert_eq!(result.phones.last().map(String::as_str), Some(PAD));
            assert_eq!(result.tones.first(), Some(&0));
            assert_eq!(result.tones.last(), Some(&0));
            assert_eq!(result.word2ph.first(), Some(&1));
            assert_eq!(result.word2ph.last(), Some(&1));
        }
    }
}
