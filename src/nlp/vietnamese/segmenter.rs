use tracing::trace;

use crate::{constants::DEFAULT_TONE, nlp::is_symbol};

const MATCH_LENGTHS: [usize; 2] = [2, 1];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub phones: Vec<String>,
    pub tones: Vec<i32>,
    /// Characters that matched no symbol and were dropped.
    pub skipped: usize,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    fn extend(&mut self, other: Segmentation) {
        self.phones.extend(other.phones);
        self.tones.extend(other.tones);
        self.skipped += other.skipped;
    }
}

/// Segments a full transcription as returned by the IPA engine: one unit per
/// whitespace-separated syllable, each with its own trailing tone digit.
pub fn segment_transcription(ipa: &str) -> Segmentation {
    let mut result = Segmentation::default();
    for unit in ipa.split_whitespace() {
        result.extend(segment(unit));
    }
    result
}

/// Greedy longest-match segmentation of a single transcription unit.
///
/// A trailing ASCII digit `0`-`6` is the tone of every emitted phone; without
/// one the tone is 1. Digits `7`-`9` are stripped and also give tone 1. Other
/// Unicode decimal digits are not tone marks. Characters that start no known
/// symbol are skipped.
pub fn segment(unit: &str) -> Segmentation {
    let (body, tone) = split_tone(unit);
    let chars: Vec<char> = body.chars().collect();

    let mut result = Segmentation::default();
    let mut pos = 0usize;
    while pos < chars.len() {
        let matched = MATCH_LENGTHS.iter().find_map(|&len| {
            if pos + len > chars.len() {
                return None;
            }
            let candidate: String = chars[pos..pos + len].iter().collect();
            is_symbol(&candidate).then_some((candidate, len))
        });

        match matched {
            Some((symbol, len)) => {
                result.phones.push(symbol);
                result.tones.push(tone);
                pos += len;
            }
            None => {
                trace!("skipping unknown character {:?} in '{}'", chars[pos], unit);
                result.skipped += 1;
                pos += 1;
            }
        }
    }
    result
}

fn split_tone(unit: &str) -> (&str, i32) {
    let Some(last) = unit.chars().last() else {
        return (unit, DEFAULT_TONE);
    };
    let Some(digit) = last.to_digit(10) else {
        return (unit, DEFAULT_TONE);
    };
    let body = &unit[..unit.len() - last.len_utf8()];
    let tone = digit as i32;
    if (0..=6).contains(&tone) {
        (body, tone)
    } else {
        trace!("tone digit {digit} out of range in '{unit}', using default");
        (body, DEFAULT_TONE)
    }
}
