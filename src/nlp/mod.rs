pub mod bert;
pub mod tokenizer;
pub mod transcriber;
pub mod vietnamese;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::constants::{SP, UNK};

pub const PUNCTUATIONS: [&str; 10] = ["!", "?", "…", ",", ".", "'", "-", "\"", ":", ";"];
pub const PAD: &str = "_";

pub static SYMBOLS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let punctuation_symbols = {
        let mut v = PUNCTUATIONS.to_vec();
        v.extend([SP, UNK]);
        v
    };
    let mut normal = VI_MONOPHTHONGS.to_vec();
    normal.extend(VI_DIPHTHONGS);
    normal.extend(VI_CONSONANTS);
    normal.sort();
    normal.dedup();
    let mut symbols = Vec::with_capacity(1 + normal.len() + punctuation_symbols.len());
    symbols.push(PAD);
    symbols.extend(normal);
    symbols.extend(punctuation_symbols);
    symbols
});

pub static SYMBOL_ID_MAP: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    SYMBOLS
        .iter()
        .enumerate()
        .map(|(idx, &symbol)| (symbol, idx))
        .collect()
});

pub static SIL_PHONEME_IDS: Lazy<Vec<usize>> = Lazy::new(|| {
    PUNCTUATIONS
        .iter()
        .chain([SP, UNK].iter())
        .filter_map(|symbol| SYMBOL_ID_MAP.get(symbol).copied())
        .collect()
});

pub static LANGUAGE_ID_MAP: Lazy<HashMap<&'static str, usize>> =
    Lazy::new(|| HashMap::from_iter([("VI", 0usize)]));

pub static LANGUAGE_TONE_START_MAP: Lazy<HashMap<&'static str, usize>> =
    Lazy::new(|| HashMap::from_iter([("VI", 0usize)]));

pub const NUM_VI_TONES: usize = 6;
pub const NUM_TONES: usize = NUM_VI_TONES;
pub const NUM_LANGUAGES: usize = 1;

pub static VI_MONOPHTHONGS: &[&str] = &[
    "a", "ă", "â", "e", "ê", "i", "o", "ô", "ơ", "u", "ư", "ɯ", "ɛ", "ɔ", "ə",
];

pub static VI_DIPHTHONGS: &[&str] = &["ie", "iê", "uo", "uô", "ưo", "ươ", "ua", "uă"];

pub static VI_CONSONANTS: &[&str] = &[
    "b", "c", "d", "đ", "g", "h", "k", "kʰ", "l", "m", "n", "ŋ", "ɲ", "p", "r", "s", "t", "tʰ",
    "ʈ", "v", "x", "ʂ",
];

pub fn is_punctuation(text: &str) -> bool {
    PUNCTUATIONS.contains(&text)
}

pub fn is_symbol(text: &str) -> bool {
    SYMBOL_ID_MAP.contains_key(text)
}
