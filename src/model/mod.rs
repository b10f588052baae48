use serde::Serialize;

use crate::{
    constants::Language,
    errors::{G2pError, Result},
    nlp::{LANGUAGE_ID_MAP, LANGUAGE_TONE_START_MAP, SYMBOL_ID_MAP, vietnamese::g2p::PhoneAlignment},
};

/// Integer sequences fed to a VITS-style acoustic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInputs {
    pub phone_ids: Vec<i64>,
    pub tone_ids: Vec<i64>,
    pub lang_ids: Vec<i64>,
    pub word2ph: Vec<usize>,
}

impl ModelInputs {
    /// Maps phones to symbol ids and tones to language-offset tone ids. With
    /// `add_blank` a blank (id 0) is placed around every phone and `word2ph`
    /// is scaled so it still sums to the sequence length.
    pub fn build(alignment: &PhoneAlignment, language: Language, add_blank: bool) -> Result<Self> {
        let code = language.as_code();
        let language_id = *LANGUAGE_ID_MAP
            .get(code)
            .ok_or_else(|| G2pError::Config(format!("language id for {code} not found")))?
            as i64;
        let tone_start = *LANGUAGE_TONE_START_MAP
            .get(code)
            .ok_or_else(|| G2pError::Config(format!("tone start for {code} not found")))?
            as i64;

        let mut phone_ids = Vec::with_capacity(alignment.phones.len());
        for phone in &alignment.phones {
            let id = SYMBOL_ID_MAP
                .get(phone.as_str())
                .copied()
                .ok_or_else(|| G2pError::UnknownSymbol(phone.clone()))?;
            phone_ids.push(id as i64);
        }

        let mut tone_ids: Vec<i64> = alignment
            .tones
            .iter()
            .map(|&tone| tone_start + tone as i64)
            .collect();
        let mut lang_ids = vec![language_id; phone_ids.len()];
        let mut word2ph = alignment.word2ph.clone();

        if add_blank {
            phone_ids = intersperse(&phone_ids, 0);
            tone_ids = intersperse(&tone_ids, 0);
            lang_ids = intersperse(&lang_ids, language_id);
            for val in &mut word2ph {
                *val *= 2;
            }
            if let Some(first) = word2ph.first_mut() {
                *first += 1;
            }
        }

        Ok(Self {
            phone_ids,
            tone_ids,
            lang_ids,
            word2ph,
        })
    }
}

fn intersperse(values: &[i64], blank: i64) -> Vec<i64> {
    let mut result = Vec::with_capacity(values.len() * 2 + 1);
    for value in values {
        result.push(blank);
        result.push(*value);
    }
    result.push(blank);
    result
}
