//! Vietnamese text front end for Style-BERT-VITS2 style speech synthesis:
//! normalization, subword-to-phoneme alignment, and model input sequencing.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod model;
pub mod nlp;
pub mod server;

pub use errors::{G2pError, Result, TranscriptionError};
pub use nlp::vietnamese::{
    distribute::distribute_phone,
    g2p::{Alignment, AlignmentDiagnostics, FallbackPolicy, G2p, PhoneAlignment, align},
    normalizer::normalize_text,
    segmenter::{Segmentation, segment, segment_transcription},
};
