use thiserror::Error;

#[derive(Error, Debug)]
pub enum G2pError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    #[error("lexicon line {line}: {message}")]
    Lexicon { line: usize, message: String },
    #[error("unknown phone symbol '{0}'")]
    UnknownSymbol(String),
    #[error("word2ph length {actual} does not match feature sequence length {expected}")]
    Word2PhMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, G2pError>;

/// Failure reported by an IPA transcription engine for a single word.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("no transcription for word '{0}'")]
    UnknownWord(String),
    #[error("transcription of '{word}' failed: {message}")]
    Engine { word: String, message: String },
}
