use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Vi,
}

impl Language {
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Vi => "VI",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

pub const DEFAULT_CONTINUATION_PREFIX: &str = "##";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_TONE: i32 = 1;
pub const UNK: &str = "UNK";
pub const SP: &str = "SP";
