use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Languages the pipeline can dub into.
///
/// The lowercase code is what clients send and what appears in job state,
/// object keys and workspace file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Hindi,
    Tamil,
    Bengali,
    Telugu,
    Marathi,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 5] = [
        TargetLanguage::Hindi,
        TargetLanguage::Tamil,
        TargetLanguage::Bengali,
        TargetLanguage::Telugu,
        TargetLanguage::Marathi,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::Hindi => "hindi",
            TargetLanguage::Tamil => "tamil",
            TargetLanguage::Bengali => "bengali",
            TargetLanguage::Telugu => "telugu",
            TargetLanguage::Marathi => "marathi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Hindi => "Hindi",
            TargetLanguage::Tamil => "Tamil",
            TargetLanguage::Bengali => "Bengali",
            TargetLanguage::Telugu => "Telugu",
            TargetLanguage::Marathi => "Marathi",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            TargetLanguage::Hindi => "हिंदी",
            TargetLanguage::Tamil => "தமிழ்",
            TargetLanguage::Bengali => "বাংলা",
            TargetLanguage::Telugu => "తెలుగు",
            TargetLanguage::Marathi => "मराठी",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported target language {0:?}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for TargetLanguage {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TargetLanguage::ALL
            .into_iter()
            .find(|language| language.code() == wanted)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
