//! Types representing the different Gemini models which can be used.

use std::fmt;

/// References a specific Gemini model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelRef {
    /// The Gemini 1.5 flash LLM.
    #[default]
    Gemini15Flash,
    /// The Gemini 1.5 pro LLM.
    Gemini15Pro,
    /// The Gemini 2 flash LLM.
    Gemini20Flash,
    /// The Gemini 2.5 flash LLM.
    Gemini25Flash,
    /// The Gemini 2.5 flash-lite LLM.
    Gemini25FlashLite,
    /// Any other model identifier accepted by the API.
    Custom(String),
}

impl ModelRef {
    fn known() -> &'static [ModelRef] {
        use ModelRef::*;
        &[
            Gemini15Flash,
            Gemini15Pro,
            Gemini20Flash,
            Gemini25Flash,
            Gemini25FlashLite,
        ]
    }

    /// The identifier used in API paths.
    pub fn model_str(&self) -> &str {
        use ModelRef::*;
        match self {
            Gemini15Flash => "gemini-1.5-flash",
            Gemini15Pro => "gemini-1.5-pro",
            Gemini20Flash => "gemini-2.0-flash",
            Gemini25Flash => "gemini-2.5-flash",
            Gemini25FlashLite => "gemini-2.5-flash-lite",
            Custom(s) => s.as_str(),
        }
    }
}

impl From<&str> for ModelRef {
    fn from(s: &str) -> ModelRef {
        let s = s.trim();
        let s = s.strip_prefix("models/").unwrap_or(s);
        for candidate in ModelRef::known() {
            if candidate.model_str() == s {
                return candidate.clone();
            }
        }
        ModelRef::Custom(s.to_string())
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_str())
    }
}
