use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which recognition engine a capture session feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Rendered equations to LaTeX markup
    #[default]
    Math,
    /// Multilingual OCR to plain text
    Text,
}

impl Mode {
    /// Noun used in the overlay hint
    pub fn target_noun(&self) -> &'static str {
        match self {
            Mode::Math => "equation",
            Mode::Text => "text",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Math => f.write_str("math"),
            Mode::Text => f.write_str("text"),
        }
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "math" | "latex" => Ok(Mode::Math),
            "text" | "ocr" => Ok(Mode::Text),
            other => Err(ParseModeError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseModeError {
    #[error("unknown mode '{0}', expected 'math' or 'text'")]
    Unknown(String),
}

/// Non-empty, ordered set of OCR language codes (`eng+fra+ara`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageSet(Vec<String>);

impl LanguageSet {
    pub fn new<I, S>(codes: I) -> Result<Self, ParseLanguageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut langs: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ParseLanguageError::InvalidCode(code.to_string()));
            }
            if !langs.iter().any(|l| l == code) {
                langs.push(code.to_string());
            }
        }

        if langs.is_empty() {
            return Err(ParseLanguageError::Empty);
        }
        Ok(Self(langs))
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self(vec!["eng".into(), "fra".into(), "ara".into()])
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("+"))
    }
}

impl FromStr for LanguageSet {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split('+'))
    }
}

impl TryFrom<String> for LanguageSet {
    type Error = ParseLanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageSet> for String {
    fn from(value: LanguageSet) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLanguageError {
    #[error("language set must not be empty")]
    Empty,

    #[error("invalid language code '{0}'")]
    InvalidCode(String),
}

/// Raw engine output, before any cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionResult {
    Math(String),
    Text { text: String, languages: LanguageSet },
}


/// What the user sees and what lands on the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResult {
    pub display_text: String,
    pub clipboard_payload: String,
    pub kind: Mode,
}

/// Which engines finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStatus {
    pub math: bool,
    pub text: bool,
}

impl BackendStatus {
    pub fn supports(&self, mode: Mode) -> bool {
        match mode {
            Mode::Math => self.math,
            Mode::Text => self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_set_parse() {
        let langs: LanguageSet = "eng+fra+ara".parse().unwrap();
        assert_eq!(langs.codes(), ["eng", "fra", "ara"]);
        assert_eq!(langs.to_string(), "eng+fra+ara");
    }

    #[test]
    fn test_language_set_dedupes_and_skips_blanks() {
        let langs: LanguageSet = " eng++fra+eng ".parse().unwrap();
        assert_eq!(langs.to_string(), "eng+fra");
    }

    #[test]
    fn test_language_set_rejects_empty() {
        assert_eq!("".parse::<LanguageSet>(), Err(ParseLanguageError::Empty));
        assert_eq!("+ +".parse::<LanguageSet>(), Err(ParseLanguageError::Empty));
    }

    #[test]
    fn test_language_set_rejects_shell_characters() {
        assert!(matches!(
            "eng+fr a".parse::<LanguageSet>(),
            Err(ParseLanguageError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("LaTeX".parse::<Mode>(), Ok(Mode::Math));
        assert_eq!("text".parse::<Mode>(), Ok(Mode::Text));
        assert_eq!(
            "image".parse::<Mode>(),
            Err(ParseModeError::Unknown("image".to_string()))
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let err = "Image".parse::<Mode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown mode 'image', expected 'math' or 'text'");

        let err = "eng+f;r".parse::<LanguageSet>().unwrap_err();
        assert_eq!(err.to_string(), "invalid language code 'f;r'");
        assert_eq!(
            ParseLanguageError::Empty.to_string(),
            "language set must not be empty"
        );
    }

    #[test]
    fn test_backend_status_supports() {
        let status = BackendStatus {
            math: true,
            text: false,
        };
        assert!(status.supports(Mode::Math));
        assert!(!status.supports(Mode::Text));
    }
}
