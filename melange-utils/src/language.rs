use serde::{Deserialize, Serialize};

/// Languages the catalog carries localized strings for. German is the
/// app's primary language, English the fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
}

impl Language {
    /// Parse a language tag, accepting region variants like `de-AT`.
    /// Anything that is not German resolves to English.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase();
        if normalized == "de" || normalized.starts_with("de-") {
            Language::De
        } else {
            Language::En
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn parses_language_tags() {
        assert_eq!(Language::from_tag("de"), Language::De);
        assert_eq!(Language::from_tag("de-AT"), Language::De);
        assert_eq!(Language::from_tag("  DE "), Language::De);
        assert_eq!(Language::from_tag("en"), Language::En);
        assert_eq!(Language::from_tag("en-US"), Language::En);
        assert_eq!(Language::from_tag("fr"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
    }
}
