use serde::{Deserialize, Serialize};

/// Dub language a credit record is kept for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Japanese,
    English,
}

impl Language {
    pub const ALL: &[Language] = &[Self::Japanese, Self::English];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Japanese => "japanese",
            Self::English => "english",
        }
    }

    /// Case-insensitive match against the recognized language labels.
    ///
    /// Anything else, including the empty string, is not a language we track.
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded actor credits for one title, one string per language.
///
/// Each string follows `Char A, Char B: Actor|Char C: Other Actor`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRecord {
    #[serde(default)]
    pub japanese: String,
    #[serde(default)]
    pub english: String,
}

impl CreditRecord {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Japanese => &self.japanese,
            Language::English => &self.english,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.japanese.is_empty() && self.english.is_empty()
    }

    /// JSON form written to the `credits` column.
    pub fn to_storage(&self) -> String {
        serde_json::json!({
            "japanese": self.japanese,
            "english": self.english,
        })
        .to_string()
    }

    /// Read a stored `credits` column value.
    ///
    /// Rows written before credits were split per language hold a bare
    /// string; anything that isn't a JSON object is kept whole as the
    /// Japanese credits.
    pub fn from_storage(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => {
                let field = |key: &str| {
                    map.get(key)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string()
                };
                Self {
                    japanese: field("japanese"),
                    english: field("english"),
                }
            }
            _ => {
                if !raw.is_empty() {
                    tracing::debug!(len = raw.len(), "legacy credits value, reading as japanese");
                }
                Self {
                    japanese: raw.to_string(),
                    english: String::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_labels_are_case_insensitive() {
        assert_eq!(Language::from_label("japanese"), Some(Language::Japanese));
        assert_eq!(Language::from_label("JAPANESE"), Some(Language::Japanese));
        assert_eq!(Language::from_label("English"), Some(Language::English));
        assert_eq!(Language::from_label("french"), None);
        assert_eq!(Language::from_label(""), None);
    }

    #[test]
    fn test_storage_roundtrip() {
        let record = CreditRecord {
            japanese: "A, B: Va1|C: Va2".into(),
            english: "A: Eng1".into(),
        };
        let stored = record.to_storage();
        assert_eq!(CreditRecord::from_storage(&stored), record);
    }

    #[test]
    fn test_legacy_plain_string_becomes_japanese() {
        let record = CreditRecord::from_storage("Naruto Uzumaki");
        assert_eq!(record.japanese, "Naruto Uzumaki");
        assert_eq!(record.english, "");
    }

    #[test]
    fn test_non_object_json_is_legacy() {
        let record = CreditRecord::from_storage("42");
        assert_eq!(record.japanese, "42");
        assert!(record.english.is_empty());
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let record = CreditRecord::from_storage(r#"{"english": "X: Y"}"#);
        assert_eq!(record.japanese, "");
        assert_eq!(record.english, "X: Y");

        let record = CreditRecord::from_storage(r#"{"japanese": 7}"#);
        assert!(record.is_empty());
    }

    #[test]
    fn test_empty_column() {
        assert!(CreditRecord::from_storage("").is_empty());
    }
}
