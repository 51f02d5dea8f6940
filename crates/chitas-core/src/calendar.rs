use serde::{Deserialize, Serialize};

use crate::state::Language;

/// A field supplied by the feed in both English and Hebrew
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub he: Option<String>,
}

impl Bilingual {
    pub fn new(en: &str, he: &str) -> Self {
        Self {
            en: Some(en.to_string()),
            he: Some(he.to_string()),
        }
    }

    pub fn english(en: &str) -> Self {
        Self {
            en: Some(en.to_string()),
            he: None,
        }
    }

    /// Entry for `language`, falling back to English when it is missing or blank.
    pub fn get(&self, language: Language) -> &str {
        let preferred = match language {
            Language::En => self.en.as_deref(),
            Language::He => self.he.as_deref(),
        };
        preferred
            .filter(|value| !value.is_empty())
            .or(self.en.as_deref())
            .unwrap_or("")
    }
}

/// One daily-study entry from the calendar feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    #[serde(default)]
    pub title: Bilingual,
    #[serde(default)]
    pub display_value: Bilingual,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl CalendarItem {
    /// Stable key within one day's feed.
    pub fn english_title(&self) -> &str {
        self.title.en.as_deref().unwrap_or("")
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.trim().is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Raw shape of the calendar endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct CalendarFeed {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub calendar_items: Vec<CalendarItem>,
}

/// Today's feed plus the date it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSnapshot {
    /// Date string as issued by the feed (e.g. `2024-01-15`).
    pub date: String,
    /// Hebrew date from the converter, or `date` when conversion failed.
    /// Empty when the feed carried no date.
    pub localized_date: String,
    pub items: Vec<CalendarItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilingual_falls_back_to_english() {
        let value = Bilingual::english("X");
        assert_eq!(value.get(Language::He), "X");
        assert_eq!(value.get(Language::En), "X");
    }

    #[test]
    fn test_bilingual_prefers_requested_language() {
        let value = Bilingual::new("Bereshit", "בראשית");
        assert_eq!(value.get(Language::He), "בראשית");
        assert_eq!(value.get(Language::En), "Bereshit");
    }

    #[test]
    fn test_blank_hebrew_falls_back() {
        let value = Bilingual {
            en: Some("Tanya".to_string()),
            he: Some(String::new()),
        };
        assert_eq!(value.get(Language::He), "Tanya");
    }

    #[test]
    fn test_item_deserializes_feed_shape() {
        let item: CalendarItem = serde_json::from_value(serde_json::json!({
            "title": {"en": "Parashat Hashavua", "he": "פרשת השבוע"},
            "displayValue": {"en": "Bo", "he": "בא"},
            "url": "Exodus.10.1-13.16",
            "ref": "Exodus 10:1-13:16",
            "order": 1,
            "category": "Tanakh",
            "extraDetails": {"aliyot": []}
        }))
        .unwrap();

        assert_eq!(item.english_title(), "Parashat Hashavua");
        assert_eq!(item.display_value.get(Language::He), "בא");
        assert_eq!(item.reference(), Some("Exodus 10:1-13:16"));
        assert_eq!(item.category.as_deref(), Some("Tanakh"));
    }

    #[test]
    fn test_empty_ref_is_absent() {
        let item: CalendarItem = serde_json::from_value(serde_json::json!({
            "title": {"en": "Learning Schedule"},
            "displayValue": {"en": "Day 3"},
            "ref": "",
            "url": "topics/daily-learning"
        }))
        .unwrap();

        assert_eq!(item.reference(), None);
        assert_eq!(item.url(), Some("topics/daily-learning"));
    }
}
