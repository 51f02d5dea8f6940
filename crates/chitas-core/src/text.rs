use serde::{Deserialize, Serialize};

/// Body of a text response: one passage, or a sequence of lines and chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBody {
    Single(String),
    Sections(Vec<Option<Section>>),
}

/// One element of a sequence body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Line(String),
    /// Verses of one chapter; null verses are kept so positions stay 1-based and stable.
    Chapter(Vec<Option<String>>),
    /// Anything deeper or stranger than the two known nesting depths.
    Unrecognized(serde_json::Value),
}

/// Response of the text-by-reference endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextResponse {
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub he: Option<TextBody>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default, rename = "heRef")]
    pub he_reference: Option<String>,
    /// The library reports unknown references with a 200 and this field.
    #[serde(default)]
    pub error: Option<String>,
}

impl TextBody {
    pub fn is_empty(&self) -> bool {
        match self {
            TextBody::Single(text) => text.trim().is_empty(),
            TextBody::Sections(sections) => sections.iter().all(|section| match section {
                None => true,
                Some(Section::Line(line)) => line.trim().is_empty(),
                Some(Section::Chapter(verses)) => verses
                    .iter()
                    .all(|verse| verse.as_deref().map_or(true, |v| v.trim().is_empty())),
                Some(Section::Unrecognized(_)) => true,
            }),
        }
    }
}

impl TextResponse {
    pub fn english(body: TextBody) -> Self {
        Self {
            text: Some(body),
            ..Self::default()
        }
    }

    /// False when neither `text` nor `he` carries anything displayable.
    pub fn has_content(&self) -> bool {
        let present = |body: &Option<TextBody>| body.as_ref().is_some_and(|b| !b.is_empty());
        present(&self.text) || present(&self.he)
    }
}
