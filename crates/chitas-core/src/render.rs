//! Turns a fetched text response into a renderer-agnostic view tree.
//!
//! The tree carries an English section and, when the response has Hebrew, a
//! parallel Hebrew section. Front ends decide how to lay either out.

use std::sync::OnceLock;

use regex::Regex;

use crate::state::Language;
use crate::text::{Section, TextBody, TextResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    /// 1-based position within its chapter, counting skipped entries.
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    TextBlock(String),
    Chapter(Vec<Verse>),
    NoContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSection {
    pub language: Language,
    pub nodes: Vec<ViewNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewTree {
    pub sections: Vec<LanguageSection>,
}

impl ViewTree {
    pub fn section(&self, language: Language) -> Option<&LanguageSection> {
        self.sections.iter().find(|s| s.language == language)
    }

    /// Nodes for one language; empty when that language was omitted.
    pub fn nodes(&self, language: Language) -> &[ViewNode] {
        self.section(language)
            .map(|s| s.nodes.as_slice())
            .unwrap_or(&[])
    }
}

pub fn render(response: &TextResponse) -> ViewTree {
    let mut english = response.text.as_ref().map(render_body).unwrap_or_default();
    if english.is_empty() {
        english.push(ViewNode::NoContent);
    }

    let mut sections = vec![LanguageSection {
        language: Language::En,
        nodes: english,
    }];

    let hebrew = response.he.as_ref().map(render_body).unwrap_or_default();
    if !hebrew.is_empty() {
        sections.push(LanguageSection {
            language: Language::He,
            nodes: hebrew,
        });
    }

    ViewTree { sections }
}

fn render_body(body: &TextBody) -> Vec<ViewNode> {
    match body {
        TextBody::Single(text) => text_block(text).into_iter().collect(),
        TextBody::Sections(sections) => sections
            .iter()
            .flatten()
            .filter_map(render_section)
            .collect(),
    }
}

fn render_section(section: &Section) -> Option<ViewNode> {
    match section {
        Section::Line(text) => text_block(text),
        Section::Chapter(verses) => {
            let verses: Vec<Verse> = verses
                .iter()
                .enumerate()
                .filter_map(|(index, verse)| {
                    let text = plain_text(verse.as_deref()?);
                    (!text.is_empty()).then(|| Verse {
                        position: index + 1,
                        text,
                    })
                })
                .collect();
            (!verses.is_empty()).then_some(ViewNode::Chapter(verses))
        }
        Section::Unrecognized(_) => None,
    }
}

fn text_block(raw: &str) -> Option<ViewNode> {
    let text = plain_text(raw);
    (!text.is_empty()).then_some(ViewNode::TextBlock(text))
}

fn footnote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<sup[^>]*class="footnote-marker"[^>]*>.*?</sup>|<i[^>]*class="footnote"[^>]*>.*?</i>"#)
            .expect("footnote pattern is valid")
    })
}

fn break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("break pattern is valid"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Strip the library's inline markup down to plain text.
pub fn plain_text(raw: &str) -> String {
    let text = footnote_pattern().replace_all(raw, "");
    let text = break_pattern().replace_all(&text, "\n");
    let text = tag_pattern().replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&thinsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
