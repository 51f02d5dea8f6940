//! UI-agnostic application state types
//!
//! This module contains data structures that are shared between front ends
//! and don't depend on any specific UI framework.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSnapshot;
use crate::config::Config;
use crate::render::ViewTree;

/// Which of the two pre-supplied language fields is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "he" | "hebrew" => Some(Language::He),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::He,
            Language::He => Language::En,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::He => "עברית",
        }
    }
}

/// Lifecycle of today's calendar feed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CalendarStatus {
    #[default]
    Loading,
    Ready(CalendarSnapshot),
    /// Page-level banner text; all summaries stay empty.
    Failed(String),
}

/// The detail overlay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Hidden,
    Loading {
        token: u64,
        title: String,
        reference: String,
    },
    Loaded {
        title: String,
        reference: String,
        tree: ViewTree,
    },
    Failed {
        title: String,
        reference: String,
        message: String,
        fallback_url: String,
    },
}

impl DetailState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, DetailState::Hidden)
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            DetailState::Hidden => None,
            DetailState::Loading { title, .. }
            | DetailState::Loaded { title, .. }
            | DetailState::Failed { title, .. } => Some(title),
        }
    }
}

/// Everything the controller mutates in response to user actions or fetches
#[derive(Debug, Clone)]
pub struct AppState {
    pub language: Language,
    pub dark_theme: bool,
    pub calendar: CalendarStatus,
    pub detail: DetailState,
    /// Indices into today's "other items" that are currently expanded.
    pub expanded_others: BTreeSet<usize>,
    /// Local date the page is showing; drives the Psalms cycle and the header.
    pub today: NaiveDate,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            language: Language::default(),
            dark_theme: false,
            calendar: CalendarStatus::default(),
            detail: DetailState::default(),
            expanded_others: BTreeSet::new(),
            today,
        }
    }

    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            language: config.language(),
            dark_theme: config.dark_theme(),
            ..Self::new(today)
        }
    }

    pub fn snapshot(&self) -> Option<&CalendarSnapshot> {
        match &self.calendar {
            CalendarStatus::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
