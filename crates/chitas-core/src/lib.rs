pub mod cache;
pub mod calendar;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod psalms;
pub mod render;
pub mod selection;
pub mod state;
pub mod text;

// Re-export main types for convenience
pub use cache::TextCache;
pub use calendar::{Bilingual, CalendarItem, CalendarSnapshot};
pub use client::{encode_reference, SefariaClient, TextSource};
pub use config::Config;
pub use controller::{DailyView, DetailAction, DetailKey, OtherEntry, ReferenceSummary, ViewController};
pub use error::ContentError;
pub use psalms::{resolve_portion, PsalmsPortion};
pub use render::{render, LanguageSection, Verse, ViewNode, ViewTree};
pub use selection::{select, Category, DailySelection};
pub use state::{AppState, CalendarStatus, DetailState, Language};
pub use text::{Section, TextBody, TextResponse};
