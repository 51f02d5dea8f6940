//! Command handlers for the daily-study page.
//!
//! The controller owns an [`AppState`] and the selection derived from the
//! current calendar snapshot. Every handler is synchronous: network work is
//! described by the returned [`DetailAction`] and its outcome is fed back in
//! through [`ViewController::on_detail_loaded`], so any front end can drive it.

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::calendar::{CalendarItem, CalendarSnapshot};
use crate::client::{external_link, source_link};
use crate::error::ContentError;
use crate::psalms::{resolve_for_date, PsalmsPortion};
use crate::render::render;
use crate::selection::{select, Category, DailySelection};
use crate::state::{AppState, CalendarStatus, DetailState, Language};
use crate::text::TextResponse;

pub const CALENDAR_FAILED_BANNER: &str =
    "Failed to load daily study materials. Please try again later.";

/// What the user asked to see in detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKey {
    Category(Category),
    Psalms,
    /// Index into the "other items" collection.
    Other(usize),
}

/// Follow-up work for the front end after a detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// Fetch through the cache, then report back with the same token.
    Fetch {
        token: u64,
        reference: String,
        title: String,
    },
    /// No structured reference exists; open this page instead.
    OpenExternal { url: String },
}

/// One of the five fixed reference summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSummary {
    pub key: DetailKey,
    pub heading: String,
    pub value: String,
}

/// An expandable entry for a feed item without a fixed slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherEntry {
    pub key: DetailKey,
    pub title: String,
    pub value: String,
    pub expanded: bool,
    /// Whether "view full text" leads anywhere.
    pub viewable: bool,
}

/// Everything a front end needs to draw the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyView {
    pub language: Language,
    pub dark_theme: bool,
    pub gregorian_date: String,
    pub localized_date: Option<String>,
    pub loading: bool,
    pub banner: Option<String>,
    pub summaries: Vec<ReferenceSummary>,
    pub others: Vec<OtherEntry>,
}

pub struct ViewController {
    state: AppState,
    selection: DailySelection,
    view: DailyView,
    library_url: String,
    next_token: u64,
    /// What the open overlay was requested for.
    detail_key: Option<DetailKey>,
}

enum DetailTarget {
    Text { reference: String, title: String },
    External { url: String },
}

impl ViewController {
    pub fn new(state: AppState, library_url: &str) -> Self {
        let selection = state.snapshot().map(select).unwrap_or_default();
        let view = derive_view(&state, &selection);
        Self {
            state,
            selection,
            view,
            library_url: library_url.to_string(),
            next_token: 0,
            detail_key: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &DailyView {
        &self.view
    }

    pub fn detail(&self) -> &DetailState {
        &self.state.detail
    }

    fn refresh(&mut self) {
        self.view = derive_view(&self.state, &self.selection);
    }

    pub fn on_calendar_loaded(&mut self, result: Result<CalendarSnapshot, ContentError>) {
        match result {
            Ok(snapshot) => {
                info!(date = %snapshot.date, items = snapshot.items.len(), "calendar ready");
                self.selection = select(&snapshot);
                self.state.calendar = CalendarStatus::Ready(snapshot);
            }
            Err(err) => {
                error!("calendar fetch failed: {err}");
                self.selection = DailySelection::default();
                self.state.calendar = CalendarStatus::Failed(CALENDAR_FAILED_BANNER.to_string());
            }
        }
        self.state.expanded_others.clear();
        // Keys index the old feed; an open overlay keeps its title as is.
        self.detail_key = None;
        self.refresh();
    }

    /// Drop back to the loading state before a refetch.
    pub fn on_reload(&mut self) {
        self.state.calendar = CalendarStatus::Loading;
        self.selection = DailySelection::default();
        self.state.expanded_others.clear();
        self.detail_key = None;
        self.refresh();
    }

    pub fn on_language_toggle(&mut self) {
        self.state.language = self.state.language.toggled();
        debug!(language = self.state.language.as_str(), "language toggled");
        self.retitle_detail();
        self.refresh();
    }

    pub fn on_theme_toggle(&mut self) {
        self.state.dark_theme = !self.state.dark_theme;
        self.view.dark_theme = self.state.dark_theme;
    }

    pub fn on_other_toggle(&mut self, index: usize) {
        if index >= self.selection.others.len() {
            return;
        }
        if !self.state.expanded_others.remove(&index) {
            self.state.expanded_others.insert(index);
        }
        self.refresh();
    }

    /// Resolve a detail request into a fetch or an external link.
    ///
    /// `NoContent` means there is nothing to open; callers skip it quietly.
    pub fn on_detail_request(&mut self, key: DetailKey) -> Result<DetailAction, ContentError> {
        let (reference, title) = match self.detail_target(key)? {
            DetailTarget::Text { reference, title } => (reference, title),
            DetailTarget::External { url } => return Ok(DetailAction::OpenExternal { url }),
        };

        self.next_token += 1;
        let token = self.next_token;
        self.detail_key = Some(key);
        self.state.detail = DetailState::Loading {
            token,
            title: title.clone(),
            reference: reference.clone(),
        };
        debug!(token, reference = %reference, "detail requested");

        Ok(DetailAction::Fetch {
            token,
            reference,
            title,
        })
    }

    fn detail_target(&self, key: DetailKey) -> Result<DetailTarget, ContentError> {
        let language = self.state.language;
        let (reference, title) = match key {
            DetailKey::Psalms => {
                if self.state.snapshot().is_none() {
                    return Err(ContentError::no_content("Tehillim"));
                }
                let portion = self.psalms_portion();
                (
                    portion.reference.to_string(),
                    format!("Tehillim: {}", portion.range_label),
                )
            }
            DetailKey::Category(category) => {
                let item = self
                    .selection
                    .get(category)
                    .ok_or_else(|| ContentError::no_content(category.canonical_title()))?;
                let reference = item
                    .reference()
                    .ok_or_else(|| ContentError::no_content(category.canonical_title()))?;
                (
                    reference.to_string(),
                    item.display_value.get(language).to_string(),
                )
            }
            // Other items are titled by their reference.
            DetailKey::Other(index) => {
                let item = self
                    .selection
                    .others
                    .get(index)
                    .ok_or_else(|| ContentError::no_content(format!("other item {index}")))?;
                match (item.reference(), item.url()) {
                    (Some(reference), _) => (reference.to_string(), reference.to_string()),
                    (None, Some(url)) => {
                        return Ok(DetailTarget::External {
                            url: external_link(&self.library_url, url),
                        });
                    }
                    (None, None) => {
                        return Err(ContentError::no_content(item.english_title()));
                    }
                }
            }
        };

        let title = if title.is_empty() { reference.clone() } else { title };
        Ok(DetailTarget::Text { reference, title })
    }

    /// Re-title the open overlay after a language switch.
    fn retitle_detail(&mut self) {
        let Some(key) = self.detail_key else {
            return;
        };
        let Ok(DetailTarget::Text { title: fresh, .. }) = self.detail_target(key) else {
            return;
        };
        match &mut self.state.detail {
            DetailState::Hidden => {}
            DetailState::Loading { title, .. }
            | DetailState::Loaded { title, .. }
            | DetailState::Failed { title, .. } => *title = fresh,
        }
    }

    /// Apply a finished fetch. Returns false when the result was stale: a newer
    /// request was issued, or the overlay was closed, in the meantime.
    pub fn on_detail_loaded(
        &mut self,
        token: u64,
        result: Result<TextResponse, ContentError>,
    ) -> bool {
        let DetailState::Loading {
            token: current,
            title,
            reference,
        } = &self.state.detail
        else {
            debug!(token, "detail result arrived after the overlay closed");
            return false;
        };
        if *current != token {
            debug!(token, current, "ignoring stale detail result");
            return false;
        }

        let title = title.clone();
        let reference = reference.clone();
        self.state.detail = match result {
            Ok(response) => {
                if !response.has_content() {
                    debug!("{}", ContentError::no_content(&reference));
                }
                DetailState::Loaded {
                    title,
                    tree: render(&response),
                    reference,
                }
            }
            Err(err) => {
                error!("text fetch for {reference} failed: {err}");
                DetailState::Failed {
                    title,
                    message: err.to_string(),
                    fallback_url: source_link(&self.library_url, &reference),
                    reference,
                }
            }
        };
        true
    }

    pub fn on_detail_close(&mut self) {
        self.state.detail = DetailState::Hidden;
        self.detail_key = None;
    }

    pub fn psalms_portion(&self) -> PsalmsPortion {
        resolve_for_date(self.state.today)
    }
}

/// Recompute the page from state. Bilingual fallback is applied fresh each
/// time, so a language switch re-derives every visible string.
pub fn derive_view(state: &AppState, selection: &DailySelection) -> DailyView {
    let language = state.language;
    let (loading, banner, localized_date) = match &state.calendar {
        CalendarStatus::Loading => (true, None, None),
        CalendarStatus::Failed(message) => (false, Some(message.clone()), None),
        CalendarStatus::Ready(snapshot) => (
            false,
            None,
            Some(snapshot.localized_date.clone()).filter(|date| !date.is_empty()),
        ),
    };

    let mut summaries = Vec::new();
    let mut others = Vec::new();
    if state.snapshot().is_some() {
        let summary = |category: Category| {
            selection
                .get(category)
                .map(|item| category_summary(category, item, language))
        };
        summaries.extend(summary(Category::TorahPortion));
        summaries.push(psalms_summary(resolve_for_date(state.today), language));
        summaries.extend(summary(Category::Tanya));
        summaries.extend(summary(Category::RambamOneChapter));
        summaries.extend(summary(Category::RambamThreeChapters));

        others = selection
            .others
            .iter()
            .enumerate()
            .map(|(index, item)| OtherEntry {
                key: DetailKey::Other(index),
                title: item.title.get(language).to_string(),
                value: item.display_value.get(language).to_string(),
                expanded: state.expanded_others.contains(&index),
                viewable: item.reference().is_some() || item.url().is_some(),
            })
            .collect();
    }

    DailyView {
        language,
        dark_theme: state.dark_theme,
        gregorian_date: format_gregorian(state.today),
        localized_date,
        loading,
        banner,
        summaries,
        others,
    }
}

fn category_summary(category: Category, item: &CalendarItem, language: Language) -> ReferenceSummary {
    ReferenceSummary {
        key: DetailKey::Category(category),
        heading: item.title.get(language).to_string(),
        value: item.display_value.get(language).to_string(),
    }
}

fn psalms_summary(portion: PsalmsPortion, language: Language) -> ReferenceSummary {
    let heading = match language {
        Language::En => "Daily Tehillim",
        Language::He => "תהילים יומי",
    };
    ReferenceSummary {
        key: DetailKey::Psalms,
        heading: heading.to_string(),
        value: portion.range_label.to_string(),
    }
}

pub fn format_gregorian(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
