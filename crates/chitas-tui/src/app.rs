use std::sync::Arc;

use chitas_core::{
    AppState, CalendarSnapshot, Config, ContentError, DetailAction, DetailKey, DetailState,
    SefariaClient, TextCache, TextResponse, ViewController,
};
use chrono::NaiveDate;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

type Fetch<T> = JoinHandle<Result<T, ContentError>>;

pub struct App {
    pub should_quit: bool,
    pub controller: ViewController,

    client: SefariaClient,
    cache: TextCache,

    // Background work, polled on every tick
    calendar_task: Option<Fetch<CalendarSnapshot>>,
    detail_tasks: Vec<(u64, Fetch<TextResponse>)>,

    /// Index into `selectable_keys()`.
    pub cursor: usize,
    pub detail_scroll: u16,
    /// One-line message shown in the footer until the next key press.
    pub status: Option<String>,

    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        let client = SefariaClient::from_config(config);
        let cache = TextCache::new(Arc::new(client.clone()));
        let controller = ViewController::new(AppState::from_config(config, today), client.library_url());

        Self {
            should_quit: false,
            controller,
            client,
            cache,
            calendar_task: None,
            detail_tasks: Vec::new(),
            cursor: 0,
            detail_scroll: 0,
            status: None,
            animation_frame: 0,
        }
    }

    /// Every row the cursor can land on, summaries first.
    pub fn selectable_keys(&self) -> Vec<DetailKey> {
        let view = self.controller.view();
        view.summaries
            .iter()
            .map(|summary| summary.key)
            .chain(view.others.iter().map(|other| other.key))
            .collect()
    }

    pub fn selected_key(&self) -> Option<DetailKey> {
        self.selectable_keys().get(self.cursor).copied()
    }

    pub fn detail_visible(&self) -> bool {
        self.controller.detail().is_visible()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.view().loading
            || matches!(self.controller.detail(), DetailState::Loading { .. })
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn next(&mut self) {
        let len = self.selectable_keys().len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.selectable_keys().len().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let len = self.selectable_keys().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn start_calendar_fetch(&mut self) {
        if let Some(handle) = self.calendar_task.take() {
            handle.abort();
        }
        let client = self.client.clone();
        self.calendar_task = Some(tokio::spawn(async move {
            client.fetch_today_calendar().await
        }));
    }

    pub fn reload(&mut self) {
        info!("reloading today's calendar");
        self.controller.on_reload();
        self.cursor = 0;
        self.start_calendar_fetch();
    }

    pub fn toggle_language(&mut self) {
        self.controller.on_language_toggle();
    }

    pub fn toggle_theme(&mut self) {
        self.controller.on_theme_toggle();
    }

    /// Expand or collapse the selected "other" entry.
    pub fn toggle_selected(&mut self) {
        if let Some(DetailKey::Other(index)) = self.selected_key() {
            self.controller.on_other_toggle(index);
        }
    }

    /// A collapsed "other" entry expands first; a second Enter opens it.
    pub fn open_selected(&mut self) {
        match self.selected_key() {
            Some(DetailKey::Other(index)) if !self.is_expanded(index) => {
                self.controller.on_other_toggle(index);
            }
            Some(key) => self.request_detail(key),
            None => {}
        }
    }

    fn is_expanded(&self, index: usize) -> bool {
        self.controller.state().expanded_others.contains(&index)
    }

    pub fn request_detail(&mut self, key: DetailKey) {
        match self.controller.on_detail_request(key) {
            Ok(DetailAction::Fetch { token, reference, .. }) => {
                self.detail_scroll = 0;
                let cache = self.cache.clone();
                self.detail_tasks.push((
                    token,
                    tokio::spawn(async move { cache.get_or_fetch(&reference).await }),
                ));
            }
            Ok(DetailAction::OpenExternal { url }) => self.open_link(&url),
            Err(err) => debug!("nothing to open: {err}"),
        }
    }

    pub fn close_detail(&mut self) {
        self.controller.on_detail_close();
        self.detail_scroll = 0;
    }

    /// Open the source page for a failed detail in the browser.
    pub fn open_fallback(&mut self) {
        if let DetailState::Failed { fallback_url, .. } = self.controller.detail() {
            let url = fallback_url.clone();
            self.open_link(&url);
        }
    }

    fn open_link(&mut self, url: &str) {
        match open::that(url) {
            Ok(()) => {
                info!("opened {url}");
                self.status = Some(format!("Opened {url}"));
            }
            Err(err) => {
                warn!("could not open {url}: {err}");
                self.status = Some(format!("Open in a browser: {url}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Background tasks
    // ------------------------------------------------------------------

    /// Hand finished fetches to the controller. Unfinished tasks are left alone.
    pub async fn poll_tasks(&mut self) {
        if self.calendar_task.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = self.calendar_task.take() {
                self.controller.on_calendar_loaded(flatten(handle.await));
                self.clamp_cursor();
            }
        }

        if self.detail_tasks.iter().any(|(_, handle)| handle.is_finished()) {
            let (finished, pending): (Vec<_>, Vec<_>) = self
                .detail_tasks
                .drain(..)
                .partition(|(_, handle)| handle.is_finished());
            self.detail_tasks = pending;

            for (token, handle) in finished {
                self.controller.on_detail_loaded(token, flatten(handle.await));
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

/// A panicked or cancelled fetch is reported like any other failed request.
fn flatten<T>(joined: Result<Result<T, ContentError>, JoinError>) -> Result<T, ContentError> {
    joined.unwrap_or_else(|err| {
        Err(ContentError::Network {
            url: String::new(),
            status: None,
            message: format!("background fetch did not complete: {err}"),
        })
    })
}
