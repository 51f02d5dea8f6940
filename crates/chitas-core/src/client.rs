use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::calendar::{CalendarFeed, CalendarSnapshot};
use crate::config::Config;
use crate::error::ContentError;
use crate::text::TextResponse;

/// Same unreserved set as JavaScript's `encodeURIComponent`.
const REFERENCE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_reference(reference: &str) -> String {
    utf8_percent_encode(reference, REFERENCE_ENCODE_SET).to_string()
}

#[derive(Deserialize)]
struct DateConversion {
    #[serde(default)]
    hebrew: Option<String>,
}

/// Anything that can look up a passage by reference
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch_text(&self, reference: &str) -> Result<TextResponse, ContentError>;
}

/// Client for the Sefaria text library and the Hebcal date converter
#[derive(Clone)]
pub struct SefariaClient {
    client: Client,
    library_url: String,
    date_converter_url: String,
}

impl SefariaClient {
    pub fn new(library_url: &str, date_converter_url: &str) -> Self {
        Self {
            client: Client::new(),
            library_url: library_url.trim_end_matches('/').to_string(),
            date_converter_url: date_converter_url.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.library_url(), config.date_converter_url())
    }

    /// Today's calendar feed. The Hebrew date is best effort.
    pub async fn fetch_today_calendar(&self) -> Result<CalendarSnapshot, ContentError> {
        let url = format!("{}/api/calendars", self.library_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ContentError::from_reqwest(&url, err))?;

        if !response.status().is_success() {
            return Err(ContentError::Network {
                url,
                status: Some(response.status().as_u16()),
                message: format!("calendar request failed with status: {}", response.status()),
            });
        }

        let feed: CalendarFeed = response
            .json()
            .await
            .map_err(|err| ContentError::from_reqwest(&url, err))?;
        debug!(date = %feed.date, items = feed.calendar_items.len(), "calendar feed loaded");

        // Without a date there is nothing to convert; the items still stand.
        let localized_date = if feed.date.is_empty() {
            warn!("calendar feed carried no date");
            String::new()
        } else {
            match self.localize_date(&feed.date).await {
                Ok(hebrew) => hebrew,
                Err(err) => {
                    warn!("{err}; showing the raw date instead");
                    feed.date.clone()
                }
            }
        };

        Ok(CalendarSnapshot {
            date: feed.date,
            localized_date,
            items: feed.calendar_items,
        })
    }

    /// Hebrew rendering of a Gregorian `YYYY-MM-DD` date.
    pub async fn localize_date(&self, date: &str) -> Result<String, ContentError> {
        let conversion_error = |message: String| ContentError::DateConversion {
            date: date.to_string(),
            message,
        };

        let response = self
            .client
            .get(&self.date_converter_url)
            .query(&[("cfg", "json"), ("date", date), ("g2h", "1")])
            .send()
            .await
            .map_err(|err| conversion_error(err.to_string()))?;

        if !response.status().is_success() {
            return Err(conversion_error(format!(
                "converter responded with status: {}",
                response.status()
            )));
        }

        let conversion: DateConversion = response
            .json()
            .await
            .map_err(|err| conversion_error(err.to_string()))?;

        conversion
            .hebrew
            .filter(|hebrew| !hebrew.is_empty())
            .ok_or_else(|| conversion_error("response carried no hebrew date".to_string()))
    }

    pub fn library_url(&self) -> &str {
        &self.library_url
    }
}

/// Link to a reference on the library's own site.
pub fn source_link(library_url: &str, reference: &str) -> String {
    format!(
        "{}/{}",
        library_url.trim_end_matches('/'),
        encode_reference(reference)
    )
}

/// Link for feed items that only carry a site path.
pub fn external_link(library_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        library_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl TextSource for SefariaClient {
    async fn fetch_text(&self, reference: &str) -> Result<TextResponse, ContentError> {
        let url = format!(
            "{}/api/texts/{}",
            self.library_url,
            encode_reference(reference)
        );

        let response = self
            .client
            .get(&url)
            .query(&[("context", "0")])
            .send()
            .await
            .map_err(|err| ContentError::from_reqwest(&url, err))?;

        if !response.status().is_success() {
            return Err(ContentError::Network {
                url,
                status: Some(response.status().as_u16()),
                message: format!("text request failed with status: {}", response.status()),
            });
        }

        let text: TextResponse = response
            .json()
            .await
            .map_err(|err| ContentError::from_reqwest(&url, err))?;

        if let Some(error) = &text.error {
            warn!(reference, "library reported: {error}");
        }

        Ok(text)
    }
}
