use std::fmt;

use gamecat_core::AppId;
use thiserror::Error;

/// Required catalog fields whose absence or malformation fails extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    ReleaseDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ReleaseDate => "release_date",
        })
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("app {appid} does not resolve to a storefront page")]
    NotResolved { appid: AppId },

    #[error("app {appid}: required field {field} is missing")]
    ExtractionFailed { appid: AppId, field: Field },

    #[error("app {appid}: field {field} has unparseable value {value:?}")]
    MalformedField {
        appid: AppId,
        field: Field,
        value: String,
    },

    #[error("headless render failed: {0}")]
    Render(String),

    #[error("chart at {url} rendered no item links within {timeout_secs}s")]
    RenderTimeout { url: String, timeout_secs: u64 },
}
