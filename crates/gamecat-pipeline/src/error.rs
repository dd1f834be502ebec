use gamecat_core::AppId;
use gamecat_db::DbError;
use gamecat_scraper::ScraperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("count must be between 1 and {max}, got {count}")]
    InvalidCount { count: usize, max: usize },

    #[error("search needs at least one filter")]
    EmptyFilter,

    #[error("game {appid} is already in the catalog")]
    AlreadyExists { appid: AppId },

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl PipelineError {
    /// `true` for every way an id can fail to produce an entry: it does not
    /// resolve, or its page lacks or garbles a required field.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Scraper(
                ScraperError::NotResolved { .. }
                    | ScraperError::ExtractionFailed { .. }
                    | ScraperError::MalformedField { .. }
            )
        )
    }
}
