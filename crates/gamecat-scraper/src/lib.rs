pub mod client;
pub mod error;
pub mod extract;
pub mod price;
pub mod ranking;
pub mod render;
pub mod types;

pub use client::{resolves_to_app, FetchedDocument, StorefrontClient};
pub use error::{Field, ScraperError};
pub use extract::{extract_entry, Extraction};
pub use ranking::{parse_chart, HARDWARE_APPID};
pub use render::{wait_for_links, ChromeBackend, PollSettings, RenderBackend, RenderSession};
