//! remark-sources: Getting exam reports into the marking core.
//!
//! Loads report pages from disk or over HTTP(S), parses them with `scraper`
//! into a tree the core can query, and reads the `remark.toml` configuration.

pub mod config;
pub mod error;
pub mod html;
pub mod loader;

pub use config::{load_config, load_config_from, FetchConfig, RemarkConfig};
pub use error::SourceError;
pub use html::{HtmlDocument, HtmlNode};
pub use loader::{load_all, DocumentLoader, FileLoader, HttpLoader, Source, SourceLoader};
