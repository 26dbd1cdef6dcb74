//! Payload parsers for the three acquisition paths
//!
//! Each path has its own parser: [`feed::FeedParser`] for the RSS feed,
//! [`table::TableParser`] for the flat trending export, and
//! [`sections::SectionedTableParser`] for the multi-section explore
//! export. Parse failures are scoped as narrowly as the format allows: a
//! bad feed item or export row is skipped, a bad explore section becomes
//! an absent slot, and only a payload with no usable structure at all
//! fails the parse outright.

pub mod feed;
pub mod sections;
pub mod table;

pub use feed::FeedParser;
pub use sections::SectionedTableParser;
pub use table::TableParser;

/// Parse failures, scoped to one record or one section.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// The feed document was not usable XML
    #[error("malformed feed: {0}")]
    Feed(String),

    /// The table export had no usable header row
    #[error("malformed table export: {0}")]
    Table(String),

    /// One section of an explore export failed to parse
    #[error("section '{section}' failed to parse: {reason}")]
    Section {
        /// The section that failed
        section: &'static str,
        /// Why it failed
        reason: String,
    },

    /// A timestamp cell matched none of the known layouts
    #[error("timestamp '{value}' not recognized")]
    Timestamp {
        /// The rejected cell text
        value: String,
    },
}
