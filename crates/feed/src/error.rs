// ABOUTME: Error types for loading info JSON and rendering podcast RSS.
// ABOUTME: Provides FeedError with read, parse, classification, date, and encoding variants.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading documents or writing the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input location could not be read.
    #[error("error reading {location}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    /// The input was read but is not valid JSON.
    #[error("error loading {location}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is neither a single video (`formats`) nor a playlist (`entries`).
    #[error("unrecognized JSON in {location}")]
    Unrecognized { location: String },

    /// An `upload_date` value is not a valid YYYYMMDD date.
    #[error("invalid date {value:?}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A character cannot be represented in the output encoding.
    #[error("character {character:?} cannot be encoded as {encoding}")]
    Unencodable {
        character: char,
        encoding: &'static str,
    },

    /// The requested output encoding label is not known.
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),

    /// Writing to the output failed.
    #[error("error writing output")]
    Write(#[from] io::Error),
}

impl FeedError {
    /// Creates a Read error for an input location.
    pub fn read(location: impl Into<String>, source: io::Error) -> Self {
        FeedError::Read {
            location: location.into(),
            source,
        }
    }

    /// Creates a Parse error for an input location.
    pub fn parse(location: impl Into<String>, source: serde_json::Error) -> Self {
        FeedError::Parse {
            location: location.into(),
            source,
        }
    }

    /// Creates an Unrecognized error for an input location.
    pub fn unrecognized(location: impl Into<String>) -> Self {
        FeedError::Unrecognized {
            location: location.into(),
        }
    }

    /// Returns true if the document could not be classified.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, FeedError::Unrecognized { .. })
    }

    /// Returns true if the output encoding could not represent the content.
    pub fn is_unencodable(&self) -> bool {
        matches!(self, FeedError::Unencodable { .. })
    }

    /// Input location named by this error, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            FeedError::Read { location, .. }
            | FeedError::Parse { location, .. }
            | FeedError::Unrecognized { location } => Some(location),
            _ => None,
        }
    }
}
