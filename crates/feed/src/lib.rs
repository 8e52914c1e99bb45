// ABOUTME: Core library converting youtube-dl info JSON into podcast RSS.
// ABOUTME: Provides loading/merging of info documents, media type inference, and streaming RSS rendering.

pub mod encoding;
pub mod error;
pub mod loader;
pub mod media_type;
pub mod merge;
pub mod models;
pub mod options;
pub mod render;
pub mod resolve;
pub mod time_parse;
pub mod xml_writer;

pub use encoding::{encoding_for_label, write_declaration, EncodedWriter};
pub use error::FeedError;
pub use loader::{load_collection, load_document, parse_document};
pub use media_type::infer_media_type;
pub use merge::{entries_to_collection, merge_documents};
pub use models::{Collection, InfoDocument, Item, Source};
pub use options::{parse_indent, RenderOptions, RenderOptionsBuilder};
pub use render::{render_to_string, write_document, write_feed, write_item};
pub use resolve::{resolve_path, resolve_url};
pub use time_parse::ymd_to_rfc2822;
