// ABOUTME: Loading of youtube-dl info JSON from files or stdin.
// ABOUTME: Decodes bytes, parses JSON, and classifies each document as a video or a playlist.

use std::fs;
use std::io::{self, Read};

use serde_json::Value;
use tracing::{debug, warn};

use crate::encoding::decode_json_bytes;
use crate::error::FeedError;
use crate::merge::merge_documents;
use crate::models::{Collection, InfoDocument, Item, Source};

/// Reads the raw bytes of a location.
pub fn read_source(source: &Source) -> Result<Vec<u8>, FeedError> {
    match source {
        Source::Stdin => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| FeedError::read(source.to_string(), e))?;
            Ok(buf)
        }
        Source::Path(path) => fs::read(path).map_err(|e| FeedError::read(source.to_string(), e)),
    }
}

/// Parses and classifies one info JSON document.
///
/// A document with a `formats` list is a single video; one with an `entries`
/// list is a playlist. Having both or neither is an error.
pub fn parse_document(bytes: &[u8], source: &Source) -> Result<InfoDocument, FeedError> {
    let location = source.to_string();
    let text = decode_json_bytes(bytes);
    let value: Value =
        serde_json::from_str(&text).map_err(|e| FeedError::parse(location.as_str(), e))?;

    let has_entries = value.get("entries").is_some_and(Value::is_array);
    let has_formats = value.get("formats").is_some_and(Value::is_array);
    if has_entries == has_formats {
        return Err(FeedError::unrecognized(location));
    }

    if has_formats {
        let mut item: Item =
            serde_json::from_value(value).map_err(|e| FeedError::parse(location.as_str(), e))?;
        item.source = Some(source.clone());
        debug!(location = %location, id = %item.id, "loaded video info");
        return Ok(InfoDocument::Video(item));
    }

    let null_entries = value
        .get("entries")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter(|e| e.is_null()).count())
        .unwrap_or(0);
    if null_entries > 0 {
        warn!(location = %location, count = null_entries, "skipping null playlist entries");
    }

    let mut playlist: Collection =
        serde_json::from_value(value).map_err(|e| FeedError::parse(location.as_str(), e))?;
    playlist.source = Some(source.clone());
    for entry in &mut playlist.entries {
        entry.source = Some(source.clone());
    }
    debug!(
        location = %location,
        entries = playlist.entries.len(),
        "loaded playlist info"
    );
    Ok(InfoDocument::Playlist(playlist))
}

/// Reads, parses, and classifies one location.
pub fn load_document(source: &Source) -> Result<InfoDocument, FeedError> {
    let bytes = read_source(source)?;
    parse_document(&bytes, source)
}

/// Loads every location, in order, and merges them into one playlist.
pub fn load_collection(sources: &[Source]) -> Result<Collection, FeedError> {
    let documents = sources
        .iter()
        .map(load_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn src(name: &str) -> Source {
        Source::Path(PathBuf::from(name))
    }

    #[test]
    fn test_classifies_video() {
        let doc = parse_document(
            br#"{"id": "v1", "duration": 10, "formats": [], "ext": "mp4"}"#,
            &src("v1.info.json"),
        )
        .unwrap();
        match doc {
            InfoDocument::Video(item) => {
                assert_eq!(item.id, "v1");
                assert_eq!(item.source, Some(src("v1.info.json")));
            }
            other => panic!("expected video, got {:?}", other),
        }
    }

    #[test]
    fn test_classifies_playlist_and_tags_entries() {
        let doc = parse_document(
            br#"{"title": "P", "entries": [{"id": "a", "duration": null}, null]}"#,
            &src("p.json"),
        )
        .unwrap();
        match doc {
            InfoDocument::Playlist(p) => {
                assert_eq!(p.entries.len(), 1);
                assert_eq!(p.entries[0].source, Some(src("p.json")));
            }
            other => panic!("expected playlist, got {:?}", other),
        }
    }

    #[test]
    fn test_both_markers_rejected() {
        let err = parse_document(br#"{"entries": [], "formats": []}"#, &src("both.json"))
            .unwrap_err();
        assert!(err.is_unrecognized());
        assert_eq!(err.location(), Some("both.json"));
    }

    #[test]
    fn test_no_marker_rejected() {
        let err = parse_document(br#"{"id": "x", "entries": null}"#, &src("none.json"))
            .unwrap_err();
        assert!(err.is_unrecognized());

        let err = parse_document(b"[1, 2]", &src("array.json")).unwrap_err();
        assert!(err.is_unrecognized());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_document(b"{\"id\": ", &src("bad.json")).unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));
        assert_eq!(err.to_string(), "error loading bad.json");
    }

    #[test]
    fn test_video_missing_duration_is_parse_error() {
        let err = parse_document(br#"{"id": "x", "formats": []}"#, &src("x.json")).unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(&src("/nonexistent/dir/x.info.json")).unwrap_err();
        assert!(matches!(err, FeedError::Read { .. }));
    }
}
