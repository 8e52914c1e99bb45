// ABOUTME: Merging of loaded info documents into the single playlist rendered as the channel.
// ABOUTME: Passes a lone playlist through unchanged, otherwise synthesizes shared playlist metadata.

use tracing::debug;

use crate::models::{Collection, InfoDocument, Item, PlaylistMeta};

/// Combines loaded documents into one playlist.
///
/// A single playlist document is returned as-is, so its author-supplied
/// channel metadata is kept. Otherwise all entries, in input order, are
/// wrapped in a new playlist with metadata from [`shared_playlist_meta`].
pub fn merge_documents(mut documents: Vec<InfoDocument>) -> Collection {
    if documents.len() == 1 {
        match documents.pop() {
            Some(InfoDocument::Playlist(playlist)) => {
                debug!("using single playlist as-is");
                return playlist;
            }
            Some(other) => documents.push(other),
            None => {}
        }
    }

    let mut entries = Vec::new();
    for document in documents {
        match document {
            InfoDocument::Video(item) => entries.push(item),
            InfoDocument::Playlist(playlist) => entries.extend(playlist.entries),
        }
    }
    entries_to_collection(entries)
}

/// Wraps entries in a playlist with their common playlist metadata.
pub fn entries_to_collection(entries: Vec<Item>) -> Collection {
    let meta = shared_playlist_meta(&entries);
    Collection::from_items(meta, entries)
}

/// Playlist metadata (`playlist_id`, `playlist_title`, `playlist_uploader`,
/// `playlist_uploader_id`) if identical for every entry that has any.
/// Any disagreement yields empty metadata.
pub fn shared_playlist_meta(entries: &[Item]) -> PlaylistMeta {
    let mut shared: Option<PlaylistMeta> = None;
    for entry in entries {
        let meta = entry.playlist_meta();
        if meta.is_empty() {
            continue;
        }
        match &shared {
            None => shared = Some(meta),
            Some(existing) if *existing != meta => {
                debug!(id = %entry.id, "playlist metadata differs between entries");
                return PlaylistMeta::default();
            }
            Some(_) => {}
        }
    }
    match shared {
        Some(meta) => {
            debug!(
                id = meta.id.as_deref().unwrap_or_default(),
                title = meta.title.as_deref().unwrap_or_default(),
                "synthesized shared playlist metadata"
            );
            meta
        }
        None => {
            debug!("no playlist metadata to share");
            PlaylistMeta::default()
        }
    }
}
