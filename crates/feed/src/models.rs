// ABOUTME: Typed models for youtube-dl info JSON documents.
// ABOUTME: Item is a single video, Collection is a playlist; Source tags where each was loaded from.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Input location that stands for standard input.
pub const STDIN_LOCATION: &str = "-";

/// Location a document was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// Interprets a command-line style location, where `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDIN_LOCATION {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    /// Filesystem path used when resolving references found in the document.
    /// Standard input resolves relative to the current directory.
    pub fn path(&self) -> &Path {
        match self {
            Source::Stdin => Path::new(STDIN_LOCATION),
            Source::Path(p) => p,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "{}", STDIN_LOCATION),
            Source::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// A single downloaded video (info JSON with a `formats` list).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    /// Duration in seconds. The key is required but may be null.
    #[serde(deserialize_with = "required_nullable")]
    pub duration: Option<Number>,
    pub title: Option<String>,
    pub webpage_url: Option<String>,
    pub upload_date: Option<String>,
    #[serde(rename = "_filename")]
    pub filename: Option<String>,
    pub filesize: Option<u64>,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
    pub ext: Option<String>,
    pub thumbnail: Option<String>,
    pub age_limit: Option<i64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub playlist_id: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub playlist_title: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub playlist_uploader: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub playlist_uploader_id: Option<String>,
    #[serde(skip)]
    pub source: Option<Source>,
}

impl Item {
    /// Playlist metadata keys carried by this item, without the `playlist_` prefix.
    /// Empty values are treated as absent.
    pub fn playlist_meta(&self) -> PlaylistMeta {
        let keep = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        PlaylistMeta {
            id: keep(&self.playlist_id),
            title: keep(&self.playlist_title),
            uploader: keep(&self.playlist_uploader),
            uploader_id: keep(&self.playlist_uploader_id),
        }
    }
}

/// Playlist-level metadata shared by the items of a playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistMeta {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
}

impl PlaylistMeta {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.title.is_none()
            && self.uploader.is_none()
            && self.uploader_id.is_none()
    }
}

/// A playlist (info JSON with an `entries` list), rendered as the RSS channel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Collection {
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub uploader_id: Option<String>,
    pub webpage_url: Option<String>,
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "skip_null_entries")]
    pub entries: Vec<Item>,
    #[serde(skip)]
    pub source: Option<Source>,
}

impl Collection {
    /// Builds a playlist wrapper around merged items.
    pub fn from_items(meta: PlaylistMeta, entries: Vec<Item>) -> Self {
        Collection {
            id: meta.id,
            title: meta.title,
            uploader: meta.uploader,
            uploader_id: meta.uploader_id,
            entries,
            ..Default::default()
        }
    }

    /// Latest item upload date (YYYYMMDD compares lexicographically).
    pub fn latest_upload_date(&self) -> Option<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.upload_date.as_deref())
            .max()
    }

    /// Channel explicit flag: only when every item has an age limit.
    pub fn explicit(&self) -> Option<bool> {
        if self.entries.is_empty() {
            return None;
        }
        let limits: Option<Vec<i64>> = self.entries.iter().map(|e| e.age_limit).collect();
        limits.and_then(|l| l.into_iter().max()).map(|max| max > 0)
    }
}

/// A loaded info JSON document, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoDocument {
    Video(Item),
    Playlist(Collection),
}

fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(value).ok_or_else(|| serde::de::Error::custom("id must not be null"))
}

fn loose_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn skip_null_entries<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Option<Item>>::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().collect())
}
