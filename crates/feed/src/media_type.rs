// ABOUTME: Media type (MIME type) inference for downloaded files.
// ABOUTME: Maps file extension and audio/video codecs to an RFC 6381 media type with codecs parameter.

use std::path::Path;

use crate::models::Item;

/// Media type used when neither `ext` nor a filename extension is known.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Extensions whose media type never carries a codecs parameter.
const NO_CODECS_PARAM: &[&str] = &["flv", "gif", "mp3"];

/// Extensions intended for audio; assumed audio when no codec is known.
const AUDIO_MP4_EXTS: &[&str] = &["f4a", "f4b", "f4p", "m4a", "m4b", "m4p", "m4r"];

/// Gets the media type for a youtube-dl entry.
///
/// The type family is `audio/` when an audio codec is known and no video
/// codec is, otherwise `video/`. A codec value of `"none"` counts as unknown.
/// Codec values are placed in the parameter as-is, without RFC 2231 encoding.
pub fn infer_media_type(item: &Item) -> String {
    let ext = match entry_extension(item) {
        Some(ext) => ext,
        None => return FALLBACK_MEDIA_TYPE.to_string(),
    };
    media_type_for(&ext, item.acodec.as_deref(), item.vcodec.as_deref())
}

/// Gets the media type for an extension and raw codec values.
pub fn media_type_for(ext: &str, acodec: Option<&str>, vcodec: Option<&str>) -> String {
    let mut param_ext = ext;
    let mut acodec = known_codec(acodec);
    let vcodec = known_codec(vcodec);

    let family = if acodec.is_some() && vcodec.is_none() {
        "audio"
    } else {
        "video"
    };
    let unknown_codecs = acodec.is_none() && vcodec.is_none();

    let media_type = match ext {
        "3g2" => format!("{}/3gpp2", family),
        "3gp" => format!("{}/3gpp", family),
        "avi" => "video/vnd.avi".to_string(),
        e if AUDIO_MP4_EXTS.contains(&e) => {
            if unknown_codecs {
                "audio/mp4".to_string()
            } else {
                format!("{}/mp4", family)
            }
        }
        "f4v" | "m4v" => format!("{}/mp4", family),
        "flv" => "video/x-flv".to_string(),
        "gif" => "image/gif".to_string(),
        "mk3d" | "mks" | "mkv" => format!("{}/x-matroska", family),
        "mka" => {
            if unknown_codecs {
                "audio/x-matroska".to_string()
            } else {
                format!("{}/x-matroska", family)
            }
        }
        "mp3" => "audio/mpeg".to_string(),
        "ogg" => {
            if vcodec.is_none() {
                "audio/ogg".to_string()
            } else {
                format!("{}/ogg", family)
            }
        }
        "opus" => {
            // Opus-in-Ogg, as recommended by Xiph for .opus files.
            param_ext = "ogg";
            if acodec.is_none() {
                acodec = Some("opus".to_string());
            }
            "audio/ogg".to_string()
        }
        "ogv" => format!("{}/ogg", family),
        "wav" => "audio/vnd.wave".to_string(),
        other => format!("{}/{}", family, other),
    };

    if NO_CODECS_PARAM.contains(&param_ext) {
        return media_type;
    }

    match (vcodec, acodec) {
        (Some(v), Some(a)) => format!("{}; codecs=\"{}, {}\"", media_type, v, a),
        (Some(c), None) | (None, Some(c)) => format!("{}; codecs={}", media_type, c),
        (None, None) => media_type,
    }
}

/// Extension from `ext`, falling back to the extension of `_filename`.
fn entry_extension(item: &Item) -> Option<String> {
    if let Some(ext) = item.ext.as_deref().filter(|e| !e.is_empty()) {
        return Some(ext.to_string());
    }
    item.filename
        .as_deref()
        .and_then(|f| Path::new(f).extension())
        .map(|e| e.to_string_lossy().into_owned())
}

/// Treats `"none"` and empty values as unknown and normalises codec names
/// to their RFC 6381 identifiers.
fn known_codec(codec: Option<&str>) -> Option<String> {
    match codec {
        None | Some("") | Some("none") => None,
        Some("h264") => Some("avc1".to_string()),
        Some(c) => Some(c.to_string()),
    }
}
