// ABOUTME: Integration tests for loading info JSON files and rendering them as podcast RSS.
// ABOUTME: Checks merge behavior, well-formed output, escaping, path resolution, and error reporting.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tempfile::TempDir;
use ytdlrss_feed::{
    load_collection, render_to_string, write_document, EncodedWriter, FeedError, RenderOptions,
    Source,
};

fn write_json(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path
}

fn video_json(id: &str, title: &str, date: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "{title}",
            "duration": 125,
            "upload_date": "{date}",
            "ext": "m4a",
            "acodec": "mp4a.40.2",
            "vcodec": "none",
            "_filename": "{id}.m4a",
            "filesize": 4096,
            "age_limit": 0,
            "webpage_url": "https://video.example/watch?v={id}",
            "playlist_id": "PL9",
            "playlist_title": "Conference Talks",
            "playlist_uploader": "Conf Org",
            "formats": [{{"format_id": "140"}}]
        }}"#
    )
}

/// Element names and attribute values (unescaped) in document order.
#[derive(Debug, Default)]
struct Parsed {
    elements: Vec<String>,
    attributes: Vec<(String, String)>,
}

fn parse_xml(xml: &str) -> Parsed {
    let mut reader = Reader::from_str(xml);
    let mut parsed = Parsed::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                parsed
                    .elements
                    .push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                for attr in e.attributes() {
                    let attr = attr.expect("well-formed attribute");
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .expect("attribute value unescapes");
                    parsed.attributes.push((
                        String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                        value.into_owned(),
                    ));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!(
                "malformed XML at {}: {:?}\n{}",
                reader.buffer_position(),
                e,
                xml
            ),
        }
    }
    parsed
}

fn count(parsed: &Parsed, name: &str) -> usize {
    parsed.elements.iter().filter(|e| *e == name).count()
}

#[test]
fn test_two_videos_make_one_channel() {
    let dir = TempDir::new().unwrap();
    let a = write_json(dir.path(), "a.info.json", &video_json("aaa", "First", "20200101"));
    let b = write_json(dir.path(), "b.info.json", &video_json("bbb", "Second", "20200315"));

    let collection = load_collection(&[Source::Path(a), Source::Path(b)]).unwrap();
    let opts = RenderOptions::builder()
        .indent("  ")
        .output_path(dir.path().join("feed.xml"))
        .build();
    let xml = render_to_string(&collection, &opts).unwrap();

    let parsed = parse_xml(&xml);
    assert_eq!(count(&parsed, "rss"), 1);
    assert_eq!(count(&parsed, "channel"), 1);
    assert_eq!(count(&parsed, "item"), 2);

    assert!(xml.contains("  <channel>\n    <title>Conference Talks</title>\n"));
    assert!(xml.contains("<itunes:author>Conf Org</itunes:author>"));
    // Channel date is the newest item date.
    assert!(xml.contains("    <pubDate>Sun, 15 Mar 2020 00:00:00 -0000</pubDate>\n"));
    assert!(xml.contains("    <itunes:explicit>clean</itunes:explicit>\n"));

    let first = xml.find("https://video.example/watch?v=aaa").unwrap();
    let second = xml.find("https://video.example/watch?v=bbb").unwrap();
    assert!(first < second, "items must keep input order");

    let urls: Vec<&str> = parsed
        .attributes
        .iter()
        .filter(|(k, _)| k == "url")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(urls, vec!["aaa.m4a", "bbb.m4a"]);
    assert!(xml.contains("type=\"audio/mp4; codecs=mp4a.40.2\" length=\"4096\""));
}

#[test]
fn test_disagreeing_playlists_leave_channel_bare() {
    let dir = TempDir::new().unwrap();
    let a = write_json(dir.path(), "a.json", &video_json("aaa", "First", "20200101"));
    let other =
        video_json("bbb", "Second", "20200102").replace("Conference Talks", "Another List");
    let b = write_json(dir.path(), "b.json", &other);

    let collection = load_collection(&[Source::Path(a), Source::Path(b)]).unwrap();
    assert_eq!(collection.title, None);
    assert_eq!(collection.uploader, None);
    assert_eq!(collection.id, None);

    let xml = render_to_string(&collection, &RenderOptions::default()).unwrap();
    assert!(!xml.contains("<itunes:author>"));
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss"));
}

#[test]
fn test_single_playlist_keeps_author_metadata() {
    let dir = TempDir::new().unwrap();
    let media = dir.path().join("media");
    fs::create_dir(&media).unwrap();
    let playlist = write_json(
        &media,
        "show.json",
        r#"{
            "title": "My <Show> & Co",
            "description": "Hand-written \"feed\"",
            "uploader": "Me",
            "webpage_url": "https://me.example/show",
            "upload_date": "20210704",
            "thumbnail": "cover art.jpg",
            "entries": [
                {"id": "e1", "duration": null, "_filename": "e1.mp3", "ext": "mp3",
                 "thumbnail": "https://img.example/e1.jpg"},
                null,
                {"id": "e2", "duration": 2.5, "_filename": "sub/e2.opus", "ext": "opus",
                 "age_limit": 18}
            ]
        }"#,
    );

    let collection = load_collection(&[Source::Path(playlist)]).unwrap();
    assert_eq!(collection.title.as_deref(), Some("My <Show> & Co"));
    assert_eq!(collection.entries.len(), 2);

    let opts = RenderOptions::builder()
        .base("https://host.example/pod/feed.xml")
        .generator("ytdl2rss 9.9")
        .output_path(dir.path().join("feed.xml"))
        .build();
    let xml = render_to_string(&collection, &opts).unwrap();
    let parsed = parse_xml(&xml);

    assert!(xml.contains("<title>My &lt;Show&gt; &amp; Co</title>"));
    assert!(xml.contains("<description>Hand-written &quot;feed&quot;</description>"));
    assert!(xml.contains("<pubDate>Sun, 04 Jul 2021 00:00:00 -0000</pubDate>"));
    assert!(xml.contains("<generator>ytdl2rss 9.9</generator>"));
    // Not every entry has an age limit.
    assert_eq!(xml.matches("<itunes:explicit>").count(), 1);
    assert!(xml.contains("<itunes:explicit>yes</itunes:explicit>"));
    assert!(xml.contains("<itunes:duration>2.5</itunes:duration>"));

    let hrefs: Vec<&str> = parsed
        .attributes
        .iter()
        .filter(|(k, _)| k == "href" || k == "url")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "https://host.example/pod/media/cover%20art.jpg",
            "https://host.example/pod/feed.xml",
            "https://host.example/pod/media/e1.mp3",
            "https://img.example/e1.jpg",
            "https://host.example/pod/media/sub/e2.opus",
        ]
    );
    assert_eq!(count(&parsed, "image"), 1);
    assert!(xml.contains("type=\"audio/ogg; codecs=opus\""));
}

#[test]
fn test_attribute_values_round_trip() {
    let dir = TempDir::new().unwrap();
    let tricky = r#"it's "odd" <&> name.mp3"#;
    let json = serde_json::json!({
        "id": "x",
        "duration": 1,
        "ext": "mp3",
        "_filename": tricky,
        "thumbnail": "http://t.example/a?b=1&c=\"2\"",
        "formats": [],
    });
    let path = write_json(dir.path(), "x.json", &json.to_string());

    let collection = load_collection(&[Source::Path(path)]).unwrap();
    let opts = RenderOptions::builder().resolve(false).build();
    let xml = render_to_string(&collection, &opts).unwrap();
    let parsed = parse_xml(&xml);

    let value = |key: &str| {
        parsed
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };
    assert_eq!(value("url"), tricky);
    assert_eq!(value("href"), "http://t.example/a?b=1&c=\"2\"");
}

#[test]
fn test_unrecognized_document_names_location() {
    let dir = TempDir::new().unwrap();
    let good = write_json(dir.path(), "good.json", &video_json("g", "G", "20200101"));
    let both = write_json(dir.path(), "both.json", r#"{"entries": [], "formats": []}"#);

    let err = load_collection(&[Source::Path(good), Source::Path(both.clone())]).unwrap_err();
    assert!(err.is_unrecognized());
    assert_eq!(err.location(), Some(both.display().to_string().as_str()));
    assert!(err.to_string().contains("both.json"));
}

#[test]
fn test_utf16_input_is_detected() {
    let dir = TempDir::new().unwrap();
    let json = video_json("u", "Ünïcödé", "20200101");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(json.encode_utf16().flat_map(|u| u.to_le_bytes()));
    let path = dir.path().join("utf16.json");
    fs::write(&path, bytes).unwrap();

    let collection = load_collection(&[Source::Path(path)]).unwrap();
    assert_eq!(collection.entries[0].title.as_deref(), Some("Ünïcödé"));
}

#[test]
fn test_unencodable_output_fails_after_partial_write() {
    let dir = TempDir::new().unwrap();
    let path = write_json(dir.path(), "jp.json", &video_json("jp", "日本語", "20200101"));
    let collection = load_collection(&[Source::Path(path)]).unwrap();

    let mut out = EncodedWriter::new(Vec::new(), encoding_rs::WINDOWS_1252);
    let err = write_document(&collection, &mut out, &RenderOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        FeedError::Unencodable { character: '日', encoding: "windows-1252" }
    ));
    let written = out.into_inner();
    assert!(written.starts_with(b"<?xml version=\"1.0\" encoding=\"windows-1252\"?>"));
}
