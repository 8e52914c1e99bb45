// ABOUTME: Character encoding handling for JSON input and RSS output.
// ABOUTME: Detects UTF-8/16/32 JSON per RFC 4627 and encodes output strictly with encoding_rs.

use std::io::Write;

use encoding_rs::{EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::FeedError;

/// Unicode encodings JSON text may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Detects the encoding of JSON text from its BOM or the pattern of NUL
/// bytes in the first four octets (RFC 4627 section 3).
pub fn detect_json_encoding(bytes: &[u8]) -> JsonEncoding {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => JsonEncoding::Utf8,
        [0x00, 0x00, 0xFE, 0xFF, ..] => JsonEncoding::Utf32Be,
        [0xFF, 0xFE, 0x00, 0x00, ..] => JsonEncoding::Utf32Le,
        [0xFE, 0xFF, ..] => JsonEncoding::Utf16Be,
        [0xFF, 0xFE, ..] => JsonEncoding::Utf16Le,
        [0x00, 0x00, 0x00, _, ..] => JsonEncoding::Utf32Be,
        [_, 0x00, 0x00, 0x00, ..] => JsonEncoding::Utf32Le,
        [0x00, _, ..] => JsonEncoding::Utf16Be,
        [_, 0x00, ..] => JsonEncoding::Utf16Le,
        _ => JsonEncoding::Utf8,
    }
}

/// Decodes JSON bytes to text, removing any BOM.
/// Malformed sequences become U+FFFD.
pub fn decode_json_bytes(bytes: &[u8]) -> String {
    match detect_json_encoding(bytes) {
        JsonEncoding::Utf8 => decode_with(UTF_8, bytes),
        JsonEncoding::Utf16Le => decode_with(UTF_16LE, bytes),
        JsonEncoding::Utf16Be => decode_with(UTF_16BE, bytes),
        JsonEncoding::Utf32Le => decode_utf32(bytes, u32::from_le_bytes),
        JsonEncoding::Utf32Be => decode_utf32(bytes, u32::from_be_bytes),
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (decoded, _) = encoding.decode_with_bom_removal(bytes);
    decoded.into_owned()
}

fn decode_utf32(bytes: &[u8], to_u32: fn([u8; 4]) -> u32) -> String {
    let text: String = bytes
        .chunks(4)
        .map(|chunk| {
            <[u8; 4]>::try_from(chunk)
                .ok()
                .and_then(|quad| char::from_u32(to_u32(quad)))
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect();
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Looks up an output encoding by label (e.g. `utf-8`, `latin1`, `shift_jis`).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, FeedError> {
    Encoding::for_label(label.trim().as_bytes())
        .map(Encoding::output_encoding)
        .ok_or_else(|| FeedError::UnknownEncoding(label.to_string()))
}

/// Writes the XML declaration for `encoding`.
pub fn write_declaration<W: Write>(
    out: &mut EncodedWriter<W>,
    indented: bool,
) -> Result<(), FeedError> {
    let decl = format!(
        "<?xml version=\"1.0\" encoding=\"{}\"?>",
        out.encoding().name()
    );
    out.write_str(&decl)?;
    if indented {
        out.write_str("\n")?;
    }
    Ok(())
}

/// Streams text into an underlying writer in a fixed output encoding.
///
/// Characters the encoding cannot represent fail with
/// [`FeedError::Unencodable`]; text written before the failure stays written.
pub struct EncodedWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    buf: Vec<u8>,
}

impl<W: Write> EncodedWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding: encoding.output_encoding(),
            buf: vec![0; 4096],
        }
    }

    /// UTF-8 writer, the default for feeds.
    pub fn utf8(inner: W) -> Self {
        Self::new(inner, UTF_8)
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Encodes and writes `text`.
    pub fn write_str(&mut self, text: &str) -> Result<(), FeedError> {
        if self.encoding == UTF_8 {
            self.inner.write_all(text.as_bytes())?;
            return Ok(());
        }

        let mut encoder = self.encoding.new_encoder();
        let mut remaining = text;
        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(remaining, &mut self.buf, true);
            self.inner.write_all(&self.buf[..written])?;
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => return Ok(()),
                EncoderResult::OutputFull => continue,
                EncoderResult::Unmappable(character) => {
                    return Err(FeedError::Unencodable {
                        character,
                        encoding: self.encoding.name(),
                    })
                }
            }
        }
    }

    pub fn flush(&mut self) -> Result<(), FeedError> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
