// ABOUTME: Minimal forward-only XML element writer used to stream the RSS document.
// ABOUTME: Handles text/attribute escaping via quick-xml and optional indentation with an arbitrary unit.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::encoding::EncodedWriter;
use crate::error::FeedError;

/// Escapes `&`, `<`, `>`, `'` and `"` in element text.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Escapes and quotes an attribute value.
///
/// Double quotes are used unless the value contains `"` but no `'`, in which
/// case single quotes avoid escaping. Whitespace other than space is written
/// as character references so parsers do not normalise it away.
pub fn quote_attr(value: &str) -> String {
    let mut escaped = partial_escape(value).into_owned();
    if escaped.contains(|c: char| matches!(c, '\n' | '\r' | '\t')) {
        escaped = escaped
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;");
    }

    if escaped.contains('"') {
        if escaped.contains('\'') {
            format!("\"{}\"", escaped.replace('"', "&quot;"))
        } else {
            format!("'{}'", escaped)
        }
    } else {
        format!("\"{}\"", escaped)
    }
}

/// Streams elements to an [`EncodedWriter`].
///
/// With an indent unit every element starts on its own line, indented by
/// depth × unit. Without one nothing but markup and content is written.
pub struct XmlWriter<'a, W: Write> {
    out: &'a mut EncodedWriter<W>,
    indent: Option<&'a str>,
    depth: usize,
}

impl<'a, W: Write> XmlWriter<'a, W> {
    pub fn new(out: &'a mut EncodedWriter<W>, indent: Option<&'a str>) -> Self {
        Self {
            out,
            indent,
            depth: 0,
        }
    }

    /// Writes `<name attrs>` and descends one level.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), FeedError> {
        self.write_indent()?;
        self.open_tag(name, attrs)?;
        self.out.write_str(">")?;
        self.write_eol()?;
        self.depth += 1;
        Ok(())
    }

    /// Ascends one level and writes `</name>`.
    pub fn end(&mut self, name: &str) -> Result<(), FeedError> {
        self.depth = self.depth.saturating_sub(1);
        self.write_indent()?;
        self.out.write_str("</")?;
        self.out.write_str(name)?;
        self.out.write_str(">")?;
        self.write_eol()
    }

    /// Writes `<name attrs>text</name>` with `text` escaped.
    pub fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), FeedError> {
        self.write_indent()?;
        self.open_tag(name, attrs)?;
        self.out.write_str(">")?;
        self.out.write_str(&escape_text(text))?;
        self.out.write_str("</")?;
        self.out.write_str(name)?;
        self.out.write_str(">")?;
        self.write_eol()
    }

    /// Writes `<name attrs/>`.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), FeedError> {
        self.write_indent()?;
        self.open_tag(name, attrs)?;
        self.out.write_str("/>")?;
        self.write_eol()
    }

    fn open_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), FeedError> {
        self.out.write_str("<")?;
        self.out.write_str(name)?;
        for (key, value) in attrs {
            self.out.write_str(" ")?;
            self.out.write_str(key)?;
            self.out.write_str("=")?;
            self.out.write_str(&quote_attr(value))?;
        }
        Ok(())
    }

    fn write_indent(&mut self) -> Result<(), FeedError> {
        if let Some(unit) = self.indent {
            for _ in 0..self.depth {
                self.out.write_str(unit)?;
            }
        }
        Ok(())
    }

    fn write_eol(&mut self) -> Result<(), FeedError> {
        if self.indent.is_some() {
            self.out.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(indent: Option<&str>) -> String {
        let mut out = EncodedWriter::utf8(Vec::new());
        {
            let mut xml = XmlWriter::new(&mut out, indent);
            xml.start("a", &[("x", "1")]).unwrap();
            xml.text_element("b", &[], "1 < 2 & \"q\"").unwrap();
            xml.empty("c", &[("href", "u?a=1&b=2")]).unwrap();
            xml.end("a").unwrap();
        }
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_compact_output() {
        assert_eq!(
            render(None),
            "<a x=\"1\"><b>1 &lt; 2 &amp; &quot;q&quot;</b><c href=\"u?a=1&amp;b=2\"/></a>"
        );
    }

    #[test]
    fn test_indented_output() {
        assert_eq!(
            render(Some("\t")),
            "<a x=\"1\">\n\t<b>1 &lt; 2 &amp; &quot;q&quot;</b>\n\t\
             <c href=\"u?a=1&amp;b=2\"/>\n</a>\n"
        );
    }

    #[test]
    fn test_quote_attr() {
        assert_eq!(quote_attr("plain"), "\"plain\"");
        assert_eq!(quote_attr("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote_attr("it's \"x\""), "\"it's &quot;x&quot;\"");
        assert_eq!(quote_attr("a<b>&c"), "\"a&lt;b&gt;&amp;c\"");
        assert_eq!(quote_attr("l1\nl2"), "\"l1&#10;l2\"");
    }
}
