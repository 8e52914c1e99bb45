// ABOUTME: Rendering options for the RSS writer and a fluent builder for them.
// ABOUTME: Covers base URL, indentation, generator string, resolver mode, and output location.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Generator identifier used when the caller does not inject one.
pub const DEFAULT_GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Configuration for rendering a collection as podcast RSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// URL at which the feed will be served; relative references resolve against it.
    pub base: Option<String>,
    /// Indent unit. `None` writes compact output without line breaks.
    pub indent: Option<String>,
    /// Contents of the `<generator>` element.
    pub generator: String,
    /// Resolve file paths relative to the feed and emit channel description,
    /// artwork, and the Atom self link. When off, references are written verbatim.
    pub resolve: bool,
    /// Location the feed is written to, used to relativise file paths.
    pub output_path: PathBuf,
    /// Directory that relative input and output locations are anchored to.
    /// Needed when some locations are absolute and others are not.
    pub working_dir: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base: None,
            indent: None,
            generator: DEFAULT_GENERATOR.to_string(),
            resolve: true,
            output_path: PathBuf::new(),
            working_dir: None,
        }
    }
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    /// Base URL if one was given and is non-empty.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref().filter(|b| !b.is_empty())
    }

    /// `path` joined onto the working directory when it is relative.
    pub fn anchor<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match &self.working_dir {
            Some(dir) if path.is_relative() => Cow::Owned(dir.join(path)),
            _ => Cow::Borrowed(path),
        }
    }
}

/// Parses an indent argument: a number means that many spaces, anything
/// else is used literally.
pub fn parse_indent(arg: &str) -> String {
    match arg.trim().parse::<usize>() {
        Ok(n) => " ".repeat(n),
        Err(_) => arg.to_string(),
    }
}

/// Builder for [`RenderOptions`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
    opts: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: RenderOptions::default(),
        }
    }

    /// Set the URL from which the feed and media will be served.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.opts.base = Some(base.into());
        self
    }

    /// Set the indent unit (enables line breaks).
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.opts.indent = Some(indent.into());
        self
    }

    /// Set the `<generator>` text.
    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.opts.generator = generator.into();
        self
    }

    /// Enable or disable path resolution and the extended channel metadata.
    pub fn resolve(mut self, resolve: bool) -> Self {
        self.opts.resolve = resolve;
        self
    }

    /// Set where the feed will be written.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.opts.output_path = path.into();
        self
    }

    /// Anchor relative locations to `dir`.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.working_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> RenderOptions {
        self.opts
    }
}
