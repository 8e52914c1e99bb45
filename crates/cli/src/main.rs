// ABOUTME: CLI converting youtube-dl .info.json files into a podcast RSS feed.
// ABOUTME: Loads every input first, then streams the feed to a file or stdout in the chosen encoding.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use ytdlrss_feed::resolve::has_scheme;
use ytdlrss_feed::{
    encoding_for_label, load_collection, parse_indent, write_document, EncodedWriter, FeedError,
    RenderOptions, Source,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n\n",
    "ytdl2rss is free and unencumbered software released into the public domain.\n\n",
    "ytdl2rss is distributed in the hope that it will be useful, but WITHOUT ANY\n",
    "WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS\n",
    "FOR A PARTICULAR PURPOSE.  See the Unlicense for details."
);

const GENERATOR: &str = concat!("ytdl2rss ", env!("CARGO_PKG_VERSION"));

/// Create a podcast RSS feed from youtube-dl .info.json files.
#[derive(Parser, Debug)]
#[command(name = "ytdl2rss")]
#[command(version = LONG_VERSION)]
#[command(about = "Create a podcast RSS feed from youtube-dl .info.json files")]
struct Args {
    /// URL from which files will be served, to resolve relative URLs
    #[arg(short = 'B', long = "base", value_name = "URL")]
    base: Option<String>,

    /// XML indent string, or number of spaces to indent (no value: compact)
    #[arg(short = 'i', long = "indent", value_name = "N|STR", num_args = 0..=1)]
    indent: Option<Option<String>>,

    /// Output RSS file (default: stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output character encoding (default: UTF-8, or the locale charset on a terminal)
    #[arg(short = 'e', long = "encoding", value_name = "LABEL")]
    encoding: Option<String>,

    /// Write paths and URLs verbatim and omit channel description, artwork, and self link
    #[arg(long = "no-resolve")]
    no_resolve: bool,

    /// youtube-dl .info.json files ("-" reads standard input)
    #[arg(required = true, value_name = "JSON_FILE")]
    json_files: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let unencodable = err
                .chain()
                .filter_map(|cause| cause.downcast_ref::<FeedError>())
                .any(FeedError::is_unencodable);
            if unencodable {
                eprintln!("hint: use --encoding to pick an encoding which can represent it");
            }
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.base.as_deref().is_some_and(has_scheme) {
        // Aggregators such as AntennaPod fail on relative URLs.
        warn!(
            "URLs in RSS 2.0 must start with a URI scheme; \
             use -B/--base to give the absolute URL at which the feed will be served"
        );
    }

    let sources: Vec<Source> = args
        .json_files
        .iter()
        .map(|arg| Source::from_arg(arg))
        .collect();
    let collection = load_collection(&sources)?;

    let encoding = select_encoding(args)?;
    debug!(encoding = encoding.name(), "selected output encoding");

    let working_dir = env::current_dir().context("error reading current directory")?;
    let mut builder = RenderOptions::builder()
        .generator(GENERATOR)
        .resolve(!args.no_resolve)
        .working_dir(working_dir)
        // Stdout is treated as a document in the current directory.
        .output_path(args.output.clone().unwrap_or_else(|| PathBuf::from("-")));
    if let Some(base) = &args.base {
        builder = builder.base(base.as_str());
    }
    if let Some(indent) = args.indent.as_ref().and_then(Option::as_ref) {
        builder = builder.indent(parse_indent(indent));
    }
    let opts = builder.build();

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("error opening {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = EncodedWriter::new(BufWriter::new(sink), encoding);

    // Flush whatever was written even when rendering fails part way.
    let written = write_document(&collection, &mut out, &opts);
    let flushed = out.flush();
    written?;
    flushed?;
    Ok(())
}

/// Picks the output encoding: `--encoding`, else UTF-8 for files, else the
/// locale charset when writing to a terminal, else UTF-8.
fn select_encoding(args: &Args) -> Result<&'static Encoding> {
    if let Some(label) = &args.encoding {
        return Ok(encoding_for_label(label)?);
    }
    if args.output.is_none() && io::stdout().is_terminal() {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty());
        if let Some(encoding) = locale
            .as_deref()
            .and_then(locale_charset)
            .and_then(|charset| encoding_for_label(charset).ok())
        {
            return Ok(encoding);
        }
    }
    Ok(UTF_8)
}

/// Charset part of a POSIX locale name, e.g. `UTF-8` in `en_US.UTF-8@euro`.
fn locale_charset(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    let charset = rest.split('@').next().unwrap_or(rest);
    (!charset.is_empty()).then_some(charset)
}
