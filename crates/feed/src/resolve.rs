// ABOUTME: Resolution of file paths and URLs found in info JSON to URLs usable in the feed.
// ABOUTME: Pure path arithmetic: relative to the JSON file, re-expressed relative to the feed, joined to the base URL.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Resolves a path in `src_path` to a URL in `dst_path` served at `base`.
///
/// `path` is relative to the directory containing `src_path`. The result is
/// relative to the directory containing `dst_path`, percent-encoded, and
/// joined to `base` when one is given. Both locations should be absolute, or
/// both relative to the same directory; the filesystem is never consulted.
pub fn resolve_path(path: &str, src_path: &Path, dst_path: &Path, base: Option<&str>) -> String {
    if path.is_empty() {
        return String::new();
    }
    let src_dir = parent_dir(src_path);
    let cur_path = normalize(&src_dir.join(path));
    let dst_dir = normalize(&parent_dir(dst_path));
    let rel_path = relative_path(&cur_path, &dst_dir);
    join_base(base, &path_to_url(&rel_path))
}

/// Resolves a URL in `src_path` to a URL in `dst_path` served at `base`.
///
/// Absolute URLs are returned unchanged, scheme-relative URLs are joined to
/// `base`, and anything else is treated as a percent-encoded relative path.
pub fn resolve_url(url: &str, src_path: &Path, dst_path: &Path, base: Option<&str>) -> String {
    if has_scheme(url) {
        return url.to_string();
    }
    if url.starts_with("//") {
        return join_base(base, url);
    }
    let path = urlencoding::decode(url)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| url.to_string());
    resolve_path(&path, src_path, dst_path, base)
}

/// Joins a relative reference onto an optional base URL.
pub fn join_base(base: Option<&str>, reference: &str) -> String {
    let base = match base {
        Some(b) if !b.is_empty() => b,
        _ => return reference.to_string(),
    };

    if let Ok(base_url) = Url::parse(base) {
        return match base_url.join(reference) {
            Ok(joined) => joined.to_string(),
            Err(_) => reference.to_string(),
        };
    }

    // Base without a scheme: join textually on its directory.
    if reference.starts_with('/') || has_scheme(reference) {
        return reference.to_string();
    }
    match base.rfind('/') {
        Some(idx) => format!("{}{}", &base[..=idx], reference),
        None => reference.to_string(),
    }
}

/// True if `s` starts with an RFC 3986 scheme followed by `:`.
pub fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            _ => out.push(comp),
        }
    }
    out.iter().collect()
}

/// Path of `target` relative to directory `base`. Both must be normalized.
fn relative_path(target: &Path, base: &Path) -> PathBuf {
    if target.is_absolute() != base.is_absolute() {
        return target.to_path_buf();
    }

    let target_comps: Vec<Component> = target.components().collect();
    let base_comps: Vec<Component> = base.components().collect();
    let common = target_comps
        .iter()
        .zip(base_comps.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_comps.len() {
        rel.push("..");
    }
    for comp in &target_comps[common..] {
        rel.push(comp.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Converts a relative or absolute path to a percent-encoded URL path.
fn path_to_url(path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut absolute = false;
    for comp in path.components() {
        match comp {
            Component::Prefix(_) => {}
            Component::RootDir => absolute = true,
            Component::CurDir => segments.push(".".to_string()),
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(name) => {
                segments.push(urlencoding::encode(&name.to_string_lossy()).into_owned())
            }
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
