//! Path relativization utilities
//!
//! Computes a target path relative to a base directory the way URI relative
//! references work: both paths are split into a volume (drive, UNC server,
//! POSIX root or URI authority) plus normalized segments, and the shared
//! leading segments are replaced by `..` steps out of the base.
//!
//! All emitted paths use '/' as separator, whatever the host platform is.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

/// `scheme://authority/path`; single-letter schemes are drive letters, not URIs
static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]+)://([^/\\?#]*)(.*)$").expect("Invalid URI_RE regex")
});

/// `C:`, `C:\...` or `C:/...`
static DRIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]):([\\/].*)?$").expect("Invalid DRIVE_RE regex"));

/// Win32 verbatim prefix, as returned by `canonicalize`: `\\?\C:\...` or `\\?\UNC\server\...`
static VERBATIM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\\/]{2}\?[\\/](?:(?i:(UNC))[\\/])?(.*)$").expect("Invalid VERBATIM_RE regex")
});

/// Why a path could not be made relative
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelativizeError {
    #[error("not an absolute path: {0:?}")]
    NotAbsolute(String),

    #[error("malformed path: {0:?}")]
    Malformed(String),

    #[error("{target:?} is on a different volume than {base:?}")]
    DifferentVolume { base: String, target: String },
}

/// The part of an absolute location that relative paths cannot cross
#[derive(Debug, Clone, PartialEq, Eq)]
enum Volume {
    /// Windows drive letter, uppercased
    Drive(char),
    /// UNC server name, lowercased
    Unc(String),
    /// POSIX filesystem root
    Root,
    /// Any other URI; scheme and authority lowercased
    Uri { scheme: String, authority: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    volume: Volume,
    segments: Vec<String>,
    trailing_separator: bool,
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalize separators to '/' (for cross-platform consistency)
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Drop a verbatim prefix, turning `\\?\C:\x` into `C:\x` and
/// `\\?\UNC\server\x` into `//server/x`
pub fn strip_verbatim(path: &str) -> String {
    match VERBATIM_RE.captures(path) {
        Some(caps) if caps.get(1).is_some() => format!("//{}", &caps[2]),
        Some(caps) => caps[2].to_string(),
        None => path.to_string(),
    }
}

/// Form of an absolute path written into references
pub fn display_path(path: &str) -> String {
    normalize_separators(&strip_verbatim(path))
}

/// Check if a path is hidden (starts with '.')
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Append a separator so the base is always treated as a directory
fn ensure_trailing_separator(base: &str) -> String {
    if base.ends_with(is_separator) {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// Split a path into segments, dropping empty and `.` segments and applying `..`
fn split_segments(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decode `%XX` escapes; invalid escapes are kept literally
fn percent_decode(input: &str) -> Result<String, RelativizeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).map_err(|_| RelativizeError::Malformed(input.to_string()))
}

fn parse_location(raw: &str) -> Result<Location, RelativizeError> {
    if raw.contains('\0') {
        return Err(RelativizeError::Malformed(raw.to_string()));
    }
    let trailing_separator = raw.ends_with(is_separator);
    let stripped = strip_verbatim(raw);
    let raw = stripped.as_str();

    if let Some(caps) = URI_RE.captures(raw) {
        let scheme = caps[1].to_lowercase();
        let authority = caps[2].to_lowercase();
        let path = percent_decode(&caps[3])?;

        if scheme == "file" {
            let mut location = match authority.as_str() {
                "" | "localhost" => {
                    // file:///C:/dir carries the drive inside the path
                    let local = path.trim_start_matches('/');
                    if DRIVE_RE.is_match(local) {
                        parse_location(local)?
                    } else {
                        parse_location(&format!("/{}", local))?
                    }
                }
                _ => Location {
                    volume: Volume::Unc(authority.clone()),
                    segments: split_segments(&path),
                    trailing_separator,
                },
            };
            location.trailing_separator = trailing_separator;
            return Ok(location);
        }

        return Ok(Location {
            volume: Volume::Uri { scheme, authority },
            segments: split_segments(&path),
            trailing_separator,
        });
    }

    let mut chars = raw.chars();
    if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
        if is_separator(a) && is_separator(b) {
            let rest = &raw[2..];
            let mut parts = rest.splitn(2, is_separator);
            let server = parts.next().unwrap_or_default();
            if server.is_empty() {
                return Err(RelativizeError::Malformed(raw.to_string()));
            }
            return Ok(Location {
                volume: Volume::Unc(server.to_lowercase()),
                segments: split_segments(parts.next().unwrap_or_default()),
                trailing_separator,
            });
        }
    }

    if let Some(caps) = DRIVE_RE.captures(raw) {
        let letter = caps[1]
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| RelativizeError::Malformed(raw.to_string()))?;
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        return Ok(Location {
            volume: Volume::Drive(letter),
            segments: split_segments(rest),
            trailing_separator,
        });
    }

    if raw.starts_with('/') {
        return Ok(Location {
            volume: Volume::Root,
            segments: split_segments(raw),
            trailing_separator,
        });
    }

    Err(RelativizeError::NotAbsolute(raw.to_string()))
}

/// Compute `target` relative to the directory `base`.
///
/// The result uses '/' separators and contains `..` steps when `target` lies
/// outside `base`. Segments are compared case-insensitively.
pub fn try_relativize(base: &str, target: &str) -> Result<String, RelativizeError> {
    let base_dir = ensure_trailing_separator(base);
    let from = parse_location(&base_dir)?;
    let to = parse_location(target)?;

    if from.volume != to.volume {
        return Err(RelativizeError::DifferentVolume {
            base: base.to_string(),
            target: target.to_string(),
        });
    }

    let common = from
        .segments
        .iter()
        .zip(&to.segments)
        .take_while(|(a, b)| a.to_lowercase() == b.to_lowercase())
        .count();

    let mut parts: Vec<&str> = vec![".."; from.segments.len() - common];
    parts.extend(to.segments[common..].iter().map(String::as_str));

    if parts.is_empty() {
        return Ok(".".to_string());
    }

    let mut relative = parts.join("/");
    if to.trailing_separator && common < to.segments.len() {
        relative.push('/');
    }
    Ok(relative)
}

/// Make `target` relative to `base`, falling back to `target` itself.
///
/// The fallback applies when there is no base, when the two live on
/// different volumes, or when either path cannot be parsed. The returned
/// path always uses '/' as separator.
pub fn relativize(base: Option<&str>, target: &str) -> String {
    match base {
        Some(base) if !base.is_empty() => match try_relativize(base, target) {
            Ok(path) => normalize_separators(&path),
            Err(_) => display_path(target),
        },
        _ => display_path(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators("src\\main.rs"), "src/main.rs");
        assert_eq!(normalize_separators("a/b/c/d.rs"), "a/b/c/d.rs");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new(".git")));
        assert!(is_hidden(Path::new("src/.env")));
        assert!(!is_hidden(Path::new("src")));
        assert!(!is_hidden(Path::new("/")));
    }

    #[test]
    fn test_relativize_file_under_base() {
        assert_eq!(relativize(Some("C:\\Sol"), "C:\\Sol\\src\\a.cs"), "src/a.cs");
        assert_eq!(relativize(Some("/project"), "/project/src/main.rs"), "src/main.rs");
    }

    #[test]
    fn test_relativize_base_with_trailing_separator() {
        assert_eq!(relativize(Some("C:\\Sol\\"), "C:\\Sol\\src\\a.cs"), "src/a.cs");
        assert_eq!(relativize(Some("/project/"), "/project/a.rs"), "a.rs");
    }

    #[test]
    fn test_relativize_base_is_directory_not_prefix() {
        // "C:\Sol" must not swallow the "C:\Solution" sibling
        assert_eq!(
            relativize(Some("C:\\Sol"), "C:\\Solution\\a.cs"),
            "../Solution/a.cs"
        );
    }

    #[test]
    fn test_relativize_outside_base_uses_parent_steps() {
        assert_eq!(
            relativize(Some("C:\\Sol\\app"), "C:\\Sol\\lib\\x.cs"),
            "../lib/x.cs"
        );
        assert_eq!(relativize(Some("/a/b/c"), "/a/x.rs"), "../../x.rs");
    }

    #[test]
    fn test_relativize_is_case_insensitive() {
        assert_eq!(relativize(Some("c:\\sol"), "C:\\SOL\\Src\\A.cs"), "Src/A.cs");
    }

    #[test]
    fn test_relativize_different_drive_falls_back() {
        assert_eq!(relativize(Some("C:\\Sol"), "D:\\Other\\b.cs"), "D:/Other/b.cs");
        assert!(matches!(
            try_relativize("C:\\Sol", "D:\\Other\\b.cs"),
            Err(RelativizeError::DifferentVolume { .. })
        ));
    }

    #[test]
    fn test_relativize_different_unc_server_falls_back() {
        assert_eq!(
            relativize(Some("\\\\build\\src\\Sol"), "\\\\files\\src\\a.cs"),
            "//files/src/a.cs"
        );
        assert_eq!(
            relativize(Some("\\\\build\\src\\Sol"), "\\\\BUILD\\src\\Sol\\a.cs"),
            "a.cs"
        );
    }

    #[test]
    fn test_relativize_drive_vs_posix_falls_back() {
        assert_eq!(relativize(Some("/home/me/sol"), "C:\\x.cs"), "C:/x.cs");
    }

    #[test]
    fn test_relativize_without_base_returns_target() {
        assert_eq!(relativize(None, "C:\\Sol\\a.cs"), "C:/Sol/a.cs");
        assert_eq!(relativize(Some(""), "/p/a.rs"), "/p/a.rs");
    }

    #[test]
    fn test_relativize_malformed_falls_back() {
        assert_eq!(relativize(Some("C:\\Sol"), "relative\\a.cs"), "relative/a.cs");
        assert_eq!(relativize(Some("not absolute"), "C:\\Sol\\a.cs"), "C:/Sol/a.cs");
        assert!(matches!(
            try_relativize("/p", "/p/a\0b"),
            Err(RelativizeError::Malformed(_))
        ));
        assert!(matches!(
            try_relativize("C:\\Sol", "C:relative.cs"),
            Err(RelativizeError::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_relativize_normalizes_dot_segments() {
        assert_eq!(relativize(Some("/p/./q/../r"), "/p/r/s/./t.rs"), "s/t.rs");
        assert_eq!(relativize(Some("C:\\Sol"), "C:\\Sol\\\\src\\a.cs"), "src/a.cs");
    }

    #[test]
    fn test_relativize_file_uris() {
        assert_eq!(
            relativize(Some("file:///C:/Sol/"), "file:///C:/Sol/My%20Docs/a.cs"),
            "My Docs/a.cs"
        );
        // a file URI and a plain drive path name the same volume
        assert_eq!(relativize(Some("C:\\Sol"), "file:///c:/Sol/a.cs"), "a.cs");
        assert_eq!(relativize(Some("/srv/app"), "file:///srv/app/x.rs"), "x.rs");
    }

    #[test]
    fn test_relativize_other_schemes() {
        assert_eq!(
            relativize(Some("https://host/repo"), "https://HOST/repo/src/a.rs"),
            "src/a.rs"
        );
        assert_eq!(
            relativize(Some("https://host/repo"), "http://host/repo/a.rs"),
            "http://host/repo/a.rs"
        );
    }

    #[test]
    fn test_relativize_target_equal_to_base() {
        assert_eq!(relativize(Some("/p/q"), "/p/q"), ".");
    }

    #[test]
    fn test_relativize_keeps_trailing_separator_of_directory_target() {
        assert_eq!(relativize(Some("/p"), "/p/sub/"), "sub/");
    }

    #[test]
    fn test_relativized_path_rejoins_to_target() {
        let base = "/work/sol";
        for target in ["/work/sol/a.rs", "/work/sol/src/deep/b.rs", "/WORK/Sol/c.rs"] {
            let relative = relativize(Some(base), target);
            assert!(!relative.split('/').any(|s| s == ".."), "{}", relative);
            let rejoined = format!("{}/{}", base, relative);
            assert_eq!(rejoined.to_lowercase(), target.to_lowercase());
        }
    }

    #[test]
    fn test_relativize_verbatim_drive_paths() {
        assert_eq!(try_relativize("\\\\?\\C:\\Sol", "C:\\Sol\\a.cs").unwrap(), "a.cs");
        assert_eq!(
            relativize(Some("\\\\?\\C:\\Sol"), "\\\\?\\C:\\Sol\\src\\a.cs"),
            "src/a.cs"
        );
        assert_eq!(
            relativize(Some("C:\\Sol"), "\\\\?\\c:\\sol\\lib\\x.cs"),
            "lib/x.cs"
        );
        // another drive stays another drive
        assert_eq!(
            relativize(Some("\\\\?\\C:\\Sol"), "\\\\?\\D:\\Other\\b.cs"),
            "D:/Other/b.cs"
        );
        assert!(matches!(
            try_relativize("\\\\?\\C:\\Sol", "\\\\?\\D:\\Other\\b.cs"),
            Err(RelativizeError::DifferentVolume { .. })
        ));
    }

    #[test]
    fn test_relativize_verbatim_unc_paths() {
        assert_eq!(
            relativize(Some("\\\\?\\UNC\\build\\src\\Sol"), "\\\\build\\src\\Sol\\a.cs"),
            "a.cs"
        );
        assert_eq!(
            relativize(Some("\\\\build\\src"), "\\\\?\\unc\\files\\x.cs"),
            "//files/x.cs"
        );
        // a drive and a server never share a volume
        assert_eq!(
            relativize(Some("\\\\?\\C:\\Sol"), "\\\\?\\UNC\\build\\a.cs"),
            "//build/a.cs"
        );
    }

    #[test]
    fn test_relativize_extended_length_paths() {
        let deep = "segment".repeat(40);
        let base = format!("\\\\?\\C:\\{}", deep);
        let target = format!("\\\\?\\C:\\{}\\{}\\a.cs", deep, deep);
        assert!(target.len() > 260);
        assert_eq!(relativize(Some(&base), &target), format!("{}/a.cs", deep));
    }

    #[test]
    fn test_display_path_strips_verbatim_prefix() {
        assert_eq!(display_path("\\\\?\\C:\\Sol\\a.cs"), "C:/Sol/a.cs");
        assert_eq!(display_path("\\\\?\\UNC\\srv\\share\\a.cs"), "//srv/share/a.cs");
        assert_eq!(display_path("/srv/app/a.rs"), "/srv/app/a.rs");
        assert_eq!(relativize(None, "\\\\?\\C:\\Sol\\a.cs"), "C:/Sol/a.cs");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b").unwrap(), "a b");
        assert_eq!(percent_decode("100%").unwrap(), "100%");
        assert_eq!(percent_decode("%zz").unwrap(), "%zz");
        assert_eq!(percent_decode("%E2%9C%93").unwrap(), "✓");
        assert!(percent_decode("%FF").is_err());
    }
}
