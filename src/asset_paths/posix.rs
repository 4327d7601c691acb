//! Lexical forward-slash path arithmetic.
//!
//! Output URLs must be byte-identical on every build platform, so paths are handled as
//! strings with `/` separators instead of going through [`std::path`].

/// Replace every backslash with a forward slash.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether `path` is rooted, either with a leading slash or a drive letter.
pub fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with(['/', '\\'])
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Collapse `.`, `..` and repeated separators.
///
/// Rooted paths never climb above the root. Relative paths keep leading `..` segments and
/// collapse to `.` when empty.
pub fn normalize(path: &str) -> String {
    let path = to_forward_slashes(path);
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join segments with `/` and normalize the result. Empty segments are skipped.
pub fn join(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve(base: &str, path: &str) -> String {
    if is_absolute(path) {
        normalize(path)
    } else {
        join(&[base, path])
    }
}

/// Parent directory of a normalized path.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

/// Path leading from directory `from` to `to`. Both must be normalized the same way.
///
/// Returns an empty string when both name the same directory.
pub fn relative(from: &str, to: &str) -> String {
    let from: Vec<&str> = from.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let to: Vec<&str> = to.split('/').filter(|s| !s.is_empty() && *s != ".").collect();

    let shared = from
        .iter()
        .zip(&to)
        .take_while(|(left, right)| left == right)
        .count();

    let mut segments = vec![".."; from.len() - shared];
    segments.extend_from_slice(&to[shared..]);
    segments.join("/")
}

/// Whether a relative path climbs out of the directory it is relative to.
pub fn escapes_root(relative_path: &str) -> bool {
    relative_path == ".." || relative_path.starts_with("../")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dots_and_separators() {
        assert_eq!(normalize("/r//foo/./0.2.0/../0.3.0/"), "/r/foo/0.3.0");
        assert_eq!(normalize("a\\b\\..\\c.css"), "a/c.css");
        assert_eq!(normalize("../../x"), "../../x");
        assert_eq!(normalize("/../x"), "/x");
        assert_eq!(normalize("a/.."), ".");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn joins_segments() {
        assert_eq!(
            join(&["/r", "foo", "0.2.0", "", "images/a.css"]),
            "/r/foo/0.2.0/images/a.css"
        );
        assert_eq!(
            join(&["../../../", "neuron", "4.2.1", "neuron.js"]),
            "../../../neuron/4.2.1/neuron.js"
        );
    }

    #[test]
    fn resolves_against_base() {
        assert_eq!(resolve("/proj", "views/index.html"), "/proj/views/index.html");
        assert_eq!(resolve("/proj", "/abs/index.html"), "/abs/index.html");
        assert_eq!(resolve("/proj", "C:\\views\\a.html"), "C:/views/a.html");
    }

    #[test]
    fn computes_dirname() {
        assert_eq!(dirname("/proj/views/index.html"), "/proj/views");
        assert_eq!(dirname("/index.html"), "/");
        assert_eq!(dirname("index.html"), ".");
    }

    #[test]
    fn computes_relative_paths() {
        assert_eq!(relative("/proj/views", "/proj/views/pages"), "pages");
        assert_eq!(relative("/proj/views", "/proj/views"), "");
        assert_eq!(relative("/proj/views", "/proj/other/a.html"), "../other/a.html");
        assert_eq!(relative("/proj/views", "/proj"), "..");
    }

    #[test]
    fn detects_escaping_paths() {
        assert!(escapes_root(".."));
        assert!(escapes_root("../outside.html"));
        assert!(!escapes_root("..hidden/file"));
        assert!(!escapes_root("sibling.html"));
    }
}
