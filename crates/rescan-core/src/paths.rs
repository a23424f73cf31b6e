//! Lexical helpers for slash-delimited paths.
//!
//! Paths reported by external tools are not guaranteed to exist locally, so
//! these helpers never touch the filesystem. Cleaning follows the usual
//! lexical rules: repeated slashes collapse, `.` segments drop, and `..`
//! removes the preceding segment without climbing above a leading root.

/// Lexically normalise `path`. An empty result becomes `"."`.
#[must_use]
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
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

/// Join `base` and `relative` with a slash and clean the result.
///
/// Empty components are skipped; joining two empty strings yields an empty
/// string. A leading slash on `relative` does not reset the path.
#[must_use]
pub fn join(base: &str, relative: &str) -> String {
    let parts: Vec<&str> = [base, relative]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Directory component of `path`: everything before the last slash, cleaned.
#[must_use]
pub fn dir(path: &str) -> String {
    let head = path.rfind('/').map_or("", |idx| &path[..=idx]);
    clean(head)
}
