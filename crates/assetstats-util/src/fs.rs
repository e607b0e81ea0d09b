//! Filesystem utilities for assetstats.

use std::path::Path;

use crate::error::UtilError;

/// Create a directory and all parent directories if they do not exist.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<(), UtilError> {
    std::fs::create_dir_all(path).map_err(|source| UtilError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Replace the full contents of `path` with `contents`, creating the parent
/// directory first if it is missing.
///
/// # Errors
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<(), UtilError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    std::fs::write(path, contents).map_err(|source| UtilError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Join `name` onto `base` with `/` and normalize the result lexically.
///
/// `.` segments and repeated separators are dropped, `..` removes the
/// preceding segment, and a leading `/` is kept. Nothing touches the
/// filesystem, so symlinks are not resolved. An empty result is `.`.
pub fn join_lexical(base: &str, name: &str) -> String {
    let joined = match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{name}"),
    };
    normalize(&joined)
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `/..` is still `/`.
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_owned(),
        (false, false) => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_existing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        ensure_dir(tmp.path()).unwrap();
    }

    #[test]
    fn write_file_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("build").join("stats").join("out.json");
        write_file(&dest, b"{}").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"{}");
    }

    #[test]
    fn write_file_overwrites_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out.json");
        fs::write(&dest, b"a much longer previous body").unwrap();

        write_file(&dest, b"short").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"short");
    }

    #[test]
    fn write_file_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = write_file(&blocker.join("out.json"), b"{}").unwrap_err();
        assert!(err.to_string().contains("blocker"), "error was: {err}");
    }

    #[test]
    fn join_absolute_base() {
        assert_eq!(join_lexical("/dist", "main.js"), "/dist/main.js");
        assert_eq!(join_lexical("/dist/", "main.js"), "/dist/main.js");
    }

    #[test]
    fn join_drops_dot_segments() {
        assert_eq!(join_lexical("./dist", "main.js"), "dist/main.js");
        assert_eq!(join_lexical("dist/./js", "./main.js"), "dist/js/main.js");
    }

    #[test]
    fn join_resolves_parent_segments() {
        assert_eq!(join_lexical("/dist/js", "../img/a.png"), "/dist/img/a.png");
        assert_eq!(join_lexical("dist", "../../a.png"), "../a.png");
        assert_eq!(join_lexical("/", "../a.png"), "/a.png");
    }

    #[test]
    fn join_empty_parts() {
        assert_eq!(join_lexical("", "main.js"), "main.js");
        assert_eq!(join_lexical("dist", ""), "dist");
        assert_eq!(join_lexical(".", "."), ".");
    }
}
