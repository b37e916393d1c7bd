//! Path resolution between workspace locations
//!
//! Every reference refsync writes is root-relative: from a module at depth
//! N below the workspace root, the path climbs exactly N segments up and
//! then descends by the target's full root-relative path. A minimal
//! relative path (`../sibling`) reads ambiguously once nesting depth varies
//! across the tree; the root-relative form is unambiguous and survives
//! relocation within the same depth class.
//!
//! All paths handled here are forward-slash strings relative to the
//! workspace root, independent of the host OS separator.

use std::path::Path;

/// Render a `Path` as a forward-slash string
pub fn to_posix(path: &Path) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    segments.join("/")
}

/// Number of meaningful segments in a root-relative path
pub fn depth(dir: &str) -> usize {
    segments(dir).len()
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Lexically normalize a forward-slash path, collapsing `.` and `..`.
///
/// Returns `None` when the path climbs above its starting point (more `..`
/// segments than real ones) - such an entry cannot be expressed as a
/// root-relative location.
pub fn normalize(path: &str) -> Option<String> {
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            other => out.push(other),
        }
    }
    Some(out.join("/"))
}

/// Compute the reference path from `from_dir` to `to_dir`, both given
/// root-relative.
///
/// The result is always `depth(from_dir)` leading `..` segments followed by
/// `to_dir` verbatim. Depth 0 (the workspace root itself) yields a `./`
/// prefix, never an artifact segment.
pub fn root_relative(from_dir: &str, to_dir: &str) -> String {
    let ups = depth(from_dir);
    let to = segments(to_dir).join("/");

    if ups == 0 {
        if to.is_empty() {
            return ".".to_string();
        }
        return format!("./{to}");
    }

    let mut parts = vec![".."; ups];
    if to.is_empty() {
        return parts.join("/");
    }
    parts.push(&to);
    parts.join("/")
}

/// Normalize an on-disk entry (relative to `from_dir`) to canonical
/// root-relative form.
///
/// Returns `None` for entries that escape the workspace root; those are
/// preserved verbatim by the merge instead of being re-anchored.
pub fn resolve_entry(from_dir: &str, entry: &str) -> Option<String> {
    let joined = if segments(from_dir).is_empty() {
        entry.to_string()
    } else {
        format!("{}/{}", segments(from_dir).join("/"), entry)
    };
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(depth(""), 0);
        assert_eq!(depth("packages"), 1);
        assert_eq!(depth("packages/common/schema"), 3);
        assert_eq!(depth("./packages/"), 1);
    }

    #[test]
    fn test_root_relative_same_depth() {
        assert_eq!(
            root_relative("packages/core", "packages/schema"),
            "../../packages/schema"
        );
    }

    #[test]
    fn test_root_relative_depth_three_to_depth_two() {
        // A module three directories below root referencing one two below:
        // always the full root-relative form, never a minimal ../.. path.
        assert_eq!(
            root_relative("packages/common/schema", "packages/errors"),
            "../../../packages/errors"
        );
    }

    #[test]
    fn test_root_relative_depth_zero() {
        assert_eq!(root_relative("", "packages/core"), "./packages/core");
        assert_eq!(root_relative(".", "packages/core"), "./packages/core");
    }

    #[test]
    fn test_root_relative_to_root() {
        assert_eq!(root_relative("packages/core", ""), "../..");
        assert_eq!(root_relative("", ""), ".");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a/./b/../c").as_deref(), Some("a/c"));
        assert_eq!(normalize("./x").as_deref(), Some("x"));
        assert_eq!(normalize("..") , None);
        assert_eq!(normalize("a/../../b"), None);
    }

    #[test]
    fn test_resolve_entry() {
        assert_eq!(
            resolve_entry("packages/core", "../../packages/schema").as_deref(),
            Some("packages/schema")
        );
        assert_eq!(
            resolve_entry("packages/core", "./tsconfig.src.json").as_deref(),
            Some("packages/core/tsconfig.src.json")
        );
        // Escapes the root
        assert_eq!(resolve_entry("packages/core", "../../../elsewhere"), None);
    }

    #[test]
    fn test_round_trip() {
        let from = "apps/web";
        let to = "packages/common/schema";
        let there = root_relative(from, to);
        assert_eq!(resolve_entry(from, &there).as_deref(), Some(to));

        let back = root_relative(to, from);
        assert_eq!(resolve_entry(to, &back).as_deref(), Some(from));
    }

    #[test]
    fn test_to_posix() {
        assert_eq!(to_posix(Path::new("packages/core")), "packages/core");
        assert_eq!(to_posix(Path::new("./packages/core/")), "packages/core");
    }
}
