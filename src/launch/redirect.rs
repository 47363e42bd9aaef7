// SPDX-License-Identifier: MIT

//! Pure path arithmetic for moving paths from one root to another.
//!
//! The launch arguments describe paths on the Windows host, so they are
//! handled as strings with Windows semantics: both `\` and `/` separate
//! components, and components compare case-insensitively.  Nothing in here
//! touches the filesystem.

use super::error::RedirectError;

const SEPARATORS: [char; 2] = ['\\', '/'];

/// A lexically normalized path: `.` and empty components are dropped and `..`
/// pops the previous component.
struct Components<'a> {
    anchored: bool,
    parts: Vec<&'a str>,
}

impl<'a> Components<'a> {
    fn of(path: &'a str) -> Self {
        let mut parts = Vec::new();
        for part in path.split(SEPARATORS) {
            match part {
                "" | "." => (),
                ".." => {
                    parts.pop();
                }
                part => parts.push(part),
            }
        }
        Self {
            anchored: path.starts_with(SEPARATORS),
            parts,
        }
    }

    /// The components of `self` after `root`, if `self` is strictly nested in `root`.
    fn strip_root(&self, root: &Components<'_>) -> Option<&[&'a str]> {
        if self.anchored != root.anchored || self.parts.len() <= root.parts.len() {
            return None;
        }
        let matches = self
            .parts
            .iter()
            .zip(root.parts.iter())
            .all(|(a, b)| same_component(a, b));
        if matches {
            Some(&self.parts[root.parts.len()..])
        } else {
            None
        }
    }
}

fn same_component(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// The separator the path is written with.  Paths without any separator
/// default to the Windows one.
pub fn separator_of(path: &str) -> char {
    if path.contains('\\') {
        '\\'
    } else if path.contains('/') {
        '/'
    } else {
        '\\'
    }
}

/// True if `path` lies strictly inside `root`.  A path is not a descendant of itself.
pub fn is_descendant(path: &str, root: &str) -> bool {
    Components::of(path)
        .strip_root(&Components::of(root))
        .is_some()
}

/// The part of `path` below `root`, without a leading separator.
pub fn relative_to(path: &str, root: &str) -> Result<String, RedirectError> {
    let components = Components::of(path);
    let relative = relative_parts(&components, path, root)?;
    let separator = separator_of(path).to_string();
    Ok(relative.join(separator.as_str()))
}

/// Move `path` from under `old_root` to the same location under `new_root`.
pub fn remap(path: &str, old_root: &str, new_root: &str) -> Result<String, RedirectError> {
    let components = Components::of(path);
    let relative = relative_parts(&components, path, old_root)?;
    let separator = separator_of(new_root).to_string();
    Ok(join(new_root, &relative.join(separator.as_str())))
}

fn relative_parts<'a, 'b>(
    components: &'b Components<'a>,
    path: &str,
    root: &str,
) -> Result<&'b [&'a str], RedirectError> {
    components
        .strip_root(&Components::of(root))
        .ok_or_else(|| RedirectError::NotDescendant {
            path: path.to_string(),
            root: root.to_string(),
        })
}

/// Join `child` onto `base` with exactly one separator between them, using
/// the separator `base` is written with.
pub fn join(base: &str, child: &str) -> String {
    let separator = separator_of(base);
    let base = base.trim_end_matches(SEPARATORS);
    let child = child.trim_start_matches(SEPARATORS);
    format!("{base}{separator}{child}")
}

/// `path` with exactly one trailing separator.
pub fn with_trailing_separator(path: &str) -> String {
    join(path, "")
}

/// The final component of the path.
pub fn file_name(path: &str) -> Option<&str> {
    path.split(SEPARATORS).filter(|p| !p.is_empty()).last()
}

/// The path without its final component.
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches(SEPARATORS);
    let idx = trimmed.rfind(SEPARATORS)?;
    let parent = trimmed[..idx].trim_end_matches(SEPARATORS);
    if parent.is_empty() {
        // The parent of `\foo` is the anchor itself.
        Some(&trimmed[..idx + 1])
    } else {
        Some(parent)
    }
}

/// The name of the directory that directly contains the path.
pub fn parent_name(path: &str) -> Option<&str> {
    parent(path).and_then(file_name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_path_is_descendant() {
        assert!(is_descendant(r"C:\mc\libraries\a.jar", r"C:\mc"));
        assert!(is_descendant(r"C:\mc\a.jar", r"C:\mc\"));
    }

    #[test]
    fn root_is_not_its_own_descendant() {
        assert!(!is_descendant(r"C:\mc", r"C:\mc"));
        assert!(!is_descendant(r"C:\mc\", r"C:\mc"));
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_descendant() {
        assert!(!is_descendant(r"C:\mcx\a.jar", r"C:\mc"));
        assert!(!is_descendant(r"D:\mc\a.jar", r"C:\mc"));
    }

    #[test]
    fn comparison_ignores_case() {
        assert!(is_descendant(r"c:\MC\Mods\x.jar", r"C:\mc"));
        assert!(is_descendant(r"C:\Über\x", r"C:\über"));
    }

    #[test]
    fn both_separators_are_accepted() {
        assert!(is_descendant("C:/mc/a.jar", r"C:\mc"));
        assert!(is_descendant("/home/user/.minecraft/a.jar", "/home/user/.minecraft"));
    }

    #[test]
    fn dot_components_are_normalized() {
        assert!(is_descendant(r"C:\mc\.\versions\..\a.jar", r"C:\mc"));
        assert!(!is_descendant(r"C:\mc\..\other\a.jar", r"C:\mc"));
    }

    #[test]
    fn relative_has_no_leading_separator() {
        assert_eq!(relative_to(r"C:\mc\libraries\a.jar", r"C:\mc\").unwrap(), r"libraries\a.jar");
        assert_eq!(relative_to("/a/b/c", "/a").unwrap(), "b/c");
    }

    #[test]
    fn relative_outside_root_fails() {
        let err = relative_to(r"D:\build\classes", r"C:\mc").unwrap_err();
        assert_eq!(
            err,
            RedirectError::NotDescendant {
                path: r"D:\build\classes".to_string(),
                root: r"C:\mc".to_string(),
            }
        );
        assert!(relative_to(r"C:\mc", r"C:\mc").is_err());
    }

    #[test]
    fn remap_moves_into_new_root() {
        assert_eq!(remap(r"C:\mc\a.jar", r"C:\mc", r"S:\sb").unwrap(), r"S:\sb\a.jar");
        assert_eq!(
            remap(r"C:\mc\natives\x64", r"C:\mc", r"S:\sb\").unwrap(),
            r"S:\sb\natives\x64"
        );
    }

    #[test]
    fn remap_onto_same_root_is_a_no_op() {
        let path = r"C:\mc\versions\1.21\1.21.jar";
        let once = remap(path, r"C:\mc", r"C:\mc").unwrap();
        assert_eq!(once, path);
        assert_eq!(remap(&once, r"C:\mc", r"C:\mc").unwrap(), once);
    }

    #[test]
    fn name_decomposition() {
        assert_eq!(file_name(r"D:\build\resources\main"), Some("main"));
        assert_eq!(file_name(r"D:\build\classes\"), Some("classes"));
        assert_eq!(parent(r"D:\build\resources\main"), Some(r"D:\build\resources"));
        assert_eq!(parent_name(r"D:\build\resources\main"), Some("resources"));
        assert_eq!(parent(r"\top"), Some(r"\"));
        assert_eq!(parent("java"), None);
    }

    #[test]
    fn join_uses_one_separator() {
        assert_eq!(join(r"S:\sb\", r"\assets"), r"S:\sb\assets");
        assert_eq!(join("/tmp/sb", "assets"), "/tmp/sb/assets");
        assert_eq!(with_trailing_separator(r"S:\sb"), r"S:\sb\");
        assert_eq!(with_trailing_separator(r"S:\sb\\"), r"S:\sb\");
    }
}
