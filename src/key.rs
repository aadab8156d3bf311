//! Pure string key utilities.
//!
//! Nothing here touches the filesystem: canonicalization is a string
//! transform so keys differing only by case or separator style collapse to
//! one entry.

/// Characters that cannot appear in a file name on the supported platforms.
const INVALID_FILENAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Canonical, platform-neutral form of a path-like key: backslashes become
/// forward slashes, then everything is lower-cased.
///
/// # Example
///
/// ```
/// use quantmap::key::canonical_path_key;
///
/// assert_eq!(
///     canonical_path_key("Assets\\Textures\\Wood.PNG"),
///     "assets/textures/wood.png"
/// );
/// assert_eq!(
///     canonical_path_key("Assets/Textures/wood.png"),
///     canonical_path_key("assets\\textures\\WOOD.png")
/// );
/// ```
pub fn canonical_path_key(raw: &str) -> String {
    raw.replace('\\', "/").to_lowercase()
}

/// Collapses a string into something usable as a file name: chunks between
/// invalid-name characters are joined with `_`, empty chunks dropped.
///
/// # Example
///
/// ```
/// use quantmap::key::sanitise_filename;
///
/// assert_eq!(sanitise_filename("Toto\"a>b<c"), "Toto_a_b_c");
/// ```
pub fn sanitise_filename(input: &str) -> String {
    input
        .split(|c: char| c.is_control() || INVALID_FILENAME_CHARS.contains(&c))
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_lower_cases() {
        assert_eq!(canonical_path_key("A/B.TXT"), "a/b.txt");
    }

    #[test]
    fn canonical_key_forward_slashes() {
        assert_eq!(canonical_path_key("a\\b\\c.txt"), "a/b/c.txt");
    }

    #[test]
    fn canonical_key_is_idempotent() {
        let once = canonical_path_key("X\\Y.Txt");
        assert_eq!(canonical_path_key(&once), once);
    }

    #[test]
    fn sanitise_collapses_adjacent_invalid_chars() {
        assert_eq!(sanitise_filename("a<>b"), "a_b");
    }

    #[test]
    fn sanitise_drops_leading_and_trailing_invalid_chars() {
        assert_eq!(sanitise_filename("<report>"), "report");
    }

    #[test]
    fn sanitise_keeps_clean_names_untouched() {
        assert_eq!(sanitise_filename("report-2023.json"), "report-2023.json");
    }
}
