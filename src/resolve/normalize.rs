// src/resolve/normalize.rs
//! Field canonicalization shared by every source.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::consts::UNKNOWN;
use crate::core::sanitize::normalize_ws;

fn memory_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // Leading integer + unit; a trailing LPDDRn(X) qualifier is tolerated and dropped.
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(GB|MB|G|M)(?:\s*LPDDR\d+X?)?").ok())
        .as_ref()
}

/// Canonicalize a free-text memory size to `"<N> GB"` / `"<N> MB"`.
///
/// `"Unknown"` passes through. Input without a recognizable size is returned
/// unchanged (not turned into `"Unknown"`).
pub fn normalize_memory(raw: &str) -> String {
    if raw == UNKNOWN {
        return s!(raw);
    }
    let upper = raw.trim().to_uppercase();
    let Some(caps) = memory_re().and_then(|re| re.captures(&upper)) else {
        return s!(raw);
    };
    let unit = match &caps[2] {
        "G" | "GB" => "GB",
        _ => "MB",
    };
    format!("{} {}", &caps[1], unit)
}

/// `true` for `"<N> GB"` or `"<N> MB"`, the only sizes a record may carry.
pub fn is_canonical_memory(value: &str) -> bool {
    match value.split_once(' ') {
        Some((n, "GB" | "MB")) => !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Matching key for device names: lowercase, punctuation removed,
/// whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect();
    normalize_ws(&stripped)
}

/// Strip a trailing hardware-revision suffix (`-A`, `-B`, …) from a product code.
pub fn strip_revision_suffix(code: &str) -> &str {
    let b = code.as_bytes();
    if b.len() >= 2 && b[b.len() - 2] == b'-' && b[b.len() - 1].is_ascii_uppercase() {
        &code[..code.len() - 2]
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_memory_shape() {
        assert!(is_canonical_memory("8 GB"));
        assert!(is_canonical_memory("512 MB"));
        assert!(!is_canonical_memory("Varies by model"));
        assert!(!is_canonical_memory("8GB"));
        assert!(!is_canonical_memory(" GB"));
        assert!(!is_canonical_memory("Unknown"));
    }

    #[test]
    fn memory_units_canonicalize() {
        assert_eq!(normalize_memory("4GB"), "4 GB");
        assert_eq!(normalize_memory(" 512 mb "), "512 MB");
        assert_eq!(normalize_memory("8 G"), "8 GB");
        assert_eq!(normalize_memory("128M"), "128 MB");
        assert_eq!(normalize_memory("8 GB LPDDR5X"), "8 GB");
        assert_eq!(normalize_memory("6 GB LPDDR4X SDRAM"), "6 GB");
    }

    #[test]
    fn memory_passthrough_when_unrecognized() {
        assert_eq!(normalize_memory("Unknown"), "Unknown");
        assert_eq!(normalize_memory("varies"), "varies");
        assert_eq!(normalize_memory(""), "");
    }

    #[test]
    fn memory_normalization_is_idempotent() {
        for raw in ["1GB", "2 GB", "3G", "256MB", "512 M", "16 gb", "4GB LPDDR4X", "64 Gb"] {
            let once = normalize_memory(raw);
            assert_eq!(normalize_memory(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn names_normalize_for_matching() {
        assert_eq!(normalize_name("iPad Pro (12.9-inch) (5th generation)"), "ipad pro 129inch 5th generation");
        assert_eq!(normalize_name("  iPhone   XS\tMax "), "iphone xs max");
        assert_eq!(normalize_name("Mac mini (2024, M4)"), "mac mini 2024 m4");
    }

    #[test]
    fn revision_suffix_is_stripped() {
        assert_eq!(strip_revision_suffix("iPad13,8-A"), "iPad13,8");
        assert_eq!(strip_revision_suffix("iPhone17,3"), "iPhone17,3");
        assert_eq!(strip_revision_suffix("Mac16,1-b"), "Mac16,1-b");
        assert_eq!(strip_revision_suffix("-A"), "");
    }
}
