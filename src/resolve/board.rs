// src/resolve/board.rs
//! Board-code → processor resolution.
//!
//! The table is an ordered sequence, not a map: an exact match on the full
//! code wins; otherwise the first entry (in file order) whose code is a
//! prefix of the input wins. Overlapping prefixes are not disambiguated, so
//! earlier entries take precedence over later ones.

use serde::Deserialize;

use crate::config::consts::UNKNOWN;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct BoardMapping {
    pub code: String,
    pub chip: String,
}

#[derive(Clone, Debug, Default)]
pub struct BoardTable {
    entries: Vec<BoardMapping>,
}

impl BoardTable {
    pub fn new(entries: Vec<BoardMapping>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Exact match first, then first prefix match in table order.
    pub fn lookup(&self, board_code: &str) -> Option<&str> {
        if board_code.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|m| m.code == board_code)
            .or_else(|| self.entries.iter().find(|m| board_code.starts_with(m.code.as_str())))
            .map(|m| m.chip.as_str())
    }

    /// Like [`lookup`](Self::lookup) but degrades to `"Unknown"`.
    pub fn resolve(&self, board_code: &str) -> &str {
        self.lookup(board_code).unwrap_or(UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> BoardTable {
        BoardTable::new(
            pairs.iter()
                .map(|(c, p)| BoardMapping { code: s!(*c), chip: s!(*p) })
                .collect(),
        )
    }

    #[test]
    fn exact_codes_map_verbatim() {
        let t = table(&[("j720ap", "M4"), ("j71ap", "A7"), ("j71bap", "A10")]);
        assert_eq!(t.resolve("j720ap"), "M4");
        assert_eq!(t.resolve("j71bap"), "A10");
        assert_eq!(t.resolve("j71ap"), "A7");
    }

    #[test]
    fn exact_beats_earlier_prefix() {
        // "j71" would prefix-match "j71bap", but the exact entry is preferred
        let t = table(&[("j71", "A7"), ("j71bap", "A10")]);
        assert_eq!(t.resolve("j71bap"), "A10");
    }

    #[test]
    fn first_prefix_in_order_wins() {
        let t = table(&[("j72", "M4"), ("j720", "M4 Pro")]);
        assert_eq!(t.resolve("j720sap"), "M4");
        let t = table(&[("j720", "M4 Pro"), ("j72", "M4")]);
        assert_eq!(t.resolve("j720sap"), "M4 Pro");
    }

    #[test]
    fn unmatched_code_is_unknown() {
        let t = table(&[("j720ap", "M4")]);
        assert_eq!(t.resolve("x999ap"), "Unknown");
        assert_eq!(t.resolve(""), "Unknown");
        assert_eq!(t.lookup("j72"), None);
    }
}
