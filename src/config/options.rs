// src/config/options.rs
use std::fmt;
use std::path::PathBuf;

use super::consts::DEFAULT_OUT_DIR;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    IPhone,
    IPad,
    Mac,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::IPhone, Family::IPad, Family::Mac];

    pub fn label(&self) -> &'static str {
        match self {
            Family::IPhone => "iPhone",
            Family::IPad => "iPad",
            Family::Mac => "Mac",
        }
    }

    pub fn options(&self) -> FamilyOptions {
        match self {
            Family::IPhone => FamilyOptions::iphone(),
            Family::IPad => FamilyOptions::ipad(),
            Family::Mac => FamilyOptions::mac(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword rules that split a family into sub-lines for scoped matching.
/// Rules are tried in order against a normalized name; the first keyword
/// contained in the name gives the class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub rules: &'static [(&'static str, &'static str)],
    pub fallback: &'static str,
}

impl Partition {
    pub fn classify(&self, normalized_name: &str) -> &'static str {
        self.rules
            .iter()
            .find(|(kw, _)| normalized_name.contains(kw))
            .map(|(_, class)| *class)
            .unwrap_or(self.fallback)
    }
}

/// How chip names are recognized inside a wiki `CPU:` label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipPattern {
    /// Generation-line letters, e.g. `A` and `M`.
    pub lines: &'static [char],
    /// Qualifier words allowed after the generation number.
    pub qualifiers: &'static [&'static str],
    /// Qualifiers stripped from the result (marketing names no longer used).
    pub deprecated: &'static [&'static str],
    /// Fixed identifiers of chips that predate the lettered naming.
    pub legacy_ids: &'static [&'static str],
}

/// Per-family configuration. Everything that differs between the iPhone,
/// iPad and Mac catalogs lives here or in the family's knowledge base.
#[derive(Clone, Debug, PartialEq)]
pub struct FamilyOptions {
    pub family: Family,
    /// `ProductType` prefix in the Xcode lookup.
    pub product_prefix: &'static str,
    /// Apple Wiki page title holding the family's device list.
    pub wiki_page: &'static str,
    /// Wiki entries are kept only if their name or body mentions this.
    pub wiki_keyword: &'static str,
    pub chip: ChipPattern,
    /// Fuzzy acceptance threshold for the Entity Matcher.
    pub match_threshold: f64,
    pub partition: Option<Partition>,
    /// Lookup rows whose product generation is below this are skipped.
    pub min_generation: u32,
    /// If non-empty, a record is emitted only when its resolved processor
    /// starts with one of these prefixes.
    pub membership_prefixes: &'static [&'static str],
    /// Join `DeviceTraits.DevicePerformanceMemoryClass` in the lookup query.
    pub memory_class_column: bool,
    /// Wikipedia page with a release-date table, if the family uses one.
    pub release_dates_page: Option<&'static str>,
    pub release_match_threshold: f64,
    /// Synthesize the catalog from overrides when the lookup emits nothing.
    pub overrides_fallback: bool,
    pub out_file: &'static str,
}

impl FamilyOptions {
    pub fn iphone() -> Self {
        Self {
            family: Family::IPhone,
            product_prefix: "iPhone",
            wiki_page: "List_of_iPhones",
            wiki_keyword: "iPhone",
            chip: ChipPattern {
                lines: &['A'],
                qualifiers: &["Pro", "X", "Bionic", "Fusion"],
                deprecated: &["Bionic", "Fusion"],
                legacy_ids: &[
                    "S5L8900", "S5L8920", "S5L8930", "S5L8940",
                    "S5L8942", "S5L8945", "S5L8950", "S5L8955",
                ],
            },
            match_threshold: 0.85,
            partition: None,
            min_generation: 10,
            membership_prefixes: &[],
            memory_class_column: true,
            release_dates_page: Some("List_of_iPhone_models"),
            release_match_threshold: 0.85,
            overrides_fallback: false,
            out_file: "iPhone.json",
        }
    }

    pub fn ipad() -> Self {
        Self {
            family: Family::IPad,
            product_prefix: "iPad",
            wiki_page: "List_of_iPads",
            wiki_keyword: "iPad",
            chip: ChipPattern {
                lines: &['A', 'M'],
                qualifiers: &["Pro", "X", "Z", "Bionic", "Fusion"],
                deprecated: &["Bionic", "Fusion"],
                legacy_ids: &[],
            },
            match_threshold: 0.80,
            partition: Some(Partition {
                rules: &[("pro", "pro"), ("air", "air"), ("mini", "mini")],
                fallback: "ipad",
            }),
            min_generation: 0,
            membership_prefixes: &[],
            memory_class_column: true,
            release_dates_page: None,
            release_match_threshold: 0.85,
            overrides_fallback: false,
            out_file: "iPad.json",
        }
    }

    pub fn mac() -> Self {
        Self {
            family: Family::Mac,
            product_prefix: "Mac",
            wiki_page: "List_of_Macs",
            wiki_keyword: "Mac",
            chip: ChipPattern {
                lines: &['M'],
                qualifiers: &["Pro", "Max", "Ultra"],
                deprecated: &[],
                legacy_ids: &[],
            },
            match_threshold: 0.80,
            partition: Some(Partition {
                rules: &[
                    ("macbook air", "macbook air"),
                    ("macbook pro", "macbook pro"),
                    ("mac mini", "mac mini"),
                    ("mac studio", "mac studio"),
                    ("mac pro", "mac pro"),
                    ("imac", "imac"),
                ],
                fallback: "mac",
            }),
            min_generation: 0,
            membership_prefixes: &["M"],
            memory_class_column: false,
            release_dates_page: None,
            release_match_threshold: 0.85,
            overrides_fallback: true,
            out_file: "Mac.json",
        }
    }

    pub fn out_path(&self) -> PathBuf {
        PathBuf::from(DEFAULT_OUT_DIR).join(self.out_file)
    }

    /// Post-resolution membership check. An empty prefix list admits all.
    pub fn admits_processor(&self, processor: &str) -> bool {
        if self.membership_prefixes.is_empty() {
            return true;
        }
        let chip = processor.trim().to_ascii_uppercase();
        self.membership_prefixes
            .iter()
            .any(|p| chip.starts_with(&p.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipad_partition_checks_pro_before_mini() {
        let p = FamilyOptions::ipad().partition.unwrap();
        assert_eq!(p.classify("ipad pro 11inch"), "pro");
        assert_eq!(p.classify("ipad mini 6th generation"), "mini");
        assert_eq!(p.classify("ipad 10th generation"), "ipad");
    }

    #[test]
    fn mac_membership_requires_m_line() {
        let mac = FamilyOptions::mac();
        assert!(mac.admits_processor("M2 Ultra"));
        assert!(mac.admits_processor("m1"));
        assert!(!mac.admits_processor("Unknown"));
        assert!(!mac.admits_processor("A12Z"));
        assert!(FamilyOptions::ipad().admits_processor("Unknown"));
    }
}
