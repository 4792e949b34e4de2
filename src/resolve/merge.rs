// src/resolve/merge.rs
//! Catalog Merger: one record per structured-lookup row.
//!
//! Field priority (highest first):
//! - processor: manual override, wiki match, board code, `"Unknown"`
//! - memory: manual override, wiki match, memory-class table, family
//!   default for the resolved chip, `"Unknown"`
//! - identifier: identifier override, else the product type without its
//!   revision suffix
//!
//! Rows below the family's minimum generation are skipped before
//! resolution; the family membership check runs after it.

use crate::catalog::{Catalog, DeviceRecord, Identifier};
use crate::config::consts::{OVERRIDE_ONLY_MEMORY, UNKNOWN};
use crate::config::knowledge::KnowledgeBase;
use crate::config::options::FamilyOptions;
use crate::progress::Progress;
use crate::specs::device_traits::LookupRow;
use crate::specs::wiki::WikiDevice;

use super::facts::{select, Field, SourceFact, Trust};
use super::matcher::Matcher;
use super::normalize::{is_canonical_memory, strip_revision_suffix};

/// A resolved record the membership check refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedRecord {
    pub name: String,
    pub processor: String,
    pub trust: Trust,
}

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub catalog: Catalog,
    pub dropped: Vec<DroppedRecord>,
    /// Rows excluded by the minimum-generation filter.
    pub skipped: usize,
    /// The catalog was synthesized from overrides alone.
    pub from_overrides: bool,
}

pub struct Merger<'a> {
    opts: &'a FamilyOptions,
    kb: &'a KnowledgeBase,
    chips: Matcher<String>,
    memory: Matcher<String>,
    releases: Option<Matcher<String>>,
}

impl<'a> Merger<'a> {
    pub fn new(opts: &'a FamilyOptions, kb: &'a KnowledgeBase, wiki: &[WikiDevice]) -> Self {
        let chips = Matcher::new(
            wiki.iter().map(|d| (d.name.clone(), d.chip.clone())),
            opts.match_threshold,
            opts.partition,
        );
        let memory = Matcher::new(
            wiki.iter().map(|d| (d.name.clone(), d.memory.clone())),
            opts.match_threshold,
            None,
        );
        Self { opts, kb, chips, memory, releases: None }
    }

    /// Attach `(model, date)` pairs; every emitted record then carries a
    /// `release_date`, `"Unknown"` when no model matches.
    pub fn with_release_dates(mut self, dates: Vec<(String, String)>) -> Self {
        self.releases = Some(Matcher::new(dates, self.opts.release_match_threshold, None));
        self
    }

    fn wiki_fact(&self, matcher: &Matcher<String>, name: &str, field: Field) -> Option<SourceFact> {
        let (value, link) = matcher.find(name)?;
        if value == UNKNOWN {
            return None;
        }
        if field == Field::Memory && !is_canonical_memory(value) {
            logd!("Match: {} ignoring wiki memory '{value}'", link.canonical_name);
            return None;
        }
        logd!(
            "Match: {} → {} ({:?}) {field}={value}",
            link.canonical_name, link.source_name, link.confidence
        );
        Some(SourceFact::new(name, field, value.as_str(), Trust::Wiki))
    }

    pub fn resolve_processor(&self, row: &LookupRow) -> SourceFact {
        let name = row.name.as_str();
        let facts: Vec<SourceFact> = [
            self.kb
                .chip_override(name)
                .map(|c| SourceFact::new(name, Field::Processor, c, Trust::Override)),
            self.wiki_fact(&self.chips, name, Field::Processor),
            self.kb
                .board
                .lookup(&row.board_code)
                .map(|c| SourceFact::new(name, Field::Processor, c, Trust::StructuredLookup)),
        ]
        .into_iter()
        .flatten()
        .collect();

        select(&facts, Field::Processor)
            .cloned()
            .unwrap_or_else(|| SourceFact::unknown(name, Field::Processor))
    }

    pub fn resolve_memory(&self, row: &LookupRow, processor: &SourceFact) -> SourceFact {
        let name = row.name.as_str();
        let chip = (!processor.is_unknown()).then_some(processor.value.as_str());
        let facts: Vec<SourceFact> = [
            self.kb
                .memory_override(name)
                .map(|m| SourceFact::new(name, Field::Memory, m, Trust::Override)),
            self.wiki_fact(&self.memory, name, Field::Memory),
            row.memory_class
                .and_then(|c| self.kb.memory_for_class(c))
                .map(|m| SourceFact::new(name, Field::Memory, m, Trust::StructuredLookup)),
            self.kb
                .memory_default
                .as_ref()
                .map(|d| SourceFact::new(name, Field::Memory, d.for_chip(chip), Trust::Default)),
        ]
        .into_iter()
        .flatten()
        .collect();

        select(&facts, Field::Memory)
            .cloned()
            .unwrap_or_else(|| SourceFact::unknown(name, Field::Memory))
    }

    pub fn resolve_identifier(&self, row: &LookupRow) -> Identifier {
        match self.kb.identifier_override(&row.name).filter(|c| !c.trim().is_empty()) {
            Some(codes) => Identifier::parse(codes),
            None => Identifier::Single(s!(strip_revision_suffix(&row.product_type))),
        }
    }

    fn release_date(&self, name: &str) -> Option<String> {
        let releases = self.releases.as_ref()?;
        Some(releases.lookup(name).cloned().unwrap_or_else(|| s!(UNKNOWN)))
    }

    /// Build the catalog from lookup rows, in row order.
    pub fn merge(&self, rows: &[LookupRow], progress: &mut dyn Progress) -> MergeOutcome {
        let mut out = MergeOutcome::default();
        progress.begin(rows.len());

        for row in rows {
            if row.generation().unwrap_or(0) < self.opts.min_generation {
                logd!("Merge: skip {} ({}) below generation {}", row.name, row.product_type, self.opts.min_generation);
                out.skipped += 1;
                continue;
            }

            let processor = self.resolve_processor(row);
            let memory = self.resolve_memory(row, &processor);
            let identifier = self.resolve_identifier(row);
            logd!(
                "Merge: {} sku={identifier} chip={} [{}] ram={} [{}]",
                row.name, processor.value, processor.trust, memory.value, memory.trust
            );

            if !self.opts.admits_processor(&processor.value) {
                if processor.trust == Trust::Override {
                    let msg = format!(
                        "{} dropped: override chip '{}' is outside the {} line",
                        row.name, processor.value, self.opts.family
                    );
                    logw!("Merge: {msg}");
                    progress.warn(&msg);
                } else {
                    logd!("Merge: drop {} (chip {})", row.name, processor.value);
                }
                out.dropped.push(DroppedRecord {
                    name: row.name.clone(),
                    processor: processor.value,
                    trust: processor.trust,
                });
                continue;
            }

            let record = DeviceRecord {
                name: row.name.clone(),
                identifier,
                processor: processor.value,
                memory: memory.value,
                release_date: self.release_date(&row.name),
            };
            if out.catalog.insert(record) {
                logd!("Merge: {} overwritten by a later row", row.name);
            }
            progress.item_done(&row.name);
        }

        if out.catalog.is_empty() && self.opts.overrides_fallback && self.kb.has_chip_overrides() {
            logw!("Merge: no {} records from the lookup; building from overrides", self.opts.family);
            progress.warn("no records from the device lookup; building the catalog from overrides");
            out.catalog = self.from_overrides(progress);
            out.from_overrides = true;
        }
        out
    }

    /// Catalog made only of curated overrides that name a chip, in file order.
    pub fn from_overrides(&self, progress: &mut dyn Progress) -> Catalog {
        let mut catalog = Catalog::new();
        for o in self.kb.overrides.iter() {
            let Some(chip) = o.chip.as_deref() else { continue };
            let identifier = match o.identifier.as_deref().filter(|c| !c.trim().is_empty()) {
                Some(codes) => Identifier::Multi(codes.split_whitespace().map(String::from).collect()),
                None => Identifier::Multi(vec![s!(UNKNOWN)]),
            };
            catalog.insert(DeviceRecord {
                name: o.name.clone(),
                identifier,
                processor: s!(chip),
                memory: o.memory.clone().unwrap_or_else(|| s!(OVERRIDE_ONLY_MEMORY)),
                release_date: self.release_date(&o.name),
            });
            progress.item_done(&o.name);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    const KB: &str = r#"
        family = "iPad"

        [[board]]
        code = "j307ap"
        chip = "A14"

        [[board]]
        code = "j517"
        chip = "M1"

        [[override]]
        name = "iPad Air (4th generation)"
        chip = "A14 Override"
        memory = "4 GB"

        [[override]]
        name = "iPad Pro (12.9-inch) (5th generation)"
        identifier = "iPad13,8"

        [[memory_class]]
        class = 6
        memory = "6 GB"
    "#;

    fn row(name: &str, product_type: &str, board: &str, class: Option<i64>) -> LookupRow {
        LookupRow {
            name: s!(name),
            product_type: s!(product_type),
            board_code: s!(board),
            platform: s!("iPhoneOS"),
            memory_class: class,
        }
    }

    fn wiki(name: &str, chip: &str, memory: &str) -> WikiDevice {
        WikiDevice { name: s!(name), chip: s!(chip), memory: s!(memory) }
    }

    #[test]
    fn override_beats_wiki_and_board() {
        let opts = FamilyOptions::ipad();
        let kb = KnowledgeBase::from_toml("t", KB).unwrap();
        let wiki = [wiki("iPad Air (4th generation)", "A13", "3 GB")];
        let m = Merger::new(&opts, &kb, &wiki);

        let r = row("iPad Air (4th generation)", "iPad13,1", "j307ap", Some(6));
        let chip = m.resolve_processor(&r);
        assert_eq!((chip.value.as_str(), chip.trust), ("A14 Override", Trust::Override));
        let ram = m.resolve_memory(&r, &chip);
        assert_eq!((ram.value.as_str(), ram.trust), ("4 GB", Trust::Override));
    }

    #[test]
    fn layers_fall_through_in_order() {
        let opts = FamilyOptions::ipad();
        let kb = KnowledgeBase::from_toml("t", KB).unwrap();
        let wiki = [wiki("iPad Pro (12.9-inch) (5th generation)", "Unknown", "Unknown")];
        let m = Merger::new(&opts, &kb, &wiki);

        let r = row("iPad Pro (12.9-inch) (5th generation)", "iPad13,8-A", "j517xap", Some(6));
        let chip = m.resolve_processor(&r);
        // Wiki says Unknown, so the board prefix decides
        assert_eq!((chip.value.as_str(), chip.trust), ("M1", Trust::StructuredLookup));
        let ram = m.resolve_memory(&r, &chip);
        assert_eq!((ram.value.as_str(), ram.trust), ("6 GB", Trust::StructuredLookup));

        let none = row("iPad (9th generation)", "iPad12,1", "zzz", Some(99));
        let chip = m.resolve_processor(&none);
        assert!(chip.is_unknown());
        assert!(m.resolve_memory(&none, &chip).is_unknown());
    }

    #[test]
    fn free_text_wiki_memory_falls_through_to_memory_class() {
        let opts = FamilyOptions::ipad();
        let kb = KnowledgeBase::from_toml("t", KB).unwrap();
        let wiki = [wiki("iPad Air (5th generation)", "M1", "Varies by model")];
        let m = Merger::new(&opts, &kb, &wiki);

        let r = row("iPad Air (5th generation)", "iPad13,16", "j407ap", Some(6));
        let chip = m.resolve_processor(&r);
        assert_eq!((chip.value.as_str(), chip.trust), ("M1", Trust::Wiki));
        let ram = m.resolve_memory(&r, &chip);
        assert_eq!((ram.value.as_str(), ram.trust), ("6 GB", Trust::StructuredLookup));
    }

    #[test]
    fn identifier_override_and_suffix_strip() {
        let opts = FamilyOptions::ipad();
        let kb = KnowledgeBase::from_toml("t", KB).unwrap();
        let m = Merger::new(&opts, &kb, &[]);
        let pro = row("iPad Pro (12.9-inch) (5th generation)", "iPad13,10-B", "j517ap", None);
        assert_eq!(m.resolve_identifier(&pro), Identifier::Single(s!("iPad13,8")));
        let air = row("iPad Air (5th generation)", "iPad13,16-A", "j407ap", None);
        assert_eq!(m.resolve_identifier(&air), Identifier::Single(s!("iPad13,16")));
    }

    #[test]
    fn membership_runs_after_resolution() {
        let opts = FamilyOptions::mac();
        let kb = KnowledgeBase::from_toml(
            "mac",
            r#"
            family = "Mac"
            [[board]]
            code = "j413"
            chip = "M2"
            [[override]]
            name = "Odd Mac"
            chip = "Intel Core i9"
            "#,
        )
        .unwrap();
        let m = Merger::new(&opts, &kb, &[]);
        let rows = [
            row("MacBook Air (M2, 2022)", "Mac14,2", "j413ap", None),
            row("Odd Mac", "Mac15,99", "j413ap", None),
            row("Mystery Mac", "Mac1,1", "x1", None),
        ];
        let out = m.merge(&rows, &mut NullProgress);
        assert_eq!(out.catalog.len(), 1);
        assert_eq!(out.catalog.get("MacBook Air (M2, 2022)").unwrap().processor, "M2");
        assert_eq!(
            out.dropped,
            vec![
                DroppedRecord { name: s!("Odd Mac"), processor: s!("Intel Core i9"), trust: Trust::Override },
                DroppedRecord { name: s!("Mystery Mac"), processor: s!("Unknown"), trust: Trust::Default },
            ]
        );
        assert!(!out.from_overrides);
    }

    #[test]
    fn overrides_fill_an_empty_lookup() {
        let opts = FamilyOptions::mac();
        let kb = KnowledgeBase::from_toml(
            "mac",
            r#"
            family = "Mac"
            [[override]]
            name = "Mac mini (2024)"
            chip = "M4"
            memory = "16 GB"
            identifier = "Mac16,10 Mac16,11"
            [[override]]
            name = "Mac Studio (2025)"
            chip = "M4 Max"
            "#,
        )
        .unwrap();
        let out = Merger::new(&opts, &kb, &[]).merge(&[], &mut NullProgress);
        assert!(out.from_overrides);
        let mini = out.catalog.get("Mac mini (2024)").unwrap();
        assert_eq!(mini.identifier.codes(), ["Mac16,10", "Mac16,11"]);
        assert_eq!(mini.memory, "16 GB");
        let studio = out.catalog.get("Mac Studio (2025)").unwrap();
        assert_eq!(studio.identifier, Identifier::Multi(vec![s!("Unknown")]));
        assert_eq!(studio.memory, "8 GB");
    }

    #[test]
    fn generation_filter_skips_old_rows() {
        let opts = FamilyOptions::iphone();
        let kb = KnowledgeBase::empty("iPhone");
        let m = Merger::new(&opts, &kb, &[]);
        let rows = [row("iPhone 8", "iPhone10,1", "d20ap", None), row("iPhone 7", "iPhone9,1", "d10ap", None)];
        let out = m.merge(&rows, &mut NullProgress);
        assert_eq!(out.skipped, 1);
        assert_eq!(out.catalog.records().next().unwrap().name, "iPhone 8");
    }
}
