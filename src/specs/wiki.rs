// src/specs/wiki.rs
//! Reading spec for The Apple Wiki device list pages.
//!
//! Purpose:
//! - Fetch the raw wiki markup of a family page through the MediaWiki API.
//! - Split it into one block per `== [[Device name]] ==` heading.
//! - Pull the processor out of the `* CPU:` line and the memory out of the
//!   `* RAM:` line of each block.
//!
//! A block with no usable `CPU:`/`RAM:` line yields `"Unknown"` for that
//! field; it never fails the page.

use regex::Regex;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::consts::{APPLE_WIKI_API_URL, MEDIA_PREFIXES, UNKNOWN};
use crate::config::options::{ChipPattern, FamilyOptions};
use crate::core::net::{self, RetryPolicy};
use crate::core::sanitize::unlink;
use crate::error::{Error, Result};
use crate::resolve::normalize::normalize_memory;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiDevice {
    pub name: String,
    pub chip: String,
    pub memory: String,
}

/// Compiled per-family extraction rules.
pub struct Extractor {
    heading: Regex,
    cpu_line: Regex,
    ram_line: Regex,
    chip: Regex,
    pattern: ChipPattern,
    keyword: String,
}

impl Extractor {
    pub fn new(opts: &FamilyOptions) -> Result<Self> {
        let pattern = opts.chip;
        let lines: String = pattern.lines.iter().collect();
        let quals = pattern
            .qualifiers
            .iter()
            .map(|q| regex::escape(q))
            .collect::<Vec<_>>()
            .join("|");
        let chip = if quals.is_empty() {
            format!(r"\b[{lines}]\d+\b")
        } else {
            format!(r"\b[{lines}]\d+(?:\s*(?:{quals}))?\b")
        };

        Ok(Self {
            heading: Regex::new(r"==\s*\[\[(.*?)\]\]\s*==")?,
            cpu_line: Regex::new(r"\*\s*CPU:[ \t]*([^\r\n]*)")?,
            ram_line: Regex::new(r"(?i)\*\s*RAM:[ \t]*([^\r\n]*)")?,
            chip: Regex::new(&chip)?,
            pattern,
            keyword: opts.wiki_keyword.to_lowercase(),
        })
    }

    /// Processor named in a block's `CPU:` line, or `"Unknown"`.
    ///
    /// A link label (`[[target|label]]`) is searched before the rest of the
    /// line; deprecated qualifiers are dropped from the result; legacy chip
    /// identifiers are the last resort.
    pub fn extract_chip(&self, block: &str) -> String {
        let Some(line) = self.cpu_line.captures(block).map(|c| c[1].trim().to_string()) else {
            return s!(UNKNOWN);
        };

        let label = line
            .find("[[")
            .and_then(|o| line[o..].find("]]").map(|c| unlink(&line[o..o + c + 2])));
        let found = label
            .as_deref()
            .and_then(|l| self.chip.find(l))
            .map(|m| s!(m.as_str()))
            .or_else(|| self.chip.find(&unlink(&line)).map(|m| s!(m.as_str())));

        if let Some(chip) = found {
            return self.strip_deprecated(&chip);
        }
        self.pattern
            .legacy_ids
            .iter()
            .find(|id| line.contains(*id))
            .map(|id| s!(*id))
            .unwrap_or_else(|| s!(UNKNOWN))
    }

    fn strip_deprecated(&self, chip: &str) -> String {
        chip.split_whitespace()
            .filter(|w| !self.pattern.deprecated.contains(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonical memory from a block's `RAM:` line, or `"Unknown"`.
    pub fn extract_memory(&self, block: &str) -> String {
        match self.ram_line.captures(block).map(|c| c[1].trim().to_string()) {
            Some(raw) if !raw.is_empty() => normalize_memory(&raw),
            _ => s!(UNKNOWN),
        }
    }

    fn admits(&self, name: &str, block: &str) -> bool {
        self.keyword.is_empty()
            || name.to_lowercase().contains(&self.keyword)
            || block.to_lowercase().contains(&self.keyword)
    }

    /// Every device block on the page, in page order. A name that appears
    /// twice keeps its first position and its last values.
    pub fn parse_devices(&self, text: &str) -> Vec<WikiDevice> {
        let heads: Vec<_> = self.heading.captures_iter(text).collect();
        let mut out: Vec<WikiDevice> = Vec::with_capacity(heads.len());

        for (i, cap) in heads.iter().enumerate() {
            let (Some(whole), Some(inner)) = (cap.get(0), cap.get(1)) else { continue };
            let end = heads
                .get(i + 1)
                .and_then(|n| n.get(0))
                .map_or(text.len(), |m| m.start());
            let block = &text[whole.end()..end];

            let raw_name = inner.as_str().trim();
            if MEDIA_PREFIXES.iter().any(|p| raw_name.starts_with(p)) {
                continue;
            }
            let name = raw_name.rsplit('|').next().unwrap_or(raw_name).trim();
            if name.is_empty() || !self.admits(name, block) {
                continue;
            }

            let device = WikiDevice {
                name: s!(name),
                chip: self.extract_chip(block),
                memory: self.extract_memory(block),
            };
            logd!("Wiki: {} → chip={} ram={}", device.name, device.chip, device.memory);
            match out.iter_mut().find(|d| d.name == device.name) {
                Some(prev) => *prev = device,
                None => out.push(device),
            }
        }
        out
    }
}

/// Markup of the latest revision from a MediaWiki `prop=revisions` response.
pub fn revision_text(body: &str, url: &str, title: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body)
        .map_err(|source| Error::Decode { url: s!(url), source })?;
    let pages = json
        .pointer("/query/pages")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::NoRevision(s!(title)))?;

    pages
        .values()
        .filter_map(|page| page.pointer("/revisions/0"))
        .find_map(|rev| {
            rev.get("*")
                .or_else(|| rev.pointer("/slots/main/*"))
                .and_then(Value::as_str)
        })
        .map(String::from)
        .ok_or_else(|| Error::NoRevision(s!(title)))
}

/// Download the family page's markup. Failure here aborts the family's run.
pub fn fetch(client: &Client, opts: &FamilyOptions, policy: &RetryPolicy) -> Result<String> {
    let query = [
        ("action", "query"),
        ("titles", opts.wiki_page),
        ("prop", "revisions"),
        ("rvprop", "content"),
        ("format", "json"),
    ];
    logf!("Wiki: fetching {}", opts.wiki_page);
    let body = net::get_text(client, APPLE_WIKI_API_URL, &query, policy)?;
    let text = revision_text(&body, APPLE_WIKI_API_URL, opts.wiki_page)?;
    logf!("Wiki: {} bytes of markup for {}", text.len(), opts.wiki_page);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
intro text
== [[File:iPad lineup.png]] ==
* CPU: [[A99]]
== [[iPad Pro (12.9-inch) (5th generation)]] ==
* CPU: [[Apple M1|M1]]
* RAM: 8GB LPDDR4X
== [[iPad Air (3rd generation)|iPad Air 3]] ==
* CPU: [[A12 Bionic]]
* ram: 3 GB
== [[iPod touch (7th generation)]] ==
* CPU: A10 Fusion
== [[iPad (1st generation)]] ==
* Storage: 16 GB
";

    fn ipad() -> Extractor {
        Extractor::new(&FamilyOptions::ipad()).unwrap()
    }

    #[test]
    fn page_splits_into_family_devices() {
        let devices = ipad().parse_devices(PAGE);
        let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["iPad Pro (12.9-inch) (5th generation)", "iPad Air 3", "iPad (1st generation)"]
        );
        assert_eq!(devices[0].chip, "M1");
        assert_eq!(devices[0].memory, "8 GB");
        assert_eq!(devices[1].chip, "A12");
        assert_eq!(devices[1].memory, "3 GB");
        assert_eq!(devices[2].chip, "Unknown");
        assert_eq!(devices[2].memory, "Unknown");
    }

    #[test]
    fn label_is_preferred_and_qualifiers_kept() {
        let x = ipad();
        assert_eq!(x.extract_chip("* CPU: [[Apple A12X Bionic|A12X Bionic]]"), "A12X");
        assert_eq!(x.extract_chip("* CPU: [[A17 Pro]] (6-core)"), "A17 Pro");
        assert_eq!(x.extract_chip("* CPU: Apple M4 with 10 cores"), "M4");
        let mac = Extractor::new(&FamilyOptions::mac()).unwrap();
        assert_eq!(mac.extract_chip("* CPU: [[M2 Ultra]]"), "M2 Ultra");
        assert_eq!(mac.extract_chip("* CPU: Intel Core i9"), "Unknown");
    }

    #[test]
    fn legacy_ids_are_a_fallback() {
        let iphone = Extractor::new(&FamilyOptions::iphone()).unwrap();
        assert_eq!(iphone.extract_chip("* CPU: Samsung S5L8900 (412 MHz)"), "S5L8900");
        assert_eq!(iphone.extract_chip("* CPU: [[A11 Bionic]]"), "A11");
    }

    #[test]
    fn revision_content_is_found() {
        let body = r#"{"query":{"pages":{"-1":{"title":"x"},"42":{"revisions":[{"*":"== [[iPhone 16]] =="}]}}}}"#;
        assert_eq!(revision_text(body, "u", "List_of_iPhones").unwrap(), "== [[iPhone 16]] ==");
        let empty = r#"{"query":{"pages":{"-1":{"missing":""}}}}"#;
        assert!(matches!(revision_text(empty, "u", "Nope"), Err(Error::NoRevision(_))));
        assert!(matches!(revision_text("<html>", "u", "Nope"), Err(Error::Decode { .. })));
    }
}
