// src/resolve/matcher.rs
//! Entity Matcher: links a device name to "the same" name in another source.
//!
//! Lookup order:
//! 1. raw exact name, then exact normalized name (lowercase, punctuation
//!    removed, whitespace collapsed);
//! 2. otherwise the best normalized-Levenshtein candidate, optionally limited
//!    to references in the target's partition class, if its score reaches
//!    the threshold.
//!
//! This is a single best-effort lookup per target, not an assignment: two
//! targets may link to the same reference. Ties on score go to the
//! lexicographically smallest normalized reference name.

use std::collections::HashMap;

use strsim::normalized_levenshtein;

use super::normalize::normalize_name;
use crate::config::options::Partition;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Confidence {
    Exact,
    Fuzzy(f64),
}

/// `canonical_name` (the target being resolved) ↔ `source_name` (the
/// reference entry it was linked to).
#[derive(Clone, Debug, PartialEq)]
pub struct MatchLink {
    pub canonical_name: String,
    pub source_name: String,
    pub confidence: Confidence,
}

#[derive(Clone, Debug)]
struct Entry<V> {
    key: String,
    name: String,
    class: Option<&'static str>,
    value: V,
}

#[derive(Clone, Debug)]
pub struct Matcher<V> {
    entries: Vec<Entry<V>>,
    raw: HashMap<String, usize>,
    normalized: HashMap<String, usize>,
    threshold: f64,
    partition: Option<Partition>,
}

impl<V> Matcher<V> {
    /// Build from `(reference name, value)` pairs. When several names share
    /// a normalized key, the first one given wins the exact step.
    pub fn new<I>(references: I, threshold: f64, partition: Option<Partition>) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let mut entries: Vec<Entry<V>> = references
            .into_iter()
            .map(|(name, value)| {
                let key = normalize_name(&name);
                let class = partition.map(|p| p.classify(&key));
                Entry { key, name, class, value }
            })
            .collect();

        // Stable sort keeps first-given order among equal keys.
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        let mut raw = HashMap::with_capacity(entries.len());
        let mut normalized = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            raw.entry(e.name.clone()).or_insert(i);
            normalized.entry(e.key.clone()).or_insert(i);
        }

        Self { entries, raw, normalized, threshold, partition }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Best acceptable reference for `target`, with the link that explains it.
    /// `None` is "not found", never an error.
    pub fn find(&self, target: &str) -> Option<(&V, MatchLink)> {
        let link = |e: &Entry<V>, confidence| MatchLink {
            canonical_name: s!(target),
            source_name: e.name.clone(),
            confidence,
        };

        if let Some(&i) = self.raw.get(target) {
            let e = &self.entries[i];
            return Some((&e.value, link(e, Confidence::Exact)));
        }

        let key = normalize_name(target);
        if let Some(&i) = self.normalized.get(&key) {
            let e = &self.entries[i];
            return Some((&e.value, link(e, Confidence::Exact)));
        }
        if key.is_empty() {
            return None;
        }

        let class = self.partition.map(|p| p.classify(&key));
        let mut best: Option<(f64, &Entry<V>)> = None;
        for e in &self.entries {
            if class.is_some() && e.class != class {
                continue;
            }
            let score = normalized_levenshtein(&key, &e.key);
            // Strictly greater: entries are key-sorted, so ties keep the smallest key.
            if best.is_none_or(|(b, _)| score > b) {
                best = Some((score, e));
            }
        }

        match best {
            Some((score, e)) if score >= self.threshold => {
                Some((&e.value, link(e, Confidence::Fuzzy(score))))
            }
            _ => None,
        }
    }

    pub fn lookup(&self, target: &str) -> Option<&V> {
        self.find(target).map(|(v, _)| v)
    }
}
