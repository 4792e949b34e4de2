// src/resolve/facts.rs
//! Source facts and their trust ranking.
//!
//! A fact is immutable once produced; the merger only chooses among the
//! facts gathered for one entity and one field.

use std::fmt;

use crate::config::consts::UNKNOWN;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Processor,
    Memory,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Processor => "processor",
            Field::Memory => "memory",
        })
    }
}

/// Ordered lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trust {
    Default,
    StructuredLookup,
    Wiki,
    Override,
}

impl fmt::Display for Trust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trust::Default => "default",
            Trust::StructuredLookup => "lookup",
            Trust::Wiki => "wiki",
            Trust::Override => "override",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFact {
    pub entity: String,
    pub field: Field,
    pub value: String,
    pub trust: Trust,
}

impl SourceFact {
    pub fn new(entity: &str, field: Field, value: impl Into<String>, trust: Trust) -> Self {
        Self { entity: s!(entity), field, value: value.into(), trust }
    }

    /// Placeholder when no layer knows the value.
    pub fn unknown(entity: &str, field: Field) -> Self {
        Self::new(entity, field, UNKNOWN, Trust::Default)
    }

    pub fn is_unknown(&self) -> bool {
        self.value == UNKNOWN
    }
}

/// Highest-trust fact for `field`. Among equal trust the first one given wins.
/// `"Unknown"` values are not facts and never win.
pub fn select<'a, I>(facts: I, field: Field) -> Option<&'a SourceFact>
where
    I: IntoIterator<Item = &'a SourceFact>,
{
    let mut best: Option<&SourceFact> = None;
    for f in facts {
        if f.field != field || f.is_unknown() || f.value.trim().is_empty() {
            continue;
        }
        if best.is_none_or(|b| f.trust > b.trust) {
            best = Some(f);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_outranks_everything() {
        let facts = [
            SourceFact::new("iPad Air (4th generation)", Field::Processor, "A12", Trust::StructuredLookup),
            SourceFact::new("iPad Air (4th generation)", Field::Processor, "A14", Trust::Override),
            SourceFact::new("iPad Air (4th generation)", Field::Processor, "A13", Trust::Wiki),
        ];
        let won = select(&facts, Field::Processor).unwrap();
        assert_eq!(won.value, "A14");
        assert_eq!(won.trust, Trust::Override);
    }

    #[test]
    fn unknown_and_other_fields_are_ignored() {
        let facts = [
            SourceFact::new("x", Field::Processor, "Unknown", Trust::Wiki),
            SourceFact::new("x", Field::Memory, "8 GB", Trust::Override),
            SourceFact::new("x", Field::Processor, "A18", Trust::StructuredLookup),
        ];
        assert_eq!(select(&facts, Field::Processor).unwrap().value, "A18");
        assert!(select(&facts[..1], Field::Memory).is_none());
    }

    #[test]
    fn trust_order() {
        assert!(Trust::Override > Trust::Wiki);
        assert!(Trust::Wiki > Trust::StructuredLookup);
        assert!(Trust::StructuredLookup > Trust::Default);
    }
}
