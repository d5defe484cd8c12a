//! Detector label parsing.
//!
//! A detector class name either names a conforming component exactly (`cap_b`) or a
//! non-conforming variant of it, written as the base name, the delimiter and a single
//! reserved code: `cap_b_w` (misaligned) or `cap_b_n` (missing).

use crate::error::TaxonomyError;
use std::collections::BTreeSet;

pub const DELIMITER: char = '_';
pub const MISALIGNED_CODE: char = 'w';
pub const MISSING_CODE: char = 'n';

/// Inspection state carried by a single detection label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionState {
    Conforming,
    Misaligned,
    Missing,
}

impl DetectionState {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            MISALIGNED_CODE => Some(DetectionState::Misaligned),
            MISSING_CODE => Some(DetectionState::Missing),
            _ => None,
        }
    }

    pub fn is_conforming(self) -> bool {
        self == DetectionState::Conforming
    }
}

/// A detection label split into its base component name and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLabel<'a> {
    pub base: &'a str,
    pub state: DetectionState,
}

impl<'a> ParsedLabel<'a> {
    /// Parse a raw label. Never fails: anything without a reserved suffix is conforming.
    pub fn parse(label: &'a str) -> Self {
        match split_suffix(label) {
            Some((base, state)) => ParsedLabel { base, state },
            None => ParsedLabel {
                base: label,
                state: DetectionState::Conforming,
            },
        }
    }
}

fn split_suffix(label: &str) -> Option<(&str, DetectionState)> {
    let mut tail = label.char_indices().rev();
    let (_, code) = tail.next()?;
    let (delimiter_at, delimiter) = tail.next()?;
    if delimiter != DELIMITER {
        return None;
    }
    let state = DetectionState::from_code(code)?;
    Some((&label[..delimiter_at], state))
}

/// Check that `base`, obtained from `label`, is an unambiguous base component name.
pub fn validate_base_name(label: &str, base: &str) -> Result<(), TaxonomyError> {
    if base.is_empty() {
        return Err(TaxonomyError::EmptyBase {
            label: label.to_string(),
        });
    }
    if split_suffix(base).is_some() {
        return Err(TaxonomyError::AmbiguousSuffix {
            label: label.to_string(),
            base: base.to_string(),
        });
    }
    Ok(())
}

/// Derive the sorted, deduplicated base component names from a label vocabulary.
pub fn resolve_base_names<I, S>(vocabulary: I) -> Result<Vec<String>, TaxonomyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut bases = BTreeSet::new();
    for label in vocabulary {
        let label = label.as_ref();
        let parsed = ParsedLabel::parse(label);
        validate_base_name(label, parsed.base)?;
        bases.insert(parsed.base.to_string());
    }
    Ok(bases.into_iter().collect())
}
