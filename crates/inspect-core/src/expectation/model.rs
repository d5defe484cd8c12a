//! Expectation model

use super::prompt::{acquire_count, CountPrompt};
use crate::error::CoreError;
use crate::taxonomy::validate_base_name;
use std::collections::BTreeMap;

/// Expected-good and physical counts for one base component name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub expected_ok: i64,
    pub total: i64,
}

impl Expectation {
    /// Not clamped: negative when the operator declares more than the board holds.
    pub fn expected_not_ok(&self) -> i64 {
        self.total - self.expected_ok
    }
}

/// Per-session ground truth, keyed by base component name. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationModel {
    entries: BTreeMap<String, Expectation>,
}

impl ExpectationModel {
    /// Ask `prompt` for the expected-OK count of every base name, in the given order.
    ///
    /// Names absent from `totals` get a total of 0. A name that still carries a `_w`/`_n`
    /// suffix is rejected before anything is asked.
    pub fn build<S, P>(
        base_names: &[S],
        totals: &BTreeMap<String, i64>,
        prompt: &mut P,
    ) -> Result<Self, CoreError>
    where
        S: AsRef<str>,
        P: CountPrompt + ?Sized,
    {
        for name in base_names {
            validate_base_name(name.as_ref(), name.as_ref())?;
        }
        let mut entries = BTreeMap::new();
        for name in base_names {
            let name = name.as_ref();
            let expected_ok = acquire_count(name, prompt)?;
            entries.insert(name.to_string(), expectation(name, expected_ok, totals));
        }
        Ok(Self { entries })
    }

    /// Build directly from known counts.
    ///
    /// Keys must be base names: `pin_w` is rejected, since a detection of it would be read
    /// as a misaligned `pin`.
    pub fn from_counts<I, S>(counts: I, totals: &BTreeMap<String, i64>) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (name, expected_ok) in counts {
            let name = name.into();
            validate_base_name(&name, &name)?;
            let entry = expectation(&name, expected_ok, totals);
            entries.insert(name, entry);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&Expectation> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn expected_ok_counts(&self) -> BTreeMap<String, i64> {
        self.counts(|entry| entry.expected_ok)
    }

    pub fn expected_not_ok_counts(&self) -> BTreeMap<String, i64> {
        self.counts(Expectation::expected_not_ok)
    }

    fn counts(&self, f: impl Fn(&Expectation) -> i64) -> BTreeMap<String, i64> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), f(entry)))
            .collect()
    }
}

fn expectation(name: &str, expected_ok: i64, totals: &BTreeMap<String, i64>) -> Expectation {
    let total = totals.get(name).copied().unwrap_or(0);
    if expected_ok > total {
        log::warn!(
            "Expected OK count for '{}' ({}) exceeds the {} present on the board",
            name,
            expected_ok,
            total
        );
    }
    Expectation { expected_ok, total }
}
