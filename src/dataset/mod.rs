//! Canonical tuition dataset
//!
//! The nested, immutable structure every query runs against. It is produced
//! once by the normalizer, persisted as a JSON artifact and shared read-only
//! for the lifetime of the service.

pub mod amount;
pub mod artifact;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use amount::Amount;
pub use artifact::DatasetError;

/// level → amount
pub type LevelTable = BTreeMap<String, Amount>;

/// primary key → secondary key → amount (e.g. fieldGroup → level → amount)
pub type KeyedTable = BTreeMap<String, LevelTable>;

/// degree → fieldGroup → level → amount
pub type ThreeLevelTable = BTreeMap<String, KeyedTable>;

/// degree → unitType → fieldGroup → level → amount
pub type VariableSection = BTreeMap<String, BTreeMap<String, KeyedTable>>;

/// The four normalized tuition sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalDataset {
    /// fieldGroup → level → amount
    #[serde(default)]
    pub base: KeyedTable,
    /// degree → unitType → fieldGroup → level → amount
    #[serde(default)]
    pub variable: VariableSection,
    /// degree → fieldGroup → level → amount, denominated in USD
    #[serde(default)]
    pub currency: ThreeLevelTable,
    /// location → degree → amount
    #[serde(default)]
    pub self_governing: KeyedTable,
}

/// Number of top-level entries per section, used for logging and readiness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSizes {
    pub base: usize,
    pub variable: usize,
    pub currency: usize,
    pub self_governing: usize,
}

impl CanonicalDataset {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.variable.is_empty()
            && self.currency.is_empty()
            && self.self_governing.is_empty()
    }

    pub fn section_sizes(&self) -> SectionSizes {
        SectionSizes {
            base: self.base.len(),
            variable: self.variable.len(),
            currency: self.currency.len(),
            self_governing: self.self_governing.len(),
        }
    }

    /// `base[field_group][level]`
    pub fn base_rate(&self, field_group: &str, level: &str) -> Option<&Amount> {
        lookup2(&self.base, field_group, level)
    }

    /// `variable[degree][unit_type]`
    pub fn variable_unit_table(&self, degree: &str, unit_type: &str) -> Option<&KeyedTable> {
        self.variable.get(degree)?.get(unit_type)
    }

    /// `variable[degree][unit_type][field_group][level]`
    pub fn variable_rate(
        &self,
        degree: &str,
        unit_type: &str,
        field_group: &str,
        level: &str,
    ) -> Option<&Amount> {
        lookup2(self.variable_unit_table(degree, unit_type)?, field_group, level)
    }

    /// `currency[degree][field_group][level]`
    pub fn currency_rate(&self, degree: &str, field_group: &str, level: &str) -> Option<&Amount> {
        lookup2(self.currency.get(degree)?, field_group, level)
    }

    /// `selfGoverning[location][degree]`
    pub fn self_governing_rate(&self, location: &str, degree: &str) -> Option<&Amount> {
        lookup2(&self.self_governing, location, degree)
    }
}

/// Two-step lookup shared by every accessor; a missing intermediate key
/// short-circuits to `None`.
fn lookup2<'a, V>(
    table: &'a BTreeMap<String, BTreeMap<String, V>>,
    outer: &str,
    inner: &str,
) -> Option<&'a V> {
    table.get(outer)?.get(inner)
}

/// Keys of a section map in iteration order.
pub fn keys_of<V>(map: &BTreeMap<String, V>) -> Vec<String> {
    map.keys().cloned().collect()
}
