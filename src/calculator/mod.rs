//! Tuition calculator
//!
//! Answers option-list and quote queries against one immutable
//! [`CanonicalDataset`]. Every query is stateless.

pub mod format;
pub mod models;

use std::sync::Arc;
use tracing::debug;

use crate::dataset::{keys_of, Amount, CanonicalDataset};
use crate::error::AppError;
use crate::normalize::{clean_header, normalize_text};

pub use format::{format_international_currency, format_local_currency, UNSPECIFIED};
pub use models::{
    CurrencyTuitionRequest, Denomination, FlatTuition, SelfGoverningTuitionRequest,
    StandardTuitionBreakdown, StandardTuitionRequest, StandardTuitionResponse,
    TotalTuitionResponse,
};

/// Unit type whose field groups populate the field-group dropdown.
pub const DEFAULT_FIELD_GROUP_UNIT_TYPE: &str = "نظری";

/// Calculator over a shared, read-only dataset
#[derive(Debug, Clone)]
pub struct TuitionCalculator {
    dataset: Arc<CanonicalDataset>,
    field_group_unit_type: String,
}

impl TuitionCalculator {
    pub fn new(dataset: Arc<CanonicalDataset>) -> Self {
        Self {
            dataset,
            field_group_unit_type: DEFAULT_FIELD_GROUP_UNIT_TYPE.to_string(),
        }
    }

    /// Use a different unit type to enumerate field groups.
    pub fn with_field_group_unit_type(mut self, unit_type: &str) -> Self {
        self.field_group_unit_type = normalize_text(unit_type);
        self
    }

    pub fn dataset(&self) -> &CanonicalDataset {
        &self.dataset
    }

    // --- option queries ---

    pub fn degrees(&self) -> Vec<String> {
        keys_of(&self.dataset.variable)
    }

    /// Field groups offered for `degree`, read from its designated unit-type
    /// table. `None` when the degree or that table is missing.
    pub fn field_groups(&self, degree: &str) -> Option<Vec<String>> {
        self.dataset
            .variable_unit_table(&normalize_text(degree), &self.field_group_unit_type)
            .map(keys_of)
    }

    pub fn levels(&self, field_group: &str) -> Option<Vec<String>> {
        self.dataset.base.get(&normalize_text(field_group)).map(keys_of)
    }

    pub fn locations(&self) -> Vec<String> {
        keys_of(&self.dataset.self_governing)
    }

    pub fn self_governing_degrees(&self, location: &str) -> Option<Vec<String>> {
        self.dataset
            .self_governing
            .get(&normalize_text(location))
            .map(keys_of)
    }

    pub fn currency_degrees(&self) -> Vec<String> {
        keys_of(&self.dataset.currency)
    }

    pub fn currency_field_groups(&self, degree: &str) -> Option<Vec<String>> {
        self.dataset.currency.get(&normalize_text(degree)).map(keys_of)
    }

    pub fn currency_levels(&self, degree: &str, field_group: &str) -> Option<Vec<String>> {
        self.dataset
            .currency
            .get(&normalize_text(degree))?
            .get(&normalize_text(field_group))
            .map(keys_of)
    }

    // --- calculations ---

    /// Base rate plus the sum of `count × rate` over requested unit types.
    ///
    /// Missing or non-numeric rates count as zero, as do non-positive counts.
    pub fn standard_tuition(
        &self,
        request: &StandardTuitionRequest,
    ) -> Result<StandardTuitionBreakdown, AppError> {
        let mut selections = Selections::default();
        let degree = selections.require("degree", &request.degree);
        let field_group = selections.require("fieldGroup", &request.field_group);
        let level = selections.require_level(&request.level);
        selections.finish()?;

        let base_amount = coerce(self.dataset.base_rate(&field_group, &level));

        let mut variable_amount = 0.0;
        for (unit_type, count) in request.unit_entries() {
            let count = models::unit_count(count);
            if count <= 0 {
                continue;
            }
            let unit_type = normalize_text(unit_type);
            let rate = coerce(
                self.dataset
                    .variable_rate(&degree, &unit_type, &field_group, &level),
            );
            debug!(unit_type = %unit_type, count, rate, "Variable tuition component");
            variable_amount += count as f64 * rate;
        }

        Ok(StandardTuitionBreakdown::new(base_amount, variable_amount))
    }

    pub fn self_governing_tuition(
        &self,
        request: &SelfGoverningTuitionRequest,
    ) -> Result<FlatTuition, AppError> {
        let mut selections = Selections::default();
        let location = selections.require("location", &request.location);
        let degree = selections.require("degree", &request.degree);
        selections.finish()?;

        Ok(FlatTuition {
            amount: flat(self.dataset.self_governing_rate(&location, &degree)),
            denomination: Denomination::Local,
        })
    }

    pub fn currency_tuition(&self, request: &CurrencyTuitionRequest) -> Result<FlatTuition, AppError> {
        let mut selections = Selections::default();
        let degree = selections.require("degree", &request.degree);
        let field_group = selections.require("fieldGroup", &request.field_group);
        let level = selections.require_level(&request.level);
        selections.finish()?;

        Ok(FlatTuition {
            amount: flat(self.dataset.currency_rate(&degree, &field_group, &level)),
            denomination: Denomination::International,
        })
    }
}

/// Collects required selection values, remembering which ones are missing.
#[derive(Default)]
struct Selections {
    missing: Vec<&'static str>,
}

impl Selections {
    fn require(&mut self, name: &'static str, value: &Option<String>) -> String {
        let value = value.as_deref().map(normalize_text).unwrap_or_default();
        if value.is_empty() {
            self.missing.push(name);
        }
        value
    }

    /// Levels are matched in their cleaned header form, so `"1"` and
    /// `"سطح ۱"` both select `"سطح 1"`.
    fn require_level(&mut self, value: &Option<String>) -> String {
        clean_header(&self.require("level", value))
    }

    fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(AppError::Validation(format!(
            "Missing required selections: {}",
            self.missing.join(", ")
        )))
    }
}

/// Rate used in sums: absent or malformed cells count as zero.
fn coerce(amount: Option<&Amount>) -> f64 {
    amount.and_then(Amount::as_number).unwrap_or(0.0)
}

/// Rate shown on its own: absent is zero, a present non-number is NaN so it
/// renders as unspecified.
fn flat(amount: Option<&Amount>) -> f64 {
    match amount {
        None => 0.0,
        Some(amount) => amount.as_number().unwrap_or(f64::NAN),
    }
}
