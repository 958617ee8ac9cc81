use serde::{Deserialize, Deserializer, Serialize};

use super::format::{format_international_currency, format_local_currency};

/// Standard tuition request: base rate plus per-unit variable rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardTuitionRequest {
    #[serde(default, deserialize_with = "selection")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "selection")]
    pub field_group: Option<String>,
    #[serde(default, deserialize_with = "selection")]
    pub level: Option<String>,
    /// unitType → requested count. Counts may be numbers or numeric strings;
    /// anything other than an object requests no units.
    #[serde(default)]
    pub units: Option<serde_json::Value>,
}

impl StandardTuitionRequest {
    pub fn unit_entries(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.units
            .as_ref()
            .and_then(serde_json::Value::as_object)
            .into_iter()
            .flatten()
    }
}

/// Self-governing (flat location + degree) tuition request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfGoverningTuitionRequest {
    #[serde(default, deserialize_with = "selection")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "selection")]
    pub degree: Option<String>,
}

/// Currency-denominated tuition request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTuitionRequest {
    #[serde(default, deserialize_with = "selection")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "selection")]
    pub field_group: Option<String>,
    #[serde(default, deserialize_with = "selection")]
    pub level: Option<String>,
}

/// Computed standard tuition, in thousands of the local currency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StandardTuitionBreakdown {
    pub base_amount: f64,
    pub variable_amount: f64,
    pub total_amount: f64,
}

impl StandardTuitionBreakdown {
    pub fn new(base_amount: f64, variable_amount: f64) -> Self {
        Self {
            base_amount,
            variable_amount,
            total_amount: base_amount + variable_amount,
        }
    }

    pub fn to_response(&self) -> StandardTuitionResponse {
        StandardTuitionResponse {
            base_tuition: format_local_currency(self.base_amount),
            variable_tuition: format_local_currency(self.variable_amount),
            total_tuition: format_local_currency(self.total_amount),
        }
    }
}

/// Which formatter a flat amount is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    /// Thousands of the local currency.
    Local,
    /// US dollars.
    International,
}

/// A single looked-up amount. `NaN` marks a cell that is present but not a
/// number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTuition {
    pub amount: f64,
    pub denomination: Denomination,
}

impl FlatTuition {
    pub fn to_response(&self) -> TotalTuitionResponse {
        let total_tuition = match self.denomination {
            Denomination::Local => format_local_currency(self.amount),
            Denomination::International => format_international_currency(self.amount),
        };
        TotalTuitionResponse { total_tuition }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardTuitionResponse {
    pub base_tuition: String,
    pub variable_tuition: String,
    pub total_tuition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalTuitionResponse {
    pub total_tuition: String,
}

/// Selection values arrive as loosely typed JSON: strings are taken as-is,
/// numbers by their text, anything else counts as not selected.
fn selection<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Interpret a requested unit count. Numbers are truncated toward zero,
/// strings must hold a number; anything else counts as zero.
pub fn unit_count(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(0),
        serde_json::Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}
