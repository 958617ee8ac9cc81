//! Cascading dropdown option lists
//!
//! Each handler answers `{"options": [...]}`. A query naming a parent
//! selection that does not exist answers 404 with an empty list.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{error::AppError, metrics};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DegreeQuery {
    pub degree: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroupQuery {
    pub field_group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeFieldGroupQuery {
    pub degree: Option<String>,
    pub field_group: Option<String>,
}

fn listed(options: Vec<String>) -> Json<OptionsResponse> {
    Json(OptionsResponse { options })
}

/// Turn a parent lookup into a response; `None` is a 404.
fn found(
    query: &str,
    options: Option<Vec<String>>,
    not_found: impl FnOnce() -> String,
) -> Result<Json<OptionsResponse>, AppError> {
    match options {
        Some(options) => Ok(listed(options)),
        None => {
            metrics::record_option_not_found(query);
            Err(AppError::NotFound(not_found()))
        }
    }
}

pub async fn degrees(State(state): State<AppState>) -> Json<OptionsResponse> {
    listed(state.calculator().degrees())
}

pub async fn field_groups(
    State(state): State<AppState>,
    Query(query): Query<DegreeQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let degree = query.degree.unwrap_or_default();
    let options = state.calculator().field_groups(&degree);
    found("field_groups", options, || format!("Degree '{}' not found", degree))
}

pub async fn levels(
    State(state): State<AppState>,
    Query(query): Query<FieldGroupQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let field_group = query.field_group.unwrap_or_default();
    let options = state.calculator().levels(&field_group);
    found("levels", options, || {
        format!("Field group '{}' not found", field_group)
    })
}

pub async fn locations(State(state): State<AppState>) -> Json<OptionsResponse> {
    listed(state.calculator().locations())
}

pub async fn self_governing_degrees(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let location = query.location.unwrap_or_default();
    let options = state.calculator().self_governing_degrees(&location);
    found("self_governing_degrees", options, || {
        format!("Location '{}' not found", location)
    })
}

pub async fn currency_degrees(State(state): State<AppState>) -> Json<OptionsResponse> {
    listed(state.calculator().currency_degrees())
}

pub async fn currency_field_groups(
    State(state): State<AppState>,
    Query(query): Query<DegreeQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let degree = query.degree.unwrap_or_default();
    let options = state.calculator().currency_field_groups(&degree);
    found("currency_field_groups", options, || {
        format!("Currency degree '{}' not found", degree)
    })
}

pub async fn currency_levels(
    State(state): State<AppState>,
    Query(query): Query<DegreeFieldGroupQuery>,
) -> Result<Json<OptionsResponse>, AppError> {
    let degree = query.degree.unwrap_or_default();
    let field_group = query.field_group.unwrap_or_default();
    let options = state.calculator().currency_levels(&degree, &field_group);
    found("currency_levels", options, || {
        format!(
            "Currency field group '{}' not found for degree '{}'",
            field_group, degree
        )
    })
}
