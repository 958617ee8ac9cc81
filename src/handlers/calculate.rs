use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, info};

use super::AppState;
use crate::calculator::{
    CurrencyTuitionRequest, SelfGoverningTuitionRequest, StandardTuitionRequest,
    StandardTuitionResponse, TotalTuitionResponse,
};
use crate::{error::AppError, metrics};

fn observe<T>(kind: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    match &result {
        Ok(_) => metrics::record_quote(kind),
        Err(AppError::Validation(msg)) => {
            debug!(kind, "Rejected quote: {}", msg);
            metrics::record_validation_failure(kind);
        }
        Err(_) => {}
    }
    result
}

/// POST /api/calculate
pub async fn calculate_standard(
    State(state): State<AppState>,
    payload: Result<Json<StandardTuitionRequest>, JsonRejection>,
) -> Result<Json<StandardTuitionResponse>, AppError> {
    let Json(request) = payload?;
    let breakdown = observe(
        "standard",
        state.calculator().standard_tuition(&request),
    )?;

    info!(
        base = breakdown.base_amount,
        variable = breakdown.variable_amount,
        total = breakdown.total_amount,
        "Standard tuition quoted"
    );
    Ok(Json(breakdown.to_response()))
}

/// POST /api/calculate-self-governing
pub async fn calculate_self_governing(
    State(state): State<AppState>,
    payload: Result<Json<SelfGoverningTuitionRequest>, JsonRejection>,
) -> Result<Json<TotalTuitionResponse>, AppError> {
    let Json(request) = payload?;
    let tuition = observe(
        "self_governing",
        state.calculator().self_governing_tuition(&request),
    )?;
    Ok(Json(tuition.to_response()))
}

/// POST /api/calculate-currency
pub async fn calculate_currency(
    State(state): State<AppState>,
    payload: Result<Json<CurrencyTuitionRequest>, JsonRejection>,
) -> Result<Json<TotalTuitionResponse>, AppError> {
    let Json(request) = payload?;
    let tuition = observe("currency", state.calculator().currency_tuition(&request))?;
    Ok(Json(tuition.to_response()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TuitionCalculator;
    use crate::dataset::CanonicalDataset;
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> AppState {
        let dataset: CanonicalDataset = serde_json::from_value(json!({
            "base": {"علوم": {"کارشناسی": 1000}},
            "variable": {"دکتری": {"نظری": {"علوم": {"کارشناسی": 500}}}},
            "currency": {"دکتری": {"پزشکی": {"سطح 1": 1234.5}}},
            "selfGoverning": {"تهران": {"کارشناسی": 45000}}
        }))
        .unwrap();
        AppState::new(TuitionCalculator::new(Arc::new(dataset)))
    }

    #[tokio::test]
    async fn test_calculate_standard() {
        let request: StandardTuitionRequest = serde_json::from_value(json!({
            "degree": "دکتری",
            "fieldGroup": "علوم",
            "level": "کارشناسی",
            "units": {"نظری": 3}
        }))
        .unwrap();

        let Json(response) = calculate_standard(State(state()), Ok(Json(request))).await.unwrap();
        assert_eq!(response.total_tuition, "2,500,000 تومان");
    }

    #[tokio::test]
    async fn test_calculate_self_governing() {
        let request = SelfGoverningTuitionRequest {
            location: Some("تهران".to_string()),
            degree: Some("کارشناسی".to_string()),
        };
        let Json(response) = calculate_self_governing(State(state()), Ok(Json(request)))
            .await
            .unwrap();
        assert_eq!(response.total_tuition, "45,000,000 تومان");
    }

    #[tokio::test]
    async fn test_calculate_currency_missing_level() {
        let request = CurrencyTuitionRequest {
            degree: Some("دکتری".to_string()),
            field_group: Some("پزشکی".to_string()),
            level: None,
        };
        let err = calculate_currency(State(state()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("level")));
    }
}
