use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::AppError;

/// GET /api/data: the whole canonical dataset, as stored in the artifact
pub async fn dataset(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = state
        .calculator()
        .dataset()
        .to_json_pretty()
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TuitionCalculator;
    use crate::dataset::CanonicalDataset;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dataset_has_all_sections() {
        let state = AppState::new(TuitionCalculator::new(Arc::new(CanonicalDataset::default())));
        let response = dataset(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        for key in ["base", "variable", "currency", "selfGoverning"] {
            assert!(value[key].is_object(), "missing section {}", key);
        }
    }
}
