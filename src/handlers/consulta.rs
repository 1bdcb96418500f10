//! Consultation handler

use crate::handlers::AppState;
use crate::models::{ConsultaResult, Query, DEFAULT_SESSION_ID, DEFAULT_USER_TYPE};
use crate::utils::error::{AppError, AppResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Request body of `POST /v1/consultas`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultaRequest {
    pub pregunta: String,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ConsultaRequest {
    fn into_query(self) -> AppResult<Query> {
        if self.pregunta.trim().is_empty() {
            return Err(AppError::Validation("pregunta cannot be empty".to_string()));
        }

        Ok(Query::new(self.pregunta)
            .with_user_type(self.user_type.unwrap_or_else(|| DEFAULT_USER_TYPE.to_string()))
            .with_session_id(self.session_id.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())))
    }
}

/// POST /v1/consultas
pub async fn handle_consulta(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConsultaRequest>,
) -> AppResult<Json<ConsultaResult>> {
    let query = request.into_query()?;
    debug!("Received consultation for session {}", query.session_id);

    let result = state.pipeline.consulta_legal(&query).await?;
    Ok(Json(result))
}
