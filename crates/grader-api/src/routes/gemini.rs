//! Gemini 서술형 분석 endpoint.
//!
//! API 키는 `X-Gemini-API-Key` 헤더로만 받고 저장하지 않습니다.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use grader_core::{ExtractedRecord, InstrumentRef, Market};
use grader_data::{Advice, GeminiAdvisor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::stocks::parse_ticker;
use crate::error::{narrative_error, ApiResult};
use crate::state::AppState;

/// API 키 헤더.
pub const GEMINI_KEY_HEADER: &str = "x-gemini-api-key";

/// 연결 테스트 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiTestResponse {
    pub success: bool,
    pub model: String,
}

/// 분석 요청 본문. 추출 필드 외에 종목명과 시장을 함께 받을 수 있습니다.
#[derive(Debug, Deserialize)]
pub struct GeminiAnalyzeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(flatten)]
    pub record: ExtractedRecord,
}

fn advisor(state: &AppState, headers: &HeaderMap) -> ApiResult<GeminiAdvisor> {
    let key = headers
        .get(GEMINI_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    GeminiAdvisor::new(key, &state.narrative).map_err(narrative_error)
}

/// GET /api/gemini-test
pub async fn gemini_test(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<GeminiTestResponse>> {
    let advisor = advisor(&state, &headers)?;
    let success = advisor.ping().await.map_err(narrative_error)?;
    info!(model = advisor.model(), success, "Gemini 연결 테스트");

    Ok(Json(GeminiTestResponse {
        success,
        model: advisor.model().to_string(),
    }))
}

/// POST /api/gemini-analyze/{ticker}
pub async fn gemini_analyze(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    headers: HeaderMap,
    Json(request): Json<GeminiAnalyzeRequest>,
) -> ApiResult<Json<Advice>> {
    let ticker = parse_ticker(&ticker)?;
    let advisor = advisor(&state, &headers)?;

    let market = request
        .market
        .as_deref()
        .map(Market::parse)
        .unwrap_or_default();
    let instrument = match request.name {
        Some(name) if !name.trim().is_empty() => InstrumentRef::new(ticker, name.trim(), market),
        _ => InstrumentRef {
            market,
            ..InstrumentRef::from_ticker(ticker)
        },
    };

    let advice = advisor
        .advise(&instrument, &request.record)
        .await
        .map_err(narrative_error)?;
    Ok(Json(advice))
}

pub fn gemini_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gemini-test", get(gemini_test))
        .route("/gemini-analyze/{ticker}", post(gemini_analyze))
}
