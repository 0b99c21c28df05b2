//! 종목 목록과 종목 분석 endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use grader_collector::analyze_markup;
use grader_core::{ExtractedRecord, InstrumentRef, ScoredRecord};
use grader_data::extract_markup;
use std::sync::Arc;
use tracing::info;

use crate::error::{bad_request, data_error, ApiResult};
use crate::state::AppState;

/// 종목 코드 최대 길이.
const MAX_TICKER_LEN: usize = 12;

/// 경로의 종목 코드를 검사합니다. 영문/숫자만 허용합니다.
pub(crate) fn parse_ticker(raw: &str) -> ApiResult<String> {
    let ticker = raw.trim();
    if ticker.is_empty()
        || ticker.len() > MAX_TICKER_LEN
        || !ticker.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(bad_request(
            "INVALID_TICKER",
            format!("잘못된 종목 코드: {}", raw),
        ));
    }
    Ok(ticker.to_string())
}

/// KOSPI, KOSDAQ 순 종목 목록.
///
/// GET /api/stocks
pub async fn list_stocks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<InstrumentRef>>> {
    let instruments = state.universe.instruments().await.map_err(data_error)?;
    info!(count = instruments.len(), "종목 목록 조회");
    Ok(Json(instruments))
}

/// 종목 하나를 점수화합니다.
///
/// GET /api/analyze/{ticker}
pub async fn analyze_stock(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<ScoredRecord>> {
    let ticker = parse_ticker(&ticker)?;
    let markup = state.source.fetch(&ticker).await.map_err(data_error)?;
    Ok(Json(analyze_markup(&InstrumentRef::from_ticker(ticker), &markup)))
}

/// 점수 없이 추출 필드만 돌려줍니다.
///
/// GET /api/trading-analysis/{ticker}
pub async fn trading_analysis(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<ExtractedRecord>> {
    let ticker = parse_ticker(&ticker)?;
    let markup = state.source.fetch(&ticker).await.map_err(data_error)?;
    Ok(Json(extract_markup(&markup)))
}

pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/analyze/{ticker}", get(analyze_stock))
        .route("/trading-analysis/{ticker}", get(trading_analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_ticker() {
        assert_eq!(parse_ticker(" 005930 ").unwrap(), "005930");
        assert_eq!(parse_ticker("0001A0").unwrap(), "0001A0");

        let (status, Json(body)) = parse_ticker("../etc").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_TICKER");

        assert!(parse_ticker("").is_err());
        assert!(parse_ticker("1234567890123").is_err());
    }
}
