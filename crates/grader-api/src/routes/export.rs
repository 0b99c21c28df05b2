//! 여러 종목 점수화 결과 CSV 내보내기.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Local;
use grader_collector::{export_filename, to_csv, ExportFormat};
use grader_core::InstrumentRef;
use std::sync::Arc;
use tracing::info;

use super::stocks::parse_ticker;
use crate::error::{bad_request, ApiResult};
use crate::state::AppState;

/// 한 요청에서 처리할 최대 종목 수.
pub const MAX_EXPORT_TICKERS: usize = 200;

/// 종목 코드 배열을 받아 배치 분석 후 CSV 첨부 파일로 돌려줍니다. 실패 종목은 빠집니다.
///
/// POST /api/export
pub async fn export_stocks(
    State(state): State<Arc<AppState>>,
    Json(tickers): Json<Vec<String>>,
) -> ApiResult<impl IntoResponse> {
    if tickers.is_empty() {
        return Err(bad_request("EMPTY_REQUEST", "종목 코드가 없습니다"));
    }
    if tickers.len() > MAX_EXPORT_TICKERS {
        return Err(bad_request(
            "TOO_MANY_TICKERS",
            format!("한 번에 최대 {}개 종목까지 가능합니다", MAX_EXPORT_TICKERS),
        ));
    }

    let instruments = tickers
        .iter()
        .map(|t| parse_ticker(t).map(InstrumentRef::from_ticker))
        .collect::<ApiResult<Vec<_>>>()?;

    let report = state.orchestrator().run_batch(&instruments).await;
    info!(
        scored = report.scored.len(),
        errors = report.errors.len(),
        "CSV 내보내기"
    );

    let filename = export_filename(Local::now(), ExportFormat::Csv);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        to_csv(&report.scored),
    ))
}

pub fn export_router() -> Router<Arc<AppState>> {
    Router::new().route("/export", post(export_stocks))
}
