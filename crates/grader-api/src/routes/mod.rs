//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크
//! - `/api/stocks` - KRX 종목 목록
//! - `/api/analyze/{ticker}` - 종목 점수화
//! - `/api/trading-analysis/{ticker}` - 추출 필드만
//! - `/api/gemini-test`, `/api/gemini-analyze/{ticker}` - 서술형 분석
//! - `/api/export` - 여러 종목 점수화 결과 CSV

pub mod export;
pub mod gemini;
pub mod health;
pub mod stocks;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub use export::export_router;
pub use gemini::{gemini_router, GeminiTestResponse, GEMINI_KEY_HEADER};
pub use health::{health_router, HealthResponse};
pub use stocks::stocks_router;

/// `/api` 하위 라우터.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(stocks_router())
        .merge(gemini_router())
        .merge(export_router())
}
