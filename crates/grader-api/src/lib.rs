//! 종목 점수화 HTTP API.
//!
//! 수집기와 같은 추출/점수화 파이프라인을 요청 단위로 노출합니다.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiErrorResponse, ApiResult};
pub use state::AppState;

/// 전체 라우터 생성.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/health", routes::health_router())
        .nest("/api", routes::create_api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
