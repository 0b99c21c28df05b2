//! 환경변수 기반 설정 모듈.
//!
//! `AppConfig`(파일 + `GRADER__*`) 위에 수집기 전용 환경 변수를 한 번 더 덮어씁니다.

use grader_core::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CollectorError;
use crate::Result;

/// 설정 파일 경로를 바꿀 때 쓰는 환경 변수.
const CONFIG_PATH_VAR: &str = "GRADER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 공통 애플리케이션 설정
    pub app: AppConfig,
    /// 종목 간 요청 간격 (밀리초)
    pub pacing_ms: u64,
    /// 분석할 최대 종목 수 (없으면 전체)
    pub batch_limit: Option<usize>,
    /// 결과 파일 디렉토리
    pub output_dir: PathBuf,
    /// 콘솔 리포트 상위 종목 수
    pub top_n: usize,
}

impl CollectorConfig {
    /// `.env`와 설정 파일, 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let app = AppConfig::load(&path).map_err(|e| {
            CollectorError::Config(format!("설정 파일을 읽을 수 없습니다 ({}): {}", path, e))
        })?;

        Ok(Self::from_app(app))
    }

    /// 이미 로드한 `AppConfig`에 `PACING_MS`, `BATCH_LIMIT`, `OUTPUT_DIR`, `TOP_N`을 적용
    pub fn from_app(app: AppConfig) -> Self {
        Self {
            pacing_ms: env_var_parse("PACING_MS", app.scraper.pacing_ms),
            batch_limit: std::env::var("BATCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok()),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(&app.export.output_dir)),
            top_n: env_var_parse("TOP_N", app.export.top_n),
            app,
        }
    }

    /// 요청 간 딜레이를 Duration으로 반환
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
