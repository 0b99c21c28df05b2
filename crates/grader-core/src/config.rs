//! 설정 관리.
//!
//! 우선순위: 기본값 < `config/default.toml` < `GRADER__*` 환경 변수.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// API 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 종목 페이지 수집 설정
    pub scraper: ScraperConfig,
    /// 종목 목록 설정
    pub universe: UniverseConfig,
    /// 서술형 분석(LLM) 설정
    pub narrative: NarrativeConfig,
    /// 결과 내보내기 설정
    pub export: ExportConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 종목 페이지 수집 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// 네이버 금융 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
    /// 종목 간 요청 간격 (밀리초)
    pub pacing_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finance.naver.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            pacing_ms: 1000,
        }
    }
}

/// 종목 목록(KRX) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// KRX 정보데이터시스템 JSON 엔드포인트
    pub krx_url: String,
    /// 조회할 시장 (kospi, kosdaq)
    pub markets: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            krx_url: "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd".to_string(),
            markets: vec!["kospi".to_string(), "kosdaq".to_string()],
        }
    }
}

/// 서술형 분석 설정. API 키는 요청 헤더로만 받습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

/// 결과 내보내기 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 결과 파일 디렉토리
    pub output_dir: String,
    /// 콘솔 리포트에 표시할 상위 종목 수
    pub top_n: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            top_n: 10,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("GRADER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("universe.markets"),
            );

        builder.build()?.try_deserialize()
    }

    /// `config/default.toml`에서 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 서버 바인딩 주소.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
