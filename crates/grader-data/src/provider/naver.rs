//! 네이버 금융 종목 페이지 수집.
//!
//! `{base_url}/item/main.naver?code={ticker}` 한 페이지만 가져옵니다.
//! 응답은 대부분 UTF-8이지만 일부는 EUC-KR이므로 UTF-8 디코딩에 실패하면
//! EUC-KR로 다시 읽습니다.

use async_trait::async_trait;
use encoding_rs::EUC_KR;
use grader_core::ScraperConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::DocumentSource;
use crate::error::{DataError, Result};

/// 네이버 금융 크롤러.
#[derive(Debug, Clone)]
pub struct NaverFinanceFetcher {
    client: Client,
    base_url: String,
}

impl NaverFinanceFetcher {
    /// 설정으로 생성합니다. 요청 타임아웃과 User-Agent는 클라이언트에 고정됩니다.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 URL만 바꿉니다 (테스트 서버 등).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, ticker: &str) -> String {
        format!("{}/item/main.naver?code={}", self.base_url, ticker)
    }
}

#[async_trait]
impl DocumentSource for NaverFinanceFetcher {
    fn name(&self) -> &str {
        "naver"
    }

    async fn fetch(&self, ticker: &str) -> Result<String> {
        let url = self.item_url(ticker);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        let markup = decode_markup(&bytes)?;
        debug!(ticker, bytes = bytes.len(), "item page fetched");
        Ok(markup)
    }
}

/// UTF-8 우선, 실패 시 EUC-KR.
pub fn decode_markup(bytes: &[u8]) -> Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let (text, _, had_errors) = EUC_KR.decode(bytes);
    if had_errors {
        debug!("EUC-KR decoding replaced malformed sequences");
    }
    if text.is_empty() && !bytes.is_empty() {
        return Err(DataError::Decode(format!("{} bytes", bytes.len())));
    }
    Ok(text.into_owned())
}
