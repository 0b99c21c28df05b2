//! 종목 목록 Provider.

use async_trait::async_trait;
use grader_core::{InstrumentRef, Market, UniverseConfig};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use super::InstrumentUniverse;
use crate::error::{DataError, Result};

/// 전종목 시세 bld.
const BLD_MARKET_LISTING: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";

#[derive(Debug, Deserialize)]
struct KrxResponse {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<KrxListing>>,
}

#[derive(Debug, Deserialize)]
struct KrxListing {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
    #[serde(rename = "ISU_ABBRV")]
    name: String,
    #[serde(rename = "MKT_NM", default)]
    market_name: Option<String>,
}

/// KRX 정보데이터시스템 상장 종목 목록.
pub struct KrxUniverse {
    client: Client,
    url: String,
    markets: Vec<Market>,
}

impl KrxUniverse {
    /// 설정의 시장 이름을 엄격하게 파싱합니다. 모르는 이름은 경고 후 제외.
    pub fn new(config: &UniverseConfig) -> Self {
        let markets = config
            .markets
            .iter()
            .filter_map(|name| match name.parse::<Market>() {
                Ok(market) => Some(market),
                Err(e) => {
                    warn!(error = %e, "unknown market in universe config");
                    None
                }
            })
            .collect();

        Self {
            client: Client::new(),
            url: config.krx_url.clone(),
            markets,
        }
    }

    /// 조회 시장을 하나로 제한합니다.
    pub fn only(mut self, market: Market) -> Self {
        self.markets = vec![market];
        self
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    async fn fetch_market(&self, market: Market) -> Result<Vec<InstrumentRef>> {
        let Some(market_id) = market.krx_id() else {
            return Ok(Vec::new());
        };

        let params = [
            ("bld", BLD_MARKET_LISTING),
            ("mktId", market_id),
            ("share", "1"),
            ("csvxls_is498No", "false"),
        ];

        let response = self
            .client
            .post(&self.url)
            .form(&params)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        let data: KrxResponse = serde_json::from_str(&body)?;

        Ok(data
            .out_block
            .unwrap_or_default()
            .into_iter()
            .map(|listing| {
                // 응답의 시장명이 있으면 그것을, 없으면 요청한 시장을 씁니다.
                let listed = listing
                    .market_name
                    .as_deref()
                    .map(Market::parse)
                    .filter(|m| *m != Market::Unknown)
                    .unwrap_or(market);
                InstrumentRef::new(listing.ticker, listing.name, listed)
            })
            .collect())
    }
}

#[async_trait]
impl InstrumentUniverse for KrxUniverse {
    fn name(&self) -> &str {
        "krx"
    }

    async fn instruments(&self) -> Result<Vec<InstrumentRef>> {
        let mut all = Vec::new();
        for market in &self.markets {
            let listed = self.fetch_market(*market).await?;
            info!(market = %market, count = listed.len(), "KRX listing fetched");
            all.extend(listed);
        }
        Ok(all)
    }
}

/// 사용자가 지정한 종목 코드 목록.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    instruments: Vec<InstrumentRef>,
}

impl StaticUniverse {
    pub fn new(instruments: Vec<InstrumentRef>) -> Self {
        Self { instruments }
    }

    /// 종목 코드만으로 만듭니다. 빈 문자열은 건너뜁니다.
    pub fn from_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let instruments = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(InstrumentRef::from_ticker)
            .collect();
        Self { instruments }
    }
}

#[async_trait]
impl InstrumentUniverse for StaticUniverse {
    fn name(&self) -> &str {
        "static"
    }

    async fn instruments(&self) -> Result<Vec<InstrumentRef>> {
        Ok(self.instruments.clone())
    }
}
