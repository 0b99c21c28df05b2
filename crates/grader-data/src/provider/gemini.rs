//! Gemini 기반 서술형 매매 전략.
//!
//! 점수화와 무관한 부가 기능입니다. API 키는 호출자가 요청마다 넘깁니다.

use grader_core::{ExtractedRecord, Field, InstrumentRef, NarrativeConfig};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 서술형 분석 오류.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("API 키가 없습니다")]
    MissingCredential,

    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API 오류 ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("응답 형식 오류: {0}")]
    MalformedResponse(String),
}

/// 두 필드 서술형 조언.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// 핵심 요약과 매매 권고
    #[serde(alias = "strategic_recommendation")]
    pub summary: String,
    /// 구체적인 대응 전략
    #[serde(alias = "strategic_solution")]
    pub action: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini `generateContent` 클라이언트.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiAdvisor {
    /// 키가 없거나 비어 있으면 `MissingCredential`.
    pub fn new(api_key: Option<&str>, config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(NarrativeError::MissingCredential)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 짧은 프롬프트로 키와 연결을 확인합니다.
    pub async fn ping(&self) -> Result<bool, NarrativeError> {
        let text = self.generate("Hello").await?;
        Ok(!text.trim().is_empty())
    }

    /// 레코드를 바탕으로 매매 전략을 요청합니다.
    pub async fn advise(
        &self,
        instrument: &InstrumentRef,
        record: &ExtractedRecord,
    ) -> Result<Advice, NarrativeError> {
        let prompt = build_prompt(instrument, record);
        let text = self.generate(&prompt).await?;
        parse_advice(&text)
    }

    async fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("narrative service rate limited");
            }
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::MalformedResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(NarrativeError::MalformedResponse(
                "candidate text 없음".to_string(),
            ));
        }

        debug!(model = %self.model, chars = text.len(), "narrative generated");
        Ok(text)
    }
}

/// 분석가 프롬프트.
pub fn build_prompt(instrument: &InstrumentRef, record: &ExtractedRecord) -> String {
    let v = |field: Field| record.get(field);
    format!(
        "당신은 전문 주식 분석가입니다. 다음 주식 데이터를 분석하여 투자자에게 도움이 되는 \
매매 전략과 솔루션을 제안해주세요.

[주식 정보]
종목명: {name} ({ticker})
현재가: {price}
PER: {per} (업종: {per_industry})
PBR: {pbr}
ROE: {roe}%
부채비율: {debt}%
투자의견: {opinion} (목표가: {target})
52주 최고/최저: {high} / {low}
시가총액: {cap}
업종: {sector}

위 데이터를 바탕으로 다음 형식의 JSON으로만 답변해주세요:
{{
    \"summary\": \"현재 상황에 대한 핵심 요약 및 매매 권고 (예: 분할 매수, 관망, 매도 등)\",
    \"action\": \"구체적인 대응 전략 (예: 손절가, 익절가 제안 또는 리스크 관리 방법)\"
}}
답변은 반드시 한국어로 작성해주세요.",
        name = instrument.display_name,
        ticker = instrument.id,
        price = v(Field::CurrentPrice),
        per = v(Field::Per),
        per_industry = v(Field::PerIndustry),
        pbr = v(Field::Pbr),
        roe = v(Field::Roe),
        debt = v(Field::DebtRatio),
        opinion = v(Field::Opinion),
        target = v(Field::TargetPrice),
        high = v(Field::High52w),
        low = v(Field::Low52w),
        cap = v(Field::MarketCap),
        sector = v(Field::Sector),
    )
}

/// 코드 펜스를 벗기고 `{summary, action}` JSON으로 읽습니다.
pub fn parse_advice(text: &str) -> Result<Advice, NarrativeError> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|e| NarrativeError::MalformedResponse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text;
    };
    inner.split("```").next().unwrap_or(inner).trim()
}
