//! 종목 식별 타입.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// 상장 시장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// 유가증권시장
    Kospi,
    /// 코스닥
    Kosdaq,
    /// 알 수 없음 (직접 입력한 종목 코드 등)
    #[default]
    Unknown,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kospi => write!(f, "KOSPI"),
            Self::Kosdaq => write!(f, "KOSDAQ"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl Market {
    /// 느슨한 파싱. KRX 응답의 "KOSPI", "유가증권" 같은 표기를 모두 받습니다.
    pub fn parse(s: &str) -> Self {
        let upper = s.to_uppercase();
        if upper.contains("KOSPI") || s.contains("코스피") || s.contains("유가증권") {
            Self::Kospi
        } else if upper.contains("KOSDAQ") || s.contains("코스닥") {
            Self::Kosdaq
        } else {
            Self::Unknown
        }
    }

    /// KRX 시장 ID (`mktId` 폼 파라미터).
    pub fn krx_id(&self) -> Option<&'static str> {
        match self {
            Self::Kospi => Some("STK"),
            Self::Kosdaq => Some("KSQ"),
            Self::Unknown => None,
        }
    }
}

impl std::str::FromStr for Market {
    type Err = CoreError;

    /// 엄격한 파싱. 설정 값이나 CLI 인자에 사용합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kospi" => Ok(Self::Kospi),
            "kosdaq" => Ok(Self::Kosdaq),
            _ => Err(CoreError::UnknownMarket(s.to_string())),
        }
    }
}

/// 분석 대상 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRef {
    /// 6자리 종목 코드
    #[serde(rename = "ticker")]
    pub id: String,
    /// 종목명
    #[serde(rename = "name")]
    pub display_name: String,
    pub market: Market,
}

impl InstrumentRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, market: Market) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            market,
        }
    }

    /// 이름을 모르는 종목. 종목 코드를 이름으로 사용합니다.
    pub fn from_ticker(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            market: Market::Unknown,
        }
    }
}

impl fmt::Display for InstrumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.display_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_parse() {
        assert_eq!(Market::parse("KOSPI"), Market::Kospi);
        assert_eq!(Market::parse("유가증권시장"), Market::Kospi);
        assert_eq!(Market::parse("kosdaq global"), Market::Kosdaq);
        assert_eq!(Market::parse("KONEX"), Market::Unknown);
    }

    #[test]
    fn test_market_from_str() {
        assert_eq!("Kospi".parse::<Market>().unwrap(), Market::Kospi);
        assert!("nyse".parse::<Market>().is_err());
        assert_eq!(Market::Kosdaq.krx_id(), Some("KSQ"));
        assert_eq!(Market::Unknown.krx_id(), None);
    }

    #[test]
    fn test_instrument_serde_names() {
        let inst = InstrumentRef::new("005930", "삼성전자", Market::Kospi);
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["ticker"], "005930");
        assert_eq!(json["name"], "삼성전자");
        assert_eq!(json["market"], "KOSPI");
        assert_eq!(inst.to_string(), "삼성전자(005930)");
    }

    #[test]
    fn test_from_ticker() {
        let inst = InstrumentRef::from_ticker("000660");
        assert_eq!(inst.display_name, "000660");
        assert_eq!(inst.market, Market::Unknown);
    }
}
