//! 종목별 추출 결과 레코드.
//!
//! 키 집합은 [`Field::ALL`]로 고정되어 있습니다. 값을 찾지 못한 필드는
//! 키가 빠지는 대신 [`NOT_AVAILABLE`]을 가집니다.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

/// 미확인 값 표시.
pub const NOT_AVAILABLE: &str = "N/A";

/// 필드 개수.
pub const FIELD_COUNT: usize = 30;

/// 추출 대상 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    CurrentPrice,
    OpeningPrice,
    HighPrice,
    LowPrice,
    PrevClose,
    UpperLimit,
    LowerLimit,
    High52w,
    Low52w,
    Volume,
    TradingValue,
    MarketCap,
    Per,
    PerIndustry,
    Pbr,
    PbrIndustry,
    Eps,
    Bps,
    DividendYield,
    OpinionScore,
    Opinion,
    TargetPrice,
    ForeignOwnership,
    ForeignNetBuy,
    InstitutionalNetBuy,
    IndividualNetBuy,
    Roe,
    DebtRatio,
    OperatingMargin,
    Sector,
}

impl Field {
    /// 스키마 순서의 전체 필드.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::CurrentPrice,
        Field::OpeningPrice,
        Field::HighPrice,
        Field::LowPrice,
        Field::PrevClose,
        Field::UpperLimit,
        Field::LowerLimit,
        Field::High52w,
        Field::Low52w,
        Field::Volume,
        Field::TradingValue,
        Field::MarketCap,
        Field::Per,
        Field::PerIndustry,
        Field::Pbr,
        Field::PbrIndustry,
        Field::Eps,
        Field::Bps,
        Field::DividendYield,
        Field::OpinionScore,
        Field::Opinion,
        Field::TargetPrice,
        Field::ForeignOwnership,
        Field::ForeignNetBuy,
        Field::InstitutionalNetBuy,
        Field::IndividualNetBuy,
        Field::Roe,
        Field::DebtRatio,
        Field::OperatingMargin,
        Field::Sector,
    ];

    /// 직렬화 키.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CurrentPrice => "current_price",
            Field::OpeningPrice => "opening_price",
            Field::HighPrice => "high_price",
            Field::LowPrice => "low_price",
            Field::PrevClose => "prev_close",
            Field::UpperLimit => "upper_limit",
            Field::LowerLimit => "lower_limit",
            Field::High52w => "high_52w",
            Field::Low52w => "low_52w",
            Field::Volume => "volume",
            Field::TradingValue => "trading_value",
            Field::MarketCap => "market_cap",
            Field::Per => "per",
            Field::PerIndustry => "per_industry",
            Field::Pbr => "pbr",
            Field::PbrIndustry => "pbr_industry",
            Field::Eps => "eps",
            Field::Bps => "bps",
            Field::DividendYield => "dividend_yield",
            Field::OpinionScore => "opinion_score",
            Field::Opinion => "opinion",
            Field::TargetPrice => "target_price",
            Field::ForeignOwnership => "foreign_ownership",
            Field::ForeignNetBuy => "foreign_net_buy",
            Field::InstitutionalNetBuy => "institutional_net_buy",
            Field::IndividualNetBuy => "individual_net_buy",
            Field::Roe => "roe",
            Field::DebtRatio => "debt_ratio",
            Field::OperatingMargin => "operating_margin",
            Field::Sector => "sector",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// 한 종목의 정규화된 지표 묶음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    values: [String; FIELD_COUNT],
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl ExtractedRecord {
    /// 모든 필드가 미확인인 레코드.
    pub fn unresolved() -> Self {
        Self {
            values: std::array::from_fn(|_| NOT_AVAILABLE.to_string()),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// 빌더 형태의 [`set`](Self::set).
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        self.get(field) != NOT_AVAILABLE
    }

    /// 스키마 순서로 (필드, 값)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    pub fn resolved_count(&self) -> usize {
        self.values.iter().filter(|v| *v != NOT_AVAILABLE).count()
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

/// 누락된 키는 미확인, 모르는 키는 무시. 숫자 값은 문자열로 받습니다.
impl<'de> Deserialize<'de> for ExtractedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut record = ExtractedRecord::unresolved();
        for (key, value) in raw {
            let Ok(field) = key.parse::<Field>() else {
                continue;
            };
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            record.set(field, text);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_field_keys_are_unique_and_ordered() {
        let keys: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(keys.first(), Some(&"current_price"));
        assert_eq!(keys.last(), Some(&"sector"));

        let mut dedup = keys.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), FIELD_COUNT);

        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.as_str().parse::<Field>().unwrap(), *field);
        }
    }

    #[test]
    fn test_unresolved_record() {
        let record = ExtractedRecord::unresolved();
        assert_eq!(record.resolved_count(), 0);
        assert!(Field::ALL.iter().all(|f| record.get(*f) == NOT_AVAILABLE));
    }

    #[test]
    fn test_serialize_exact_key_set() {
        let record = ExtractedRecord::unresolved().with(Field::Per, "8.5");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), FIELD_COUNT);
        assert_eq!(obj["per"], "8.5");
        assert_eq!(obj["sector"], NOT_AVAILABLE);
    }

    #[test]
    fn test_deserialize_partial_mapping() {
        let json = r#"{"per": 8, "pbr": "0.9", "sector": null, "ticker": "005930"}"#;
        let record: ExtractedRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.get(Field::Per), "8");
        assert_eq!(record.get(Field::Pbr), "0.9");
        assert_eq!(record.get(Field::Sector), NOT_AVAILABLE);
        assert_eq!(record.resolved_count(), 2);
    }

    fn arbitrary_record() -> impl Strategy<Value = ExtractedRecord> {
        prop::collection::vec(
            prop_oneof![Just(NOT_AVAILABLE.to_string()), "[0-9,.%가-힣 ]{0,12}"],
            FIELD_COUNT,
        )
        .prop_map(|values| {
            Field::ALL
                .iter()
                .zip(values)
                .fold(ExtractedRecord::unresolved(), |r, (f, v)| r.with(*f, v))
        })
    }

    proptest! {
        #[test]
        fn prop_json_keeps_key_set(record in arbitrary_record()) {
            let json = serde_json::to_value(&record).unwrap();
            prop_assert_eq!(json.as_object().map(|obj| obj.len()), Some(FIELD_COUNT));

            let back: ExtractedRecord = serde_json::from_value(json).unwrap();
            prop_assert_eq!(back, record);
        }
    }
}
