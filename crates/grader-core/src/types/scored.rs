//! 점수화 결과 타입.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::instrument::InstrumentRef;
use super::record::ExtractedRecord;

/// 점수 상한.
pub const MAX_SCORE: u8 = 100;

/// 종합 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// 최종 점수에서 등급을 결정합니다.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Grade::S,
            70..=79 => Grade::A,
            60..=69 => Grade::B,
            50..=59 => Grade::C,
            _ => Grade::D,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(s)
    }
}

/// 투자 의견.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "강력 매수")]
    StrongBuy,
    #[serde(rename = "매수")]
    Buy,
    #[serde(rename = "보유")]
    Hold,
    #[serde(rename = "중립")]
    Neutral,
    #[serde(rename = "매도 검토")]
    ReviewExit,
}

impl Recommendation {
    /// 등급별 고정 매핑.
    pub fn for_grade(grade: Grade) -> Self {
        match grade {
            Grade::S => Recommendation::StrongBuy,
            Grade::A => Recommendation::Buy,
            Grade::B => Recommendation::Hold,
            Grade::C => Recommendation::Neutral,
            Grade::D => Recommendation::ReviewExit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "강력 매수",
            Recommendation::Buy => "매수",
            Recommendation::Hold => "보유",
            Recommendation::Neutral => "중립",
            Recommendation::ReviewExit => "매도 검토",
        }
    }

    /// 대응 전략 문구.
    pub fn strategy_note(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "적극적 매수 포지션 구축",
            Recommendation::Buy => "분할 매수 추천",
            Recommendation::Hold => "관망 또는 소량 매수",
            Recommendation::Neutral => "추가 분석 필요",
            Recommendation::ReviewExit => "리스크 관리 필요",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 추출 레코드와 점수화 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub instrument: InstrumentRef,
    #[serde(flatten)]
    pub record: ExtractedRecord,
    /// 0..=100
    pub score: u8,
    pub grade: Grade,
    /// 평가 순서대로 쌓인 근거 문구
    pub signals: Vec<String>,
    pub recommendation: Recommendation,
    #[serde(rename = "strategy")]
    pub strategy_note: String,
}

/// 배치에서 실패한 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    #[serde(flatten)]
    pub instrument: InstrumentRef,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Market};
    use proptest::prelude::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::S);
        assert_eq!(Grade::from_score(80), Grade::S);
        assert_eq!(Grade::from_score(79), Grade::A);
        assert_eq!(Grade::from_score(70), Grade::A);
        assert_eq!(Grade::from_score(69), Grade::B);
        assert_eq!(Grade::from_score(60), Grade::B);
        assert_eq!(Grade::from_score(59), Grade::C);
        assert_eq!(Grade::from_score(50), Grade::C);
        assert_eq!(Grade::from_score(49), Grade::D);
        assert_eq!(Grade::from_score(0), Grade::D);
    }

    #[test]
    fn test_recommendation_lookup() {
        let rec = Recommendation::for_grade(Grade::S);
        assert_eq!(rec.label(), "강력 매수");
        assert_eq!(rec.strategy_note(), "적극적 매수 포지션 구축");

        let rec = Recommendation::for_grade(Grade::D);
        assert_eq!(rec.to_string(), "매도 검토");
        assert_eq!(rec.strategy_note(), "리스크 관리 필요");
    }

    #[test]
    fn test_scored_record_json_is_flat() {
        let scored = ScoredRecord {
            instrument: InstrumentRef::new("005930", "삼성전자", Market::Kospi),
            record: ExtractedRecord::unresolved().with(Field::Per, "12.3"),
            score: 65,
            grade: Grade::B,
            signals: vec!["✓ 적정 PER".to_string()],
            recommendation: Recommendation::Hold,
            strategy_note: Recommendation::Hold.strategy_note().to_string(),
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["ticker"], "005930");
        assert_eq!(json["per"], "12.3");
        assert_eq!(json["grade"], "B");
        assert_eq!(json["recommendation"], "보유");
        assert_eq!(json["strategy"], "관망 또는 소량 매수");

        let back: ScoredRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, scored);
    }

    proptest! {
        #[test]
        fn prop_grade_is_monotonic(a in 0u8..=MAX_SCORE, b in 0u8..=MAX_SCORE) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // S < A < ... < D 순서이므로 점수가 높을수록 등급 값은 작거나 같음
            prop_assert!(Grade::from_score(hi) <= Grade::from_score(lo));
        }

        #[test]
        fn prop_grade_band_matches_tens(score in 50u8..80) {
            let expected = match score / 10 {
                7 => Grade::A,
                6 => Grade::B,
                _ => Grade::C,
            };
            prop_assert_eq!(Grade::from_score(score), expected);
        }
    }
}
