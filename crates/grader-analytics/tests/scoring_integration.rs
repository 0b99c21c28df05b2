//! 점수화 통합 테스트.

use grader_analytics::{evaluate, score};
use grader_core::{ExtractedRecord, Field, Grade, InstrumentRef, Market, Recommendation, NOT_AVAILABLE};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn instrument() -> InstrumentRef {
    InstrumentRef::new("005930", "삼성전자", Market::Kospi)
}

fn record(values: &[(Field, &str)]) -> ExtractedRecord {
    values
        .iter()
        .fold(ExtractedRecord::unresolved(), |r, (f, v)| r.with(*f, *v))
}

#[test]
fn test_strong_fundamentals_clamped_to_max() {
    let r = record(&[
        (Field::Per, "8"),
        (Field::Pbr, "0.9"),
        (Field::Roe, "18"),
        (Field::DebtRatio, "40"),
        (Field::DividendYield, "4"),
        (Field::OpinionScore, "1.8"),
    ]);

    let evaluation = evaluate(&r);
    assert_eq!(evaluation.raw_total, 120);

    let scored = score(&instrument(), r);
    assert_eq!(scored.score, 100);
    assert_eq!(scored.grade, Grade::S);
    assert_eq!(scored.recommendation, Recommendation::StrongBuy);
    assert_eq!(scored.strategy_note, "적극적 매수 포지션 구축");
    assert_eq!(scored.signals.len(), 6);
}

#[test]
fn test_missing_valuation_gets_no_positive_adjustment() {
    let scored = score(&instrument(), ExtractedRecord::unresolved());

    assert!(scored.signals.iter().all(|s| !s.contains("PER - 저평가")));
    assert!(scored.signals.iter().all(|s| !s.contains("PBR")));
    // PER 999(-10), ROE 0(-10)
    assert_eq!(scored.score, 30);
    assert_eq!(scored.grade, Grade::D);
    assert_eq!(scored.recommendation, Recommendation::ReviewExit);
    assert_eq!(scored.strategy_note, "리스크 관리 필요");
}

#[test]
fn test_mid_range_price_position_has_no_adjustment() {
    let r = record(&[
        (Field::CurrentPrice, "100,000"),
        (Field::High52w, "168,500"),
        (Field::Low52w, "52,500"),
        (Field::Per, "20"),
        (Field::Roe, "7"),
    ]);
    let scored = score(&instrument(), r);

    assert!(scored.signals.is_empty(), "{:?}", scored.signals);
    assert_eq!(scored.score, 50);
    assert_eq!(scored.grade, Grade::C);
}

#[test]
fn test_scored_record_json_shape() {
    let scored = score(&instrument(), record(&[(Field::Per, "8")]));
    let json = serde_json::to_value(&scored).unwrap();
    let obj = json.as_object().unwrap();

    assert_eq!(obj["ticker"], "005930");
    assert_eq!(obj["name"], "삼성전자");
    assert_eq!(obj["market"], "KOSPI");
    assert_eq!(obj["per"], "8");
    assert_eq!(obj["sector"], NOT_AVAILABLE);
    assert_eq!(obj["grade"], "C");
    assert_eq!(obj["recommendation"], "중립");
    assert_eq!(obj["strategy"], "추가 분석 필요");
}

#[test]
fn test_extreme_prices_do_not_abort_scoring() {
    let r = record(&[
        (Field::CurrentPrice, "79228162514264337593543950335"),
        (Field::High52w, "90,000"),
        (Field::Low52w, "-1"),
        (Field::Per, "8"),
    ]);

    let scored = score(&instrument(), r);
    assert!(scored.signals.iter().any(|s| s.starts_with("분석 오류: ")));
    assert!(scored.signals.contains(&"✓ 매우 낮은 PER - 저평가".to_string()));
    assert!(scored.score <= 100);
}

fn numeric_or_missing() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(NOT_AVAILABLE.to_string()),
        (-1000.0f64..100_000.0).prop_map(|v| format!("{:.2}", v)),
        (0u64..10_000_000).prop_map(|v| v.to_string()),
        (-10_000_000i64..0).prop_map(|v| v.to_string()),
        (0u64..1000).prop_map(|v| (Decimal::MAX - Decimal::from(v)).to_string()),
        (0u64..1000).prop_map(|v| (Decimal::MIN + Decimal::from(v)).to_string()),
        Just("적자".to_string()),
    ]
}

fn arbitrary_record() -> impl Strategy<Value = ExtractedRecord> {
    prop::collection::vec(numeric_or_missing(), 10).prop_map(|values| {
        let fields = [
            Field::Per,
            Field::Pbr,
            Field::Roe,
            Field::DebtRatio,
            Field::CurrentPrice,
            Field::High52w,
            Field::Low52w,
            Field::OpinionScore,
            Field::DividendYield,
            Field::TargetPrice,
        ];
        fields
            .iter()
            .zip(values)
            .fold(ExtractedRecord::unresolved(), |r, (f, v)| r.with(*f, v))
    })
}

proptest! {
    #[test]
    fn prop_score_is_bounded(r in arbitrary_record()) {
        let scored = score(&instrument(), r);
        prop_assert!(scored.score <= 100);
    }

    #[test]
    fn prop_grade_matches_score(r in arbitrary_record()) {
        let scored = score(&instrument(), r);
        let expected = match scored.score {
            80..=100 => Grade::S,
            70..=79 => Grade::A,
            60..=69 => Grade::B,
            50..=59 => Grade::C,
            _ => Grade::D,
        };
        prop_assert_eq!(scored.grade, expected);
        prop_assert_eq!(scored.recommendation, Recommendation::for_grade(expected));
    }

    #[test]
    fn prop_scoring_is_deterministic(r in arbitrary_record()) {
        let first = score(&instrument(), r.clone());
        let second = score(&instrument(), r);
        prop_assert_eq!(first, second);
    }
}
