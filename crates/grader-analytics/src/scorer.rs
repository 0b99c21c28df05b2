//! 규칙 기반 종합 점수.
//!
//! 기본 50점에서 시작해 독립된 규칙들의 가감점을 더한 뒤 0~100으로 자릅니다.
//!
//! | 규칙 | 조건 | 점수 |
//! |------|------|------|
//! | PER | < 10 / 10~15 / > 30 | +15 / +10 / -10 |
//! | PBR | < 1 / 1~2 | +15 / +10 |
//! | ROE | > 15 / 10~15 / < 5 | +15 / +10 / -10 |
//! | 부채비율 | < 50 / > 100 | +10 / -10 |
//! | 52주 위치 | > 80% / < 20% | -5 / +10 |
//! | 투자의견 점수 | <= 2 / <= 2.5 | +10 / +5 |
//! | 배당수익률 | > 3 | +5 |
//!
//! 값이 없는 필드는 가장 불리한 기본값으로 평가합니다. 숫자로 읽을 수 없는 값은
//! 해당 규칙만 건너뛰고 `분석 오류` 시그널을 남깁니다.

use grader_core::{ExtractedRecord, Field, Grade, InstrumentRef, Recommendation, ScoredRecord, MAX_SCORE};
use grader_data::coerce;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::{ScoreError, ScoreResult};

/// 시작 점수.
pub const BASE_SCORE: i32 = 50;

/// 규칙 하나의 가감점과 근거 문구.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub points: i32,
    pub signal: &'static str,
}

const fn adjust(points: i32, signal: &'static str) -> Option<Adjustment> {
    Some(Adjustment { points, signal })
}

type Rule = fn(&ExtractedRecord) -> ScoreResult<Option<Adjustment>>;

/// 평가 순서.
const RULES: [Rule; 7] = [
    per_rule,
    pbr_rule,
    roe_rule,
    debt_rule,
    price_position_rule,
    opinion_rule,
    dividend_rule,
];

/// 필드 값을 숫자로. 미확인이면 `default`.
fn numeric(record: &ExtractedRecord, field: Field, default: Decimal) -> ScoreResult<Decimal> {
    coerce(record.get(field), default).map_err(|source| ScoreError::Coerce { field, source })
}

fn per_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let per = numeric(record, Field::Per, dec!(999))?;
    Ok(if per < dec!(10) {
        adjust(15, "✓ 매우 낮은 PER - 저평가")
    } else if per < dec!(15) {
        adjust(10, "✓ 낮은 PER - 적정 가치")
    } else if per > dec!(30) {
        adjust(-10, "⚠ 높은 PER - 고평가 가능")
    } else {
        None
    })
}

fn pbr_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let pbr = numeric(record, Field::Pbr, dec!(999))?;
    Ok(if pbr < dec!(1) {
        adjust(15, "✓ PBR < 1 - 청산가치 이하")
    } else if pbr < dec!(2) {
        adjust(10, "✓ 낮은 PBR - 저평가")
    } else {
        None
    })
}

fn roe_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let roe = numeric(record, Field::Roe, Decimal::ZERO)?;
    Ok(if roe > dec!(15) {
        adjust(15, "✓ 높은 ROE - 우수한 수익성")
    } else if roe > dec!(10) {
        adjust(10, "✓ 양호한 ROE")
    } else if roe < dec!(5) {
        adjust(-10, "⚠ 낮은 ROE - 수익성 부족")
    } else {
        None
    })
}

fn debt_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let debt = numeric(record, Field::DebtRatio, dec!(100))?;
    Ok(if debt < dec!(50) {
        adjust(10, "✓ 낮은 부채비율 - 재무 안정")
    } else if debt > dec!(100) {
        adjust(-10, "⚠ 높은 부채비율 - 재무 리스크")
    } else {
        None
    })
}

/// 52주 범위 안에서 현재가의 위치 (%). 현재가와 최고가가 모두 양수일 때만 계산합니다.
pub fn price_position(record: &ExtractedRecord) -> ScoreResult<Option<Decimal>> {
    let current = numeric(record, Field::CurrentPrice, Decimal::ZERO)?;
    let high = numeric(record, Field::High52w, Decimal::ZERO)?;
    let low = numeric(record, Field::Low52w, Decimal::ZERO)?;

    if current <= Decimal::ZERO || high <= Decimal::ZERO {
        return Ok(None);
    }

    let offset = current
        .checked_sub(low)
        .ok_or(ScoreError::Overflow { field: Field::CurrentPrice })?;
    let range = high
        .checked_sub(low)
        .ok_or(ScoreError::Overflow { field: Field::High52w })?;
    if range.is_zero() {
        return Err(ScoreError::DegenerateRange { high, low });
    }

    offset
        .checked_div(range)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(Some)
        .ok_or(ScoreError::Overflow { field: Field::CurrentPrice })
}

fn price_position_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    Ok(match price_position(record)? {
        Some(position) if position > dec!(80) => adjust(-5, "⚠ 52주 고점 근처 - 조정 가능"),
        Some(position) if position < dec!(20) => adjust(10, "✓ 52주 저점 근처 - 반등 기대"),
        _ => None,
    })
}

fn opinion_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let opinion = numeric(record, Field::OpinionScore, dec!(3))?;
    Ok(if opinion <= dec!(2) {
        adjust(10, "✓ 증권사 강력 매수 의견")
    } else if opinion <= dec!(2.5) {
        adjust(5, "✓ 증권사 매수 의견")
    } else {
        None
    })
}

fn dividend_rule(record: &ExtractedRecord) -> ScoreResult<Option<Adjustment>> {
    let dividend = numeric(record, Field::DividendYield, Decimal::ZERO)?;
    Ok((dividend > dec!(3)).then_some(Adjustment {
        points: 5,
        signal: "✓ 높은 배당수익률",
    }))
}

/// 점수와 시그널.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// 0..=100 으로 자른 최종 점수
    pub score: u8,
    /// 자르기 전 합계
    pub raw_total: i32,
    pub signals: Vec<String>,
}

/// 모든 규칙을 순서대로 평가합니다. 한 규칙의 실패는 나머지 규칙에 영향을 주지 않습니다.
pub fn evaluate(record: &ExtractedRecord) -> Evaluation {
    let mut total = BASE_SCORE;
    let mut signals = Vec::new();

    for rule in RULES {
        match rule(record) {
            Ok(Some(adjustment)) => {
                total += adjustment.points;
                signals.push(adjustment.signal.to_string());
            }
            Ok(None) => {}
            Err(e) => signals.push(format!("분석 오류: {}", e)),
        }
    }

    Evaluation {
        score: total.clamp(0, i32::from(MAX_SCORE)) as u8,
        raw_total: total,
        signals,
    }
}

/// 레코드를 점수화합니다. 같은 입력은 항상 같은 결과를 냅니다.
pub fn score(instrument: &InstrumentRef, record: ExtractedRecord) -> ScoredRecord {
    let evaluation = evaluate(&record);
    let grade = Grade::from_score(evaluation.score);
    let recommendation = Recommendation::for_grade(grade);

    debug!(
        ticker = %instrument.id,
        score = evaluation.score,
        raw = evaluation.raw_total,
        grade = %grade,
        "instrument scored"
    );

    ScoredRecord {
        instrument: instrument.clone(),
        record,
        score: evaluation.score,
        grade,
        signals: evaluation.signals,
        recommendation,
        strategy_note: recommendation.strategy_note().to_string(),
    }
}
