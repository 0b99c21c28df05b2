//! 추출 문자열 정규화.
//!
//! 페이지마다 "72,300", "34.84배", "4.00매수" 처럼 같은 값이 다르게 표기되므로
//! 필드 종류별로 하나의 표준 문자열로 맞춥니다. 어떤 입력에도 panic 하지 않습니다.

use grader_core::NOT_AVAILABLE;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// 정규화 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeKind {
    /// 숫자, 소수점, 부호만 남김
    Numeric,
    /// 천 단위 구분자를 붙인 표시용 숫자
    Formatted,
    /// 단위(%, 배)를 뗀 비율
    Percentage,
    /// 투자의견 단어 (닫힌 어휘)
    Decision,
    /// 조/억 단위가 붙은 금액, 표시 그대로
    Magnitude,
    /// 일반 텍스트 (업종명 등)
    Text,
}

/// 투자의견으로 인정하는 단어. 영문은 대소문자 무시.
pub const DECISION_VOCABULARY: &[&str] = &[
    "강력매수", "매수", "보유", "중립", "매도", "강력매도", "buy", "sell", "hold", "neutral",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static JO_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d,.]+)\s*조").unwrap());
static EOK_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d,.]+)\s*억").unwrap());

/// 정규화합니다. 실패 시 미확인 값, 단 `Formatted`의 파싱 실패는 원문 그대로.
pub fn normalize(raw: &str, kind: NormalizeKind) -> String {
    match try_normalize(raw, kind) {
        Some(value) => value,
        None if kind == NormalizeKind::Formatted && has_digit(raw) => raw.trim().to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// 표준 값을 만들 수 없으면 `None`. 추출 전략은 `None`을 실패로 보고 다음 전략으로 넘어갑니다.
pub fn try_normalize(raw: &str, kind: NormalizeKind) -> Option<String> {
    match kind {
        NormalizeKind::Numeric => clean_number(raw),
        NormalizeKind::Formatted => format_number(raw),
        NormalizeKind::Percentage => {
            let body = raw
                .trim()
                .trim_end_matches(|c: char| c == '%' || c == '배' || c.is_whitespace());
            clean_number(body)
        }
        NormalizeKind::Decision => {
            let token = raw.trim();
            is_decision_word(token).then(|| token.to_string())
        }
        NormalizeKind::Magnitude => {
            let text = collapse_whitespace(raw);
            has_digit(&text).then_some(text)
        }
        NormalizeKind::Text => {
            let text = collapse_whitespace(raw);
            (!text.is_empty() && text != NOT_AVAILABLE).then_some(text)
        }
    }
}

/// 닫힌 투자의견 어휘에 속하는지.
pub fn is_decision_word(token: &str) -> bool {
    DECISION_VOCABULARY
        .iter()
        .any(|word| word.eq_ignore_ascii_case(token))
}

/// 연속 공백을 한 칸으로 줄이고 양끝을 자릅니다.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// "72,300원" -> "72300"
fn clean_number(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    has_digit(&cleaned).then_some(cleaned)
}

/// "72300" -> "72,300", "-1234.5" -> "-1,234.5"
fn format_number(text: &str) -> Option<String> {
    let cleaned = clean_number(text)?;
    let value = Decimal::from_str(cleaned.trim_end_matches('.')).ok()?;

    let integer = value.trunc().abs().normalize().to_string();
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let fraction = cleaned
        .split_once('.')
        .map(|(_, frac)| frac)
        .filter(|frac| !frac.is_empty());

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };

    Some(match fraction {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    })
}

/// 조/억 단위 금액을 원 단위로 펼칩니다.
///
/// "431조 2,350억원" -> 431235000000000, "1,234억원" -> 123400000000.
/// 단위가 없으면 원 단위 숫자로 봅니다.
pub fn expand_magnitude(text: &str) -> Option<Decimal> {
    let unit = |re: &Regex, scale: i64| -> Option<Decimal> {
        let caps = re.captures(text)?;
        let body = caps[1].replace(',', "");
        Decimal::from_str(&body).ok()?.checked_mul(Decimal::from(scale))
    };

    let jo = unit(&JO_PART, 1_000_000_000_000);
    let eok = unit(&EOK_PART, 100_000_000);

    match (jo, eok) {
        (None, None) => Decimal::from_str(&clean_number(text)?).ok(),
        (jo, eok) => jo
            .unwrap_or(Decimal::ZERO)
            .checked_add(eok.unwrap_or(Decimal::ZERO)),
    }
}

/// 숫자 변환 실패.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("숫자 변환 실패: '{0}'")]
pub struct CoerceError(pub String);

/// 점수 규칙용 숫자 변환. 미확인 값이면 `default`, 숫자가 아니면 오류.
pub fn coerce(value: &str, default: Decimal) -> Result<Decimal, CoerceError> {
    if value == NOT_AVAILABLE {
        return Ok(default);
    }

    clean_number(value)
        .and_then(|cleaned| Decimal::from_str(&cleaned).ok())
        .ok_or_else(|| CoerceError(value.to_string()))
}
