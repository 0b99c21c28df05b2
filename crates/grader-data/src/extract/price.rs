//! 시세: 현재가, 일중 가격, 상/하한가, 52주 범위.

use grader_core::Field;
use once_cell::sync::Lazy;
use regex::Regex;

use super::strategy::{FieldChain, Matcher, ScanMode};
use crate::normalize::NormalizeKind::{self, Formatted};

/// `<dl class="blind">` 시세 요약.
const QUOTE_SUMMARY: &str = "dl.blind dd, dd.blind";
/// 평탄화 텍스트 패턴 대상 요소.
pub(crate) const TEXT_CANDIDATES: &str = "div, td, p, em";

static CURRENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"현재가\s*([\d,]+)").unwrap());
static PREV_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"전일가\s*([\d,]+)").unwrap());
static OPENING: Lazy<Regex> = Lazy::new(|| Regex::new(r"시가\s*([\d,]+)").unwrap());
static HIGH: Lazy<Regex> = Lazy::new(|| Regex::new(r"고가\s*([\d,]+)").unwrap());
static LOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"저가\s*([\d,]+)").unwrap());
static UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"상한가\s*([\d,]+)").unwrap());
static LOWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"하한가\s*([\d,]+)").unwrap());

/// "52주최고 l 최저 168,500 l 52,500"
///
/// 구분자 없이 이어진 텍스트에서 다음 행의 숫자가 붙지 않도록
/// 쉼표 묶음이 있으면 그 형태까지만 잡습니다.
static RANGE_52W: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:52주최고|52-week-high)\s*[l|]\s*(?:최저|low)\s*(\d{1,3}(?:,\d{3})+|\d+)\s*[l|]\s*(\d{1,3}(?:,\d{3})+|\d+)",
    )
    .unwrap()
});
static RANGE_52W_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"52(?:주|-week).*?([\d,]+).*?([\d,]+)").unwrap());

/// 시세 요약 텍스트에서 라벨 뒤 숫자 하나.
fn quote(
    name: &'static str,
    fields: &'static [(Field, NormalizeKind)],
    regex: &'static Lazy<Regex>,
) -> FieldChain {
    FieldChain::new(
        name,
        fields,
        vec![Matcher::Pattern {
            scope: QUOTE_SUMMARY,
            mode: ScanMode::Joined,
            regex,
        }],
    )
}

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![
        FieldChain::new(
            "current_price",
            &[(Field::CurrentPrice, Formatted)],
            vec![
                Matcher::text(".no_today span.blind"),
                Matcher::text(".today em.no_up, .today em.no_down"),
                Matcher::Pattern {
                    scope: QUOTE_SUMMARY,
                    mode: ScanMode::Joined,
                    regex: &CURRENT,
                },
                Matcher::SummaryTableCell {
                    summary: "동종업종",
                    row: 2,
                    cell: 1,
                },
            ],
        ),
        quote("prev_close", &[(Field::PrevClose, Formatted)], &PREV_CLOSE),
        quote("opening_price", &[(Field::OpeningPrice, Formatted)], &OPENING),
        quote("high_price", &[(Field::HighPrice, Formatted)], &HIGH),
        quote("low_price", &[(Field::LowPrice, Formatted)], &LOW),
        quote("upper_limit", &[(Field::UpperLimit, Formatted)], &UPPER),
        quote("lower_limit", &[(Field::LowerLimit, Formatted)], &LOWER),
        FieldChain::new(
            "range_52w",
            &[(Field::High52w, Formatted), (Field::Low52w, Formatted)],
            vec![
                Matcher::Pattern {
                    scope: TEXT_CANDIDATES,
                    mode: ScanMode::Each,
                    regex: &RANGE_52W,
                },
                Matcher::Pattern {
                    scope: TEXT_CANDIDATES,
                    mode: ScanMode::Each,
                    regex: &RANGE_52W_LOOSE,
                },
                Matcher::RowEms {
                    keyword: "52주최고",
                    count: 2,
                },
            ],
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Category;
    use crate::page::Page;
    use grader_core::NOT_AVAILABLE;

    fn extract(markup: &str) -> Vec<(Field, String)> {
        Category::Price.extract(&Page::parse(markup)).values
    }

    fn value(values: &[(Field, String)], field: Field) -> &str {
        values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    #[test]
    fn test_quote_summary() {
        let values = extract(
            r#"<dl class="blind">
                <dt>종목 시세 정보</dt>
                <dd>현재가 72,300 전일대비 상승 1,300</dd>
                <dd>전일가 71,000</dd>
                <dd>시가 71,500</dd>
                <dd>고가 72,800</dd>
                <dd>상한가 92,300</dd>
                <dd>저가 71,200</dd>
                <dd>하한가 49,700</dd>
                <dd>거래량 12,345,678</dd>
            </dl>"#,
        );

        assert_eq!(value(&values, Field::CurrentPrice), "72,300");
        assert_eq!(value(&values, Field::PrevClose), "71,000");
        assert_eq!(value(&values, Field::OpeningPrice), "71,500");
        assert_eq!(value(&values, Field::HighPrice), "72,800");
        assert_eq!(value(&values, Field::LowPrice), "71,200");
        assert_eq!(value(&values, Field::UpperLimit), "92,300");
        assert_eq!(value(&values, Field::LowerLimit), "49,700");
    }

    #[test]
    fn test_current_price_prefers_no_today() {
        let values = extract(
            r#"<div class="today"><p class="no_today"><em class="no_up">
                <span class="blind">100000</span></em></p></div>
               <dl class="blind"><dd>현재가 99,000</dd></dl>"#,
        );
        assert_eq!(value(&values, Field::CurrentPrice), "100,000");
    }

    #[test]
    fn test_current_price_from_today_em_without_blind() {
        let values = extract(
            r#"<div class="today"><p class="no_exday"><em class="no_down">61,800</em></p></div>
               <dl class="blind"><dd>현재가 99,000</dd></dl>"#,
        );
        assert_eq!(value(&values, Field::CurrentPrice), "61,800");
    }

    #[test]
    fn test_current_price_falls_back_to_quote_summary() {
        let values = extract(r#"<dl class="blind"><dd>현재가 72,300 전일대비 상승 1,300</dd></dl>"#);
        assert_eq!(value(&values, Field::CurrentPrice), "72,300");
    }

    #[test]
    fn test_range_52w_english_labels() {
        let values = extract(
            r#"<div class="tab_con1"><table><tr>
                <th>52-week-high | low</th>
                <td><em>168,500</em>|<em>52,500</em></td>
            </tr></table></div>"#,
        );
        assert_eq!(value(&values, Field::High52w), "168,500");
        assert_eq!(value(&values, Field::Low52w), "52,500");
    }

    #[test]
    fn test_range_52w_korean_delimiters() {
        let values = extract(
            r#"<table><tr><th>52주최고<span class="bar">l</span>최저</th>
                <td><em>88,800</em><span class="bar">l</span><em>49,900</em></td>
            </tr></table>"#,
        );
        assert_eq!(value(&values, Field::High52w), "88,800");
        assert_eq!(value(&values, Field::Low52w), "49,900");
    }

    #[test]
    fn test_missing_everything() {
        let values = extract("<html><body><p>점검 중</p></body></html>");
        assert_eq!(values.len(), Category::Price.fields().len());
        assert!(values.iter().all(|(_, v)| v == NOT_AVAILABLE));
    }
}
