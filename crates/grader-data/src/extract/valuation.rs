//! 투자지표와 애널리스트 의견.
//!
//! 투자지표는 summary가 `PER ... EPS` 인 테이블에서 행 단위로 읽습니다.
//! 셀 하나에 `34.84배l4,816원` 처럼 두 값이 붙어 있으므로 단위로 구분합니다.
//! 테이블이 없으면 `em#_per` 같은 ID 요소를 봅니다.
//!
//! 투자의견은 `투자의견 l 목표주가 4.00매수 l 214,125` 형태의 묶음 문자열입니다.

use grader_core::Field;
use once_cell::sync::Lazy;
use regex::Regex;

use super::price::TEXT_CANDIDATES;
use super::strategy::{FieldChain, Label, Matcher, RowScan, ScanMode, Tables};
use crate::normalize::NormalizeKind::{Decision, Formatted, Numeric, Percentage};

static VALUATION_TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"PER.*EPS").unwrap());
static TIMES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?[\d.]+)\s*배").unwrap());
static WON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?[\d,]+)\s*원").unwrap());
static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?[\d.]+)\s*%").unwrap());

/// 목표주가 뒤에 52주 행의 숫자가 바로 붙는 경우가 있어 쉼표 묶음 형태를 먼저 봅니다.
static OPINION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:투자의견|opinion)\s*[l|]\s*(?:목표주가|target)\s*([\d.]+)\s*([가-힣]+|[A-Za-z]+)\s*[l|]\s*(\d{1,3}(?:,\d{3})+|\d+)",
    )
    .unwrap()
});
/// 구분자가 흐트러진 경우. 두 라벨이 모두 있는 텍스트만 보고, 의견 단어는 어휘 검사로 거릅니다.
static OPINION_LOOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:투자의견|opinion).*?(?:목표주가|target)\D*?(\d[\d.]*)\s*([가-힣]+|[A-Za-z]+).*?(\d[\d,]*)",
    )
    .unwrap()
});
static OPINION_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\d.]+)\s*([가-힣]+|[A-Za-z]+)\s*[l|]\s*(\d{1,3}(?:,\d{3})+|\d+)").unwrap()
});

/// 투자지표 테이블의 행 전체 텍스트를 라벨로 보는 스캔.
fn valuation_row(require: &'static [&'static str]) -> RowScan {
    RowScan::header(require)
        .in_tables(Tables::SummaryMatches(&VALUATION_TABLE))
        .label(Label::Row)
}

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![
        FieldChain::new(
            "per",
            &[(Field::Per, Percentage)],
            vec![
                Matcher::RowScan(valuation_row(&["PER", "EPS"]).exclude(&["업종PER"]).pattern(&TIMES)),
                Matcher::text("em#_per"),
            ],
        ),
        FieldChain::new(
            "eps",
            &[(Field::Eps, Formatted)],
            vec![
                Matcher::RowScan(valuation_row(&["PER", "EPS"]).exclude(&["업종PER"]).pattern(&WON)),
                Matcher::text("em#_eps"),
            ],
        ),
        FieldChain::new(
            "per_industry",
            &[(Field::PerIndustry, Percentage)],
            vec![
                Matcher::RowScan(valuation_row(&["업종PER"]).pattern(&TIMES)),
                Matcher::RowScan(RowScan::header(&["동일업종", "PER"]).pattern(&TIMES)),
            ],
        ),
        FieldChain::new(
            "pbr",
            &[(Field::Pbr, Percentage)],
            vec![
                Matcher::RowScan(valuation_row(&["PBR", "BPS"]).exclude(&["업종PBR"]).pattern(&TIMES)),
                Matcher::text("em#_pbr"),
            ],
        ),
        FieldChain::new(
            "bps",
            &[(Field::Bps, Formatted)],
            vec![Matcher::RowScan(
                valuation_row(&["PBR", "BPS"]).exclude(&["업종PBR"]).pattern(&WON),
            )],
        ),
        FieldChain::new(
            "pbr_industry",
            &[(Field::PbrIndustry, Percentage)],
            vec![
                Matcher::RowScan(valuation_row(&["업종PBR"]).pattern(&TIMES)),
                Matcher::RowScan(RowScan::header(&["동일업종", "PBR"]).pattern(&TIMES)),
            ],
        ),
        FieldChain::new(
            "dividend_yield",
            &[(Field::DividendYield, Percentage)],
            vec![
                Matcher::RowScan(valuation_row(&["배당"]).pattern(&PERCENT)),
                Matcher::RowScan(valuation_row(&["수익률"]).pattern(&PERCENT)),
                Matcher::text("em#_dvr"),
            ],
        ),
        FieldChain::new(
            "opinion",
            &[
                (Field::OpinionScore, Numeric),
                (Field::Opinion, Decision),
                (Field::TargetPrice, Formatted),
            ],
            vec![
                Matcher::Pattern {
                    scope: TEXT_CANDIDATES,
                    mode: ScanMode::Each,
                    regex: &OPINION,
                },
                Matcher::Pattern {
                    scope: TEXT_CANDIDATES,
                    mode: ScanMode::Each,
                    regex: &OPINION_LOOSE,
                },
                Matcher::Pattern {
                    scope: "table[summary*='투자의견'] td",
                    mode: ScanMode::Each,
                    regex: &OPINION_CELL,
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

    fn get(markup: &str, field: Field) -> String {
        Category::Valuation
            .extract(&Page::parse(markup))
            .values
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    const PER_TABLE: &str = r#"
        <table summary="PER/EPS 정보" class="per_table">
            <tr><th>PER<span>l</span>EPS(2024.12)</th>
                <td><em id="_per">34.84</em>배<span>l</span><em id="_eps">4,816</em>원</td></tr>
            <tr><th>추정PER<span>l</span>EPS</th>
                <td><em>12.10</em>배<span>l</span><em>6,200</em>원</td></tr>
            <tr><th>PBR<span>l</span>BPS(2024.12)</th>
                <td><em id="_pbr">1.21</em>배<span>l</span><em>57,930</em>원</td></tr>
            <tr><th>배당수익률<span>l</span>2024.12</th>
                <td><em id="_dvr">2.13</em>%</td></tr>
        </table>
        <table summary="동일업종 PER 정보">
            <tr><th>동일업종 PER</th><td><em>18.40</em>배</td></tr>
        </table>"#;

    #[test]
    fn test_valuation_table() {
        assert_eq!(get(PER_TABLE, Field::Per), "34.84");
        assert_eq!(get(PER_TABLE, Field::Eps), "4,816");
        assert_eq!(get(PER_TABLE, Field::Pbr), "1.21");
        assert_eq!(get(PER_TABLE, Field::Bps), "57,930");
        assert_eq!(get(PER_TABLE, Field::DividendYield), "2.13");
        // 동일업종 PER 표는 summary가 PER.*EPS 가 아니므로 두 번째 전략으로 읽힘
        assert_eq!(get(PER_TABLE, Field::PerIndustry), "18.40");
        assert_eq!(get(PER_TABLE, Field::PbrIndustry), NOT_AVAILABLE);
    }

    #[test]
    fn test_industry_rows() {
        let markup = r#"<table summary="PER EPS 업종 비교">
            <tr><th>업종PER</th><td>15.5배</td></tr>
            <tr><th>업종PBR</th><td>1.3배</td></tr>
        </table>"#;
        assert_eq!(get(markup, Field::PerIndustry), "15.5");
        assert_eq!(get(markup, Field::PbrIndustry), "1.3");
        assert_eq!(get(markup, Field::Per), NOT_AVAILABLE);
    }

    #[test]
    fn test_id_fallback_without_table() {
        let markup = r#"<div><em id="_per">9.87</em><em id="_pbr">0.77</em><em id="_dvr">4.1</em></div>"#;
        assert_eq!(get(markup, Field::Per), "9.87");
        assert_eq!(get(markup, Field::Pbr), "0.77");
        assert_eq!(get(markup, Field::DividendYield), "4.1");
        assert_eq!(get(markup, Field::Eps), NOT_AVAILABLE);
    }

    #[test]
    fn test_opinion_korean_markup() {
        let markup = r#"<table summary="투자의견 정보"><tr>
            <th>투자의견<span class="bar">l</span>목표주가</th>
            <td><span class="f_up"><em>4.00</em>매수</span><span class="bar">l</span><em>95,000</em></td>
        </tr></table>"#;
        assert_eq!(get(markup, Field::OpinionScore), "4.00");
        assert_eq!(get(markup, Field::Opinion), "매수");
        assert_eq!(get(markup, Field::TargetPrice), "95,000");
    }

    #[test]
    fn test_opinion_combined_label() {
        let markup = "<div><p>opinion | target 4.00buy |214,125</p></div>";
        assert_eq!(get(markup, Field::OpinionScore), "4.00");
        assert_eq!(get(markup, Field::Opinion), "buy");
        assert_eq!(get(markup, Field::TargetPrice), "214,125");
    }

    #[test]
    fn test_loose_opinion_rejects_unknown_word() {
        let markup = "<div><p>투자의견 목표주가 3.5 목표 없음 12,000</p></div>";
        assert_eq!(get(markup, Field::Opinion), NOT_AVAILABLE);
        assert_eq!(get(markup, Field::OpinionScore), NOT_AVAILABLE);
        assert_eq!(get(markup, Field::TargetPrice), NOT_AVAILABLE);
    }

    #[test]
    fn test_loose_opinion_accepts_vocabulary_word() {
        let markup = "<div><p>투자의견 목표주가 3.80 매수 (목표) 88,000</p></div>";
        assert_eq!(get(markup, Field::OpinionScore), "3.80");
        assert_eq!(get(markup, Field::Opinion), "매수");
        assert_eq!(get(markup, Field::TargetPrice), "88,000");
    }

    #[test]
    fn test_opinion_requires_labels() {
        let markup = "<table><tr><td>2024.12.05 1 매수 체결 15,000주</td></tr></table>";
        assert_eq!(get(markup, Field::OpinionScore), NOT_AVAILABLE);
        assert_eq!(get(markup, Field::Opinion), NOT_AVAILABLE);
        assert_eq!(get(markup, Field::TargetPrice), NOT_AVAILABLE);
    }
}
