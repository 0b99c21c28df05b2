//! 재무 건전성: ROE, 부채비율, 영업이익률.

use grader_core::Field;
use once_cell::sync::Lazy;

use super::strategy::{FieldChain, Label, Matcher, RowScan, Tables, ValueCell};
use crate::normalize::NormalizeKind::Percentage;

/// 기업실적분석/재무 요약 테이블.
const FINANCIAL_TABLES: Tables = Tables::SummaryContains(&["재무", "분석"]);

fn financial_header(label: &'static [&'static str]) -> Matcher {
    Matcher::RowScan(
        RowScan::header(label)
            .in_tables(FINANCIAL_TABLES)
            .value(ValueCell::FirstNumericTd),
    )
}

/// 테이블을 가리지 않고 행 텍스트로 찾습니다. 동종업종 비교표의 업종 평균 행은 제외.
fn any_row(label: &'static [&'static str]) -> Matcher {
    Matcher::RowScan(
        RowScan::header(label)
            .label(Label::Row)
            .exclude(&["동일업종"])
            .value(ValueCell::FirstNumericTd),
    )
}

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![
        FieldChain::new(
            "roe",
            &[(Field::Roe, Percentage)],
            vec![
                financial_header(&["ROE"]),
                financial_header(&["자기자본이익률"]),
                any_row(&["ROE"]),
            ],
        ),
        FieldChain::new(
            "debt_ratio",
            &[(Field::DebtRatio, Percentage)],
            vec![financial_header(&["부채비율"]), any_row(&["부채비율"])],
        ),
        FieldChain::new(
            "operating_margin",
            &[(Field::OperatingMargin, Percentage)],
            vec![financial_header(&["영업이익률"]), any_row(&["영업이익률"])],
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Category;
    use crate::page::Page;
    use grader_core::NOT_AVAILABLE;

    fn values(markup: &str) -> Vec<String> {
        Category::Financial
            .extract(&Page::parse(markup))
            .values
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    #[test]
    fn test_financial_summary_table() {
        let v = values(
            r#"<table summary="기업실적분석에 관한 표">
                <tr><th>주요재무정보</th><th>2022.12</th><th>2023.12</th></tr>
                <tr><th>영업이익률</th><td>14.35</td><td>2.54</td></tr>
                <tr><th>ROE(지배주주)</th><td> </td><td>4.15</td></tr>
                <tr><th>부채비율</th><td>26.41</td><td>25.36</td></tr>
            </table>"#,
        );
        assert_eq!(v, vec!["4.15", "26.41", "14.35"]);
    }

    #[test]
    fn test_korean_roe_label() {
        let v = values(
            r#"<table summary="재무비율"><tr><th>자기자본이익률</th><td>12.5%</td></tr></table>"#,
        );
        assert_eq!(v[0], "12.5");
        assert_eq!(v[1], NOT_AVAILABLE);
    }

    #[test]
    fn test_peer_table_row_fallback_skips_industry_average() {
        let v = values(
            r#"<table summary="동종업종 비교">
                <tr><td>동일업종 ROE</td><td>9.1</td></tr>
                <tr><td>ROE(%)</td><td>17.07</td><td>8.2</td></tr>
            </table>"#,
        );
        assert_eq!(v[0], "17.07");
    }

    #[test]
    fn test_absent_tables() {
        let v = values("<div>재무정보 없음</div>");
        assert!(v.iter().all(|s| s == NOT_AVAILABLE));
    }
}
