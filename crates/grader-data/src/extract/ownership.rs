//! 수급: 외국인 보유 비율과 투자자별 순매수.

use grader_core::Field;
use once_cell::sync::Lazy;

use super::strategy::{FieldChain, Label, Matcher, RowScan, Tables, ValueCell};
use crate::normalize::NormalizeKind::{Formatted, Percentage};

/// 투자자별 매매동향 블록의 행. 첫 셀이 투자자 구분, 두 번째 셀이 순매수량.
fn flow_row(investor: &'static [&'static str]) -> Matcher {
    Matcher::RowScan(
        RowScan::header(investor)
            .in_tables(Tables::Css("div.sub_section table"))
            .label(Label::FirstCell)
            .value(ValueCell::Cell(1)),
    )
}

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![
        FieldChain::new(
            "foreign_ownership",
            &[(Field::ForeignOwnership, Percentage)],
            vec![
                Matcher::RowScan(RowScan::header(&["외국인", "소진율"])),
                Matcher::RowScan(
                    RowScan::header(&["외국인비율"])
                        .label(Label::Row)
                        .value(ValueCell::FirstNumericTd),
                ),
                Matcher::RowScan(RowScan::header(&["외국인", "보유"]).exclude(&["주식수"])),
            ],
        ),
        FieldChain::new(
            "foreign_net_buy",
            &[(Field::ForeignNetBuy, Formatted)],
            vec![flow_row(&["외국인"])],
        ),
        FieldChain::new(
            "institutional_net_buy",
            &[(Field::InstitutionalNetBuy, Formatted)],
            vec![flow_row(&["기관"])],
        ),
        FieldChain::new(
            "individual_net_buy",
            &[(Field::IndividualNetBuy, Formatted)],
            vec![flow_row(&["개인"])],
        ),
    ]
});
