//! 거래: 거래량, 거래대금, 시가총액.

use grader_core::Field;
use once_cell::sync::Lazy;
use regex::Regex;

use super::strategy::{FieldChain, Matcher, RowScan, ScanMode};
use crate::normalize::NormalizeKind::{Formatted, Magnitude};

static VOLUME: Lazy<Regex> = Lazy::new(|| Regex::new(r"거래량\s*([\d,]+)").unwrap());
static TRADING_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"거래대금\s*([\d,]+)").unwrap());

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![
        FieldChain::new(
            "volume",
            &[(Field::Volume, Formatted)],
            vec![
                Matcher::Pattern {
                    scope: "dl.blind dd, dd.blind",
                    mode: ScanMode::Joined,
                    regex: &VOLUME,
                },
                Matcher::CellAfterLabel {
                    cells: "table.no_info td",
                    label: "거래량",
                },
            ],
        ),
        FieldChain::new(
            "trading_value",
            &[(Field::TradingValue, Formatted)],
            vec![Matcher::Pattern {
                scope: "dl.blind dd, dd.blind",
                mode: ScanMode::Joined,
                regex: &TRADING_VALUE,
            }],
        ),
        FieldChain::new(
            "market_cap",
            &[(Field::MarketCap, Magnitude)],
            vec![
                Matcher::RowScan(RowScan::header(&["시가총액"]).exclude(&["순위"])),
                Matcher::CellAfterLabel {
                    cells: "table.no_info td",
                    label: "시가총액",
                },
                Matcher::text("em#_market_sum"),
            ],
        ),
    ]
});
