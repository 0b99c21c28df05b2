//! 업종.

use grader_core::Field;
use once_cell::sync::Lazy;

use super::strategy::{FieldChain, Matcher};
use crate::normalize::NormalizeKind::Text;

pub(crate) static CHAINS: Lazy<Vec<FieldChain>> = Lazy::new(|| {
    vec![FieldChain::new(
        "sector",
        &[(Field::Sector, Text)],
        vec![
            // 투자지표 표의 "동일업종 PER" 같은 헤더는 제외
            Matcher::FollowingTag {
                anchor: "th",
                keyword: "업종",
                target: "td",
                exclude: &["PER", "PBR", "동일업종", "등락률"],
            },
            // <em>(업종명 : <a>반도체와반도체장비</a>ㅣ재무기준 ...)</em>
            Matcher::FollowingTag {
                anchor: "em",
                keyword: "업종명",
                target: "a",
                exclude: &["동일업종"],
            },
            Matcher::FollowingTag {
                anchor: "h4",
                keyword: "업종명",
                target: "a",
                exclude: &["동일업종"],
            },
            // 동종업종비교 섹션의 업종 링크
            Matcher::Text {
                selector: "a[href*='sise_group_detail'][href*='upjong']",
                exclude: &["더보기", "동일업종", "PER", "등락률"],
            },
        ],
    )]
});
