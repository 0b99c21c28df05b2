//! 종목 페이지에서 지표 추출.
//!
//! 카테고리마다 담당 필드가 겹치지 않게 나뉘어 있고, 각 카테고리의 부분 결과는
//! [`crate::aggregate::aggregate`]가 하나의 [`ExtractedRecord`]로 합칩니다.

mod financial;
mod ownership;
mod price;
mod sector;
pub mod strategy;
mod trading;
mod valuation;

use grader_core::{ExtractedRecord, Field};
use tracing::debug;

use crate::aggregate::aggregate;
use crate::page::Page;
use strategy::FieldChain;

/// 추출 카테고리.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Price,
    Trading,
    Valuation,
    Ownership,
    Financial,
    Sector,
}

impl Category {
    /// 병합 순서.
    pub const ALL: [Category; 6] = [
        Category::Price,
        Category::Trading,
        Category::Valuation,
        Category::Ownership,
        Category::Financial,
        Category::Sector,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Price => "price",
            Category::Trading => "trading",
            Category::Valuation => "valuation",
            Category::Ownership => "ownership",
            Category::Financial => "financial",
            Category::Sector => "sector",
        }
    }

    /// 이 카테고리가 소유하는 필드.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Category::Price => &[
                Field::CurrentPrice,
                Field::OpeningPrice,
                Field::HighPrice,
                Field::LowPrice,
                Field::PrevClose,
                Field::UpperLimit,
                Field::LowerLimit,
                Field::High52w,
                Field::Low52w,
            ],
            Category::Trading => &[Field::Volume, Field::TradingValue, Field::MarketCap],
            Category::Valuation => &[
                Field::Per,
                Field::PerIndustry,
                Field::Pbr,
                Field::PbrIndustry,
                Field::Eps,
                Field::Bps,
                Field::DividendYield,
                Field::OpinionScore,
                Field::Opinion,
                Field::TargetPrice,
            ],
            Category::Ownership => &[
                Field::ForeignOwnership,
                Field::ForeignNetBuy,
                Field::InstitutionalNetBuy,
                Field::IndividualNetBuy,
            ],
            Category::Financial => &[Field::Roe, Field::DebtRatio, Field::OperatingMargin],
            Category::Sector => &[Field::Sector],
        }
    }

    pub fn chains(&self) -> &'static [FieldChain] {
        match self {
            Category::Price => &price::CHAINS,
            Category::Trading => &trading::CHAINS,
            Category::Valuation => &valuation::CHAINS,
            Category::Ownership => &ownership::CHAINS,
            Category::Financial => &financial::CHAINS,
            Category::Sector => &sector::CHAINS,
        }
    }

    /// 카테고리의 모든 필드 체인을 실행합니다.
    pub fn extract(&self, page: &Page) -> PartialRecord {
        let values: Vec<(Field, String)> = self
            .chains()
            .iter()
            .flat_map(|chain| chain.resolve(page))
            .collect();

        debug!(
            category = self.name(),
            resolved = values.iter().filter(|(_, v)| v != grader_core::NOT_AVAILABLE).count(),
            total = values.len(),
            "category extracted"
        );

        PartialRecord {
            category: *self,
            values,
        }
    }
}

/// 카테고리 하나의 부분 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub category: Category,
    pub values: Vec<(Field, String)>,
}

impl PartialRecord {
    pub fn new(category: Category, values: Vec<(Field, String)>) -> Self {
        Self { category, values }
    }
}

/// 파싱된 페이지 전체를 추출해 하나의 레코드로 합칩니다.
pub fn extract_page(page: &Page) -> ExtractedRecord {
    aggregate(Category::ALL.iter().map(|category| category.extract(page)))
}

/// 마크업 문자열에서 바로 추출합니다. 파싱된 문서는 이 호출 안에서만 살아 있습니다.
pub fn extract_markup(markup: &str) -> ExtractedRecord {
    extract_page(&Page::parse(markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_ownership_is_disjoint_and_complete() {
        let mut seen = HashSet::new();
        for category in Category::ALL {
            for field in category.fields() {
                assert!(seen.insert(*field), "{} owned twice", field);
            }
        }
        assert_eq!(seen.len(), Field::ALL.len());
    }

    #[test]
    fn test_chains_cover_owned_fields() {
        for category in Category::ALL {
            let chained: Vec<Field> = category
                .chains()
                .iter()
                .flat_map(|chain| chain.fields.iter().map(|(f, _)| *f))
                .collect();
            let mut owned = category.fields().to_vec();
            let mut sorted = chained.clone();
            owned.sort();
            sorted.sort();
            assert_eq!(sorted, owned, "{}", category.name());
        }
    }

    #[test]
    fn test_empty_document_is_all_sentinel() {
        let record = extract_markup("");
        assert_eq!(record, ExtractedRecord::unresolved());
    }
}
