//! 종목 하나의 추출 → 집계 → 점수화.

use grader_analytics::score;
use grader_core::{InstrumentRef, ScoredRecord};
use grader_data::{extract_markup, DocumentSource};
use tracing::debug;

use crate::Result;

/// 이미 받아 온 페이지 본문을 점수화합니다. 파싱된 문서는 이 함수 안에서만 살아 있습니다.
pub fn analyze_markup(instrument: &InstrumentRef, markup: &str) -> ScoredRecord {
    let record = extract_markup(markup);
    debug!(
        ticker = %instrument.id,
        resolved = record.resolved_count(),
        "fields extracted"
    );
    score(instrument, record)
}

/// 페이지를 가져와 점수화합니다.
pub async fn analyze_instrument(
    source: &dyn DocumentSource,
    instrument: &InstrumentRef,
) -> Result<ScoredRecord> {
    let markup = source.fetch(&instrument.id).await?;
    Ok(analyze_markup(instrument, &markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grader_core::{Field, Grade, Market, NOT_AVAILABLE};

    #[test]
    fn test_empty_page_scores_with_defaults() {
        let instrument = InstrumentRef::new("005930", "삼성전자", Market::Kospi);
        let scored = analyze_markup(&instrument, "");

        assert_eq!(scored.record.get(Field::Per), NOT_AVAILABLE);
        assert_eq!(scored.score, 30);
        assert_eq!(scored.grade, Grade::D);
        assert_eq!(scored.instrument, instrument);
    }

    #[test]
    fn test_valuation_markup_is_scored() {
        let markup = r#"
            <table summary="PER/EPS 정보">
              <tr><th>PER l EPS(2024.12)</th><td><em>8.20</em>배 l <em>5,000</em>원</td></tr>
            </table>
        "#;
        let scored = analyze_markup(&InstrumentRef::from_ticker("000660"), markup);

        assert_eq!(scored.record.get(Field::Per), "8.20");
        assert_eq!(scored.signals[0], "✓ 매우 낮은 PER - 저평가");
    }
}
