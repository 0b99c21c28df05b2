//! 콘솔 상위 종목 리포트.

use grader_core::{Field, ScoredRecord};

const RULE_WIDTH: usize = 80;
/// 종목별로 보여 줄 시그널 수.
const MAX_SIGNALS: usize = 3;

/// 점수 순으로 정렬된 결과에서 상위 `top_n`개를 출력용 문자열로 만듭니다.
pub fn render_top(records: &[ScoredRecord], top_n: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let shown = records.len().min(top_n);

    let mut output = String::new();
    output.push_str(&format!("{}\nTOP {} 추천 종목\n{}\n", rule, shown, rule));

    if shown == 0 {
        output.push_str("\n분석된 종목이 없습니다.\n");
    }

    for (rank, scored) in records.iter().take(top_n).enumerate() {
        let record = &scored.record;
        output.push_str(&format!(
            "\n{}. [{}] {} ({}) - {}\n",
            rank + 1,
            scored.grade,
            scored.instrument.display_name,
            scored.instrument.id,
            scored.instrument.market
        ));
        output.push_str(&format!("   점수: {}/100\n", scored.score));
        output.push_str(&format!(
            "   추천: {} | 전략: {}\n",
            scored.recommendation, scored.strategy_note
        ));
        output.push_str(&format!(
            "   현재가: {} | PER: {} | PBR: {}\n",
            record.get(Field::CurrentPrice),
            record.get(Field::Per),
            record.get(Field::Pbr)
        ));
        output.push_str(&format!(
            "   ROE: {} | 목표가: {}\n",
            with_unit(record.get(Field::Roe), record.is_resolved(Field::Roe), "%"),
            record.get(Field::TargetPrice)
        ));
        if !scored.signals.is_empty() {
            let signals: Vec<&str> = scored
                .signals
                .iter()
                .take(MAX_SIGNALS)
                .map(String::as_str)
                .collect();
            output.push_str(&format!("   시그널: {}\n", signals.join(", ")));
        }
    }

    output.push_str(&format!("\n{}\n", rule));
    output
}

fn with_unit(value: &str, resolved: bool, unit: &str) -> String {
    if resolved {
        format!("{}{}", value, unit)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grader_analytics::score;
    use grader_core::{ExtractedRecord, InstrumentRef, Market};

    fn scored(id: &str, per: &str, roe: &str) -> ScoredRecord {
        score(
            &InstrumentRef::new(id, format!("종목{}", id), Market::Kosdaq),
            ExtractedRecord::unresolved()
                .with(Field::Per, per)
                .with(Field::Roe, roe),
        )
    }

    #[test]
    fn test_render_limits_to_top_n() {
        let records = vec![
            scored("000001", "8", "20"),
            scored("000002", "12", "12"),
            scored("000003", "40", "1"),
        ];
        let report = render_top(&records, 2);

        assert!(report.contains("TOP 2 추천 종목"));
        assert!(report.contains("1. [S] 종목000001 (000001) - KOSDAQ"));
        assert!(report.contains("2. [A] 종목000002 (000002) - KOSDAQ"));
        assert!(!report.contains("000003"));
        assert!(report.contains("ROE: 20% | 목표가: N/A"));
    }

    #[test]
    fn test_render_empty() {
        let report = render_top(&[], 10);
        assert!(report.contains("TOP 0 추천 종목"));
        assert!(report.contains("분석된 종목이 없습니다."));
    }

    #[test]
    fn test_unresolved_roe_has_no_unit() {
        let report = render_top(&[scored("000001", "8", "N/A")], 10);
        assert!(report.contains("ROE: N/A |"));
    }
}
