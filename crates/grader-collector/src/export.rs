//! 결과 내보내기 (CSV, JSON).

use chrono::{DateTime, Local};
use grader_core::{Field, ScoredRecord};
use grader_data::expand_magnitude;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::CollectorError;
use crate::orchestrator::BatchReport;
use crate::Result;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(CollectorError::Config(format!(
                "지원하지 않는 형식: {} (csv, json)",
                s
            ))),
        }
    }
}

/// CSV 헤더 순서.
pub const CSV_COLUMNS: [&str; 23] = [
    "grade",
    "score",
    "recommendation",
    "ticker",
    "name",
    "market",
    "current_price",
    "per",
    "pbr",
    "roe",
    "debt_ratio",
    "opinion",
    "opinion_score",
    "target_price",
    "high_52w",
    "low_52w",
    "market_cap",
    "market_cap_krw",
    "volume",
    "dividend_yield",
    "sector",
    "strategy",
    "signals",
];

/// 시그널 구분자.
const SIGNAL_SEPARATOR: &str = " | ";

/// 점수화 결과를 CSV로. 실패 종목은 포함하지 않습니다.
pub fn to_csv(records: &[ScoredRecord]) -> String {
    let mut output = String::new();

    output.push_str(&CSV_COLUMNS.join(","));
    output.push('\n');

    for scored in records {
        let record = &scored.record;
        let market_cap_krw = expand_magnitude(record.get(Field::MarketCap))
            .map(|won| won.to_string())
            .unwrap_or_default();

        let row = [
            scored.grade.to_string(),
            scored.score.to_string(),
            scored.recommendation.label().to_string(),
            scored.instrument.id.clone(),
            scored.instrument.display_name.clone(),
            scored.instrument.market.to_string(),
            record.get(Field::CurrentPrice).to_string(),
            record.get(Field::Per).to_string(),
            record.get(Field::Pbr).to_string(),
            record.get(Field::Roe).to_string(),
            record.get(Field::DebtRatio).to_string(),
            record.get(Field::Opinion).to_string(),
            record.get(Field::OpinionScore).to_string(),
            record.get(Field::TargetPrice).to_string(),
            record.get(Field::High52w).to_string(),
            record.get(Field::Low52w).to_string(),
            record.get(Field::MarketCap).to_string(),
            market_cap_krw,
            record.get(Field::Volume).to_string(),
            record.get(Field::DividendYield).to_string(),
            record.get(Field::Sector).to_string(),
            scored.strategy_note.clone(),
            scored.signals.join(SIGNAL_SEPARATOR),
        ];

        let escaped: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
        output.push_str(&escaped.join(","));
        output.push('\n');
    }

    output
}

/// 점수화 결과와 실패 목록을 JSON으로.
pub fn to_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// `stock_analysis_YYYYMMDD_HHMMSS.{csv,json}`
pub fn export_filename(at: DateTime<Local>, format: ExportFormat) -> String {
    format!(
        "stock_analysis_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// 결과 파일을 쓰고 경로를 돌려줍니다.
pub fn write_report(report: &BatchReport, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let content = match format {
        ExportFormat::Csv => to_csv(&report.scored),
        ExportFormat::Json => to_json(report)?,
    };

    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(Local::now(), format));
    std::fs::write(&path, content)?;

    info!(
        path = %path.display(),
        records = report.scored.len(),
        errors = report.errors.len(),
        "결과 파일 저장"
    );
    Ok(path)
}

/// CSV 이스케이프 (콤마, 따옴표, 줄바꿈 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
