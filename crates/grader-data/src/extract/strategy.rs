//! 필드 추출 전략.
//!
//! 필드(또는 한 번의 매칭으로 함께 잡히는 필드 묶음)마다 [`FieldChain`]이
//! 우선순위 순서의 [`Matcher`] 목록을 가집니다. 앞에서부터 시도해 처음으로
//! 받아들여진 캡처가 이깁니다. 같은 전략 안에서는 문서 순서상 먼저 나온 후보가 이깁니다.

use grader_core::{Field, NOT_AVAILABLE};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use crate::normalize::{normalize, try_normalize, NormalizeKind};
use crate::page::{select_within, stripped_text, Page};

/// 패턴 매칭 대상 텍스트 구성 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// 후보 요소를 하나씩 매칭
    Each,
    /// 모든 후보 텍스트를 공백으로 이어 한 번 매칭
    Joined,
}

/// 행 스캔 대상 테이블.
#[derive(Clone, Copy)]
pub enum Tables {
    Any,
    /// summary 속성에 단어 중 하나라도 포함
    SummaryContains(&'static [&'static str]),
    SummaryMatches(&'static Lazy<Regex>),
    Css(&'static str),
}

/// 행의 라벨로 볼 텍스트.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// 첫 번째 th
    Header,
    /// 행 전체 텍스트
    Row,
    /// th/td 중 첫 번째 셀
    FirstCell,
}

/// 값을 읽을 셀.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCell {
    FirstTd,
    /// th/td를 합친 셀 목록의 n번째
    Cell(usize),
    /// 숫자가 들어 있는 첫 td
    FirstNumericTd,
}

/// 테이블 행 스캔.
#[derive(Clone, Copy)]
pub struct RowScan {
    pub tables: Tables,
    pub label: Label,
    /// 라벨에 모두 포함되어야 하는 단어
    pub require: &'static [&'static str],
    /// 라벨에 하나라도 있으면 건너뛰는 단어
    pub exclude: &'static [&'static str],
    pub value: ValueCell,
    /// 값 셀 텍스트에서 첫 그룹을 뽑을 패턴
    pub pattern: Option<&'static Lazy<Regex>>,
}

impl RowScan {
    /// 모든 테이블, th 라벨, 첫 td 값.
    pub const fn header(require: &'static [&'static str]) -> Self {
        Self {
            tables: Tables::Any,
            label: Label::Header,
            require,
            exclude: &[],
            value: ValueCell::FirstTd,
            pattern: None,
        }
    }

    pub const fn in_tables(mut self, tables: Tables) -> Self {
        self.tables = tables;
        self
    }

    pub const fn label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    pub const fn exclude(mut self, exclude: &'static [&'static str]) -> Self {
        self.exclude = exclude;
        self
    }

    pub const fn value(mut self, value: ValueCell) -> Self {
        self.value = value;
        self
    }

    pub const fn pattern(mut self, pattern: &'static Lazy<Regex>) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// 하나의 추출 전략.
#[derive(Clone, Copy)]
pub enum Matcher {
    /// 셀렉터에 맞는 요소의 텍스트
    Text {
        selector: &'static str,
        exclude: &'static [&'static str],
    },
    /// 키워드를 담은 `anchor` 다음에 오는 첫 `target` 요소.
    /// `exclude` 단어가 들어간 anchor와 target은 건너뜁니다.
    FollowingTag {
        anchor: &'static str,
        keyword: &'static str,
        target: &'static str,
        exclude: &'static [&'static str],
    },
    /// 셀 목록에서 라벨 셀의 바로 다음 셀
    CellAfterLabel {
        cells: &'static str,
        label: &'static str,
    },
    /// summary로 찾은 테이블의 (행, td) 위치
    SummaryTableCell {
        summary: &'static str,
        row: usize,
        cell: usize,
    },
    /// 평탄화 텍스트 정규식. 선언된 그룹이 모두 잡혀야 성공
    Pattern {
        scope: &'static str,
        mode: ScanMode,
        regex: &'static Lazy<Regex>,
    },
    RowScan(RowScan),
    /// 키워드가 있는 행의 앞쪽 em 값들
    RowEms {
        keyword: &'static str,
        count: usize,
    },
}

/// 전략 하나가 잡은 후보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub raw_text: String,
    pub groups: Vec<String>,
}

impl Capture {
    fn single(text: String) -> Self {
        Self {
            groups: vec![text.clone()],
            raw_text: text,
        }
    }
}

impl Matcher {
    pub const fn text(selector: &'static str) -> Self {
        Matcher::Text {
            selector,
            exclude: &[],
        }
    }

    /// 후보를 문서 순서로 훑어 `accept`를 통과한 첫 캡처를 돌려줍니다.
    pub fn capture(&self, page: &Page, accept: &dyn Fn(&[String]) -> bool) -> Option<Capture> {
        let mut accepted = |capture: Capture| accept(&capture.groups).then_some(capture);

        match *self {
            Matcher::Text { selector, exclude } => page
                .select(selector)
                .into_iter()
                .map(stripped_text)
                .filter(|text| !text.is_empty() && !contains_any(text, exclude))
                .find_map(|text| accepted(Capture::single(text))),

            Matcher::FollowingTag {
                anchor,
                keyword,
                target,
                exclude,
            } => {
                let elements = page.select(&format!("{}, {}", anchor, target));
                elements.iter().enumerate().find_map(|(i, el)| {
                    let label = stripped_text(*el);
                    if el.value().name() != anchor
                        || !label.contains(keyword)
                        || contains_any(&label, exclude)
                    {
                        return None;
                    }
                    let next = elements[i + 1..]
                        .iter()
                        .filter(|candidate| candidate.value().name() == target)
                        .map(|candidate| stripped_text(*candidate))
                        .find(|text| !text.is_empty() && !contains_any(text, exclude))?;
                    accepted(Capture::single(next))
                })
            }

            Matcher::CellAfterLabel { cells, label } => {
                let cells = page.select(cells);
                cells.iter().enumerate().find_map(|(i, cell)| {
                    if !stripped_text(*cell).contains(label) {
                        return None;
                    }
                    let next = cells.get(i + 1)?;
                    non_empty(stripped_text(*next)).and_then(|t| accepted(Capture::single(t)))
                })
            }

            Matcher::SummaryTableCell { summary, row, cell } => page
                .select("table[summary]")
                .into_iter()
                .filter(|table| summary_of(*table).contains(summary))
                .find_map(|table| {
                    let rows = select_within(table, "tr");
                    let tds = select_within(*rows.get(row)?, "td");
                    non_empty(stripped_text(*tds.get(cell)?))
                        .and_then(|t| accepted(Capture::single(t)))
                }),

            Matcher::Pattern { scope, mode, regex } => {
                let candidates = page.select(scope);
                match mode {
                    ScanMode::Each => candidates
                        .into_iter()
                        .find_map(|el| match_groups(regex, &stripped_text(el)).and_then(&mut accepted)),
                    ScanMode::Joined => {
                        let joined = candidates
                            .into_iter()
                            .map(stripped_text)
                            .collect::<Vec<_>>()
                            .join(" ");
                        match_groups(regex, &joined).and_then(accepted)
                    }
                }
            }

            Matcher::RowScan(scan) => scan_rows(page, &scan, &mut accepted),

            Matcher::RowEms { keyword, count } => page
                .select("tr")
                .into_iter()
                .filter(|tr| stripped_text(*tr).contains(keyword))
                .find_map(|tr| {
                    let ems = select_within(tr, "em");
                    if ems.len() < count {
                        return None;
                    }
                    let groups: Vec<String> = ems[..count].iter().map(|em| stripped_text(*em)).collect();
                    if groups.iter().any(String::is_empty) {
                        return None;
                    }
                    accepted(Capture {
                        raw_text: groups.join("|"),
                        groups,
                    })
                }),
        }
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn summary_of(table: ElementRef<'_>) -> &str {
    table.value().attr("summary").unwrap_or("")
}

/// 선언된 캡처 그룹이 모두 비어 있지 않게 잡혀야 성공.
fn match_groups(regex: &Regex, text: &str) -> Option<Capture> {
    let caps = regex.captures(text)?;
    let groups = (1..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str().trim().to_string()))
        .collect::<Option<Vec<_>>>()?;

    if groups.is_empty() || groups.iter().any(String::is_empty) {
        return None;
    }

    Some(Capture {
        raw_text: caps[0].to_string(),
        groups,
    })
}

fn scan_rows(
    page: &Page,
    scan: &RowScan,
    accepted: &mut dyn FnMut(Capture) -> Option<Capture>,
) -> Option<Capture> {
    let rows: Vec<ElementRef<'_>> = match scan.tables {
        Tables::Any => page.select("tr"),
        Tables::SummaryContains(words) => page
            .select("table[summary]")
            .into_iter()
            .filter(|t| contains_any(summary_of(*t), words))
            .flat_map(|t| select_within(t, "tr"))
            .collect(),
        Tables::SummaryMatches(re) => page
            .select("table[summary]")
            .into_iter()
            .filter(|t| re.is_match(summary_of(*t)))
            .flat_map(|t| select_within(t, "tr"))
            .collect(),
        Tables::Css(css) => page
            .select(css)
            .into_iter()
            .flat_map(|t| select_within(t, "tr"))
            .collect(),
    };

    for row in rows {
        let cells = select_within(row, "th, td");
        let label = match scan.label {
            Label::Header => match select_within(row, "th").first() {
                Some(th) => stripped_text(*th),
                None => continue,
            },
            Label::Row => stripped_text(row),
            Label::FirstCell => match cells.first() {
                Some(cell) => stripped_text(*cell),
                None => continue,
            },
        };

        if !scan.require.iter().all(|w| label.contains(w)) || contains_any(&label, scan.exclude) {
            continue;
        }

        let value_cell = match scan.value {
            ValueCell::FirstTd => select_within(row, "td").into_iter().next(),
            ValueCell::Cell(n) => cells.get(n).copied(),
            ValueCell::FirstNumericTd => select_within(row, "td")
                .into_iter()
                .find(|td| stripped_text(*td).chars().any(|c| c.is_ascii_digit())),
        };
        let Some(cell) = value_cell else {
            continue;
        };

        let text = stripped_text(cell);
        let value = match scan.pattern {
            Some(re) => re
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string()),
            None => Some(text.clone()),
        };

        if let Some(value) = value.and_then(non_empty) {
            if let Some(capture) = accepted(Capture {
                raw_text: text,
                groups: vec![value],
            }) {
                return Some(capture);
            }
        }
    }

    None
}

/// 단일 필드 추출 결과. 추출 호출 안에서만 쓰입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    pub field_name: &'static str,
    pub raw_text: String,
    /// 이긴 전략의 위치. 실패 시 시도한 전략 수
    pub strategy_index: usize,
    pub matched: bool,
    pub groups: Vec<String>,
}

/// 필드 묶음과 그 전략 목록.
pub struct FieldChain {
    pub name: &'static str,
    /// 캡처 그룹 순서대로의 (필드, 정규화 종류)
    pub fields: &'static [(Field, NormalizeKind)],
    pub strategies: Vec<Matcher>,
}

impl FieldChain {
    pub fn new(
        name: &'static str,
        fields: &'static [(Field, NormalizeKind)],
        strategies: Vec<Matcher>,
    ) -> Self {
        Self {
            name,
            fields,
            strategies,
        }
    }

    /// 그룹 수가 맞고 모든 그룹이 각 종류로 정규화될 때만 받아들입니다.
    fn accepts(&self, groups: &[String]) -> bool {
        groups.len() == self.fields.len()
            && groups
                .iter()
                .zip(self.fields)
                .all(|(group, (_, kind))| try_normalize(group, *kind).is_some())
    }

    /// 정규화된 (필드, 값) 목록. 어떤 전략도 맞지 않으면 모두 미확인.
    pub fn resolve(&self, page: &Page) -> Vec<(Field, String)> {
        let capture = extract(self, page);
        self.fields
            .iter()
            .enumerate()
            .map(|(i, (field, kind))| {
                let value = match capture.groups.get(i) {
                    Some(group) if capture.matched => normalize(group, *kind),
                    _ => NOT_AVAILABLE.to_string(),
                };
                (*field, value)
            })
            .collect()
    }
}

/// 전략을 순서대로 시도합니다.
pub fn extract(chain: &FieldChain, page: &Page) -> RawCapture {
    let accept = |groups: &[String]| chain.accepts(groups);

    for (index, strategy) in chain.strategies.iter().enumerate() {
        if let Some(capture) = strategy.capture(page, &accept) {
            debug!(
                field = chain.name,
                strategy = index,
                raw = %capture.raw_text,
                "field resolved"
            );
            return RawCapture {
                field_name: chain.name,
                raw_text: capture.raw_text,
                strategy_index: index,
                matched: true,
                groups: capture.groups,
            };
        }
    }

    debug!(field = chain.name, "no strategy matched");
    RawCapture {
        field_name: chain.name,
        raw_text: String::new(),
        strategy_index: chain.strategies.len(),
        matched: false,
        groups: Vec::new(),
    }
}
