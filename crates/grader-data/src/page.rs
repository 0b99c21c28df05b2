//! 파싱된 종목 페이지.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::normalize::collapse_whitespace;

/// 읽기 전용 문서 모델.
///
/// `scraper::Html`은 `Send`가 아니므로 await 지점을 넘어 보관하지 않습니다.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// 문서 순서로 CSS 셀렉터에 맞는 요소들. 잘못된 셀렉터는 빈 결과.
    pub fn select<'a>(&'a self, css: &str) -> Vec<ElementRef<'a>> {
        match selector(css) {
            Some(sel) => self.html.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = selector(css)?;
        self.html.select(&sel).next()
    }
}

/// 셀렉터 파싱. 실패는 로그만 남깁니다.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(css, error = %e, "invalid selector");
            None
        }
    }
}

/// 요소 하위에서 셀렉터에 맞는 요소들.
pub(crate) fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => element.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// 텍스트 노드를 각각 trim 해서 구분자 없이 잇고 공백을 정리합니다.
///
/// `<th>52주최고 <span>l</span> 최저</th>` -> `"52주최고l최저"`
pub fn stripped_text(element: ElementRef<'_>) -> String {
    let joined: String = element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    collapse_whitespace(&joined)
}
