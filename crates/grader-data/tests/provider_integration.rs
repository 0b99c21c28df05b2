//! Provider HTTP 통합 테스트 (mockito).

use encoding_rs::EUC_KR;
use grader_core::{ExtractedRecord, Field, InstrumentRef, Market, NarrativeConfig, ScraperConfig, UniverseConfig};
use grader_data::{
    DataError, DocumentSource, GeminiAdvisor, InstrumentUniverse, KrxUniverse, NarrativeError,
    NaverFinanceFetcher,
};
use mockito::Matcher;

fn fetcher(base_url: String) -> NaverFinanceFetcher {
    let config = ScraperConfig {
        base_url,
        timeout_secs: 5,
        ..Default::default()
    };
    NaverFinanceFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_naver_fetch_utf8() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/item/main.naver")
        .match_query(Matcher::UrlEncoded("code".into(), "005930".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<th>업종</th><td>반도체</td>")
        .create_async()
        .await;

    let markup = fetcher(server.url()).fetch("005930").await.unwrap();

    assert_eq!(markup, "<th>업종</th><td>반도체</td>");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_naver_fetch_euc_kr() {
    let mut server = mockito::Server::new_async().await;
    let (encoded, _, _) = EUC_KR.encode("<dd>현재가 72,300</dd>");
    server
        .mock("GET", "/item/main.naver")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=euc-kr")
        .with_body(encoded.into_owned())
        .create_async()
        .await;

    let markup = fetcher(server.url()).fetch("000660").await.unwrap();
    assert_eq!(markup, "<dd>현재가 72,300</dd>");
}

#[tokio::test]
async fn test_naver_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/item/main.naver")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let err = fetcher(server.url()).fetch("005930").await.unwrap_err();
    assert!(matches!(err, DataError::RateLimited));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_naver_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/item/main.naver")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = fetcher(server.url()).fetch("005930").await.unwrap_err();
    assert!(matches!(err, DataError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_krx_universe_kospi_then_kosdaq() {
    let mut server = mockito::Server::new_async().await;
    let path = "/comm/bldAttendant/getJsonData.cmd";

    let kospi = server
        .mock("POST", path)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("bld".into(), "dbms/MDC/STAT/standard/MDCSTAT01501".into()),
            Matcher::UrlEncoded("mktId".into(), "STK".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"OutBlock_1":[
                {"ISU_SRT_CD":"005930","ISU_ABBRV":"삼성전자","MKT_NM":"KOSPI"},
                {"ISU_SRT_CD":"000660","ISU_ABBRV":"SK하이닉스","MKT_NM":"KOSPI"}
            ]}"#,
        )
        .create_async()
        .await;
    let kosdaq = server
        .mock("POST", path)
        .match_body(Matcher::UrlEncoded("mktId".into(), "KSQ".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"OutBlock_1":[{"ISU_SRT_CD":"247540","ISU_ABBRV":"에코프로비엠"}]}"#)
        .create_async()
        .await;

    let universe = KrxUniverse::new(&UniverseConfig {
        krx_url: format!("{}{}", server.url(), path),
        markets: vec!["kospi".to_string(), "kosdaq".to_string()],
    });
    let instruments = universe.instruments().await.unwrap();

    assert_eq!(
        instruments,
        vec![
            InstrumentRef::new("005930", "삼성전자", Market::Kospi),
            InstrumentRef::new("000660", "SK하이닉스", Market::Kospi),
            InstrumentRef::new("247540", "에코프로비엠", Market::Kosdaq),
        ]
    );
    kospi.assert_async().await;
    kosdaq.assert_async().await;
}

#[tokio::test]
async fn test_krx_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/krx")
        .with_status(200)
        .with_body("<html>LOGOUT</html>")
        .create_async()
        .await;

    let universe = KrxUniverse::new(&UniverseConfig {
        krx_url: format!("{}/krx", server.url()),
        markets: vec!["kospi".to_string()],
    });
    assert!(matches!(
        universe.instruments().await,
        Err(DataError::Parse(_))
    ));
}

fn advisor(endpoint: String) -> GeminiAdvisor {
    let config = NarrativeConfig {
        endpoint,
        ..Default::default()
    };
    GeminiAdvisor::new(Some("test-key"), &config).unwrap()
}

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

#[tokio::test]
async fn test_gemini_advise() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::Regex("삼성전자".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"parts":[{"text":"```json\n{\"summary\":\"분할 매수\",\"action\":\"손절가 70,000원\"}\n```"}]}}]}"#,
        )
        .create_async()
        .await;

    let instrument = InstrumentRef::new("005930", "삼성전자", Market::Kospi);
    let record = ExtractedRecord::unresolved().with(Field::Per, "12.5");
    let advice = advisor(server.url()).advise(&instrument, &record).await.unwrap();

    assert_eq!(advice.summary, "분할 매수");
    assert_eq!(advice.action, "손절가 70,000원");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let err = advisor(server.url()).ping().await.unwrap_err();
    assert!(matches!(err, NarrativeError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_gemini_ping() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hello!"}]}}]}"#)
        .create_async()
        .await;

    assert!(advisor(server.url()).ping().await.unwrap());
}
