//! Scoring service client tests against a local mock server

use sentiment_trader::oracle::HttpSentimentOracle;
use sentiment_trader::{SentimentLabel, SentimentOracle, SentimentReading, TraderError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn headlines() -> Vec<String> {
    vec![
        "Stocks plunge after hot inflation print".to_string(),
        "Treasury yields jump to 2024 high".to_string(),
    ]
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_posts_batch_and_parses_reading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(body_json(json!({"headlines": headlines()})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"confidence": 0.9993, "label": "negative"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let oracle = HttpSentimentOracle::new(&server.uri()).unwrap();
    let reading = oracle.score(&headlines()).await.unwrap();

    assert_eq!(reading, SentimentReading::new(0.9993, SentimentLabel::Negative));
}

#[tokio::test]
async fn test_label_is_case_insensitive() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"confidence": 0.51, "label": "Positive"})),
    )
    .await;

    let oracle = HttpSentimentOracle::new(&server.uri()).unwrap();
    let reading = oracle.score(&headlines()).await.unwrap();
    assert_eq!(reading.label, SentimentLabel::Positive);
}

#[tokio::test]
async fn test_empty_batch_skips_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let oracle = HttpSentimentOracle::new(&server.uri()).unwrap();
    assert_eq!(oracle.score(&[]).await.unwrap(), SentimentReading::neutral());
}

#[tokio::test]
async fn test_bad_responses_are_oracle_failures() {
    let cases = vec![
        ResponseTemplate::new(500).set_body_string("model not loaded"),
        ResponseTemplate::new(200).set_body_json(json!({"confidence": 0.99, "label": "bullish"})),
        ResponseTemplate::new(200).set_body_json(json!({"confidence": 1.7, "label": "positive"})),
        ResponseTemplate::new(200).set_body_json(json!({"label": "positive"})),
        ResponseTemplate::new(200).set_body_string("not json"),
    ];

    for template in cases {
        let server = MockServer::start().await;
        respond_with(&server, template).await;

        let oracle = HttpSentimentOracle::new(&server.uri()).unwrap();
        let result = oracle.score(&headlines()).await;
        assert!(
            matches!(result, Err(TraderError::OracleFailure(_))),
            "expected oracle failure, got {:?}",
            result
        );
    }
}
