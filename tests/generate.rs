use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use chrono::NaiveDate;

use match_profiler::analysis::ProfileInputs;
use match_profiler::config::ApiConfig;
use match_profiler::generate::{
    GenerationError, GenerationRequest, Generator, KeyContent, RawResponse, RetryPolicy,
    Transport, parse_response, validate_inputs,
};

const OK_BODY: &str = r###"{
  "candidates": [{
    "content": {"parts": [{"text": "## Match Profile"}]},
    "finishReason": "STOP",
    "groundingMetadata": {"groundingAttributions": [
      {"web": {"uri": "https://example.com/news", "title": "Team news"}},
      {"web": {"uri": "", "title": "No link"}},
      {"web": {"title": "Missing uri"}},
      {}
    ]}
  }]
}"###;

#[derive(Default)]
struct FakeTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    bodies: RefCell<Vec<String>>,
}

impl FakeTransport {
    fn with(responses: &[(u16, &str)]) -> Self {
        let fake = Self::default();
        for (status, body) in responses {
            fake.responses.borrow_mut().push_back(RawResponse {
                status: *status,
                body: body.to_string(),
            });
        }
        fake
    }

    fn calls(&self) -> usize {
        self.bodies.borrow().len()
    }
}

impl Transport for &FakeTransport {
    fn post(&self, _url: &str, api_key: &str, body: &str) -> Result<RawResponse, GenerationError> {
        assert_eq!(api_key, "test-key");
        self.bodies.borrow_mut().push(body.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| GenerationError::Transport("no canned response".to_string()))
    }
}

fn keyed_config() -> ApiConfig {
    ApiConfig {
        api_key: Some("test-key".to_string()),
        ..ApiConfig::default()
    }
}

fn no_wait() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::ZERO,
    }
}

fn request() -> GenerationRequest {
    GenerationRequest {
        query: "Analyze".to_string(),
        system_prompt: "You are an analyst".to_string(),
        include_search: true,
    }
}

fn valid_inputs() -> ProfileInputs {
    ProfileInputs {
        team_a: "Arsenal".to_string(),
        team_b: "Chelsea".to_string(),
        ppg_block: "PPG\t1\t2\t2.1\t1.4\t-".to_string(),
        index_block: "Offence\t14\t12".to_string(),
        ..ProfileInputs::default()
    }
}

#[test]
fn response_keeps_only_complete_sources() {
    let out = parse_response(OK_BODY).expect("body should parse");
    assert_eq!(out.text, "## Match Profile");
    assert_eq!(out.sources.len(), 1);
    assert_eq!(out.sources[0].uri, "https://example.com/news");
}

#[test]
fn response_without_text_reports_finish_reason() {
    let err = parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
        .expect_err("no text");
    assert!(matches!(err, GenerationError::Finished(ref r) if r == "SAFETY"));

    let err = parse_response(r#"{"candidates":[]}"#).expect_err("no candidates");
    assert!(matches!(err, GenerationError::InvalidResponse));

    let err = parse_response("").expect_err("empty body");
    assert!(matches!(err, GenerationError::EmptyResponse));

    let err = parse_response("<html>").expect_err("not json");
    assert!(matches!(err, GenerationError::Decode(_)));
}

#[test]
fn missing_key_fails_before_any_request() {
    let fake = FakeTransport::with(&[(200, OK_BODY)]);
    let generator = Generator::with_transport(ApiConfig::default(), &fake);
    let err = generator.call(&request()).expect_err("no key");
    assert!(matches!(err, GenerationError::MissingApiKey));
    assert_eq!(fake.calls(), 0);
}

#[test]
fn overloaded_is_retried_then_given_up() {
    let fake = FakeTransport::with(&[(503, ""), (503, ""), (503, ""), (200, OK_BODY)]);
    let generator = Generator::with_transport(keyed_config(), &fake).with_retry(no_wait());
    let err = generator.call(&request()).expect_err("still overloaded");
    assert!(matches!(err, GenerationError::Overloaded));
    assert_eq!(fake.calls(), 3);
}

#[test]
fn overloaded_then_success_returns_text() {
    let fake = FakeTransport::with(&[(503, ""), (200, OK_BODY)]);
    let generator = Generator::with_transport(keyed_config(), &fake).with_retry(no_wait());
    let out = generator.call(&request()).expect("second attempt succeeds");
    assert_eq!(out.text, "## Match Profile");
    assert_eq!(fake.calls(), 2);
}

#[test]
fn other_http_errors_are_not_retried() {
    let fake = FakeTransport::with(&[(400, r#"{"error":{"message":"API key not valid"}}"#)]);
    let generator = Generator::with_transport(keyed_config(), &fake).with_retry(no_wait());
    let err = generator.call(&request()).expect_err("bad request");
    match err {
        GenerationError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fake.calls(), 1);
}

#[test]
fn blank_query_is_rejected() {
    let fake = FakeTransport::default();
    let generator = Generator::with_transport(keyed_config(), &fake);
    let req = GenerationRequest {
        query: "   ".to_string(),
        ..request()
    };
    assert!(matches!(
        generator.call(&req),
        Err(GenerationError::InvalidInputs(_))
    ));
    assert_eq!(fake.calls(), 0);
}

#[test]
fn validation_needs_teams_ppg_and_index() {
    assert!(validate_inputs(&valid_inputs()).is_ok());
    let err = validate_inputs(&ProfileInputs::default()).expect_err("empty inputs");
    let GenerationError::InvalidInputs(msg) = err else {
        panic!("expected invalid inputs");
    };
    assert!(msg.contains("team names"));
    assert!(msg.contains("PPG and Index"));
}

#[test]
fn full_profile_fetches_news_then_folds_it_into_the_report() {
    let news = r#"{"candidates":[{"content":{"parts":[{"text":"Saka out injured"}]}}]}"#;
    let fake = FakeTransport::with(&[(200, news), (200, OK_BODY)]);
    let generator = Generator::with_transport(keyed_config(), &fake).with_retry(no_wait());
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");

    let outcome = generator
        .full_profile(&valid_inputs(), today)
        .expect("both calls succeed");
    assert_eq!(outcome.news.text, "Saka out injured");
    assert_eq!(outcome.profile.sources.len(), 1);

    let bodies = fake.bodies.borrow();
    assert_eq!(bodies.len(), 2);
    let first: serde_json::Value = serde_json::from_str(&bodies[0]).expect("json body");
    let system = first["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system prompt");
    assert!(system.contains("Saturday 1 March 2025"));
    assert!(first["tools"].is_array());
    assert!(bodies[1].contains("Saka out injured"));
}

#[test]
fn full_profile_rejects_invalid_inputs_without_calling() {
    let fake = FakeTransport::default();
    let generator = Generator::with_transport(keyed_config(), &fake);
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    let err = generator
        .full_profile(&ProfileInputs::default(), today)
        .expect_err("invalid");
    assert!(matches!(err, GenerationError::InvalidInputs(_)));
    assert_eq!(fake.calls(), 0);
}

#[test]
fn key_content_requests_skip_search() {
    let fake = FakeTransport::with(&[(200, OK_BODY)]);
    let generator = Generator::with_transport(keyed_config(), &fake);
    generator
        .key_content(KeyContent::Charts, "REPORT-TEXT", "RAW-BLOCKS")
        .expect("call succeeds");
    let body: serde_json::Value =
        serde_json::from_str(&fake.bodies.borrow()[0]).expect("json body");
    assert!(body.get("tools").is_none());
    let query = body["contents"][0]["parts"][0]["text"].as_str().expect("query");
    assert!(query.find("RAW-BLOCKS").expect("raw data") < query.find("REPORT-TEXT").expect("report"));
}
