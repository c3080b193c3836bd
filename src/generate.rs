//! Client for the `generateContent` text API.
//!
//! The HTTP call sits behind [`Transport`] so the retry loop and response decoding run
//! against canned responses in tests.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::{Analysis, ProfileInputs};
use crate::config::ApiConfig;
use crate::http_client::build_http_client;
use crate::prompts;
use crate::raw_data;

const OVERLOADED_STATUS: u16 = 503;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("cannot generate: {0}")]
    InvalidInputs(String),
    #[error("the model is overloaded (503); try again in a minute")]
    Overloaded,
    #[error("api call failed with status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("received an empty response from the api")]
    EmptyResponse,
    #[error("api call finished with reason {0}")]
    Finished(String),
    #[error("invalid response structure from the api")]
    InvalidResponse,
    #[error("failed decoding api response")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Generated text plus the web sources the model grounded it on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub query: String,
    pub system_prompt: String,
    pub include_search: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContent {
    Learnings,
    Charts,
    Visualisations,
}

impl KeyContent {
    fn system_prompt(self) -> &'static str {
        match self {
            KeyContent::Learnings => prompts::KEY_LEARNINGS_PROMPT,
            KeyContent::Charts => prompts::KEY_CHARTS_PROMPT,
            KeyContent::Visualisations => prompts::KEY_VISUALISATIONS_PROMPT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after the n-th overloaded attempt is `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub trait Transport {
    fn post(&self, url: &str, api_key: &str, body: &str) -> Result<RawResponse, GenerationError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, api_key: &str, body: &str) -> Result<RawResponse, GenerationError> {
        let resp = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct Payload<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

pub fn build_payload(request: &GenerationRequest) -> Result<String, GenerationError> {
    let payload = Payload {
        contents: vec![Content {
            parts: vec![Part {
                text: &request.query,
            }],
        }],
        system_instruction: Content {
            parts: vec![Part {
                text: &request.system_prompt,
            }],
        },
        tools: if request.include_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        },
    };
    Ok(serde_json::to_string(&payload)?)
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingAttributions", default)]
    grounding_attributions: Vec<Attribution>,
}

#[derive(Deserialize)]
struct Attribution {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Text of the first part of the first candidate. Attributions missing a uri or title
/// are dropped.
pub fn parse_response(body: &str) -> Result<GeneratedText, GenerationError> {
    if body.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let resp: ApiResponse = serde_json::from_str(body)?;
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(GenerationError::InvalidResponse);
    };

    let text = candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty());

    let Some(text) = text else {
        return match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(GenerationError::Finished(reason)),
            _ => Err(GenerationError::InvalidResponse),
        };
    };

    let sources = candidate
        .grounding_metadata
        .map(|g| g.grounding_attributions)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| {
            let web = a.web?;
            let uri = web.uri.filter(|u| !u.is_empty())?;
            let title = web.title.filter(|t| !t.is_empty())?;
            Some(Source { uri, title })
        })
        .collect();

    Ok(GeneratedText { text, sources })
}

fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Team names plus the PPG and Index blocks are the minimum for a report.
pub fn validate_inputs(inputs: &ProfileInputs) -> Result<(), GenerationError> {
    let mut problems = Vec::new();
    if inputs.team_a.trim().is_empty() || inputs.team_b.trim().is_empty() {
        problems.push("both team names are required");
    }
    if inputs.ppg_block.trim().is_empty() || inputs.index_block.trim().is_empty() {
        problems.push("PPG and Index blocks are required for analysis");
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::InvalidInputs(problems.join("; ")))
    }
}

/// Team news followed by the report that was generated with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOutcome {
    pub news: GeneratedText,
    pub profile: GeneratedText,
}

pub struct Generator<T: Transport = HttpTransport> {
    config: ApiConfig,
    transport: T,
    retry: RetryPolicy,
}

impl Generator<HttpTransport> {
    pub fn from_config(config: ApiConfig) -> anyhow::Result<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self::with_transport(config, HttpTransport::new(client)))
    }
}

impl<T: Transport> Generator<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Retries only overloaded (503) responses; every other failure returns at once.
    pub fn call(&self, request: &GenerationRequest) -> Result<GeneratedText, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        if request.query.trim().is_empty() {
            return Err(GenerationError::InvalidInputs(
                "no content provided for api call".to_string(),
            ));
        }
        let body = build_payload(request)?;

        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.attempt(api_key, &body) {
                Err(GenerationError::Overloaded) if attempt < max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    debug!(attempt, max_attempts, ?delay, "model overloaded, retrying");
                    thread::sleep(delay);
                }
                Err(GenerationError::Overloaded) => {
                    warn!(attempts = max_attempts, "model still overloaded, giving up");
                    return Err(GenerationError::Overloaded);
                }
                other => return other,
            }
        }
        Err(GenerationError::Overloaded)
    }

    fn attempt(&self, api_key: &str, body: &str) -> Result<GeneratedText, GenerationError> {
        let resp = self.transport.post(&self.config.api_url, api_key, body)?;
        if resp.status == OVERLOADED_STATUS {
            return Err(GenerationError::Overloaded);
        }
        if !(200..300).contains(&resp.status) {
            return Err(GenerationError::Http {
                status: resp.status,
                message: error_message(&resp.body),
            });
        }
        parse_response(&resp.body)
    }

    pub fn team_news(
        &self,
        team_a: &str,
        team_b: &str,
        today: NaiveDate,
    ) -> Result<GeneratedText, GenerationError> {
        self.call(&GenerationRequest {
            query: raw_data::team_news_query(team_a, team_b),
            system_prompt: prompts::team_news_prompt(team_a, team_b, today),
            include_search: true,
        })
    }

    pub fn profile(
        &self,
        inputs: &ProfileInputs,
        analysis: &Analysis,
        news: &str,
    ) -> Result<GeneratedText, GenerationError> {
        self.call(&GenerationRequest {
            query: raw_data::profile_query(inputs, analysis, news),
            system_prompt: prompts::profile_system_prompt(),
            include_search: true,
        })
    }

    /// Validate, fetch team news, then generate the report with the news folded in.
    pub fn full_profile(
        &self,
        inputs: &ProfileInputs,
        today: NaiveDate,
    ) -> Result<ProfileOutcome, GenerationError> {
        validate_inputs(inputs)?;
        let news = self.team_news(&inputs.team_a, &inputs.team_b, today)?;
        let analysis = Analysis::from_inputs(inputs);
        let profile = self.profile(inputs, &analysis, &news.text)?;
        Ok(ProfileOutcome { news, profile })
    }

    pub fn follow_up(&self, question: &str, context: &str) -> Result<GeneratedText, GenerationError> {
        self.call(&GenerationRequest {
            query: raw_data::follow_up_query(question, context),
            system_prompt: prompts::FOLLOW_UP_PROMPT.to_string(),
            include_search: true,
        })
    }

    pub fn key_content(
        &self,
        kind: KeyContent,
        report: &str,
        raw: &str,
    ) -> Result<GeneratedText, GenerationError> {
        self.call(&GenerationRequest {
            query: raw_data::key_content_query(report, raw),
            system_prompt: kind.system_prompt().to_string(),
            include_search: false,
        })
    }
}
