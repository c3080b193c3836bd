use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Cut-offs for the flag rules. Percent thresholds are whole percents, ratios are raw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagThresholds {
    pub fts: f64,
    pub bias: f64,
    /// Negative: a home-vs-away index below this favours the home side.
    pub hva: f64,
    pub late_goal: f64,
    pub resilience: f64,
    pub half_skew: f64,
    pub index: f64,
    pub clean_sheet: f64,
    pub scoring_rate: f64,
    pub fhg: f64,
    pub goal_edge: f64,
    pub volatility: f64,
}

impl Default for FlagThresholds {
    fn default() -> Self {
        Self {
            fts: 55.0,
            bias: 0.4,
            hva: -0.15,
            late_goal: 5.0,
            resilience: 30.0,
            half_skew: 60.0,
            index: 13.0,
            clean_sheet: 40.0,
            scoring_rate: 35.0,
            fhg: 60.0,
            goal_edge: 2.5,
            volatility: 70.0,
        }
    }
}

impl FlagThresholds {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Per-field overrides from `FLAG_<NAME>_THRESHOLD` keys. Unparseable values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, current: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(current)
        };
        self.fts = read("FLAG_FTS_THRESHOLD", self.fts);
        self.bias = read("FLAG_BIAS_THRESHOLD", self.bias);
        self.hva = read("FLAG_HVA_THRESHOLD", self.hva);
        self.late_goal = read("FLAG_LATE_GOAL_THRESHOLD", self.late_goal);
        self.resilience = read("FLAG_RESILIENCE_THRESHOLD", self.resilience);
        self.half_skew = read("FLAG_HALF_SKEW_THRESHOLD", self.half_skew);
        self.index = read("FLAG_INDEX_THRESHOLD", self.index);
        self.clean_sheet = read("FLAG_CLEAN_SHEET_THRESHOLD", self.clean_sheet);
        self.scoring_rate = read("FLAG_SCORING_RATE_THRESHOLD", self.scoring_rate);
        self.fhg = read("FLAG_FHG_THRESHOLD", self.fhg);
        self.goal_edge = read("FLAG_GOAL_EDGE_THRESHOLD", self.goal_edge);
        self.volatility = read("FLAG_VOLATILITY_THRESHOLD", self.volatility);
        self
    }

    /// Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading thresholds {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing thresholds {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let api_url = lookup("GEMINI_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = lookup("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(5, 600);

        Self {
            api_key,
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
