use serde::Serialize;

use crate::results::{TeamMatch, VenueFilter, parse_results_block, team_matches};

/// Cap on the volatility index; it is a scaled CV, not a probability.
pub const VOLATILITY_CAP_PERCENT: f64 = 150.0;
pub const MIN_VOLATILITY_SAMPLE: usize = 2;

/// Spread of a team's goals scored and conceded per match.
///
/// With fewer than [`MIN_VOLATILITY_SAMPLE`] matches every figure is zero; `sample_size`
/// tells that case apart from a team with identical scores every game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolatilityStats {
    pub volatility_percent: f64,
    pub mean_scored: f64,
    pub std_dev_scored: f64,
    pub scored_cv: f64,
    pub mean_conceded: f64,
    pub std_dev_conceded: f64,
    pub conceded_cv: f64,
    pub sample_size: usize,
}

impl VolatilityStats {
    pub fn has_sample(&self) -> bool {
        self.sample_size >= MIN_VOLATILITY_SAMPLE
    }

    pub fn avg_total_goals(&self) -> f64 {
        self.mean_scored + self.mean_conceded
    }

    fn spread(&self) -> f64 {
        self.std_dev_scored + self.std_dev_conceded
    }
}

/// Both sides combined, for a fixture-level read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatchVolatility {
    pub combined_percent: f64,
    pub home_avg_total: f64,
    pub away_avg_total: f64,
    pub match_avg_total: f64,
    pub range_low: f64,
    pub range_high: f64,
}

/// Sample mean and sample standard deviation (n - 1).
pub fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

pub fn coefficient_of_variation(mean: f64, std_dev: f64) -> f64 {
    if mean > 0.0 { std_dev / mean } else { 0.0 }
}

pub fn compute_volatility(matches: &[TeamMatch]) -> VolatilityStats {
    if matches.len() < MIN_VOLATILITY_SAMPLE {
        return VolatilityStats {
            sample_size: matches.len(),
            ..VolatilityStats::default()
        };
    }
    let scored: Vec<f64> = matches.iter().map(|m| f64::from(m.scored)).collect();
    let conceded: Vec<f64> = matches.iter().map(|m| f64::from(m.conceded)).collect();

    let (mean_scored, std_dev_scored) = mean_and_std_dev(&scored);
    let (mean_conceded, std_dev_conceded) = mean_and_std_dev(&conceded);
    let scored_cv = coefficient_of_variation(mean_scored, std_dev_scored);
    let conceded_cv = coefficient_of_variation(mean_conceded, std_dev_conceded);
    let avg_cv = (scored_cv + conceded_cv) / 2.0;

    VolatilityStats {
        volatility_percent: (avg_cv * 100.0).min(VOLATILITY_CAP_PERCENT),
        mean_scored,
        std_dev_scored,
        scored_cv,
        mean_conceded,
        std_dev_conceded,
        conceded_cv,
        sample_size: matches.len(),
    }
}

/// Parse a results list and compute volatility for `team`.
pub fn parse_volatility(raw: &str, team: &str, venue: VenueFilter) -> VolatilityStats {
    if raw.trim().is_empty() || team.trim().is_empty() {
        return VolatilityStats::default();
    }
    let records = parse_results_block(raw);
    compute_volatility(&team_matches(&records, team, venue))
}

pub fn match_volatility(home: &VolatilityStats, away: &VolatilityStats) -> MatchVolatility {
    let home_avg_total = home.avg_total_goals();
    let away_avg_total = away.avg_total_goals();

    let home_low = (home_avg_total - home.spread()).max(0.0);
    let home_high = home_avg_total + home.spread();
    let away_low = (away_avg_total - away.spread()).max(0.0);
    let away_high = away_avg_total + away.spread();

    MatchVolatility {
        combined_percent: (home.volatility_percent + away.volatility_percent) / 2.0,
        home_avg_total,
        away_avg_total,
        match_avg_total: (home_avg_total + away_avg_total) / 2.0,
        range_low: (home_low + away_low) / 2.0,
        range_high: (home_high + away_high) / 2.0,
    }
}
