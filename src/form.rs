use serde::Serialize;

use crate::ppg_block::PpgSnapshot;
use crate::results::{TeamMatch, VenueFilter, parse_results_block, team_matches};

/// Points per game over the most recent 4 / 8 / 12 matches of a results list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FormWindows {
    pub ppg_l4: f64,
    pub ppg_l8: f64,
    pub ppg_l12: f64,
    pub games_found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormTrendPoint {
    pub label: String,
    pub raw_l4: f64,
    pub raw_l8: f64,
    pub raw_l12: f64,
    pub stats_l8: f64,
    pub stats_season: f64,
}

/// Results lists are pasted most recent first, so windows take from the front.
pub fn form_windows(matches: &[TeamMatch]) -> FormWindows {
    let points: Vec<u32> = matches.iter().map(TeamMatch::points).collect();
    FormWindows {
        ppg_l4: window_ppg(&points, 4),
        ppg_l8: window_ppg(&points, 8),
        ppg_l12: window_ppg(&points, 12),
        games_found: points.len(),
    }
}

pub fn parse_form(raw: &str, team: &str, venue: VenueFilter) -> FormWindows {
    if raw.trim().is_empty() || team.trim().is_empty() {
        return FormWindows::default();
    }
    let records = parse_results_block(raw);
    form_windows(&team_matches(&records, team, venue))
}

/// Raw-results windows next to the PPG block's own L8 and season figures.
pub fn form_trend(label: &str, raw: FormWindows, stats: &PpgSnapshot) -> FormTrendPoint {
    FormTrendPoint {
        label: label.to_string(),
        raw_l4: raw.ppg_l4,
        raw_l8: raw.ppg_l8,
        raw_l12: raw.ppg_l12,
        stats_l8: stats.last8_ppg,
        stats_season: stats.season_ppg,
    }
}

fn window_ppg(points: &[u32], n: usize) -> f64 {
    let window = &points[..points.len().min(n)];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<u32>() as f64 / window.len() as f64
}
