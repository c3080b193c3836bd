//! "Overall" and "At Venue" stat tables: `Stat  Home  Away` rows.

use serde::Serialize;

use crate::fields::{ColumnPick, Label, lookup};

const PPG: Label<'static> = Label::exact("PPG").excluding(&["Opp PPG", "PPG L8", "PPG Bias"]);
const FIRST_TO_SCORE: Label<'static> = Label::prefix("First to score (%)");
const FIRST_TO_CONCEDE: Label<'static> = Label::prefix("First to concede (%)");
const FHG: Label<'static> = Label::prefix("Games with a FHG (%)");
const SHG: Label<'static> = Label::prefix("Games with a SHG (%)");
const CLEAN_SHEETS: Label<'static> = Label::prefix("Clean sheets (%)");
const SCORING_RATE: Label<'static> = Label::prefix("Scoring Rate").excluding(&["L8", "Half"]);
const CONCEDING_RATE: Label<'static> =
    Label::prefix("Conceding Rate").excluding(&["L8", "Half"]);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SideVenueStats {
    pub ppg: f64,
    pub first_to_score_pct: f64,
    pub first_to_concede_pct: f64,
    pub fhg_pct: f64,
    pub shg_pct: f64,
    pub clean_sheet_pct: f64,
    pub scoring_rate: f64,
    pub conceding_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VenueStats {
    pub home: SideVenueStats,
    pub away: SideVenueStats,
}

/// One stat as seen in the overall table and in the at-venue table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueComparisonRow {
    pub stat: &'static str,
    pub home_overall: f64,
    pub home_venue: f64,
    pub away_overall: f64,
    pub away_venue: f64,
}

pub fn parse_venue_stats(raw: &str) -> VenueStats {
    if raw.trim().is_empty() {
        return VenueStats::default();
    }
    let pair = |label| lookup::<2>(raw, label, ColumnPick::Leading, 3);

    let [h_ppg, a_ppg] = pair(PPG);
    let [h_fts, a_fts] = pair(FIRST_TO_SCORE);
    let [h_ftc, a_ftc] = pair(FIRST_TO_CONCEDE);
    let [h_fhg, a_fhg] = pair(FHG);
    let [h_shg, a_shg] = pair(SHG);
    let [h_cs, a_cs] = pair(CLEAN_SHEETS);
    let [h_sr, a_sr] = pair(SCORING_RATE);
    let [h_cr, a_cr] = pair(CONCEDING_RATE);

    VenueStats {
        home: SideVenueStats {
            ppg: h_ppg,
            first_to_score_pct: h_fts,
            first_to_concede_pct: h_ftc,
            fhg_pct: h_fhg,
            shg_pct: h_shg,
            clean_sheet_pct: h_cs,
            scoring_rate: h_sr,
            conceding_rate: h_cr,
        },
        away: SideVenueStats {
            ppg: a_ppg,
            first_to_score_pct: a_fts,
            first_to_concede_pct: a_ftc,
            fhg_pct: a_fhg,
            shg_pct: a_shg,
            clean_sheet_pct: a_cs,
            scoring_rate: a_sr,
            conceding_rate: a_cr,
        },
    }
}

pub fn venue_comparison(overall: &VenueStats, venue: &VenueStats) -> Vec<VenueComparisonRow> {
    let stats: [(&'static str, fn(&SideVenueStats) -> f64); 5] = [
        ("PPG", |s| s.ppg),
        ("Scoring Rate", |s| s.scoring_rate),
        ("Conceding Rate", |s| s.conceding_rate),
        ("Clean sheets (%)", |s| s.clean_sheet_pct),
        ("Games with a FHG (%)", |s| s.fhg_pct),
    ];
    stats
        .into_iter()
        .map(|(stat, get)| VenueComparisonRow {
            stat,
            home_overall: get(&overall.home),
            home_venue: get(&venue.home),
            away_overall: get(&overall.away),
            away_venue: get(&venue.away),
        })
        .collect()
}
