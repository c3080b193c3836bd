//! One pass from the pasted blocks to every derived figure.

use serde::{Deserialize, Serialize};

use crate::form::{FormTrendPoint, FormWindows, form_trend, parse_form};
use crate::half_data::{HalfSections, HalfSplitStats, parse_half_sections, parse_half_split_stats};
use crate::index_block::{IndexBlock, parse_index_block};
use crate::league_table::{LeagueQuadrant, parse_league_table};
use crate::ppg_block::{PpgBlock, label_or, parse_ppg_block};
use crate::resilience::{ResilienceStats, parse_resilience};
use crate::results::VenueFilter;
use crate::segments::{SegmentSeries, parse_five_minute_blocks};
use crate::venue_block::{VenueComparisonRow, VenueStats, parse_venue_stats, venue_comparison};
use crate::volatility::{MatchVolatility, VolatilityStats, match_volatility, parse_volatility};

/// The raw text blocks as pasted. Older saves use camelCase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInputs {
    #[serde(alias = "teamA")]
    pub team_a: String,
    #[serde(alias = "teamB")]
    pub team_b: String,
    #[serde(alias = "ppgBlock")]
    pub ppg_block: String,
    #[serde(alias = "indexBlock")]
    pub index_block: String,
    #[serde(alias = "homeFiveMinSegmentBlock")]
    pub home_five_min_block: String,
    #[serde(alias = "awayFiveMinSegmentBlock")]
    pub away_five_min_block: String,
    #[serde(alias = "halfDataScoredBlock")]
    pub half_scored_block: String,
    #[serde(alias = "halfDataConcededBlock")]
    pub half_conceded_block: String,
    #[serde(alias = "overallStats")]
    pub overall_stats_block: String,
    #[serde(alias = "atVenueStats")]
    pub at_venue_stats_block: String,
    #[serde(alias = "leagueTable")]
    pub league_table_block: String,
    #[serde(alias = "homeRawResults")]
    pub home_results_block: String,
    #[serde(alias = "awayRawResults")]
    pub away_results_block: String,
}

impl ProfileInputs {
    pub fn is_empty(&self) -> bool {
        self.blocks().iter().all(|(_, b)| b.trim().is_empty())
    }

    /// Named text blocks, team names excluded.
    pub fn blocks(&self) -> [(&'static str, &str); 11] {
        [
            ("PPG", self.ppg_block.as_str()),
            ("Index", self.index_block.as_str()),
            ("Home 5-min segments", self.home_five_min_block.as_str()),
            ("Away 5-min segments", self.away_five_min_block.as_str()),
            ("Half data (scored)", self.half_scored_block.as_str()),
            ("Half data (conceded)", self.half_conceded_block.as_str()),
            ("Overall stats", self.overall_stats_block.as_str()),
            ("At-venue stats", self.at_venue_stats_block.as_str()),
            ("League table", self.league_table_block.as_str()),
            ("Home raw results", self.home_results_block.as_str()),
            ("Away raw results", self.away_results_block.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub home_team: String,
    pub away_team: String,
    pub ppg: PpgBlock,
    pub index: IndexBlock,
    pub overall: VenueStats,
    pub at_venue: VenueStats,
    pub venue_rows: Vec<VenueComparisonRow>,
    pub segments: SegmentSeries,
    pub half_scored_sections: HalfSections,
    pub half_conceded_sections: HalfSections,
    pub half: HalfSplitStats,
    pub league: LeagueQuadrant,
    pub home_form: FormWindows,
    pub away_form: FormWindows,
    pub form_trend: Vec<FormTrendPoint>,
    pub home_volatility: VolatilityStats,
    pub away_volatility: VolatilityStats,
    pub match_volatility: MatchVolatility,
    pub resilience: ResilienceStats,
}

impl Analysis {
    /// Pure and total: missing or malformed blocks yield zeroed figures, never an error.
    /// The home team is read from the home side of its results, the away team from the away
    /// side of its results.
    pub fn from_inputs(inputs: &ProfileInputs) -> Self {
        let team_a = inputs.team_a.trim();
        let team_b = inputs.team_b.trim();

        let ppg = parse_ppg_block(&inputs.ppg_block, team_a, team_b);
        let overall = parse_venue_stats(&inputs.overall_stats_block);
        let at_venue = parse_venue_stats(&inputs.at_venue_stats_block);

        let home_form = parse_form(&inputs.home_results_block, team_a, VenueFilter::Home);
        let away_form = parse_form(&inputs.away_results_block, team_b, VenueFilter::Away);
        let trend = vec![
            form_trend(&ppg.home.team_label, home_form, &ppg.home),
            form_trend(&ppg.away.team_label, away_form, &ppg.away),
        ];

        let home_volatility =
            parse_volatility(&inputs.home_results_block, team_a, VenueFilter::Home);
        let away_volatility =
            parse_volatility(&inputs.away_results_block, team_b, VenueFilter::Away);

        Self {
            home_team: label_or(team_a, "Home"),
            away_team: label_or(team_b, "Away"),
            index: parse_index_block(&inputs.index_block),
            venue_rows: venue_comparison(&overall, &at_venue),
            overall,
            at_venue,
            segments: parse_five_minute_blocks(
                &inputs.home_five_min_block,
                &inputs.away_five_min_block,
            ),
            half_scored_sections: parse_half_sections(&inputs.half_scored_block),
            half_conceded_sections: parse_half_sections(&inputs.half_conceded_block),
            half: parse_half_split_stats(&inputs.half_scored_block, &inputs.half_conceded_block),
            league: parse_league_table(&inputs.league_table_block, team_a, team_b),
            home_form,
            away_form,
            form_trend: trend,
            match_volatility: match_volatility(&home_volatility, &away_volatility),
            home_volatility,
            away_volatility,
            resilience: parse_resilience(
                &inputs.home_results_block,
                &inputs.away_results_block,
                team_a,
                team_b,
            ),
            ppg,
        }
    }
}
