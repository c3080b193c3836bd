//! Threshold rules over the derived figures.
//!
//! Every rule names the inputs it reads; a rule whose inputs are all zero (block missing or
//! empty) is skipped, so an empty profile produces no flags at any threshold. Goal Edge is the
//! exception: it is available only when its row was pasted, and then a 0.00 edge still counts.

use serde::Serialize;

use crate::analysis::Analysis;
use crate::config::FlagThresholds;
use crate::segments::SeriesSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Good,
    Bad,
    Alert,
    Clash,
}

impl FlagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::Good => "good",
            FlagKind::Bad => "bad",
            FlagKind::Alert => "alert",
            FlagKind::Clash => "clash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticalFlag {
    pub id: &'static str,
    pub kind: FlagKind,
    pub title: &'static str,
    pub description: String,
}

struct Rule {
    id: &'static str,
    kind: FlagKind,
    title: &'static str,
    available: bool,
    fires: bool,
    description: String,
}

/// Flags in rule order. Deterministic for a given analysis and thresholds.
pub fn evaluate_flags(analysis: &Analysis, t: &FlagThresholds) -> Vec<AnalyticalFlag> {
    rules(analysis, t)
        .into_iter()
        .filter(|r| r.available && r.fires)
        .map(|r| AnalyticalFlag {
            id: r.id,
            kind: r.kind,
            title: r.title,
            description: r.description,
        })
        .collect()
}

fn any_set(inputs: &[f64]) -> bool {
    inputs.iter().any(|v| *v != 0.0)
}

fn rules(a: &Analysis, t: &FlagThresholds) -> Vec<Rule> {
    let venue = &a.at_venue;
    let (hv, av) = (&venue.home, &venue.away);
    let ppg = &a.ppg;
    let idx = &a.index.snapshot;
    let res = &a.resilience;

    let home_late = a.segments.late(SeriesSide::Home);
    let away_late = a.segments.late(SeriesSide::Away);
    let home_scored_2h = a.half.home_scored.second_half_goal_pct;
    let away_conceded_2h = a.half.away_conceded.second_half_goal_pct;

    let (home_scored_late, home_conceded_late) =
        (f64::from(home_late.scored), f64::from(home_late.conceded));
    let (away_scored_late, away_conceded_late) =
        (f64::from(away_late.scored), f64::from(away_late.conceded));

    let mv = &a.match_volatility;
    let volatility_sampled = a.home_volatility.has_sample() || a.away_volatility.has_sample();

    vec![
        Rule {
            id: "fts-htc",
            kind: FlagKind::Good,
            title: "Home Fast Start",
            available: any_set(&[hv.first_to_score_pct, av.first_to_concede_pct]),
            fires: hv.first_to_score_pct > t.fts && av.first_to_concede_pct > t.fts,
            description: format!(
                "Home scores first ({:.0}%) vs. Away concedes first ({:.0}%) at venue.",
                hv.first_to_score_pct, av.first_to_concede_pct
            ),
        },
        Rule {
            id: "fts-atc",
            kind: FlagKind::Good,
            title: "Away Fast Start",
            available: any_set(&[av.first_to_score_pct, hv.first_to_concede_pct]),
            fires: av.first_to_score_pct > t.fts && hv.first_to_concede_pct > t.fts,
            description: format!(
                "Away scores first ({:.0}%) vs. Home concedes first ({:.0}%) at venue.",
                av.first_to_score_pct, hv.first_to_concede_pct
            ),
        },
        Rule {
            id: "ppg-bias-home",
            kind: FlagKind::Good,
            title: "Home Form",
            available: any_set(&[ppg.home.ppg_bias]),
            fires: ppg.home.ppg_bias > t.bias,
            description: format!(
                "Home PPG Bias is high ({:+.2}): recent form is running ahead of the schedule.",
                ppg.home.ppg_bias
            ),
        },
        Rule {
            id: "ppg-bias-away",
            kind: FlagKind::Bad,
            title: "Away Form",
            available: any_set(&[ppg.away.ppg_bias]),
            fires: ppg.away.ppg_bias < -t.bias,
            description: format!(
                "Away PPG Bias is low ({:.2}): recent form is running behind the schedule.",
                ppg.away.ppg_bias
            ),
        },
        Rule {
            id: "hva-home",
            kind: FlagKind::Good,
            title: "Home Index Advantage",
            available: any_set(&[idx.home_vs_away]),
            fires: idx.home_vs_away < t.hva,
            description: format!(
                "H v A index ({:.2}) strongly favours the home side.",
                idx.home_vs_away
            ),
        },
        Rule {
            id: "hva-away",
            kind: FlagKind::Good,
            title: "Away Index Advantage",
            available: any_set(&[idx.home_vs_away]),
            fires: idx.home_vs_away > -t.hva,
            description: format!("H v A index ({:.2}) favours the away side.", idx.home_vs_away),
        },
        Rule {
            id: "late-home-goal",
            kind: FlagKind::Alert,
            title: "Late Home Goal Threat",
            available: any_set(&[home_scored_late, away_conceded_late]),
            fires: home_scored_late > t.late_goal && away_conceded_late > t.late_goal,
            description: format!(
                "Home scores late ({home_scored_late:.0} goals, 76-90) vs. Away concedes late ({away_conceded_late:.0} goals)."
            ),
        },
        Rule {
            id: "late-away-goal",
            kind: FlagKind::Alert,
            title: "Late Away Goal Threat",
            available: any_set(&[away_scored_late, home_conceded_late]),
            fires: away_scored_late > t.late_goal && home_conceded_late > t.late_goal,
            description: format!(
                "Away scores late ({away_scored_late:.0} goals, 76-90) vs. Home concedes late ({home_conceded_late:.0} goals)."
            ),
        },
        Rule {
            id: "res-home",
            kind: FlagKind::Alert,
            title: "Home Resilience",
            available: any_set(&[res.home_comeback]),
            fires: res.home_comeback > t.resilience,
            description: format!(
                "Home avoids defeat after trailing at half-time in {:.0}% of games.",
                res.home_comeback
            ),
        },
        Rule {
            id: "res-away-drop",
            kind: FlagKind::Bad,
            title: "Away Drops Points",
            available: any_set(&[res.away_dropped]),
            fires: res.away_dropped > t.resilience,
            description: format!(
                "Away fails to win after leading at half-time in {:.0}% of games.",
                res.away_dropped
            ),
        },
        Rule {
            id: "half-skew",
            kind: FlagKind::Alert,
            title: "2nd Half Action",
            available: any_set(&[home_scored_2h, away_conceded_2h]),
            fires: home_scored_2h > t.half_skew && away_conceded_2h > t.half_skew,
            description: format!(
                "Home scores {home_scored_2h:.0}% of its goals in the 2nd half; Away concedes {away_conceded_2h:.0}% of its goals in the 2nd half."
            ),
        },
        Rule {
            id: "mismatch-home-atk",
            kind: FlagKind::Good,
            title: "Home Offensive Mismatch",
            available: any_set(&[idx.home_offence, idx.away_defence]),
            fires: idx.home_offence < t.index && idx.away_defence > t.index,
            description: format!(
                "Home Offence index ({:.2}) meets Away Defence index ({:.2}).",
                idx.home_offence, idx.away_defence
            ),
        },
        Rule {
            id: "mismatch-home-struggle",
            kind: FlagKind::Bad,
            title: "Home Offensive Struggle",
            available: any_set(&[idx.home_offence, idx.away_defence]),
            fires: idx.home_offence > t.index && idx.away_defence < t.index,
            description: format!(
                "Home Offence index ({:.2}) faces Away Defence index ({:.2}).",
                idx.home_offence, idx.away_defence
            ),
        },
        Rule {
            id: "mismatch-away-atk",
            kind: FlagKind::Good,
            title: "Away Offensive Mismatch",
            available: any_set(&[idx.away_offence, idx.home_defence]),
            fires: idx.away_offence < t.index && idx.home_defence > t.index,
            description: format!(
                "Away Offence index ({:.2}) meets Home Defence index ({:.2}).",
                idx.away_offence, idx.home_defence
            ),
        },
        Rule {
            id: "mismatch-away-struggle",
            kind: FlagKind::Bad,
            title: "Away Offensive Struggle",
            available: any_set(&[idx.away_offence, idx.home_defence]),
            fires: idx.away_offence > t.index && idx.home_defence < t.index,
            description: format!(
                "Away Offence index ({:.2}) faces Home Defence index ({:.2}).",
                idx.away_offence, idx.home_defence
            ),
        },
        Rule {
            id: "cs-home",
            kind: FlagKind::Good,
            title: "Home Defensive Solidity",
            available: any_set(&[hv.clean_sheet_pct, av.scoring_rate]),
            fires: hv.clean_sheet_pct > t.clean_sheet && av.scoring_rate < t.scoring_rate,
            description: format!(
                "Home keeps clean sheets in {:.0}% of games while Away scores in only {:.0}%.",
                hv.clean_sheet_pct, av.scoring_rate
            ),
        },
        Rule {
            id: "cs-away",
            kind: FlagKind::Good,
            title: "Away Defensive Solidity",
            available: any_set(&[av.clean_sheet_pct, hv.scoring_rate]),
            fires: av.clean_sheet_pct > t.clean_sheet && hv.scoring_rate < t.scoring_rate,
            description: format!(
                "Away keeps clean sheets in {:.0}% of games while Home scores in only {:.0}%.",
                av.clean_sheet_pct, hv.scoring_rate
            ),
        },
        Rule {
            id: "fhg-action",
            kind: FlagKind::Alert,
            title: "High FHG Action",
            available: any_set(&[hv.fhg_pct, av.fhg_pct]),
            fires: hv.fhg_pct > t.fhg && av.fhg_pct > t.fhg,
            description: format!(
                "Both sides see a first-half goal in most games (Home: {:.0}%, Away: {:.0}%).",
                hv.fhg_pct, av.fhg_pct
            ),
        },
        Rule {
            id: "goal-edge",
            kind: FlagKind::Alert,
            title: "Goal Edge Alert",
            available: a.index.has_goal_edge,
            fires: idx.goal_edge.abs() < t.goal_edge,
            description: format!(
                "Goal Edge is {:.2}, close to zero: high potential for goals.",
                idx.goal_edge
            ),
        },
        Rule {
            id: "res-clash-comeback",
            kind: FlagKind::Clash,
            title: "Resilient Teams Clash",
            available: any_set(&[res.home_comeback, res.away_comeback]),
            fires: res.home_comeback > t.resilience && res.away_comeback > t.resilience,
            description: format!(
                "Both sides avoid defeat after trailing at half-time in over {:.0}% of games.",
                t.resilience
            ),
        },
        Rule {
            id: "res-clash-brittle",
            kind: FlagKind::Clash,
            title: "Brittle Leads",
            available: any_set(&[res.home_dropped, res.away_dropped]),
            fires: res.home_dropped > t.resilience && res.away_dropped > t.resilience,
            description: format!(
                "Both sides fail to win from a half-time lead in over {:.0}% of games.",
                t.resilience
            ),
        },
        Rule {
            id: "volatile-match",
            kind: FlagKind::Alert,
            title: "Volatile Match",
            available: volatility_sampled
                && any_set(&[mv.combined_percent, mv.match_avg_total]),
            fires: mv.combined_percent >= t.volatility,
            description: format!(
                "Combined volatility is {:.0}%; expected total goals {:.2} (range {:.2}-{:.2}).",
                mv.combined_percent, mv.match_avg_total, mv.range_low, mv.range_high
            ),
        },
    ]
}
