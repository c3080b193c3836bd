//! Text handed to the generation API: the raw blocks, and the parsed figures the model is
//! told to trust over its own reading of them.
//!
//! Ratios and means render with 2 decimals, percentages as whole numbers.

use std::fmt::Write;

use crate::analysis::{Analysis, ProfileInputs};
use crate::segments::SeriesSide;

const MISSING: &str = "N/A";

fn or_missing(block: &str) -> &str {
    let trimmed = block.trim();
    if trimmed.is_empty() { MISSING } else { trimmed }
}

/// The blocks the follow-up and key-content requests send alongside the report.
pub fn raw_data_block(inputs: &ProfileInputs) -> String {
    let rows = [
        ("PPG Block", &inputs.ppg_block),
        ("Index Block", &inputs.index_block),
        ("Home 5-Min", &inputs.home_five_min_block),
        ("Away 5-Min", &inputs.away_five_min_block),
        ("Overall Stats", &inputs.overall_stats_block),
        ("At Venue Stats", &inputs.at_venue_stats_block),
    ];
    let mut out = String::new();
    for (name, block) in rows {
        let _ = writeln!(out, "{name}: {}", or_missing(block));
    }
    out
}

/// Every pasted block, headed by the fixture.
pub fn stats_query(inputs: &ProfileInputs) -> String {
    let home = or_default_team(&inputs.team_a, "Home Team");
    let away = or_default_team(&inputs.team_b, "Away Team");
    let mut out = format!("Analyze the upcoming match: **{home} vs {away}**.\n\n");
    out.push_str(&raw_data_block(inputs));
    let _ = writeln!(out, "League Table: {}", or_missing(&inputs.league_table_block));
    let _ = writeln!(
        out,
        "Home Raw Results: {}",
        or_missing(&inputs.home_results_block)
    );
    let _ = writeln!(
        out,
        "Away Raw Results: {}",
        or_missing(&inputs.away_results_block)
    );
    out
}

pub fn verified_stats_context(a: &Analysis) -> String {
    let hv = &a.at_venue.home;
    let av = &a.at_venue.away;
    let half = &a.half;

    let mut out = String::from("**VERIFIED PARSED STATS (USE THESE VALUES, THEY ARE CORRECT):**\n");
    let lines = [
        format!("Home Scoring Rate (H@H): {:.2}", hv.scoring_rate),
        format!("Away Scoring Rate (A@A): {:.2}", av.scoring_rate),
        format!("Home Conceding Rate (H@H): {:.2}", hv.conceding_rate),
        format!("Away Conceding Rate (A@A): {:.2}", av.conceding_rate),
        format!("Home Games with FHG: {:.0}%", hv.fhg_pct),
        format!("Home Games with SHG: {:.0}%", hv.shg_pct),
        format!("Away Games with FHG: {:.0}%", av.fhg_pct),
        format!("Away Games with SHG: {:.0}%", av.shg_pct),
        format!("Home PPG Bias: {:.2}", a.ppg.home.ppg_bias),
        format!("Away PPG Bias: {:.2}", a.ppg.away.ppg_bias),
        format!(
            "Home 1st Half Goals (H@H 0.5+): {:.0}%",
            half.home_scored.first_half_over05
        ),
        format!(
            "Home Goals Breakdown (1st Half %): {:.0}%",
            half.home_scored.first_half_goal_pct
        ),
        format!(
            "Home Conceded 1st Half (H@H 0.5+): {:.0}%",
            half.home_conceded.first_half_over05
        ),
        format!(
            "Home Goals Conceded Breakdown (1st Half %): {:.0}%",
            half.home_conceded.first_half_goal_pct
        ),
    ];
    for line in lines {
        let _ = writeln!(out, "- {line}");
    }
    out
}

/// Figures only this crate derives (late goals, form windows, volatility, resilience).
pub fn derived_summary(a: &Analysis) -> String {
    let seg = &a.segments;
    let home_late = seg.late(SeriesSide::Home);
    let away_late = seg.late(SeriesSide::Away);
    let mv = &a.match_volatility;
    let res = &a.resilience;

    let mut out = String::from("**DERIVED FIGURES:**\n");
    let _ = writeln!(
        out,
        "- {} 76-90 at home: scored {}, conceded {}",
        a.home_team, home_late.scored, home_late.conceded
    );
    let _ = writeln!(
        out,
        "- {} 76-90 away: scored {}, conceded {}",
        a.away_team, away_late.scored, away_late.conceded
    );
    for (team, form) in [(&a.home_team, &a.home_form), (&a.away_team, &a.away_form)] {
        let _ = writeln!(
            out,
            "- {team} results PPG L4 {:.2} / L8 {:.2} / L12 {:.2} ({} games)",
            form.ppg_l4, form.ppg_l8, form.ppg_l12, form.games_found
        );
    }
    for (team, vol) in [
        (&a.home_team, &a.home_volatility),
        (&a.away_team, &a.away_volatility),
    ] {
        if vol.has_sample() {
            let _ = writeln!(
                out,
                "- {team} volatility {:.0}% (scored {:.2} ± {:.2}, conceded {:.2} ± {:.2}, {} games)",
                vol.volatility_percent,
                vol.mean_scored,
                vol.std_dev_scored,
                vol.mean_conceded,
                vol.std_dev_conceded,
                vol.sample_size
            );
        }
    }
    if a.home_volatility.has_sample() || a.away_volatility.has_sample() {
        let _ = writeln!(
            out,
            "- Match volatility {:.0}%, expected goals {:.2} (range {:.2}-{:.2})",
            mv.combined_percent, mv.match_avg_total, mv.range_low, mv.range_high
        );
    }
    let _ = writeln!(
        out,
        "- Resilience: {} comeback {:.0}% / dropped {:.0}%, {} comeback {:.0}% / dropped {:.0}%",
        a.home_team,
        res.home_comeback,
        res.home_dropped,
        a.away_team,
        res.away_comeback,
        res.away_dropped
    );
    if !a.league.teams.is_empty() {
        let _ = writeln!(
            out,
            "- League averages: GF {:.2} / GA {:.2} per game ({} teams)",
            a.league.avg_gf,
            a.league.avg_ga,
            a.league.team_count()
        );
    }
    out
}

/// Main report request: stats, parsed figures, then the team news fetched beforehand.
pub fn profile_query(inputs: &ProfileInputs, analysis: &Analysis, news: &str) -> String {
    let mut out = stats_query(inputs);
    out.push_str("\n---\n");
    out.push_str(&verified_stats_context(analysis));
    out.push_str(&derived_summary(analysis));
    out.push_str("---\n");
    out.push_str("**CRITICAL REAL-TIME CONTEXT (You MUST use this to guide your analysis):**\n");
    out.push_str(or_missing(news));
    out.push_str("\n---\n");
    out
}

pub fn follow_up_query(question: &str, context: &str) -> String {
    format!(
        "---\n**MY ORIGINAL PROPRIETARY DATA (FOR YOUR REFERENCE):**\n---\n{}\n---\n**MY FOLLOW-UP QUESTION:**\n\"{}\"\n",
        context.trim(),
        question.trim()
    )
}

/// Learnings / charts / visualisations requests: raw data first, then the report.
pub fn key_content_query(report: &str, raw_data: &str) -> String {
    format!(
        "---\n**MY ORIGINAL PROPRIETARY DATA (FOR YOUR REFERENCE):**\n---\n{}\n---\n**THE DETAILED ANALYSIS I JUST READ (YOUR PRIMARY CONTEXT):**\n---\n{}\n",
        raw_data.trim(),
        report.trim()
    )
}

pub fn team_news_query(team_a: &str, team_b: &str) -> String {
    format!("Get team news for {} vs {}", team_a.trim(), team_b.trim())
}

fn or_default_team<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = name.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}
