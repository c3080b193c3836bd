use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis::Analysis;
use crate::flags::AnalyticalFlag;
use crate::half_data::HalfSplit;
use crate::ppg_block::PpgSnapshot;
use crate::results::TeamSide;
use crate::segments::SeriesSide;
use crate::venue_block::SideVenueStats;
use crate::volatility::VolatilityStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub sheets: usize,
    pub segment_rows: usize,
    pub league_rows: usize,
    pub flags: usize,
}

pub fn export_analysis(
    path: &Path,
    analysis: &Analysis,
    flags: &[AnalyticalFlag],
) -> Result<ExportReport> {
    let sheets: Vec<(&str, Vec<Vec<String>>)> = vec![
        ("PPG", ppg_rows(analysis)),
        ("Index", index_rows(analysis)),
        ("Venue", venue_rows(analysis)),
        ("Segments", segment_rows(analysis)),
        ("Halves", half_rows(analysis)),
        ("Form", form_rows(analysis)),
        ("League", league_rows(analysis)),
        ("Flags", flag_rows(flags)),
    ];

    let mut workbook = Workbook::new();
    for (name, rows) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_rows(sheet, rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: sheets.len(),
        segment_rows: analysis.segments.segments.len(),
        league_rows: analysis.league.teams.len(),
        flags: flags.len(),
    })
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn ratio(v: f64) -> String {
    format!("{v:.2}")
}

fn pct(v: f64) -> String {
    format!("{v:.0}")
}

fn ppg_rows(a: &Analysis) -> Vec<Vec<String>> {
    let row = |s: &PpgSnapshot| {
        vec![
            s.team_label.clone(),
            ratio(s.season_ppg),
            ratio(s.last8_ppg),
            ratio(s.opponent_last8_ppg),
            ratio(s.ppg_bias),
        ]
    };
    vec![
        header(&["Team", "PPG", "PPG L8", "Opp PPG L8", "PPG Bias"]),
        row(&a.ppg.home),
        row(&a.ppg.away),
    ]
}

fn index_rows(a: &Analysis) -> Vec<Vec<String>> {
    let idx = &a.index.snapshot;
    vec![
        header(&["Index", "Home", "Away"]),
        vec!["Offence".to_string(), ratio(idx.home_offence), ratio(idx.away_offence)],
        vec!["Defence".to_string(), ratio(idx.home_defence), ratio(idx.away_defence)],
        vec!["H v A".to_string(), ratio(idx.home_vs_away), String::new()],
        vec!["Goal Edge".to_string(), ratio(idx.goal_edge), String::new()],
    ]
}

fn venue_rows(a: &Analysis) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Stat",
        "Home overall",
        "Home at venue",
        "Away overall",
        "Away at venue",
    ])];
    for r in &a.venue_rows {
        rows.push(vec![
            r.stat.to_string(),
            ratio(r.home_overall),
            ratio(r.home_venue),
            ratio(r.away_overall),
            ratio(r.away_venue),
        ]);
    }
    let side = |label: &str, s: &SideVenueStats| {
        vec![
            label.to_string(),
            pct(s.first_to_score_pct),
            pct(s.first_to_concede_pct),
            pct(s.fhg_pct),
            pct(s.shg_pct),
        ]
    };
    rows.push(Vec::new());
    rows.push(header(&["At venue", "FTS %", "FTC %", "FHG %", "SHG %"]));
    rows.push(side(a.home_team.as_str(), &a.at_venue.home));
    rows.push(side(a.away_team.as_str(), &a.at_venue.away));
    rows
}

fn segment_rows(a: &Analysis) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Minutes",
        "Home scored",
        "Home conceded",
        "Away scored",
        "Away conceded",
        "Home overall scored",
        "Home overall conceded",
        "Away overall scored",
        "Away overall conceded",
    ])];
    for seg in &a.segments.segments {
        rows.push(vec![
            seg.label.to_string(),
            seg.home.scored.to_string(),
            seg.home.conceded.to_string(),
            seg.away.scored.to_string(),
            seg.away.conceded.to_string(),
            seg.home_overall.scored.to_string(),
            seg.home_overall.conceded.to_string(),
            seg.away_overall.scored.to_string(),
            seg.away_overall.conceded.to_string(),
        ]);
    }
    let home_late = a.segments.late(SeriesSide::Home);
    let away_late = a.segments.late(SeriesSide::Away);
    rows.push(vec![
        "76-90".to_string(),
        home_late.scored.to_string(),
        home_late.conceded.to_string(),
        away_late.scored.to_string(),
        away_late.conceded.to_string(),
    ]);
    rows
}

fn half_rows(a: &Analysis) -> Vec<Vec<String>> {
    let row = |label: &str, h: &HalfSplit| {
        vec![
            label.to_string(),
            pct(h.first_half_over05),
            pct(h.first_half_over15),
            pct(h.second_half_over05),
            pct(h.second_half_over15),
            pct(h.first_half_goal_pct),
            pct(h.second_half_goal_pct),
        ]
    };
    vec![
        header(&[
            "Split",
            "1H 0.5+ %",
            "1H 1.5+ %",
            "2H 0.5+ %",
            "2H 1.5+ %",
            "1H goals %",
            "2H goals %",
        ]),
        row("Home scored", &a.half.home_scored),
        row("Home conceded", &a.half.home_conceded),
        row("Away scored", &a.half.away_scored),
        row("Away conceded", &a.half.away_conceded),
    ]
}

fn form_rows(a: &Analysis) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Team",
        "Results L4",
        "Results L8",
        "Results L12",
        "Stats L8",
        "Stats season",
    ])];
    for p in &a.form_trend {
        rows.push(vec![
            p.label.clone(),
            ratio(p.raw_l4),
            ratio(p.raw_l8),
            ratio(p.raw_l12),
            ratio(p.stats_l8),
            ratio(p.stats_season),
        ]);
    }

    let vol = |label: &str, v: &VolatilityStats| {
        vec![
            label.to_string(),
            pct(v.volatility_percent),
            ratio(v.mean_scored),
            ratio(v.std_dev_scored),
            ratio(v.mean_conceded),
            ratio(v.std_dev_conceded),
            v.sample_size.to_string(),
        ]
    };
    rows.push(Vec::new());
    rows.push(header(&[
        "Volatility",
        "Index %",
        "Mean scored",
        "SD scored",
        "Mean conceded",
        "SD conceded",
        "Games",
    ]));
    rows.push(vol(a.home_team.as_str(), &a.home_volatility));
    rows.push(vol(a.away_team.as_str(), &a.away_volatility));

    let mv = &a.match_volatility;
    rows.push(vec![
        "Match".to_string(),
        pct(mv.combined_percent),
        ratio(mv.match_avg_total),
        ratio(mv.range_low),
        ratio(mv.range_high),
    ]);

    let res = &a.resilience;
    rows.push(Vec::new());
    rows.push(header(&["Resilience", "Comeback %", "Dropped %"]));
    rows.push(vec![a.home_team.clone(), pct(res.home_comeback), pct(res.home_dropped)]);
    rows.push(vec![a.away_team.clone(), pct(res.away_comeback), pct(res.away_dropped)]);
    rows
}

fn league_rows(a: &Analysis) -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Team", "GP", "GF", "GA", "GF/G", "GA/G", "Fixture"])];
    for t in &a.league.teams {
        let fixture = match t.highlight {
            Some(TeamSide::Home) => "home",
            Some(TeamSide::Away) => "away",
            None => "",
        };
        rows.push(vec![
            t.name.clone(),
            t.games_played.to_string(),
            t.goals_for.to_string(),
            t.goals_against.to_string(),
            ratio(t.gf_per_game),
            ratio(t.ga_per_game),
            fixture.to_string(),
        ]);
    }
    rows.push(vec![
        "League average".to_string(),
        String::new(),
        String::new(),
        String::new(),
        ratio(a.league.avg_gf),
        ratio(a.league.avg_ga),
    ]);
    rows
}

fn flag_rows(flags: &[AnalyticalFlag]) -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Id", "Kind", "Title", "Description"])];
    for f in flags {
        rows.push(vec![
            f.id.to_string(),
            f.kind.as_str().to_string(),
            f.title.to_string(),
            f.description.clone(),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
