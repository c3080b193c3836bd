use std::fs;
use std::path::PathBuf;

use match_profiler::analysis::{Analysis, ProfileInputs};
use match_profiler::analysis_export::{ExportReport, export_analysis};
use match_profiler::config::FlagThresholds;
use match_profiler::flags::{FlagKind, evaluate_flags};
use match_profiler::raw_data::{derived_summary, profile_query, stats_query, verified_stats_context};
use match_profiler::resilience::parse_resilience;
use match_profiler::results::{TeamMatch, TeamSide};
use match_profiler::volatility::{compute_volatility, match_volatility, mean_and_std_dev};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_analysis() -> (ProfileInputs, Analysis) {
    let inputs: ProfileInputs =
        serde_json::from_str(&read_fixture("profile_inputs.json")).expect("fixture should parse");
    let analysis = Analysis::from_inputs(&inputs);
    (inputs, analysis)
}

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn ids(analysis: &Analysis, thresholds: &FlagThresholds) -> Vec<&'static str> {
    evaluate_flags(analysis, thresholds)
        .into_iter()
        .map(|f| f.id)
        .collect()
}

#[test]
fn empty_inputs_give_zeroed_analysis() {
    let analysis = Analysis::from_inputs(&ProfileInputs::default());
    assert_eq!(analysis.home_team, "Home");
    assert_eq!(analysis.away_team, "Away");
    assert_eq!(analysis.segments.segments.len(), 18);
    assert_eq!(analysis.home_form.games_found, 0);
    assert_eq!(analysis.home_volatility.sample_size, 0);
    assert_eq!(analysis.match_volatility.combined_percent, 0.0);
    assert_eq!(analysis.league.team_count(), 0);
    assert_eq!(analysis.form_trend.len(), 2);
}

#[test]
fn form_windows_use_the_venue_side_only() {
    let (_, a) = fixture_analysis();
    assert_eq!(a.home_form.games_found, 4);
    assert!(approx(a.home_form.ppg_l4, 1.5, 1e-9));
    assert_eq!(a.away_form.games_found, 3);
    assert!(approx(a.away_form.ppg_l8, 4.0 / 3.0, 1e-9));

    let trend = &a.form_trend[0];
    assert_eq!(trend.label, "Arsenal");
    assert!(approx(trend.stats_l8, 2.5, 1e-9));
    assert!(approx(trend.stats_season, 2.25, 1e-9));
}

#[test]
fn volatility_uses_sample_standard_deviation() {
    let (mean, sd) = mean_and_std_dev(&[3.0, 1.0, 2.0, 0.0]);
    assert!(approx(mean, 1.5, 1e-9));
    assert!(approx(sd, 1.290_994_448_7, 1e-6));

    let (_, a) = fixture_analysis();
    assert_eq!(a.home_volatility.sample_size, 4);
    assert!(approx(a.home_volatility.volatility_percent, 83.858, 1e-2));
    assert!(approx(a.away_volatility.volatility_percent, 107.282, 1e-2));

    let mv = a.match_volatility;
    assert!(approx(mv.combined_percent, 95.570, 1e-2));
    assert!(approx(mv.home_avg_total, 2.5, 1e-9));
    assert!(approx(mv.match_avg_total, 2.4167, 1e-3));
    assert!(approx(mv.range_low, 0.1963, 1e-3));
    assert!(approx(mv.range_high, 4.7342, 1e-3));
}

#[test]
fn volatility_needs_two_matches() {
    let one = [TeamMatch {
        side: TeamSide::Home,
        scored: 4,
        conceded: 0,
        half_time: None,
    }];
    let stats = compute_volatility(&one);
    assert_eq!(stats.sample_size, 1);
    assert!(!stats.has_sample());
    assert_eq!(stats.volatility_percent, 0.0);
    assert_eq!(stats.mean_scored, 0.0);
}

#[test]
fn identical_results_have_zero_spread() {
    let repeat = |scored, conceded| {
        vec![
            TeamMatch {
                side: TeamSide::Home,
                scored,
                conceded,
                half_time: None,
            };
            4
        ]
    };

    let steady = compute_volatility(&repeat(2, 1));
    assert!(steady.has_sample());
    assert_eq!(steady.std_dev_scored, 0.0);
    assert_eq!(steady.scored_cv, 0.0);
    assert_eq!(steady.conceded_cv, 0.0);
    assert_eq!(steady.volatility_percent, 0.0);
    assert!(approx(steady.mean_scored, 2.0, 1e-12));

    let goalless = compute_volatility(&repeat(0, 0));
    assert_eq!(goalless.scored_cv, 0.0);
    assert_eq!(goalless.volatility_percent, 0.0);

    let mv = match_volatility(&steady, &goalless);
    for value in [
        mv.combined_percent,
        mv.match_avg_total,
        mv.range_low,
        mv.range_high,
    ] {
        assert!(value.is_finite());
    }
    assert_eq!(mv.combined_percent, 0.0);
    assert!(approx(mv.range_low, 1.5, 1e-12));
    assert!(approx(mv.range_high, 1.5, 1e-12));
}

#[test]
fn volatility_is_capped() {
    let mut matches = vec![
        TeamMatch {
            side: TeamSide::Home,
            scored: 0,
            conceded: 0,
            half_time: None,
        };
        7
    ];
    matches.push(TeamMatch {
        side: TeamSide::Home,
        scored: 12,
        conceded: 12,
        half_time: None,
    });
    let stats = compute_volatility(&matches);
    assert!(stats.scored_cv > 2.5);
    assert_eq!(stats.volatility_percent, 150.0);
}

#[test]
fn resilience_from_half_time_scores() {
    let (_, a) = fixture_analysis();
    assert!(approx(a.resilience.home_comeback, 100.0, 1e-9));
    assert!(approx(a.resilience.home_dropped, 50.0, 1e-9));
    assert!(approx(a.resilience.away_comeback, 0.0, 1e-9));
    assert!(approx(a.resilience.away_dropped, 50.0, 1e-9));

    let drawn_from_lead = parse_resilience("Alpha v Beta 1-1 (1-0)", "", "alpha", "beta");
    assert_eq!(drawn_from_lead.home_dropped, 100.0);
    assert_eq!(drawn_from_lead.home_comeback, 0.0);
    assert_eq!(drawn_from_lead.away_dropped, 0.0);
}

#[test]
fn fixture_raises_expected_flags_in_rule_order() {
    let (_, a) = fixture_analysis();
    assert_eq!(
        ids(&a, &FlagThresholds::default()),
        vec![
            "fts-htc",
            "ppg-bias-home",
            "ppg-bias-away",
            "hva-home",
            "late-home-goal",
            "res-home",
            "res-away-drop",
            "half-skew",
            "goal-edge",
            "res-clash-brittle",
            "volatile-match",
        ]
    );

    let flags = evaluate_flags(&a, &FlagThresholds::default());
    let fast_start = &flags[0];
    assert_eq!(fast_start.kind, FlagKind::Good);
    assert_eq!(
        fast_start.description,
        "Home scores first (65%) vs. Away concedes first (58%) at venue."
    );
    let volatile = flags.last().expect("flags not empty");
    assert_eq!(volatile.kind, FlagKind::Alert);
    assert!(volatile.description.contains("96%"));
}

#[test]
fn evaluation_is_deterministic() {
    let (_, a) = fixture_analysis();
    let t = FlagThresholds::default();
    assert_eq!(evaluate_flags(&a, &t), evaluate_flags(&a, &t));
}

#[test]
fn threshold_overrides_change_which_flags_fire() {
    let (_, a) = fixture_analysis();
    let strict = FlagThresholds::default().with_overrides(|key| match key {
        "FLAG_VOLATILITY_THRESHOLD" => Some("99".to_string()),
        "FLAG_GOAL_EDGE_THRESHOLD" => Some(" 1.5 ".to_string()),
        "FLAG_BIAS_THRESHOLD" => Some("not a number".to_string()),
        _ => None,
    });
    assert_eq!(strict.volatility, 99.0);
    assert_eq!(strict.goal_edge, 1.5);
    assert_eq!(strict.bias, 0.4);

    let fired = ids(&a, &strict);
    assert!(!fired.contains(&"volatile-match"));
    assert!(!fired.contains(&"goal-edge"));
    assert!(fired.contains(&"ppg-bias-home"));
}

#[test]
fn index_without_goal_edge_row_flags_only_the_mismatch() {
    let inputs = ProfileInputs {
        team_a: "Alpha".to_string(),
        team_b: "Beta".to_string(),
        index_block: "Offence  12  11\nDefence  11  14".to_string(),
        ..ProfileInputs::default()
    };
    let a = Analysis::from_inputs(&inputs);
    assert_eq!(
        ids(&a, &FlagThresholds::default()),
        vec!["mismatch-home-atk"]
    );
    assert!(!a.index.has_goal_edge);
}

#[test]
fn pasted_zero_goal_edge_still_fires() {
    let inputs = ProfileInputs {
        team_a: "Alpha".to_string(),
        team_b: "Beta".to_string(),
        index_block: "Offence  12  11\nDefence  11  14\nGoal Edge  0.00".to_string(),
        ..ProfileInputs::default()
    };
    let a = Analysis::from_inputs(&inputs);
    assert!(a.index.has_goal_edge);
    assert_eq!(a.index.snapshot.goal_edge, 0.0);
    assert_eq!(
        ids(&a, &FlagThresholds::default()),
        vec!["mismatch-home-atk", "goal-edge"]
    );
}

#[test]
fn prompt_text_carries_parsed_figures() {
    let (inputs, a) = fixture_analysis();
    let query = stats_query(&inputs);
    assert!(query.starts_with("Analyze the upcoming match: **Arsenal vs Chelsea**."));

    let verified = verified_stats_context(&a);
    assert!(verified.contains("Home PPG Bias: 0.45"));
    assert!(verified.contains("Away Scoring Rate (A@A): 60.00"));

    let summary = derived_summary(&a);
    assert!(!summary.is_empty());

    let full = profile_query(&inputs, &a, "Saka doubtful");
    assert!(full.contains("Saka doubtful"));
    assert!(full.contains(&verified));

    let empty = stats_query(&ProfileInputs::default());
    assert!(empty.contains("**Home Team vs Away Team**"));
    assert!(empty.contains("PPG Block: N/A"));
}

#[test]
fn export_reports_what_it_wrote() {
    let (_, a) = fixture_analysis();
    let flags = evaluate_flags(&a, &FlagThresholds::default());
    let dir = std::env::temp_dir().join(format!("match_profiler_xlsx_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("temp dir should be writable");
    let path = dir.join("analysis.xlsx");

    let report = export_analysis(&path, &a, &flags).expect("workbook written");
    assert_eq!(
        report,
        ExportReport {
            sheets: 8,
            segment_rows: 18,
            league_rows: 3,
            flags: 11,
        }
    );
    assert!(path.exists());
    let _ = fs::remove_dir_all(dir);
}
