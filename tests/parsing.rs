use std::fs;
use std::path::PathBuf;

use match_profiler::analysis::ProfileInputs;
use match_profiler::half_data::{extract_half_split, parse_half_sections, parse_half_split_stats};
use match_profiler::index_block::parse_index_block;
use match_profiler::league_table::parse_league_table;
use match_profiler::ppg_block::parse_ppg_block;
use match_profiler::results::{
    LineParse, SkipReason, TeamSide, VenueFilter, parse_result_line, parse_results_block,
    team_matches,
};
use match_profiler::segments::{SeriesSide, parse_five_minute_blocks};
use match_profiler::venue_block::{parse_venue_stats, venue_comparison};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_inputs() -> ProfileInputs {
    serde_json::from_str(&read_fixture("profile_inputs.json")).expect("fixture should parse")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn fixture_uses_camel_case_keys() {
    let inputs = fixture_inputs();
    assert_eq!(inputs.team_a, "Arsenal");
    assert_eq!(inputs.team_b, "Chelsea");
    assert!(inputs.league_table_block.contains("Leeds United"));
    assert!(!inputs.is_empty());
    assert!(ProfileInputs::default().is_empty());
}

#[test]
fn ppg_block_reads_home_and_away_from_the_end_of_each_row() {
    let inputs = fixture_inputs();
    let block = parse_ppg_block(&inputs.ppg_block, "Arsenal", "Chelsea");
    assert_eq!(block.home.team_label, "Arsenal");
    assert!(close(block.home.season_ppg, 2.25));
    assert!(close(block.away.season_ppg, 1.40));
    assert!(close(block.home.last8_ppg, 2.50));
    assert!(close(block.away.last8_ppg, 1.10));
    assert!(close(block.home.opponent_last8_ppg, 1.40));
    assert!(close(block.away.opponent_last8_ppg, 1.55));
    assert!(close(block.home.ppg_bias, 0.45));
    assert!(close(block.away.ppg_bias, -0.50));
    assert!(block.home_text.contains("PPG Bias: 0.45"));
}

#[test]
fn ppg_block_falls_back_to_scanning_free_text() {
    let raw = "Season PPG 1.9 1.2 and then PPG Bias +0.3 -0.1";
    let block = parse_ppg_block(raw, "", "");
    assert_eq!(block.home.team_label, "Home");
    assert_eq!(block.away.team_label, "Away");
    assert!(close(block.home.season_ppg, 1.9));
    assert!(close(block.away.season_ppg, 1.2));
    assert!(close(block.home.ppg_bias, 0.3));
    assert!(close(block.away.ppg_bias, -0.1));
    assert_eq!(block.home.last8_ppg, 0.0);
}

#[test]
fn index_block_splits_side_rows_from_fixture_rows() {
    let inputs = fixture_inputs();
    let block = parse_index_block(&inputs.index_block);
    let idx = block.snapshot;
    assert!(close(idx.home_offence, 14.2));
    assert!(close(idx.away_offence, 11.8));
    assert!(close(idx.home_defence, 12.5));
    assert!(close(idx.away_defence, 13.6));
    assert!(close(idx.home_vs_away, -0.2));
    assert!(close(idx.goal_edge, 1.8));
    assert!(block.shared_text.contains("Goal Edge"));
    assert!(block.home_text.contains("Offence: 14.20"));
    assert!(block.away_text.contains("Defence: 13.60"));
}

#[test]
fn venue_tables_feed_the_comparison_rows() {
    let inputs = fixture_inputs();
    let overall = parse_venue_stats(&inputs.overall_stats_block);
    let venue = parse_venue_stats(&inputs.at_venue_stats_block);
    assert!(close(venue.home.first_to_score_pct, 65.0));
    assert!(close(venue.away.first_to_concede_pct, 58.0));
    assert!(close(venue.home.scoring_rate, 85.0));
    assert!(close(venue.away.conceding_rate, 80.0));

    let rows = venue_comparison(&overall, &venue);
    assert_eq!(rows[0].stat, "PPG");
    assert!(close(rows[0].home_overall, 2.10));
    assert!(close(rows[0].home_venue, 2.40));
    assert!(close(rows[0].away_venue, 1.10));
}

#[test]
fn result_lines_parse_with_and_without_half_time() {
    let LineParse::Parsed(rec) = parse_result_line("Man City v Liverpool 2-1") else {
        panic!("line should parse");
    };
    assert_eq!(rec.home_team, "Man City");
    assert_eq!(rec.away_team, "Liverpool");
    assert_eq!(rec.half_time, None);

    let matches = team_matches(&[rec], "city", VenueFilter::Any);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].side, TeamSide::Home);
    assert_eq!(matches[0].scored, 2);
    assert_eq!(matches[0].conceded, 1);

    assert_eq!(
        parse_result_line("   "),
        LineParse::Skipped(SkipReason::Blank)
    );
    assert_eq!(
        parse_result_line("Arsenal 2 Chelsea 1"),
        LineParse::Skipped(SkipReason::NoMatch)
    );
}

#[test]
fn venue_filter_limits_which_side_counts() {
    let inputs = fixture_inputs();
    let records = parse_results_block(&inputs.home_results_block);
    assert_eq!(records.len(), 5);
    assert_eq!(team_matches(&records, "arsenal", VenueFilter::Any).len(), 5);
    assert_eq!(team_matches(&records, "arsenal", VenueFilter::Home).len(), 4);

    let away = team_matches(&records, "arsenal", VenueFilter::Away);
    assert_eq!(away.len(), 1);
    assert_eq!(away[0].scored, 2);
    assert_eq!(away[0].half_time, Some((1, 0)));
}

#[test]
fn five_minute_blocks_take_the_venue_column() {
    let inputs = fixture_inputs();
    let series =
        parse_five_minute_blocks(&inputs.home_five_min_block, &inputs.away_five_min_block);
    assert_eq!(series.segments.len(), 18);

    let late_home = series.late(SeriesSide::Home);
    assert_eq!((late_home.scored, late_home.conceded), (6, 3));
    let late_away = series.late(SeriesSide::Away);
    assert_eq!((late_away.scored, late_away.conceded), (4, 7));

    let early = series.early(SeriesSide::Home);
    assert_eq!((early.scored, early.conceded), (1, 0));

    let overall = series.segment("76-80").expect("bucket exists").away_overall;
    assert_eq!((overall.scored, overall.conceded), (1, 2));

    assert!(series.range_total_label("77-90", SeriesSide::Home).is_none());
    assert!(series.home_lines.contains("86-90: 4-2"));
}

#[test]
fn segment_range_of_three_buckets_is_summed() {
    let home = "76-80  1-0  0-0\n81-85  1-1  0-0\n86-90  1-0  0-0";
    let series = parse_five_minute_blocks(home, "");
    let total = series
        .range_total_label("76-90", SeriesSide::Home)
        .expect("range on bucket boundaries");
    assert_eq!((total.scored, total.conceded), (3, 1));
    assert_eq!(series.total(SeriesSide::Away).scored, 0);
}

#[test]
fn half_data_sections_and_percentages() {
    let inputs = fixture_inputs();
    let sections = parse_half_sections(&inputs.half_scored_block);
    assert!(sections.home_at_home.starts_with("1ST HALF OVERS"));
    assert!(sections.away_at_away.contains("GOALS BY HALF 45% 55%"));
    assert!(sections.venue.is_empty());

    let split = extract_half_split(&sections.home_at_home);
    assert!(close(split.first_half_over05, 70.0));
    assert!(close(split.first_half_over15, 30.0));
    assert!(close(split.second_half_over05, 80.0));
    assert!(close(split.second_half_goal_pct, 62.0));

    let stats = parse_half_split_stats(&inputs.half_scored_block, &inputs.half_conceded_block);
    assert!(close(stats.away_conceded.second_half_goal_pct, 65.0));
    assert!(close(stats.home_conceded.first_half_goal_pct, 48.0));
}

#[test]
fn half_data_header_on_the_same_line_as_its_text() {
    let sections = parse_half_sections("preamble\nH@H: GOALS BY HALF 40% 60%\nAvg: 1.2");
    assert_eq!(sections.home_at_home, "GOALS BY HALF 40% 60%");
    assert_eq!(sections.avg, "1.2");
    assert!(close(extract_half_split(&sections.home_at_home).second_half_goal_pct, 60.0));
}

#[test]
fn league_table_skips_unplayed_rows_and_marks_fixture_teams() {
    let inputs = fixture_inputs();
    let league = parse_league_table(&inputs.league_table_block, "arsenal", "chelsea");
    assert_eq!(league.team_count(), 3);
    assert_eq!(league.teams[2].name, "Leeds United");
    assert_eq!(league.teams[0].highlight, Some(TeamSide::Home));
    assert_eq!(league.teams[1].highlight, Some(TeamSide::Away));
    assert_eq!(league.teams[2].highlight, None);
    assert!(close(league.teams[0].gf_per_game, 2.0));
    assert!(close(league.avg_gf, 40.0 / 30.0));
    assert!(close(league.avg_ga, 40.0 / 30.0));

    let empty = parse_league_table("", "a", "b");
    assert_eq!(empty.team_count(), 0);
    assert_eq!(empty.avg_gf, 0.0);
}

#[test]
fn league_names_ending_in_digits_are_read_whole() {
    let spaced = "1. Schalke 04 10 4 3 3 14 12 15\n2. Hannover 96 10 5 1 4 12 11 16";
    let aligned = "1\tSchalke 04\t10\t4\t3\t3\t14\t12\t15\n2\tHannover 96\t10\t5\t1\t4\t12\t11\t16";
    for raw in [spaced, aligned] {
        let league = parse_league_table(raw, "Schalke", "Hannover");
        assert_eq!(league.team_count(), 2);
        assert_eq!(league.teams[0].name, "Schalke 04");
        assert_eq!(league.teams[0].games_played, 10);
        assert_eq!(league.teams[0].goals_for, 14);
        assert_eq!(league.teams[0].goals_against, 12);
        assert_eq!(league.teams[0].highlight, Some(TeamSide::Home));
        assert_eq!(league.teams[1].name, "Hannover 96");
        assert_eq!(league.teams[1].highlight, Some(TeamSide::Away));
        assert!(close(league.avg_gf, 26.0 / 20.0));
    }
}

#[test]
fn league_averages_match_the_plotted_points() {
    let league = parse_league_table(
        &fixture_inputs().league_table_block,
        "arsenal",
        "chelsea",
    );
    let games: f64 = league.teams.iter().map(|t| f64::from(t.games_played)).sum();
    let gf: f64 = league
        .teams
        .iter()
        .map(|t| t.gf_per_game * f64::from(t.games_played))
        .sum();
    let ga: f64 = league
        .teams
        .iter()
        .map(|t| t.ga_per_game * f64::from(t.games_played))
        .sum();
    assert!((gf / games - league.avg_gf).abs() < 1e-9);
    assert!((ga / games - league.avg_ga).abs() < 1e-9);
}
