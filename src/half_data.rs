//! Half-by-half goal blocks (one for goals scored, one for goals conceded).
//!
//! The paste is split into sections by literal header tokens; everything after a header
//! belongs to that section until the next header.

use serde::Serialize;

use crate::fields::{Label, scan_values};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    HomeAtHome,
    AwayAtAway,
    Venue,
    HomeSeason,
    AwaySeason,
    Avg,
}

const HEADERS: [(&str, Section); 6] = [
    ("H@H:", Section::HomeAtHome),
    ("A@A:", Section::AwayAtAway),
    ("Venue:", Section::Venue),
    ("Home Season:", Section::HomeSeason),
    ("Away Season:", Section::AwaySeason),
    ("Avg:", Section::Avg),
];

const FIRST_HALF_OVERS: Label<'static> = Label::exact("1ST HALF OVERS");
const SECOND_HALF_OVERS: Label<'static> = Label::exact("2ND HALF OVERS");
const GOALS_BY_HALF: Label<'static> = Label::exact("GOALS BY HALF");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HalfSections {
    pub home_at_home: String,
    pub away_at_away: String,
    pub venue: String,
    pub home_season: String,
    pub away_season: String,
    pub avg: String,
}

impl HalfSections {
    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::HomeAtHome => &mut self.home_at_home,
            Section::AwayAtAway => &mut self.away_at_away,
            Section::Venue => &mut self.venue,
            Section::HomeSeason => &mut self.home_season,
            Section::AwaySeason => &mut self.away_season,
            Section::Avg => &mut self.avg,
        }
    }
}

/// Percentages for one side and one phase (scored or conceded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HalfSplit {
    pub first_half_over05: f64,
    pub first_half_over15: f64,
    pub second_half_over05: f64,
    pub second_half_over15: f64,
    pub first_half_goal_pct: f64,
    pub second_half_goal_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HalfSplitStats {
    pub home_scored: HalfSplit,
    pub home_conceded: HalfSplit,
    pub away_scored: HalfSplit,
    pub away_conceded: HalfSplit,
}

pub fn parse_half_sections(raw: &str) -> HalfSections {
    let mut sections = HalfSections::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        let header = HEADERS
            .iter()
            .find_map(|(token, section)| trimmed.strip_prefix(*token).map(|rest| (*section, rest)));

        let text = match header {
            Some((section, rest)) => {
                current = Some(section);
                rest.trim()
            }
            None => trimmed,
        };
        let Some(section) = current else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        let slot = sections.slot(section);
        if !slot.is_empty() {
            slot.push('\n');
        }
        slot.push_str(text);
    }
    sections
}

pub fn extract_half_split(section_text: &str) -> HalfSplit {
    if section_text.trim().is_empty() {
        return HalfSplit::default();
    }
    let [first_half_over05, first_half_over15] =
        scan_values::<2>(section_text, FIRST_HALF_OVERS).unwrap_or_default();
    let [second_half_over05, second_half_over15] =
        scan_values::<2>(section_text, SECOND_HALF_OVERS).unwrap_or_default();
    let [first_half_goal_pct, second_half_goal_pct] =
        scan_values::<2>(section_text, GOALS_BY_HALF).unwrap_or_default();
    HalfSplit {
        first_half_over05,
        first_half_over15,
        second_half_over05,
        second_half_over15,
        first_half_goal_pct,
        second_half_goal_pct,
    }
}

/// Home figures come from the `H@H:` section, away figures from `A@A:`.
pub fn parse_half_split_stats(scored_block: &str, conceded_block: &str) -> HalfSplitStats {
    let scored = parse_half_sections(scored_block);
    let conceded = parse_half_sections(conceded_block);
    HalfSplitStats {
        home_scored: extract_half_split(&scored.home_at_home),
        home_conceded: extract_half_split(&conceded.home_at_home),
        away_scored: extract_half_split(&scored.away_at_away),
        away_conceded: extract_half_split(&conceded.away_at_away),
    }
}
