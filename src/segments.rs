//! Five-minute goal segment tables.
//!
//! Each pasted block is a two-column table (`Home`, `Away`) of `scored-conceded` pairs per
//! 5-minute bucket. Only one column belongs to the subject team at its venue: the home
//! team's block is read from its `Home` column, the away team's block from its `Away`
//! column. The sum of both columns is the team's overall (venue + non-venue) count.

use serde::Serialize;
use tracing::debug;

use crate::tokenize::{columns, lines};

pub const FIVE_MIN_SEGMENTS: [&str; 18] = [
    "1-5", "6-10", "11-15", "16-20", "21-25", "26-30", "31-35", "36-40", "41-45", "46-50",
    "51-55", "56-60", "61-65", "66-70", "71-75", "76-80", "81-85", "86-90",
];

/// Minutes 76-90; the closing three buckets ("86-90" absorbs stoppage time).
pub const LATE_RANGE: (u8, u8) = (76, 90);
/// Minutes 1-10.
pub const EARLY_RANGE: (u8, u8) = (1, 10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalCount {
    pub scored: u32,
    pub conceded: u32,
}

impl GoalCount {
    fn add(&mut self, other: GoalCount) {
        self.scored = self.scored.saturating_add(other.scored);
        self.conceded = self.conceded.saturating_add(other.conceded);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiveMinuteSegment {
    pub label: &'static str,
    pub home: GoalCount,
    pub away: GoalCount,
    pub home_overall: GoalCount,
    pub away_overall: GoalCount,
}

impl FiveMinuteSegment {
    fn empty(label: &'static str) -> Self {
        Self {
            label,
            home: GoalCount::default(),
            away: GoalCount::default(),
            home_overall: GoalCount::default(),
            away_overall: GoalCount::default(),
        }
    }

    /// First and last minute covered by this bucket.
    pub fn minutes(&self) -> (u8, u8) {
        bucket_minutes(self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSide {
    Home,
    Away,
    HomeOverall,
    AwayOverall,
}

/// Always the 18 buckets in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSeries {
    pub segments: Vec<FiveMinuteSegment>,
    pub home_lines: String,
    pub away_lines: String,
}

impl Default for SegmentSeries {
    fn default() -> Self {
        Self {
            segments: FIVE_MIN_SEGMENTS.iter().copied().map(FiveMinuteSegment::empty).collect(),
            home_lines: String::new(),
            away_lines: String::new(),
        }
    }
}

impl SegmentSeries {
    /// Sum of the discrete buckets that make up `first..=last` minutes. `None` if either
    /// end does not fall on a bucket boundary.
    pub fn range_total(&self, first: u8, last: u8, side: SeriesSide) -> Option<GoalCount> {
        if first > last || !self.segments.iter().any(|s| s.minutes().0 == first) {
            return None;
        }
        if !self.segments.iter().any(|s| s.minutes().1 == last) {
            return None;
        }
        let mut total = GoalCount::default();
        for seg in &self.segments {
            let (lo, hi) = seg.minutes();
            if lo >= first && hi <= last {
                total.add(side_count(seg, side));
            }
        }
        Some(total)
    }

    /// Range total from a label such as `"76-90"`.
    pub fn range_total_label(&self, range: &str, side: SeriesSide) -> Option<GoalCount> {
        let (first, last) = parse_range(range)?;
        self.range_total(first, last, side)
    }

    pub fn total(&self, side: SeriesSide) -> GoalCount {
        let mut total = GoalCount::default();
        for seg in &self.segments {
            total.add(side_count(seg, side));
        }
        total
    }

    pub fn late(&self, side: SeriesSide) -> GoalCount {
        self.range_total(LATE_RANGE.0, LATE_RANGE.1, side)
            .unwrap_or_default()
    }

    pub fn early(&self, side: SeriesSide) -> GoalCount {
        self.range_total(EARLY_RANGE.0, EARLY_RANGE.1, side)
            .unwrap_or_default()
    }

    pub fn segment(&self, label: &str) -> Option<&FiveMinuteSegment> {
        self.segments.iter().find(|s| s.label == label)
    }
}

pub fn parse_five_minute_blocks(home_block: &str, away_block: &str) -> SegmentSeries {
    let mut series = SegmentSeries::default();
    let mut home_lines = Vec::new();
    let mut away_lines = Vec::new();

    for (label, row) in segment_rows(home_block) {
        let Some(seg) = series.segments.iter_mut().find(|s| s.label == label) else {
            continue;
        };
        seg.home = row.home;
        seg.home_overall = row.overall();
        home_lines.push(format!("{label}: {}-{}", row.home.scored, row.home.conceded));
    }
    for (label, row) in segment_rows(away_block) {
        let Some(seg) = series.segments.iter_mut().find(|s| s.label == label) else {
            continue;
        };
        seg.away = row.away;
        seg.away_overall = row.overall();
        away_lines.push(format!("{label}: {}-{}", row.away.scored, row.away.conceded));
    }

    series.home_lines = home_lines.join("\n");
    series.away_lines = away_lines.join("\n");
    series
}

#[derive(Debug, Clone, Copy, Default)]
struct SegmentRow {
    home: GoalCount,
    away: GoalCount,
}

impl SegmentRow {
    fn overall(&self) -> GoalCount {
        let mut out = self.home;
        out.add(self.away);
        out
    }
}

/// Rows of a block keyed by bucket label. The last two columns are `Home` and `Away`.
fn segment_rows(block: &str) -> Vec<(&'static str, SegmentRow)> {
    let mut out = Vec::new();
    for line in lines(block) {
        let Some(label) = FIVE_MIN_SEGMENTS.iter().copied().find(|l| starts_with_label(line, l))
        else {
            continue;
        };
        let cols = columns(line);
        if cols.len() < 3 {
            debug!(line, "segment row without home/away columns");
            continue;
        }
        let home = parse_pair(cols[cols.len() - 2]);
        let away = parse_pair(cols[cols.len() - 1]);
        if home.is_none() && away.is_none() {
            debug!(line, "segment row without scored-conceded pairs");
            continue;
        }
        out.push((
            label,
            SegmentRow {
                home: home.unwrap_or_default(),
                away: away.unwrap_or_default(),
            },
        ));
    }
    out
}

fn starts_with_label(line: &str, label: &str) -> bool {
    line.strip_prefix(label)
        .is_some_and(|rest| rest.starts_with(' ') || rest.starts_with('\t'))
}

/// `"2-1"` → scored 2, conceded 1.
fn parse_pair(raw: &str) -> Option<GoalCount> {
    let (scored, conceded) = raw.trim().split_once('-')?;
    Some(GoalCount {
        scored: scored.trim().parse().ok()?,
        conceded: conceded.trim().parse().ok()?,
    })
}

fn parse_range(range: &str) -> Option<(u8, u8)> {
    let (first, last) = range.trim().split_once('-')?;
    Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
}

fn bucket_minutes(label: &str) -> (u8, u8) {
    parse_range(label).unwrap_or_default()
}

fn side_count(seg: &FiveMinuteSegment, side: SeriesSide) -> GoalCount {
    match side {
        SeriesSide::Home => seg.home,
        SeriesSide::Away => seg.away,
        SeriesSide::HomeOverall => seg.home_overall,
        SeriesSide::AwayOverall => seg.away_overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefix_does_not_confuse_similar_buckets() {
        assert!(starts_with_label("1-5   1-0  0-0", "1-5"));
        assert!(!starts_with_label("11-15   1-0  0-0", "1-5"));
        assert!(!starts_with_label("1-50 x", "1-5"));
    }

    #[test]
    fn parse_pair_reads_scored_then_conceded() {
        assert_eq!(parse_pair("2-1"), Some(GoalCount { scored: 2, conceded: 1 }));
        assert_eq!(parse_pair("x-1"), None);
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let block = "1-5  4294967295-0  1-0\n6-10  4294967295-0  0-0";
        let series = parse_five_minute_blocks(block, "");
        let first = series.segment("1-5").expect("bucket present");
        assert_eq!(first.home.scored, u32::MAX);
        assert_eq!(first.home_overall.scored, u32::MAX);
        assert_eq!(series.total(SeriesSide::Home).scored, u32::MAX);
        assert_eq!(series.early(SeriesSide::HomeOverall).scored, u32::MAX);
    }
}
