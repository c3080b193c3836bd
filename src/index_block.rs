use serde::Serialize;

use crate::fields::{ColumnPick, Label, lookup, row_values, scan_values};
use crate::tokenize::{columns, lines};

const OFFENCE: Label<'static> = Label::prefix("Offence");
const DEFENCE: Label<'static> = Label::prefix("Defence");
const HOME_VS_AWAY: Label<'static> = Label::prefix("H v A");
const GOAL_EDGE: Label<'static> = Label::prefix("Goal Edge");

/// Index & Edge figures. Every field is 0.0 when absent.
///
/// `home_vs_away` is signed: negative favours the home side, positive the away side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndexSnapshot {
    pub home_offence: f64,
    pub home_defence: f64,
    pub away_offence: f64,
    pub away_defence: f64,
    pub home_vs_away: f64,
    pub goal_edge: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexBlock {
    pub snapshot: IndexSnapshot,
    pub home_text: String,
    pub away_text: String,
    /// Single-value rows (H v A, Goal Edge) that belong to the fixture, not a side.
    pub shared_text: String,
    /// A Goal Edge value was read, so a 0.00 edge is a real reading.
    pub has_goal_edge: bool,
}

pub fn parse_index_snapshot(raw: &str) -> IndexSnapshot {
    if raw.trim().is_empty() {
        return IndexSnapshot::default();
    }
    let [home_offence, away_offence] = lookup::<2>(raw, OFFENCE, ColumnPick::Leading, 3);
    let [home_defence, away_defence] = lookup::<2>(raw, DEFENCE, ColumnPick::Leading, 3);
    let [home_vs_away] = lookup::<1>(raw, HOME_VS_AWAY, ColumnPick::Leading, 2);
    let [goal_edge] = lookup::<1>(raw, GOAL_EDGE, ColumnPick::Leading, 2);
    IndexSnapshot {
        home_offence,
        home_defence,
        away_offence,
        away_defence,
        home_vs_away,
        goal_edge,
    }
}

pub fn parse_index_block(raw: &str) -> IndexBlock {
    let mut home_text = Vec::new();
    let mut away_text = Vec::new();
    let mut shared_text = Vec::new();

    for line in lines(raw) {
        let cols = columns(line);
        let name = cols.first().copied().unwrap_or_default();
        if name.starts_with(HOME_VS_AWAY.phrase) || name.starts_with(GOAL_EDGE.phrase) {
            shared_text.push(line.to_string());
        } else if cols.len() >= 3 {
            home_text.push(format!("{name}: {}", cols[cols.len() - 2]));
            away_text.push(format!("{name}: {}", cols[cols.len() - 1]));
        }
    }

    IndexBlock {
        snapshot: parse_index_snapshot(raw),
        home_text: home_text.join("\n"),
        away_text: away_text.join("\n"),
        shared_text: shared_text.join("\n"),
        has_goal_edge: row_values::<1>(raw, GOAL_EDGE, ColumnPick::Leading, 2)
            .or_else(|| scan_values::<1>(raw, GOAL_EDGE))
            .is_some(),
    }
}
