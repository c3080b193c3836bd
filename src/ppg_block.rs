use serde::Serialize;

use crate::fields::{ColumnPick, Label, row_values, scan_values};

/// The PPG table is six or more columns wide; home and away sit third and second from
/// the end.
const PPG_PICK: ColumnPick = ColumnPick::FromEnd(3);
const PPG_MIN_COLUMNS: usize = 6;

const SEASON: Label<'static> = Label::exact("PPG").excluding(&["Opp PPG", "PPG L8", "PPG Bias"]);
const LAST8: Label<'static> = Label::prefix("PPG L8").excluding(&["Opp PPG L8"]);
const OPP_LAST8: Label<'static> = Label::prefix("Opp PPG L8");
const BIAS: Label<'static> = Label::prefix("PPG Bias");

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PpgSnapshot {
    pub team_label: String,
    pub season_ppg: f64,
    pub last8_ppg: f64,
    pub opponent_last8_ppg: f64,
    pub ppg_bias: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PpgBlock {
    pub home: PpgSnapshot,
    pub away: PpgSnapshot,
    /// `Stat: value` lines per side, for the prompt.
    pub home_text: String,
    pub away_text: String,
}

pub fn parse_ppg_block(raw: &str, team_a: &str, team_b: &str) -> PpgBlock {
    let mut home = PpgSnapshot {
        team_label: label_or(team_a, "Home"),
        ..PpgSnapshot::default()
    };
    let mut away = PpgSnapshot {
        team_label: label_or(team_b, "Away"),
        ..PpgSnapshot::default()
    };
    if raw.trim().is_empty() {
        return PpgBlock {
            home,
            away,
            ..PpgBlock::default()
        };
    }

    let mut home_text = Vec::new();
    let mut away_text = Vec::new();
    let rows: [(&str, Label<'static>, fn(&mut PpgSnapshot) -> &mut f64); 4] = [
        ("PPG", SEASON, |s| &mut s.season_ppg),
        ("PPG L8", LAST8, |s| &mut s.last8_ppg),
        ("Opp PPG L8", OPP_LAST8, |s| &mut s.opponent_last8_ppg),
        ("PPG Bias", BIAS, |s| &mut s.ppg_bias),
    ];

    for (name, label, field) in rows {
        let found = row_values::<2>(raw, label, PPG_PICK, PPG_MIN_COLUMNS)
            .or_else(|| scan_values::<2>(raw, label));
        let Some([h, a]) = found else {
            continue;
        };
        *field(&mut home) = h;
        *field(&mut away) = a;
        home_text.push(format!("{name}: {h:.2}"));
        away_text.push(format!("{name}: {a:.2}"));
    }

    PpgBlock {
        home,
        away,
        home_text: home_text.join("\n"),
        away_text: away_text.join("\n"),
    }
}

pub(crate) fn label_or(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
