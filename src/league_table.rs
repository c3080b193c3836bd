use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::results::TeamSide;
use crate::tokenize::columns;

static RANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.?$").expect("rank pattern is valid"));

/// GP, W, D, L, GF, GA.
const STAT_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantTeam {
    pub name: String,
    pub games_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub gf_per_game: f64,
    pub ga_per_game: f64,
    /// Set when the row is one of the two fixture teams.
    pub highlight: Option<TeamSide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeagueQuadrant {
    pub teams: Vec<QuadrantTeam>,
    /// League-wide goals for per game, weighted by games played.
    pub avg_gf: f64,
    pub avg_ga: f64,
}

impl LeagueQuadrant {
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Rank, name, GP, W, D, L, GF, GA (anything after GA is ignored).
pub fn parse_league_table(raw: &str, team_a: &str, team_b: &str) -> LeagueQuadrant {
    let home_key = team_a.trim().to_lowercase();
    let away_key = team_b.trim().to_lowercase();

    let mut teams = Vec::new();
    let (mut total_gf, mut total_ga, mut total_gp) = (0u64, 0u64, 0u64);

    for line in raw.lines() {
        let Some((name, nums)) = split_row(line.trim()) else {
            continue;
        };
        let [gp, _, _, _, gf, ga] = nums;
        if gp == 0 {
            continue;
        }

        total_gf += u64::from(gf);
        total_ga += u64::from(ga);
        total_gp += u64::from(gp);

        let lower = name.to_lowercase();
        let highlight = if !home_key.is_empty() && lower.contains(&home_key) {
            Some(TeamSide::Home)
        } else if !away_key.is_empty() && lower.contains(&away_key) {
            Some(TeamSide::Away)
        } else {
            None
        };

        teams.push(QuadrantTeam {
            name,
            games_played: gp,
            goals_for: gf,
            goals_against: ga,
            gf_per_game: f64::from(gf) / f64::from(gp),
            ga_per_game: f64::from(ga) / f64::from(gp),
            highlight,
        });
    }

    let (avg_gf, avg_ga) = if total_gp > 0 {
        (
            total_gf as f64 / total_gp as f64,
            total_ga as f64 / total_gp as f64,
        )
    } else {
        (0.0, 0.0)
    };

    LeagueQuadrant {
        teams,
        avg_gf,
        avg_ga,
    }
}

/// Name and stat columns of one table row, or `None` for headers and prose.
///
/// A tab or column-aligned paste gives the name its own cell. Otherwise the name may hold
/// digits ("Schalke 04"), so every split is tried and the first one with W + D + L = GP
/// wins; with no consistent split the shortest name is kept.
fn split_row(line: &str) -> Option<(String, [u32; STAT_COUNT])> {
    let cells = columns(line);
    if cells.len() >= STAT_COUNT + 2 && RANK_RE.is_match(cells[0]) {
        if let Some(nums) = stats(&cells[2..]) {
            return Some((cells[1].to_string(), nums));
        }
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < STAT_COUNT + 2 || !RANK_RE.is_match(tokens[0]) {
        return None;
    }
    let mut fallback = None;
    for name_end in 2..=tokens.len() - STAT_COUNT {
        let Some(nums) = stats(&tokens[name_end..]) else {
            continue;
        };
        let name = tokens[1..name_end].join(" ");
        let [gp, w, d, l, ..] = nums;
        if u64::from(w) + u64::from(d) + u64::from(l) == u64::from(gp) {
            return Some((name, nums));
        }
        if fallback.is_none() {
            fallback = Some((name, nums));
        }
    }
    match fallback {
        Some((name, nums)) => {
            debug!(line, "league row results do not add up to games played");
            Some((name, nums))
        }
        None => {
            if tokens[1..].iter().any(|t| t.parse::<u32>().is_ok()) {
                warn!(line, "skipping league table row with unreadable numbers");
            }
            None
        }
    }
}

/// The first six cells as counts; anything after GA is ignored.
fn stats(cells: &[&str]) -> Option<[u32; STAT_COUNT]> {
    let mut out = [0u32; STAT_COUNT];
    for (slot, cell) in out.iter_mut().zip(cells.get(..STAT_COUNT)?) {
        *slot = cell.trim().parse().ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_suffixed_names_keep_their_digits() {
        let (name, nums) = split_row("5. Schalke 04 10 4 3 3 14 12 15").expect("row");
        assert_eq!(name, "Schalke 04");
        assert_eq!(nums, [10, 4, 3, 3, 14, 12]);

        let (name, nums) = split_row("5\tSchalke 04\t10\t4\t3\t3\t14\t12\t15").expect("row");
        assert_eq!(name, "Schalke 04");
        assert_eq!(nums[0], 10);
    }

    #[test]
    fn headers_and_prose_are_not_rows() {
        assert!(split_row("# Team GP W D L GF GA Pts").is_none());
        assert!(split_row("League table as of today").is_none());
        assert!(split_row("1. Arsenal 10 7").is_none());
    }
}
